use std::ops::Range;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::SolveError;
use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{Analysis, ReducedCost, ShadowPrice, Solution};

/// Consecutive degenerate pivots tolerated before pricing switches to Bland's rule
const DEGENERATE_STREAK_LIMIT: usize = 32;

/// Relative objective drift allowed while breaking ties on the optimal face
const OBJECTIVE_DRIFT_TOLERANCE: f64 = 1e-7;

/// Simplex solver for linear programming problems
///
/// Among several optimal solutions the solver always reports the same one:
/// the first variable is made as large as possible, then the second, and so on.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots across all phases before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Wall-clock cap for one solve
    time_limit: Option<Duration>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            time_limit: None,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        problem.validate()?;

        let mut budget = Budget::start(self.max_iterations, self.time_limit);
        let mut tableau = Tableau::build(problem);

        // Phase 1: Find initial basic feasible solution
        if tableau.n_artificial > 0 {
            self.phase1(&mut tableau, &mut budget)?;
            debug!(iterations = budget.iterations, "phase 1 found a feasible basis");
        }

        // Phase 2: Optimize the real objective
        // Pricing compares gains against an absolute tolerance, so the cost row is
        // normalized to unit magnitude and the sensitivity figures scaled back.
        let minimize = problem.objective.minimize;
        let scale = objective_scale(&problem.objective.coefficients);
        let mut gains = vec![0.0; tableau.n_cols];
        for (gain, &coef) in gains.iter_mut().zip(&problem.objective.coefficients) {
            *gain = (if minimize { -coef } else { coef }) / scale;
        }
        tableau.set_objective(&gains);
        self.optimize(&mut tableau, &mut budget)?;

        let optimum = problem.objective.evaluate(&tableau.values());
        debug!(iterations = budget.iterations, objective = optimum, "phase 2 reached optimality");

        let duals: Vec<f64> = tableau.duals(minimize).into_iter().map(|y| y * scale).collect();
        let reduced: Vec<(f64, bool)> = tableau
            .reduced_costs()
            .into_iter()
            .map(|(rc, is_basic)| (rc * scale, is_basic))
            .collect();

        // Phase 3: pick the canonical vertex of the optimal face
        self.break_ties(&mut tableau, &mut budget)?;

        let values = tableau.values();
        let objective_value = problem.objective.evaluate(&values);
        if (objective_value - optimum).abs() > OBJECTIVE_DRIFT_TOLERANCE * optimum.abs().max(1.0) {
            return Err(SolveError::Numerical(format!(
                "objective drifted from {} to {} while breaking ties",
                optimum, objective_value
            )));
        }

        let analysis = self.analyze(problem, &values, &duals, &reduced);

        info!(
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            iterations = budget.iterations,
            objective = objective_value,
            "LP solved to optimality"
        );

        Ok(Solution {
            values,
            objective_value,
            analysis,
            iterations: budget.iterations,
        })
    }

    fn phase1(&self, tableau: &mut Tableau, budget: &mut Budget) -> Result<(), SolveError> {
        // Maximize -sum(artificials), i.e. minimize the total artificial level
        let mut gains = vec![0.0; tableau.n_cols];
        for j in tableau.artificial_columns() {
            gains[j] = -1.0;
        }
        tableau.set_objective(&gains);

        match self.optimize(tableau, budget) {
            Ok(()) => {}
            Err(SolveError::Unbounded) => {
                return Err(SolveError::Numerical(
                    "phase 1 auxiliary problem reported unbounded".to_string(),
                ));
            }
            Err(e) => return Err(e),
        }

        let level = tableau.artificial_level();
        if level > self.tolerance * tableau.rhs_scale {
            debug!(level, "artificial variables remain positive after phase 1");
            return Err(SolveError::Infeasible);
        }

        let redundant = tableau.drive_out_artificials(self.tolerance);
        if redundant > 0 {
            debug!(redundant, "redundant constraint rows left with a zero artificial");
        }

        for j in tableau.artificial_columns() {
            tableau.banned[j] = true;
        }

        Ok(())
    }

    /// Preemptive pass over the optimal face: maximize each variable in turn,
    /// freezing every column whose movement would undo an earlier stage.
    fn break_ties(&self, tableau: &mut Tableau, budget: &mut Budget) -> Result<(), SolveError> {
        tableau.restrict_to_optimal_face(self.tolerance);

        for k in 0..tableau.n_vars {
            if tableau.banned[k] {
                continue;
            }

            let mut gains = vec![0.0; tableau.n_cols];
            gains[k] = 1.0;
            tableau.set_objective(&gains);

            match self.optimize(tableau, budget) {
                Ok(()) => tableau.restrict_to_optimal_face(self.tolerance),
                Err(SolveError::Unbounded) => {
                    // The current vertex is still optimal; stop refining here
                    debug!(variable = k, "optimal face unbounded along tie-break direction");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    fn optimize(&self, tableau: &mut Tableau, budget: &mut Budget) -> Result<(), SolveError> {
        let mut degenerate_streak = 0;

        loop {
            let bland = degenerate_streak >= DEGENERATE_STREAK_LIMIT;
            let Some(pivot_col) = tableau.entering_column(self.tolerance, bland) else {
                return Ok(());
            };
            let Some(pivot_row) = tableau.leaving_row(pivot_col, self.tolerance) else {
                return Err(SolveError::Unbounded);
            };

            budget.spend()?;

            if tableau.rhs(pivot_row) <= self.tolerance {
                degenerate_streak += 1;
            } else {
                degenerate_streak = 0;
            }

            tableau.pivot(pivot_row, pivot_col);
        }
    }

    fn analyze(
        &self,
        problem: &LpProblem,
        values: &[f64],
        duals: &[f64],
        reduced: &[(f64, bool)],
    ) -> Analysis {
        let shadow_prices = problem
            .constraints
            .iter()
            .zip(duals)
            .map(|(c, &y)| ShadowPrice::new(c.name.clone(), y, self.tolerance))
            .collect();

        let reduced_costs = problem
            .variables
            .iter()
            .zip(values)
            .zip(reduced)
            .map(|((name, &value), &(reduced_cost, is_basic))| ReducedCost {
                variable: name.clone(),
                value,
                reduced_cost,
                is_basic,
            })
            .collect();

        let binding_constraints = problem
            .constraints
            .iter()
            .filter(|c| c.op != ConstraintOp::Eq)
            .filter(|c| (c.activity(values) - c.rhs).abs() <= self.tolerance * c.rhs.abs().max(1.0))
            .map(|c| c.name.clone())
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            binding_constraints,
        }
    }
}

/// Largest objective coefficient magnitude, or 1 for an all-zero objective
fn objective_scale(coefficients: &[f64]) -> f64 {
    let largest = coefficients.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    if largest > 0.0 { largest } else { 1.0 }
}

/// Iteration and wall-clock allowance shared by every phase of one solve
struct Budget {
    iterations: usize,
    max_iterations: usize,
    started: Instant,
    time_limit: Option<Duration>,
}

impl Budget {
    fn start(max_iterations: usize, time_limit: Option<Duration>) -> Self {
        Self {
            iterations: 0,
            max_iterations,
            started: Instant::now(),
            time_limit,
        }
    }

    fn spend(&mut self) -> Result<(), SolveError> {
        if self.iterations >= self.max_iterations {
            return Err(SolveError::IterationLimit {
                iterations: self.iterations,
            });
        }
        if let Some(limit) = self.time_limit {
            let elapsed = self.started.elapsed();
            if elapsed >= limit {
                return Err(SolveError::TimeLimit { elapsed });
            }
        }
        self.iterations += 1;
        Ok(())
    }
}

/// Dense simplex tableau.
///
/// Rows `0..m` are constraints, row `m` holds the reduced gains of the current
/// objective (positive means entering improves it). The last column is the RHS.
/// Columns are laid out as `[variables | slacks | artificials]`.
struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    /// Column carrying the identity entry of each row in the initial basis
    unit_cols: Vec<usize>,
    /// Rows multiplied by -1 to make their RHS nonnegative
    flipped: Vec<bool>,
    /// Columns barred from entering the basis
    banned: Vec<bool>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    n_cols: usize,
    rhs_scale: f64,
}

impl Tableau {
    fn build(problem: &LpProblem) -> Self {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // Normalize each row to a nonnegative RHS before counting auxiliaries
        let flipped: Vec<bool> = problem.constraints.iter().map(|c| c.rhs < 0.0).collect();
        let ops: Vec<ConstraintOp> = problem
            .constraints
            .iter()
            .zip(&flipped)
            .map(|(c, &flip)| if flip { c.op.flipped() } else { c.op })
            .collect();

        let n_slack = ops.iter().filter(|&&op| op != ConstraintOp::Eq).count();
        let n_artificial = ops.iter().filter(|&&op| op != ConstraintOp::Le).count();
        let n_cols = n_vars + n_slack + n_artificial;
        let rhs_col = n_cols;

        let mut tableau = Tableau {
            data: vec![vec![0.0; n_cols + 1]; n_constraints + 1],
            basic_vars: vec![0; n_constraints],
            unit_cols: vec![0; n_constraints],
            flipped,
            banned: vec![false; n_cols],
            n_vars,
            n_slack,
            n_artificial,
            n_cols,
            rhs_scale: 1.0,
        };

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, c) in problem.constraints.iter().enumerate() {
            let sign = if tableau.flipped[i] { -1.0 } else { 1.0 };
            for (j, &coef) in c.coefficients.iter().enumerate() {
                tableau.data[i][j] = sign * coef;
            }
            tableau.data[i][rhs_col] = sign * c.rhs;
            tableau.rhs_scale = tableau.rhs_scale.max(1.0 + c.rhs.abs());

            match ops[i] {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    tableau.unit_cols[i] = slack_idx;
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    tableau.unit_cols[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    tableau.unit_cols[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        tableau
    }

    fn n_rows(&self) -> usize {
        self.basic_vars.len()
    }

    fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.n_cols]
    }

    fn artificial_columns(&self) -> Range<usize> {
        let start = self.n_vars + self.n_slack;
        start..start + self.n_artificial
    }

    fn is_artificial(&self, col: usize) -> bool {
        col >= self.n_vars + self.n_slack
    }

    /// Install objective gains and price out the current basis
    fn set_objective(&mut self, gains: &[f64]) {
        let obj_row = self.n_rows();
        let width = self.n_cols + 1;

        let mut row = vec![0.0; width];
        row[..self.n_cols].copy_from_slice(gains);

        for (i, &basic) in self.basic_vars.iter().enumerate() {
            let g = gains[basic];
            if g != 0.0 {
                for (entry, &a) in row.iter_mut().zip(&self.data[i]) {
                    *entry -= g * a;
                }
            }
        }

        self.data[obj_row] = row;
    }

    fn entering_column(&self, tolerance: f64, bland: bool) -> Option<usize> {
        let obj = &self.data[self.n_rows()];
        let mut candidates = (0..self.n_cols).filter(|&j| !self.banned[j] && obj[j] > tolerance);

        if bland {
            return candidates.next();
        }

        // Most positive gain, lowest index on ties
        let mut best: Option<usize> = None;
        for j in candidates {
            if best.is_none_or(|b| obj[j] > obj[b]) {
                best = Some(j);
            }
        }
        best
    }

    fn leaving_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for i in 0..self.n_rows() {
            let a = self.data[i][col];
            if a <= tolerance {
                continue;
            }
            let ratio = self.rhs(i).max(0.0) / a;
            best = match best {
                None => Some((i, ratio)),
                Some((r, best_ratio)) => {
                    let tie = (ratio - best_ratio).abs() <= tolerance;
                    if (!tie && ratio < best_ratio) || (tie && self.basic_vars[i] < self.basic_vars[r]) {
                        Some((i, ratio))
                    } else {
                        Some((r, best_ratio))
                    }
                }
            };
        }

        best.map(|(i, _)| i)
    }

    fn pivot(&mut self, row: usize, col: usize) {
        self.basic_vars[row] = col;

        // Scale pivot row
        let pivot_val = self.data[row][col];
        for entry in self.data[row].iter_mut() {
            *entry /= pivot_val;
        }

        // Eliminate column in other rows, objective included
        let pivot_row = self.data[row].clone();
        for (i, current) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = current[col];
            if factor == 0.0 {
                continue;
            }
            for (entry, &p) in current.iter_mut().zip(&pivot_row) {
                *entry -= factor * p;
            }
        }
    }

    fn artificial_level(&self) -> f64 {
        (0..self.n_rows())
            .filter(|&i| self.is_artificial(self.basic_vars[i]))
            .map(|i| self.rhs(i).abs())
            .sum()
    }

    /// Pivot zero-level artificials out of the basis; returns how many rows had no replacement
    fn drive_out_artificials(&mut self, tolerance: f64) -> usize {
        let mut redundant = 0;
        let first_artificial = self.n_vars + self.n_slack;

        for i in 0..self.n_rows() {
            if !self.is_artificial(self.basic_vars[i]) {
                continue;
            }
            match (0..first_artificial).find(|&j| self.data[i][j].abs() > tolerance) {
                Some(j) => self.pivot(i, j),
                None => redundant += 1,
            }
        }

        redundant
    }

    /// Ban every nonbasic column whose entry would lower the current objective
    fn restrict_to_optimal_face(&mut self, tolerance: f64) {
        let obj_row = self.n_rows();
        for j in 0..self.n_cols {
            if !self.banned[j] && self.data[obj_row][j] < -tolerance && !self.basic_vars.contains(&j) {
                self.banned[j] = true;
            }
        }
    }

    fn values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.n_vars];
        for (i, &basic) in self.basic_vars.iter().enumerate() {
            if basic < self.n_vars {
                values[basic] = self.rhs(i);
            }
        }
        values
    }

    /// Dual value per original constraint, as d(objective)/d(rhs)
    fn duals(&self, minimize: bool) -> Vec<f64> {
        let obj_row = self.n_rows();
        self.unit_cols
            .iter()
            .zip(&self.flipped)
            .map(|(&col, &flip)| {
                let gain = self.data[obj_row][col];
                let y = if minimize { gain } else { -gain };
                if flip { -y } else { y }
            })
            .collect()
    }

    /// (reduced cost, is basic) per structural variable
    fn reduced_costs(&self) -> Vec<(f64, bool)> {
        let obj_row = self.n_rows();
        (0..self.n_vars)
            .map(|j| {
                if self.basic_vars.contains(&j) {
                    (0.0, true)
                } else {
                    (-self.data[obj_row][j], false)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);
        assert!(solution.analysis.is_binding("x_max"));
        assert!(!solution.analysis.is_binding("y_max"));
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let result = Solver::new().solve(&problem);

        assert_eq!(result.unwrap_err(), SolveError::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        // Maximize x subject to x >= 1
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 1.0);

        let result = Solver::new().solve(&problem);

        assert_eq!(result.unwrap_err(), SolveError::Unbounded);
    }

    #[test]
    fn test_equality_shadow_prices() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y = 4
        //   x <= 3
        // One more unit of demand costs 3 (served by y),
        // one more unit of x capacity saves 1.
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("demand", vec![1.0, 1.0], ConstraintOp::Eq, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem).unwrap();

        let demand = solution.analysis.shadow_price("demand").unwrap();
        let x_max = solution.analysis.shadow_price("x_max").unwrap();
        assert!((demand - 3.0).abs() < 1e-6, "demand dual = {} (expected 3)", demand);
        assert!((x_max + 1.0).abs() < 1e-6, "x_max dual = {} (expected -1)", x_max);
    }

    #[test]
    fn test_negative_rhs_is_normalized() {
        // -x <= -2 is x >= 2; minimize x
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("floor", vec![-1.0], ConstraintOp::Le, -2.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        // Raising the RHS towards zero loosens the floor and lowers the cost
        let dual = solution.analysis.shadow_price("floor").unwrap();
        assert!((dual + 1.0).abs() < 1e-6, "floor dual = {} (expected -1)", dual);
    }

    #[test]
    fn test_redundant_equalities() {
        // x + y = 2 and 2x + 2y = 4 describe the same line
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("a", vec![1.0, 1.0], ConstraintOp::Eq, 2.0);
        problem.add_constraint("b", vec![2.0, 2.0], ConstraintOp::Eq, 4.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        assert!(solution.values[1].abs() < 1e-9);
        assert!((solution.objective_value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_tie_break_prefers_first_variable() {
        // a + 2b = 10 with costs 1 and 2: every split costs 10.
        // Phase 1 enters b first; the tie-break must still land on a = 10.
        let mut problem = LpProblem::new(vec!["a".to_string(), "b".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("total", vec![1.0, 2.0], ConstraintOp::Eq, 10.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 10.0).abs() < 1e-6, "a = {} (expected 10)", solution.values[0]);
        assert!(solution.values[1].abs() < 1e-9, "b = {} (expected 0)", solution.values[1]);
        assert!((solution.objective_value - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_tie_break_is_repeatable() {
        let mut problem = LpProblem::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        problem.set_objective(vec![1.0, 1.0, 1.0], true);
        problem.add_constraint("total", vec![1.0, 1.0, 1.0], ConstraintOp::Eq, 9.0);
        problem.add_constraint("a_cap", vec![1.0, 0.0, 0.0], ConstraintOp::Le, 4.0);

        let solver = Solver::new();
        let first = solver.solve(&problem).unwrap();
        let second = solver.solve(&problem).unwrap();

        assert_eq!(first.values, second.values);
        assert!((first.values[0] - 4.0).abs() < 1e-6);
        assert!((first.values[1] - 5.0).abs() < 1e-6);
        assert!(first.values[2].abs() < 1e-9);
    }

    #[test]
    fn test_tiny_cost_differences_are_priced() {
        // Minimize: 2e-10 a + 1e-10 b
        // Subject to: a + b = 1e6
        // Optimal: a=0, b=1e6, obj=1e-4
        let mut problem = LpProblem::new(vec!["a".to_string(), "b".to_string()]);
        problem.set_objective(vec![2e-10, 1e-10], true);
        problem.add_constraint("demand", vec![1.0, 1.0], ConstraintOp::Eq, 1e6);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!(solution.values[0].abs() < 1e-6, "a = {} (expected 0)", solution.values[0]);
        assert!((solution.values[1] - 1e6).abs() < 1e-6, "b = {} (expected 1e6)", solution.values[1]);
        assert!((solution.objective_value - 1e-4).abs() < 1e-12, "obj = {} (expected 1e-4)", solution.objective_value);

        let demand = solution.analysis.shadow_price("demand").unwrap();
        assert!((demand - 1e-10).abs() < 1e-16, "demand dual = {} (expected 1e-10)", demand);
        let a = &solution.analysis.reduced_costs[0];
        assert!(!a.is_basic);
        assert!((a.reduced_cost - 1e-10).abs() < 1e-16, "a reduced cost = {} (expected 1e-10)", a.reduced_cost);
    }

    #[test]
    fn test_large_costs_keep_their_sensitivity() {
        // Same shape as above with costs scaled up by 1e18
        let mut problem = LpProblem::new(vec!["a".to_string(), "b".to_string()]);
        problem.set_objective(vec![2e8, 1e8], true);
        problem.add_constraint("demand", vec![1.0, 1.0], ConstraintOp::Eq, 5.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[1] - 5.0).abs() < 1e-6, "b = {} (expected 5)", solution.values[1]);
        let demand = solution.analysis.shadow_price("demand").unwrap();
        assert!((demand - 1e8).abs() < 1e-3, "demand dual = {} (expected 1e8)", demand);
    }

    #[test]
    fn test_solver_builder() {
        let solver = Solver::new()
            .with_max_iterations(50)
            .with_tolerance(1e-7)
            .with_time_limit(Duration::from_secs(2));

        assert_eq!(solver.max_iterations(), 50);
        assert_eq!(solver.tolerance(), 1e-7);
        assert_eq!(solver.time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(Solver::new().tolerance(), 1e-9);
    }

    #[test]
    fn test_iteration_limit() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("demand", vec![1.0, 1.0], ConstraintOp::Eq, 4.0);

        let result = Solver::new().with_max_iterations(0).solve(&problem);

        assert_eq!(result.unwrap_err(), SolveError::IterationLimit { iterations: 0 });
    }

    #[test]
    fn test_time_limit() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("demand", vec![1.0, 1.0], ConstraintOp::Eq, 4.0);

        let result = Solver::new().with_time_limit(Duration::ZERO).solve(&problem);

        assert!(matches!(result, Err(SolveError::TimeLimit { .. })));
    }

    #[test]
    fn test_no_constraints() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![5.0], true);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.values, vec![0.0]);
        assert_eq!(solution.objective_value, 0.0);
        assert_eq!(solution.iterations, 0);
    }
}
