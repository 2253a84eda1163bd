use crate::error::SolveError;

/// A linear program over nonnegative variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Variable names, in column order
    pub variables: Vec<String>,
    /// Objective function coefficients (costs)
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: true,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check dimensions and finiteness before building a tableau
    pub fn validate(&self) -> Result<(), SolveError> {
        let n = self.num_variables();
        if self.objective.coefficients.len() != n {
            return Err(SolveError::InvalidProblem(format!(
                "objective has {} coefficients for {} variables",
                self.objective.coefficients.len(),
                n
            )));
        }
        if let Some(j) = self.objective.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(SolveError::InvalidProblem(format!(
                "objective coefficient of {} is not finite",
                self.variables[j]
            )));
        }

        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(SolveError::InvalidProblem(format!(
                    "constraint {} has {} coefficients for {} variables",
                    c.name,
                    c.coefficients.len(),
                    n
                )));
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|x| !x.is_finite()) {
                return Err(SolveError::InvalidProblem(format!(
                    "constraint {} has a non-finite value",
                    c.name
                )));
            }
        }

        Ok(())
    }
}

impl Objective {
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients.iter().zip(values).map(|(c, x)| c * x).sum()
    }
}

impl Constraint {
    /// Left-hand side value for the given assignment
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.coefficients.iter().zip(values).map(|(a, x)| a * x).sum()
    }

    /// Whether the assignment satisfies this constraint within `tolerance`
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.activity(values);
        match self.op {
            ConstraintOp::Le => lhs <= self.rhs + tolerance,
            ConstraintOp::Ge => lhs >= self.rhs - tolerance,
            ConstraintOp::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_ragged_constraint() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 1.0], true);
        problem.add_constraint("short", vec![1.0], ConstraintOp::Le, 3.0);

        assert!(matches!(problem.validate(), Err(SolveError::InvalidProblem(_))));
    }

    #[test]
    fn test_validate_rejects_nan_rhs() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("bad", vec![1.0], ConstraintOp::Eq, f64::NAN);

        assert!(problem.validate().is_err());
    }

    #[test]
    fn test_constraint_satisfaction() {
        let c = Constraint {
            name: "sum".to_string(),
            coefficients: vec![1.0, 2.0],
            op: ConstraintOp::Le,
            rhs: 5.0,
        };
        assert!(c.is_satisfied(&[1.0, 2.0], 1e-9));
        assert!(!c.is_satisfied(&[2.0, 2.0], 1e-9));
        assert_eq!(c.activity(&[2.0, 2.0]), 6.0);
        assert_eq!(ConstraintOp::Le.flipped(), ConstraintOp::Ge);
    }
}
