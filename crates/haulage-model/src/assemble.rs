use haulage_solver::{Constraint, ConstraintOp, LpProblem};
use tracing::debug;

use crate::error::TransportError;
use crate::model::Model;

/// A position in the origin x destination matrix
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub origin: usize,
    pub destination: usize,
}

/// Why a matrix cell carries no decision variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinReason {
    /// No route exists for the pair
    Unreachable,
    /// The destination has no order, so nothing is shipped there
    Unordered,
}

/// Linear constraints of one transportation model.
///
/// Decision variables exist only for reachable cells of ordered destinations,
/// listed origin-major. Every other cell is pinned to zero. Rows are laid out
/// as one demand equality per ordered destination, then one supply cap per
/// origin.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    variables: Vec<Cell>,
    pinned: Vec<(Cell, PinReason)>,
    constraints: Vec<Constraint>,
    /// Destination column of each demand row
    demand_rows: Vec<usize>,
    /// Origin row of each supply row
    supply_rows: Vec<usize>,
    total_demand: f64,
}

/// Derive demand equalities and supply caps from a model.
///
/// The supply cap on each origin is the total demand. It only binds when a
/// single origin serves every order, so it almost never prunes a plan.
pub fn assemble(model: &Model) -> Result<ConstraintSet, TransportError> {
    let costs = model.costs();
    let n_origins = model.origins().len();
    let n_destinations = model.destinations().len();

    for j in model.ordered_destinations() {
        if !(0..n_origins).any(|i| costs.is_reachable(i, j)) {
            return Err(TransportError::InfeasibleStructure {
                destination: model.destinations()[j].clone(),
            });
        }
    }

    let mut variables = Vec::new();
    let mut pinned = Vec::new();
    for origin in 0..n_origins {
        for destination in 0..n_destinations {
            let cell = Cell { origin, destination };
            if !costs.is_reachable(origin, destination) {
                pinned.push((cell, PinReason::Unreachable));
            } else if model.demand(destination).is_none() {
                pinned.push((cell, PinReason::Unordered));
            } else {
                variables.push(cell);
            }
        }
    }

    let total_demand = model.total_demand();
    let mut constraints = Vec::new();

    let demand_rows: Vec<usize> = model.ordered_destinations().collect();
    for &j in &demand_rows {
        let coefficients = variables
            .iter()
            .map(|cell| if cell.destination == j { 1.0 } else { 0.0 })
            .collect();
        constraints.push(Constraint {
            name: format!("demand[{}]", model.destinations()[j]),
            coefficients,
            op: ConstraintOp::Eq,
            rhs: model.demand(j).unwrap_or(0.0),
        });
    }

    let supply_rows: Vec<usize> = (0..n_origins).collect();
    for &i in &supply_rows {
        let coefficients = variables
            .iter()
            .map(|cell| if cell.origin == i { 1.0 } else { 0.0 })
            .collect();
        constraints.push(Constraint {
            name: format!("supply[{}]", model.origins()[i]),
            coefficients,
            op: ConstraintOp::Le,
            rhs: total_demand,
        });
    }

    debug!(
        variables = variables.len(),
        pinned = pinned.len(),
        constraints = constraints.len(),
        "constraints assembled"
    );

    Ok(ConstraintSet {
        variables,
        pinned,
        constraints,
        demand_rows,
        supply_rows,
        total_demand,
    })
}

impl ConstraintSet {
    /// Cells carrying a decision variable, in variable order
    pub fn variables(&self) -> &[Cell] {
        &self.variables
    }

    /// Cells held at zero, with the reason
    pub fn pinned(&self) -> &[(Cell, PinReason)] {
        &self.pinned
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn demand_rows(&self) -> &[usize] {
        &self.demand_rows
    }

    pub fn supply_rows(&self) -> &[usize] {
        &self.supply_rows
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    /// Index of the constraint row for a demand destination column
    pub fn demand_row(&self, destination: usize) -> Option<usize> {
        self.demand_rows.iter().position(|&j| j == destination)
    }

    /// Index of the constraint row for an origin's supply cap
    pub fn supply_row(&self, origin: usize) -> Option<usize> {
        self.supply_rows
            .iter()
            .position(|&i| i == origin)
            .map(|k| self.demand_rows.len() + k)
    }

    /// Minimum-cost LP over the variable cells
    pub fn to_problem(&self, model: &Model) -> LpProblem {
        let names = self
            .variables
            .iter()
            .map(|cell| {
                format!(
                    "{}->{}",
                    model.origins()[cell.origin],
                    model.destinations()[cell.destination]
                )
            })
            .collect();

        let mut problem = LpProblem::new(names);
        let costs = self
            .variables
            .iter()
            .map(|cell| model.costs().get(cell.origin, cell.destination).unwrap_or(0.0))
            .collect();
        problem.set_objective(costs, true);
        problem.constraints = self.constraints.clone();
        problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{OrderTable, RouteTable};

    #[test]
    fn test_assemble_rows_and_variables() {
        let routes = RouteTable::new()
            .with("A", "X", 2.0)
            .with("A", "Y", 5.0)
            .with("B", "X", 4.0)
            .with("B", "Y", 1.0);
        let orders = OrderTable::new().with("X", 10.0).with("Y", 6.0);
        let model = Model::build(&routes, &orders).unwrap();

        let set = assemble(&model).unwrap();

        assert_eq!(set.variables().len(), 4);
        assert!(set.pinned().is_empty());
        assert_eq!(set.constraints().len(), 4);
        assert_eq!(set.total_demand(), 16.0);

        let demand_x = &set.constraints()[set.demand_row(0).unwrap()];
        assert_eq!(demand_x.name, "demand[X]");
        assert_eq!(demand_x.op, ConstraintOp::Eq);
        assert_eq!(demand_x.rhs, 10.0);
        assert_eq!(demand_x.coefficients, vec![1.0, 0.0, 1.0, 0.0]);

        let supply_b = &set.constraints()[set.supply_row(1).unwrap()];
        assert_eq!(supply_b.name, "supply[B]");
        assert_eq!(supply_b.op, ConstraintOp::Le);
        assert_eq!(supply_b.rhs, 16.0);
        assert_eq!(supply_b.coefficients, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_missing_routes_are_pinned_not_free() {
        let routes = RouteTable::new().with("A", "X", 3.0).with("B", "Y", 1.0).with("B", "W", 0.0);
        let orders = OrderTable::new().with("X", 5.0).with("Y", 5.0);
        let model = Model::build(&routes, &orders).unwrap();

        let set = assemble(&model).unwrap();

        assert_eq!(
            set.variables(),
            [Cell { origin: 0, destination: 0 }, Cell { origin: 1, destination: 1 }]
        );
        let w = model.destination_index("W").unwrap();
        assert!(set.pinned().contains(&(Cell { origin: 0, destination: 1 }, PinReason::Unreachable)));
        assert!(set.pinned().contains(&(Cell { origin: 1, destination: w }, PinReason::Unordered)));

        // The pass-through column gets no demand row; every origin gets a cap
        assert_eq!(set.demand_rows(), [0, 1]);
        assert_eq!(set.supply_rows(), [0, 1]);
        assert_eq!(set.demand_row(w), None);
        assert_eq!(set.supply_row(1), Some(3));

        let problem = set.to_problem(&model);
        assert_eq!(problem.variables, vec!["A->X".to_string(), "B->Y".to_string()]);
        assert_eq!(problem.objective.coefficients, vec![3.0, 1.0]);
    }

    #[test]
    fn test_unreachable_destination() {
        let routes = RouteTable::new().with("A", "X", 3.0);
        let orders = OrderTable::new().with("X", 5.0).with("Y", 5.0);
        let model = Model::build(&routes, &orders).unwrap();

        let err = assemble(&model).unwrap_err();

        assert_eq!(
            err,
            TransportError::InfeasibleStructure {
                destination: "Y".to_string()
            }
        );
    }
}
