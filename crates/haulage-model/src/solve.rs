use haulage_solver::{Analysis, Solver};
use tracing::debug;

use crate::assemble::{Cell, ConstraintSet};
use crate::error::TransportError;
use crate::model::Model;

/// Shipments below this magnitude are rounding noise and reported as zero
pub const SHIPMENT_NOISE: f64 = 1e-9;

/// Absolute slack allowed when re-checking constraints, per unit of RHS
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Solver output still addressed by matrix cell rather than by name
#[derive(Debug, Clone)]
pub struct RawShipment {
    pub cells: Vec<Cell>,
    pub values: Vec<f64>,
    pub objective_value: f64,
    pub analysis: Analysis,
    pub iterations: usize,
}

/// Minimize total shipping cost subject to the assembled constraints
pub fn solve(model: &Model, constraints: &ConstraintSet, solver: &Solver) -> Result<RawShipment, TransportError> {
    let problem = constraints.to_problem(model);
    let solution = solver.solve(&problem)?;

    let values = settle(model, constraints, solution.values)?;

    debug!(
        iterations = solution.iterations,
        objective = solution.objective_value,
        "transport LP solved"
    );

    Ok(RawShipment {
        cells: constraints.variables().to_vec(),
        values,
        objective_value: solution.objective_value,
        analysis: solution.analysis,
        iterations: solution.iterations,
    })
}

/// Snap rounding noise to exact zero, then reject negative flow and any plan
/// that breaks a demand or supply row.
fn settle(model: &Model, constraints: &ConstraintSet, mut values: Vec<f64>) -> Result<Vec<f64>, TransportError> {
    for (value, cell) in values.iter_mut().zip(constraints.variables()) {
        if *value < -SHIPMENT_NOISE {
            return Err(TransportError::SolverInternal(format!(
                "negative shipment {} on {} -> {}",
                value,
                model.origins()[cell.origin],
                model.destinations()[cell.destination]
            )));
        }
        if value.abs() <= SHIPMENT_NOISE {
            *value = 0.0;
        }
    }

    for c in constraints.constraints() {
        if !c.is_satisfied(&values, FEASIBILITY_TOLERANCE * c.rhs.abs().max(1.0)) {
            return Err(TransportError::SolverInternal(format!(
                "solver plan violates {} (activity {}, rhs {})",
                c.name,
                c.activity(&values),
                c.rhs
            )));
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::input::{OrderTable, RouteTable};

    fn two_by_two() -> (Model, ConstraintSet) {
        let routes = RouteTable::new()
            .with("A", "X", 2.0)
            .with("A", "Y", 5.0)
            .with("B", "X", 4.0)
            .with("B", "Y", 1.0);
        let orders = OrderTable::new().with("X", 10.0).with("Y", 10.0);
        let model = Model::build(&routes, &orders).unwrap();
        let constraints = assemble(&model).unwrap();
        (model, constraints)
    }

    #[test]
    fn test_solve_basic_scenario() {
        let (model, constraints) = two_by_two();

        let raw = solve(&model, &constraints, &Solver::new()).unwrap();

        assert_eq!(raw.cells.len(), 4);
        // A->X, A->Y, B->X, B->Y
        let expected = [10.0, 0.0, 0.0, 10.0];
        for (value, want) in raw.values.iter().zip(expected) {
            assert!((value - want).abs() < 1e-6, "values = {:?}", raw.values);
        }
        assert!((raw.objective_value - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_cap_surfaces_as_timeout() {
        let routes = RouteTable::new().with("A", "X", 2.0).with("B", "X", 1.0);
        let orders = OrderTable::new().with("X", 4.0);
        let model = Model::build(&routes, &orders).unwrap();
        let constraints = assemble(&model).unwrap();

        let result = solve(&model, &constraints, &Solver::new().with_max_iterations(1));

        assert!(matches!(result, Err(TransportError::SolverTimeout(_))));
    }

    #[test]
    fn test_settle_snaps_noise_to_zero() {
        let (model, constraints) = two_by_two();
        // A->X, A->Y, B->X, B->Y
        let values = vec![10.0, SHIPMENT_NOISE / 2.0, -SHIPMENT_NOISE, 10.0];

        let settled = settle(&model, &constraints, values).unwrap();

        assert_eq!(settled[1], 0.0);
        assert_eq!(settled[2], 0.0);
        assert!(settled[2].is_sign_positive());
        assert_eq!(settled[0], 10.0);
        assert_eq!(settled[3], 10.0);
    }

    #[test]
    fn test_settle_rejects_negative_shipment() {
        let (model, constraints) = two_by_two();
        let values = vec![10.0, 0.0, -1e-6, 10.0];

        let err = settle(&model, &constraints, values).unwrap_err();

        match err {
            TransportError::SolverInternal(msg) => assert!(msg.contains("B -> X"), "{}", msg),
            other => panic!("expected SolverInternal, got {:?}", other),
        }
    }

    #[test]
    fn test_settle_rejects_constraint_violation() {
        let (model, constraints) = two_by_two();
        // X receives only half its order
        let values = vec![5.0, 0.0, 0.0, 10.0];

        let err = settle(&model, &constraints, values).unwrap_err();

        match err {
            TransportError::SolverInternal(msg) => assert!(msg.contains("demand[X]"), "{}", msg),
            other => panic!("expected SolverInternal, got {:?}", other),
        }
    }
}
