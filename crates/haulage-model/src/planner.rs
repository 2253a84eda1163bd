use haulage_solver::Solver;
use tracing::{debug, info};

use crate::assemble::assemble;
use crate::error::TransportError;
use crate::extract::{extract, ShipmentPlan};
use crate::input::{OrderTable, RouteTable};
use crate::model::Model;
use crate::solve::solve;

/// Runs build -> assemble -> solve -> extract for one pair of input tables.
///
/// A planner holds configuration only, so one instance can serve concurrent
/// solves on separate threads.
#[derive(Debug, Clone)]
pub struct Planner {
    solver: Solver,
    /// Relative tolerance of the post-solve cost cross-check
    consistency_tolerance: f64,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            solver: Solver::default(),
            consistency_tolerance: 1e-6,
        }
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_consistency_tolerance(mut self, tol: f64) -> Self {
        self.consistency_tolerance = tol;
        self
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    pub fn consistency_tolerance(&self) -> f64 {
        self.consistency_tolerance
    }

    /// Cheapest plan meeting every order
    pub fn plan(&self, routes: &RouteTable, orders: &OrderTable) -> Result<ShipmentPlan, TransportError> {
        let model = Model::build(routes, orders)?;
        let constraints = assemble(&model)?;
        debug!(
            unordered = model.unordered_destinations().len(),
            pinned = constraints.pinned().len(),
            "solving transport model"
        );

        let raw = solve(&model, &constraints, &self.solver)?;
        let plan = extract(&model, &raw, self.consistency_tolerance)?;

        info!(
            origins = model.origins().len(),
            destinations = model.destinations().len(),
            total_cost = plan.total_cost(),
            "shipment plan ready"
        );
        Ok(plan)
    }
}

/// Plan with default settings
pub fn plan(routes: &RouteTable, orders: &OrderTable) -> Result<ShipmentPlan, TransportError> {
    Planner::default().plan(routes, orders)
}
