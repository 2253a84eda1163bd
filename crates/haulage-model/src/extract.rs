use tracing::warn;

use crate::error::TransportError;
use crate::model::Model;
use crate::solve::RawShipment;

/// Quantity moved along one reachable route
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub origin: String,
    pub destination: String,
    pub quantity: f64,
    pub unit_cost: f64,
}

/// Cost of delivering one more unit to a destination
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalCost {
    pub destination: String,
    pub marginal_cost: f64,
}

/// How much a route's cost must fall before it would carry flow
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReducedCost {
    pub origin: String,
    pub destination: String,
    pub reduced_cost: f64,
}

/// Optimal shipment plan addressed by origin and destination identifiers
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentPlan {
    /// One entry per reachable ordered route, origin-major; unreachable pairs are absent
    shipments: Vec<Shipment>,
    total_cost: f64,
    marginal_costs: Vec<MarginalCost>,
    reduced_costs: Vec<RouteReducedCost>,
    /// Origins whose total-demand cap is tight
    capped_origins: Vec<String>,
    iterations: usize,
}

/// Map raw solver output back to named routes and cross-check the cost.
///
/// `tolerance` is the relative mismatch allowed between the solver's objective
/// and the cost recomputed from the route table.
pub fn extract(model: &Model, raw: &RawShipment, tolerance: f64) -> Result<ShipmentPlan, TransportError> {
    let costs = model.costs();
    let mut shipments = Vec::with_capacity(raw.cells.len());
    let mut recomputed = 0.0;

    for (cell, &quantity) in raw.cells.iter().zip(&raw.values) {
        let unit_cost = costs.get(cell.origin, cell.destination).ok_or_else(|| {
            TransportError::SolverInternal(format!(
                "solver assigned flow to missing route {} -> {}",
                model.origins()[cell.origin],
                model.destinations()[cell.destination]
            ))
        })?;
        recomputed += unit_cost * quantity;
        shipments.push(Shipment {
            origin: model.origins()[cell.origin].clone(),
            destination: model.destinations()[cell.destination].clone(),
            quantity,
            unit_cost,
        });
    }

    let reported = raw.objective_value;
    if (recomputed - reported).abs() > tolerance * reported.abs().max(1.0) {
        return Err(TransportError::ResultInconsistency { reported, recomputed });
    }

    let mut marginal_costs = Vec::new();
    for j in model.ordered_destinations() {
        let destination = &model.destinations()[j];
        if let Some(value) = raw.analysis.shadow_price(&format!("demand[{}]", destination)) {
            marginal_costs.push(MarginalCost {
                destination: destination.clone(),
                marginal_cost: value,
            });
        }
    }

    let reduced_costs = raw
        .cells
        .iter()
        .zip(&raw.analysis.reduced_costs)
        .map(|(cell, rc)| RouteReducedCost {
            origin: model.origins()[cell.origin].clone(),
            destination: model.destinations()[cell.destination].clone(),
            reduced_cost: rc.reduced_cost,
        })
        .collect();

    // With no demand every cap is trivially tight at zero
    let capped_origins: Vec<String> = if model.total_demand() > 0.0 {
        model
            .origins()
            .iter()
            .filter(|origin| raw.analysis.is_binding(&format!("supply[{}]", origin)))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    if !capped_origins.is_empty() {
        warn!(origins = ?capped_origins, "supply cap is binding");
    }

    Ok(ShipmentPlan {
        shipments,
        total_cost: recomputed,
        marginal_costs,
        reduced_costs,
        capped_origins,
        iterations: raw.iterations,
    })
}

impl ShipmentPlan {
    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    /// Shipments carrying a positive quantity
    pub fn active(&self) -> impl Iterator<Item = &Shipment> {
        self.shipments.iter().filter(|s| s.quantity > 0.0)
    }

    /// Quantity on a route, or `None` if the route is not part of the plan
    pub fn quantity(&self, origin: &str, destination: &str) -> Option<f64> {
        self.shipments
            .iter()
            .find(|s| s.origin == origin && s.destination == destination)
            .map(|s| s.quantity)
    }

    /// Total quantity delivered to a destination
    pub fn delivered(&self, destination: &str) -> f64 {
        self.shipments
            .iter()
            .filter(|s| s.destination == destination)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn marginal_costs(&self) -> &[MarginalCost] {
        &self.marginal_costs
    }

    pub fn marginal_cost(&self, destination: &str) -> Option<f64> {
        self.marginal_costs
            .iter()
            .find(|m| m.destination == destination)
            .map(|m| m.marginal_cost)
    }

    pub fn reduced_costs(&self) -> &[RouteReducedCost] {
        &self.reduced_costs
    }

    pub fn capped_origins(&self) -> &[String] {
        &self.capped_origins
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{assemble, Cell};
    use crate::input::{OrderTable, RouteTable};
    use haulage_solver::Analysis;

    fn model() -> Model {
        let routes = RouteTable::new().with("A", "X", 2.0).with("B", "Y", 3.0);
        let orders = OrderTable::new().with("X", 4.0).with("Y", 1.0);
        Model::build(&routes, &orders).unwrap()
    }

    fn raw(values: Vec<f64>, objective_value: f64) -> RawShipment {
        RawShipment {
            cells: vec![Cell { origin: 0, destination: 0 }, Cell { origin: 1, destination: 1 }],
            values,
            objective_value,
            analysis: Analysis::default(),
            iterations: 2,
        }
    }

    #[test]
    fn test_extract_names_and_cost() {
        let model = model();
        assert_eq!(assemble(&model).unwrap().variables().len(), 2);

        let plan = extract(&model, &raw(vec![4.0, 1.0], 11.0), 1e-6).unwrap();

        assert_eq!(plan.shipments().len(), 2);
        assert_eq!(plan.quantity("A", "X"), Some(4.0));
        assert_eq!(plan.quantity("B", "Y"), Some(1.0));
        // Unreachable pairs are omitted, not reported as zero
        assert_eq!(plan.quantity("A", "Y"), None);
        assert_eq!(plan.delivered("X"), 4.0);
        assert_eq!(plan.total_cost(), 11.0);
        assert_eq!(plan.iterations(), 2);
    }

    #[test]
    fn test_cost_mismatch_is_reported() {
        let model = model();

        let err = extract(&model, &raw(vec![4.0, 1.0], 12.0), 1e-6).unwrap_err();

        assert_eq!(
            err,
            TransportError::ResultInconsistency {
                reported: 12.0,
                recomputed: 11.0
            }
        );
    }

    #[test]
    fn test_flow_on_missing_route_is_rejected() {
        let model = model();
        let mut shipment = raw(vec![4.0, 1.0], 11.0);
        shipment.cells[1] = Cell { origin: 0, destination: 1 };

        assert!(matches!(
            extract(&model, &shipment, 1e-6),
            Err(TransportError::SolverInternal(_))
        ));
    }
}
