use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::error::TransportError;
use crate::input::{OrderTable, RouteTable};

/// Dense origin x destination cost table.
///
/// A cell is `None` when no route exists; that is never the same as a
/// zero-cost route.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n_origins: usize,
    n_destinations: usize,
    cells: Vec<Option<f64>>,
}

impl CostMatrix {
    fn unreachable(n_origins: usize, n_destinations: usize) -> Self {
        Self {
            n_origins,
            n_destinations,
            cells: vec![None; n_origins * n_destinations],
        }
    }

    fn set(&mut self, origin: usize, destination: usize, cost: f64) {
        self.cells[origin * self.n_destinations + destination] = Some(cost);
    }

    /// Cost of the route, or `None` if the cell is unreachable
    pub fn get(&self, origin: usize, destination: usize) -> Option<f64> {
        self.cells[origin * self.n_destinations + destination]
    }

    pub fn is_reachable(&self, origin: usize, destination: usize) -> bool {
        self.get(origin, destination).is_some()
    }

    pub fn num_origins(&self) -> usize {
        self.n_origins
    }

    pub fn num_destinations(&self) -> usize {
        self.n_destinations
    }
}

/// Indexed, validated transportation model for one solve.
///
/// Origins are ordered by first appearance in the route table. Destinations
/// are the ordered destinations in order-table order, followed by
/// destinations that only appear on routes (pass-through columns).
#[derive(Debug, Clone)]
pub struct Model {
    origins: Vec<String>,
    destinations: Vec<String>,
    origin_index: HashMap<String, usize>,
    destination_index: HashMap<String, usize>,
    /// Ordered quantity per destination column, `None` for pass-through columns
    demand: Vec<Option<f64>>,
    costs: CostMatrix,
}

impl Model {
    pub fn build(routes: &RouteTable, orders: &OrderTable) -> Result<Self, TransportError> {
        let mut destinations = Vec::new();
        let mut destination_index = HashMap::new();
        let mut demand = Vec::new();

        for order in orders.iter() {
            check_identifier(&order.destination, "order destination")?;
            if !order.quantity.is_finite() || order.quantity < 0.0 {
                return Err(TransportError::MalformedInput(format!(
                    "order for {} has invalid quantity {}",
                    order.destination, order.quantity
                )));
            }
            match destination_index.entry(order.destination.clone()) {
                Entry::Occupied(_) => {
                    return Err(TransportError::MalformedInput(format!(
                        "duplicate order for {}",
                        order.destination
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(destinations.len());
                    destinations.push(order.destination.clone());
                    demand.push(Some(order.quantity));
                }
            }
        }

        // Total demand becomes every supply cap, so it must stay finite too
        let total: f64 = demand.iter().flatten().sum();
        if !total.is_finite() {
            return Err(TransportError::MalformedInput(format!(
                "total ordered quantity overflows ({})",
                total
            )));
        }

        let mut origins = Vec::new();
        let mut origin_index = HashMap::new();
        let mut entries = Vec::with_capacity(routes.len());
        let mut seen = HashMap::new();

        for route in routes.iter() {
            check_identifier(&route.origin, "route origin")?;
            check_identifier(&route.destination, "route destination")?;
            if !route.cost.is_finite() || route.cost < 0.0 {
                return Err(TransportError::MalformedInput(format!(
                    "route {} -> {} has invalid cost {}",
                    route.origin, route.destination, route.cost
                )));
            }

            let i = *origin_index.entry(route.origin.clone()).or_insert_with(|| {
                origins.push(route.origin.clone());
                origins.len() - 1
            });
            let j = *destination_index.entry(route.destination.clone()).or_insert_with(|| {
                destinations.push(route.destination.clone());
                demand.push(None);
                destinations.len() - 1
            });

            if seen.insert((i, j), route.cost).is_some() {
                return Err(TransportError::MalformedInput(format!(
                    "duplicate route {} -> {}",
                    route.origin, route.destination
                )));
            }
            entries.push((i, j, route.cost));
        }

        let mut costs = CostMatrix::unreachable(origins.len(), destinations.len());
        for (i, j, cost) in entries {
            costs.set(i, j, cost);
        }

        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            routes = routes.len(),
            "model built"
        );

        Ok(Self {
            origins,
            destinations,
            origin_index,
            destination_index,
            demand,
            costs,
        })
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn origin_index(&self, origin: &str) -> Option<usize> {
        self.origin_index.get(origin).copied()
    }

    pub fn destination_index(&self, destination: &str) -> Option<usize> {
        self.destination_index.get(destination).copied()
    }

    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// Ordered quantity for a destination column; `None` for pass-through columns
    pub fn demand(&self, destination: usize) -> Option<f64> {
        self.demand[destination]
    }

    /// Column indices of destinations that carry an order, in column order
    pub fn ordered_destinations(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.destinations.len()).filter(|&j| self.demand[j].is_some())
    }

    /// Route destinations without an order
    pub fn unordered_destinations(&self) -> Vec<&str> {
        self.destinations
            .iter()
            .zip(&self.demand)
            .filter(|(_, d)| d.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn total_demand(&self) -> f64 {
        self.demand.iter().flatten().sum()
    }
}

fn check_identifier(id: &str, what: &str) -> Result<(), TransportError> {
    if id.trim().is_empty() {
        return Err(TransportError::MalformedInput(format!("{} is empty", what)));
    }
    Ok(())
}
