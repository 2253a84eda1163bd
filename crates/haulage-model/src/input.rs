//! Raw route and order tables as supplied by the caller.
//!
//! Tables keep insertion order; that order fixes the origin and destination
//! indexing of the model built from them. Nothing is validated here, see
//! [`Model::build`](crate::Model::build).

/// A directed origin -> destination link with a per-unit shipping cost
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub origin: String,
    pub destination: String,
    pub cost: f64,
}

/// Quantity required at a destination
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub destination: String,
    pub quantity: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTable {
    orders: Vec<Order>,
}

impl Route {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, cost: f64) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            cost,
        }
    }
}

impl Order {
    pub fn new(destination: impl Into<String>, quantity: f64) -> Self {
        Self {
            destination: destination.into(),
            quantity,
        }
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Builder-style insert
    pub fn with(mut self, origin: impl Into<String>, destination: impl Into<String>, cost: f64) -> Self {
        self.push(Route::new(origin, destination, cost));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl OrderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn with(mut self, destination: impl Into<String>, quantity: f64) -> Self {
        self.push(Order::new(destination, quantity));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl<O: Into<String>, D: Into<String>> FromIterator<(O, D, f64)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (O, D, f64)>>(iter: I) -> Self {
        Self {
            routes: iter
                .into_iter()
                .map(|(origin, destination, cost)| Route::new(origin, destination, cost))
                .collect(),
        }
    }
}

impl<D: Into<String>> FromIterator<(D, f64)> for OrderTable {
    fn from_iter<I: IntoIterator<Item = (D, f64)>>(iter: I) -> Self {
        Self {
            orders: iter
                .into_iter()
                .map(|(destination, quantity)| Order::new(destination, quantity))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_keep_insertion_order() {
        let routes: RouteTable = [("B", "Y", 1.0), ("A", "X", 2.0)].into_iter().collect();
        let origins: Vec<&str> = routes.iter().map(|r| r.origin.as_str()).collect();
        assert_eq!(origins, vec!["B", "A"]);

        let orders = OrderTable::new().with("Y", 3.0).with("X", 4.0);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders.iter().next(), Some(&Order::new("Y", 3.0)));
    }
}
