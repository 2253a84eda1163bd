pub mod assemble;
pub mod error;
pub mod extract;
pub mod input;
pub mod model;
pub mod planner;
pub mod solve;

pub use assemble::{assemble, Cell, ConstraintSet, PinReason};
pub use error::TransportError;
pub use extract::{extract, MarginalCost, RouteReducedCost, Shipment, ShipmentPlan};
pub use haulage_solver::Solver;
pub use input::{Order, OrderTable, Route, RouteTable};
pub use model::{CostMatrix, Model};
pub use planner::{plan, Planner};
pub use solve::{solve, RawShipment};
