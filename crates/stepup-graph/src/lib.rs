mod build;
mod endpoints;
mod errors;
mod order;

pub use build::{build_graph, DependencyGraph};
pub use endpoints::find_endpoints;
pub use errors::GraphError;
pub use order::{order_ids, order_upgrades, Schedule};
