//! Edge builders
//!
//! Each builder encodes one kind of relationship between cluster objects. Builders only add
//! edges between nodes that already exist, so they compose in any order.

mod route;
mod service;

pub use route::{RouteEdgeBuilder, add_route_edges};
pub use service::{ServiceEdgeBuilder, selects};

use crate::domain::builder::EdgeBuilder;

/// Every built-in builder, in the order the default pipeline runs them.
pub fn all() -> Vec<Box<dyn EdgeBuilder>> {
    vec![Box::new(ServiceEdgeBuilder), Box::new(RouteEdgeBuilder)]
}
