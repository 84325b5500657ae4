//! resource-graph library: relationship graph over cluster objects and marker-based diagnostics.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod server;
