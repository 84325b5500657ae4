pub mod analysis;
pub mod builder;
pub mod edge;
pub mod graph;
pub mod marker;
pub mod namer;
pub mod node;
pub mod object;
pub mod ports;
