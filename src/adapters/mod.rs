pub mod analysis;
pub mod edges;
pub mod source;
