use crate::domain::graph::ResourceGraph;
use crate::domain::marker::Marker;
use crate::domain::namer::Namer;

/// A read-only traversal that reports findings as markers.
///
/// Passes never fail: a clean graph yields an empty vector. Output order must depend only on
/// the graph, so the same graph always produces the same sequence.
pub trait AnalysisPass: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker>;
}
