use crate::domain::graph::ResourceGraph;
use crate::domain::object::ObjectSet;
use tracing::{debug, info};

/// Derives typed edges from a batch of objects already present as nodes.
///
/// Implementations must be idempotent and purely additive: running one twice, or interleaved
/// with other builders in any order, yields the same edge set.
pub trait EdgeBuilder: Send + Sync {
    fn name(&self) -> &str;

    fn build(&self, graph: &mut ResourceGraph, objects: &ObjectSet);
}

/// Add one node per object. Later objects with an identity already seen are ignored.
pub fn ingest(graph: &mut ResourceGraph, objects: &ObjectSet) {
    for object in objects.iter() {
        let before = graph.node_count();
        graph.add_object(object.clone());
        if graph.node_count() == before {
            debug!(id = %object.id(), "duplicate object identity, keeping first");
        }
    }
}

/// Graph builder - runs an explicit, caller-supplied list of edge builders
pub struct GraphBuilder {
    builders: Vec<Box<dyn EdgeBuilder>>,
}

impl GraphBuilder {
    pub fn new(builders: Vec<Box<dyn EdgeBuilder>>) -> Self {
        Self { builders }
    }

    pub fn builder_names(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    /// Two-pass build: node ingestion, then edge wiring.
    pub fn build(&self, objects: &ObjectSet) -> ResourceGraph {
        let mut graph = ResourceGraph::new();

        // Pass 1: Node Allocation
        ingest(&mut graph, objects);

        // Pass 2: Edge Wiring
        self.apply(&mut graph, objects);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built resource graph"
        );
        graph
    }

    /// Run every builder, in order, against an existing graph.
    pub fn apply(&self, graph: &mut ResourceGraph, objects: &ObjectSet) {
        for builder in &self.builders {
            let before = graph.edge_count();
            builder.build(graph, objects);
            debug!(
                builder = builder.name(),
                added = graph.edge_count() - before,
                "edge builder finished"
            );
        }
    }
}
