//! Mock implementations for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use resource_graph::domain::analysis::AnalysisPass;
use resource_graph::domain::builder::EdgeBuilder;
use resource_graph::domain::edge::{EdgeKind, EdgeMetadata};
use resource_graph::domain::graph::ResourceGraph;
use resource_graph::domain::marker::{Marker, Severity};
use resource_graph::domain::namer::Namer;
use resource_graph::domain::node::NodeId;
use resource_graph::domain::object::{Object, ObjectKind, ObjectSet};
use resource_graph::domain::ports::ObjectSource;

/// Mock ObjectSource that serves a fixed list of objects, or an error.
pub struct MockObjectSource {
    objects: Option<Vec<Object>>,
}

impl MockObjectSource {
    pub fn new(objects: Vec<Object>) -> Self {
        Self {
            objects: Some(objects),
        }
    }

    pub fn failing() -> Self {
        Self { objects: None }
    }
}

impl ObjectSource for MockObjectSource {
    fn load(&self) -> Result<ObjectSet> {
        self.objects
            .clone()
            .map(|objects| objects.into_iter().collect())
            .ok_or_else(|| anyhow!("object source unavailable"))
    }
}

/// Mock Namer that only uses the object name and counts calls.
#[derive(Default)]
pub struct CountingNamer {
    pub calls: AtomicUsize,
}

impl Namer for CountingNamer {
    fn name(&self, id: &NodeId) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        id.name.clone()
    }
}

/// Mock EdgeBuilder linking every route to every service with a custom edge kind.
pub struct AllPairsBuilder;

pub const ALL_PAIRS_EDGE: &str = "MockAllPairs";

impl EdgeBuilder for AllPairsBuilder {
    fn name(&self) -> &str {
        "all-pairs"
    }

    fn build(&self, graph: &mut ResourceGraph, _objects: &ObjectSet) {
        for route in graph.nodes_of_kind(ObjectKind::Route) {
            for service in graph.nodes_of_kind(ObjectKind::Service) {
                graph.add_edge(
                    EdgeKind::new(ALL_PAIRS_EDGE),
                    route,
                    service,
                    EdgeMetadata::default(),
                );
            }
        }
    }
}

/// Mock AnalysisPass emitting one Info marker per node of a kind.
pub struct NodeCountPass {
    pub kind: ObjectKind,
}

impl AnalysisPass for NodeCountPass {
    fn name(&self) -> &str {
        "node-count"
    }

    fn run(&self, graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
        graph
            .nodes_of_kind(self.kind)
            .into_iter()
            .map(|h| {
                let id = &graph.node(h).id;
                Marker::new("NodeSeen", Severity::Info, namer.name(id)).with_node(id.clone())
            })
            .collect()
    }
}
