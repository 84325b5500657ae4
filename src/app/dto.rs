use crate::domain::edge::EdgeMetadata;
use crate::domain::graph::ResourceGraph;
use crate::domain::marker::{Marker, Severity};
use crate::domain::namer::Namer;
use crate::domain::object::{ObjectKind, SkippedObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub builders: Vec<String>,
    pub passes: Vec<String>,
}

/// Request body for a diagnostic run: a `List`-shaped collection of raw documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub summary: ReportSummary,
    pub markers: Vec<MarkerDto>,
}

impl DiagnosticReport {
    pub fn highest_severity(&self) -> Option<Severity> {
        self.markers.iter().map(|m| m.severity).max()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_objects: Vec<SkippedObject>,
}

impl ReportSummary {
    pub fn new(graph: &ResourceGraph, markers: &[Marker], skipped: &[SkippedObject]) -> Self {
        let count = |severity| markers.iter().filter(|m| m.severity == severity).count();
        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
            skipped_objects: skipped.to_vec(),
        }
    }
}

/// A marker with its related nodes rendered through a [`Namer`].
#[derive(Debug, Clone, Serialize)]
pub struct MarkerDto {
    pub key: String,
    pub severity: Severity,
    pub message: String,
    pub related_nodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl MarkerDto {
    pub fn from_marker(marker: &Marker, namer: &dyn Namer) -> Self {
        Self {
            key: marker.key.clone(),
            severity: marker.severity,
            message: marker.message.clone(),
            related_nodes: marker.related_nodes.iter().map(|id| namer.name(id)).collect(),
            suggestion: marker.suggestion.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphDump {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDto {
    pub label: String,
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeDto {
    pub kind: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "is_default_metadata")]
    pub metadata: EdgeMetadata,
}

fn is_default_metadata(metadata: &EdgeMetadata) -> bool {
    *metadata == EdgeMetadata::default()
}

impl GraphDump {
    pub fn new(graph: &ResourceGraph, namer: &dyn Namer) -> Self {
        let nodes = graph
            .nodes()
            .map(|(_, node)| NodeDto {
                label: namer.name(&node.id),
                kind: node.id.kind,
                namespace: node.id.namespace.clone(),
                name: node.id.name.clone(),
            })
            .collect();
        let edges = graph
            .edges()
            .into_iter()
            .map(|edge| EdgeDto {
                kind: edge.kind.to_string(),
                from: namer.name(&graph.node(edge.from).id),
                to: namer.name(&graph.node(edge.to).id),
                metadata: edge.metadata,
            })
            .collect();
        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            nodes,
            edges,
        }
    }
}
