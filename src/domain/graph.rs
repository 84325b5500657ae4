use crate::domain::edge::{Edge, EdgeKind, EdgeMetadata, EdgeWeight};
use crate::domain::node::{Node, NodeHandle, NodeId};
use crate::domain::object::{Object, ObjectKind};
use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resource Graph - typed directed multigraph over cluster objects.
///
/// Append-only: nodes and edges are added during construction and never removed, so
/// petgraph indices double as insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    /// The directed graph of nodes and edges
    pub graph: DiGraph<Node, EdgeWeight>,

    /// Mapping from identity triple to node index
    id_to_node: HashMap<NodeId, NodeHandle>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` unless its identity is already present. The first payload wins.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        if let Some(&idx) = self.id_to_node.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_to_node.insert(id, idx);
        idx
    }

    pub fn add_object(&mut self, object: Arc<Object>) -> NodeHandle {
        self.add_node(Node::new(object))
    }

    /// Add a directed edge. Returns `false` without touching the graph when either endpoint
    /// is unknown or an identical edge (kind, endpoints, metadata) already exists.
    pub fn add_edge(
        &mut self,
        kind: EdgeKind,
        from: NodeHandle,
        to: NodeHandle,
        metadata: EdgeMetadata,
    ) -> bool {
        if !self.contains(from) || !self.contains(to) {
            debug!(kind = %kind, ?from, ?to, "ignoring edge with unknown endpoint");
            return false;
        }
        let weight = EdgeWeight { kind, metadata };
        if self
            .graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == weight)
        {
            return false;
        }
        self.graph.add_edge(from, to, weight);
        true
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.graph.node_weight(handle).is_some()
    }

    pub fn find(&self, id: &NodeId) -> Option<NodeHandle> {
        self.id_to_node.get(id).copied()
    }

    pub fn node(&self, handle: NodeHandle) -> &Node {
        &self.graph[handle]
    }

    /// Outgoing edges of `handle` in insertion order, optionally filtered by kind.
    pub fn edges_from(&self, handle: NodeHandle, kind: Option<&EdgeKind>) -> Vec<Edge> {
        self.edges_directed(handle, Direction::Outgoing, kind)
    }

    /// Incoming edges of `handle` in insertion order, optionally filtered by kind.
    pub fn edges_to(&self, handle: NodeHandle, kind: Option<&EdgeKind>) -> Vec<Edge> {
        self.edges_directed(handle, Direction::Incoming, kind)
    }

    fn edges_directed(
        &self,
        handle: NodeHandle,
        direction: Direction,
        kind: Option<&EdgeKind>,
    ) -> Vec<Edge> {
        if !self.contains(handle) {
            return Vec::new();
        }
        // petgraph walks adjacency lists newest-first
        let mut ids: Vec<_> = self
            .graph
            .edges_directed(handle, direction)
            .filter(|e| kind.is_none_or(|k| e.weight().kind == *k))
            .map(|e| e.id())
            .collect();
        ids.sort();
        ids.into_iter().filter_map(|id| self.edge(id)).collect()
    }

    fn edge(&self, id: petgraph::graph::EdgeIndex) -> Option<Edge> {
        let (from, to) = self.graph.edge_endpoints(id)?;
        let weight = self.graph.edge_weight(id)?;
        Some(Edge {
            kind: weight.kind.clone(),
            from,
            to,
            metadata: weight.metadata.clone(),
        })
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_indices()
            .filter_map(|id| self.edge(id))
            .collect()
    }

    /// Nodes of `kind` in insertion order.
    pub fn nodes_of_kind(&self, kind: ObjectKind) -> Vec<NodeHandle> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind() == kind)
            .collect()
    }

    /// Stored payloads of `kind` in insertion order. Only the object that won its identity is
    /// returned, never a later duplicate.
    pub fn objects_of_kind(&self, kind: ObjectKind) -> Vec<(NodeHandle, Arc<Object>)> {
        self.nodes_of_kind(kind)
            .into_iter()
            .map(|idx| (idx, self.graph[idx].object.clone()))
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
