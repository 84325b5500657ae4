use crate::domain::object::{Object, ObjectKind};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable handle to a node in a [`ResourceGraph`](crate::domain::graph::ResourceGraph).
///
/// A plain index value: it stays valid for the lifetime of the graph because nodes are never
/// removed.
pub type NodeHandle = NodeIndex;

/// Identity triple of a node. Never changes after the node is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
}

impl NodeId {
    pub fn new(kind: ObjectKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Graph node: identity plus a shared reference to the object it was created from.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub object: Arc<Object>,
}

impl Node {
    pub fn new(object: Arc<Object>) -> Self {
        Self {
            id: object.id(),
            object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.id.kind
    }
}
