use crate::domain::node::NodeHandle;
use crate::domain::object::PortRef;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Edge kind - a string tag naming the relationship.
///
/// The set is open so callers can register their own builders; the well-known kinds are
/// associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeKind(Cow<'static, str>);

impl EdgeKind {
    /// Route → Service, one edge per resolved backend.
    pub const TARGETS_SERVICE: EdgeKind = EdgeKind(Cow::Borrowed("TargetsService"));
    /// Workload → Service, when the service selector matches the pod template.
    pub const EXPOSED_THROUGH_SERVICE: EdgeKind = EdgeKind(Cow::Borrowed("ExposedThroughService"));

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional data carried on an edge. Part of the edge's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<PortRef>,
    /// Target has several ports and the source did not pick one.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ambiguous_port: bool,
}

/// What the graph stores per edge; endpoints live in the graph structure itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeWeight {
    pub kind: EdgeKind,
    pub metadata: EdgeMetadata,
}

/// An edge as returned by graph queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub from: NodeHandle,
    pub to: NodeHandle,
    pub metadata: EdgeMetadata,
}
