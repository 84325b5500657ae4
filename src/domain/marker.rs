use crate::domain::node::NodeId;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Severity of a diagnostic finding. Ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A diagnostic finding produced by an analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Marker {
    /// Stable category identifier, e.g. `MissingServiceWarning`.
    pub key: String,
    pub severity: Severity,
    pub message: String,
    pub related_nodes: Vec<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Marker {
    pub fn new(key: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            severity,
            message: message.into(),
            related_nodes: Vec::new(),
            suggestion: None,
        }
    }

    pub fn with_node(mut self, id: NodeId) -> Self {
        self.related_nodes.push(id);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Stable sort by key; markers sharing a key keep their relative order.
pub fn sort_markers(markers: &mut [Marker]) {
    markers.sort_by(|a, b| a.key.cmp(&b.key));
}

/// Drop exact duplicates, keeping the first occurrence.
pub fn dedup_markers(markers: Vec<Marker>) -> Vec<Marker> {
    let mut seen = HashSet::new();
    markers
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}
