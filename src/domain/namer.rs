//! Presentation names for graph nodes.
//!
//! Analysis passes take a `&dyn Namer` argument instead of formatting identities themselves,
//! so the same pass can feed human-readable and machine-readable output.

use crate::domain::node::NodeId;

pub trait Namer: Send + Sync {
    fn name(&self, id: &NodeId) -> String;
}

/// Renders `<namespace>/<name> (<kind>)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {
    fn name(&self, id: &NodeId) -> String {
        format!("{}/{} ({})", id.namespace, id.name, id.kind)
    }
}

/// Renders `<kind>/<namespace>/<name>`, suitable as a key in structured output.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualifiedNamer;

impl Namer for QualifiedNamer {
    fn name(&self, id: &NodeId) -> String {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::object::ObjectKind;

    #[test]
    fn test_default_namer_format() {
        let id = NodeId::new(ObjectKind::Route, "web", "frontend");
        assert_eq!(DefaultNamer.name(&id), "web/frontend (Route)");
    }

    #[test]
    fn test_qualified_namer_format() {
        let id = NodeId::new(ObjectKind::Service, "web", "frontend");
        assert_eq!(QualifiedNamer.name(&id), "Service/web/frontend");
    }
}
