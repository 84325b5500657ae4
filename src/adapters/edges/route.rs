use crate::domain::builder::EdgeBuilder;
use crate::domain::edge::{EdgeKind, EdgeMetadata};
use crate::domain::graph::ResourceGraph;
use crate::domain::node::NodeId;
use crate::domain::object::{ObjectKind, ObjectSet, Route};
use tracing::debug;

/// Route → Service edges for the primary and every alternate backend.
///
/// Each resolved backend gets one `TargetsService` edge carrying its weight. Backends whose
/// service is not in the graph get no edge; the analysis passes report that absence.
///
/// Routes are read from the graph, so a later object repeating a route's identity contributes
/// nothing.
pub struct RouteEdgeBuilder;

impl EdgeBuilder for RouteEdgeBuilder {
    fn name(&self) -> &str {
        "route"
    }

    fn build(&self, graph: &mut ResourceGraph, _objects: &ObjectSet) {
        for (_, object) in graph.objects_of_kind(ObjectKind::Route) {
            if let Some(route) = object.as_route() {
                add_route_edges(graph, route);
            }
        }
    }
}

pub fn add_route_edges(graph: &mut ResourceGraph, route: &Route) {
    let route_id = route.id();
    let Some(route_node) = graph.find(&route_id) else {
        debug!(route = %route_id, "route not ingested, skipping");
        return;
    };
    if graph.node(route_node).object.as_route() != Some(route) {
        debug!(route = %route_id, "route shadowed by an earlier object, skipping");
        return;
    }
    let target_port = route.spec.target_port().cloned();

    for backend in route.spec.backends() {
        if !backend.is_service() {
            debug!(route = %route_id, kind = %backend.kind, "skipping non-service backend");
            continue;
        }
        if backend.name.is_empty() {
            debug!(route = %route_id, "skipping backend without a name");
            continue;
        }

        let service_id = NodeId::new(
            ObjectKind::Service,
            &route.metadata.namespace,
            &backend.name,
        );
        let Some(service_node) = graph.find(&service_id) else {
            debug!(route = %route_id, service = %service_id, "backend service not found");
            continue;
        };

        let ambiguous_port = target_port.is_none()
            && graph
                .node(service_node)
                .object
                .as_service()
                .is_some_and(|s| s.spec.distinct_port_count() > 1);

        graph.add_edge(
            EdgeKind::TARGETS_SERVICE,
            route_node,
            service_node,
            EdgeMetadata {
                weight: Some(backend.weight()),
                target_port: target_port.clone(),
                ambiguous_port,
            },
        );
    }
}
