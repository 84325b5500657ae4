use crate::domain::analysis::AnalysisPass;
use crate::domain::edge::EdgeKind;
use crate::domain::graph::ResourceGraph;
use crate::domain::marker::{Marker, Severity};
use crate::domain::namer::Namer;
use crate::domain::node::NodeHandle;
use crate::domain::object::{ObjectKind, TlsTermination};
use std::collections::BTreeSet;

pub const MISSING_SERVICE_WARNING: &str = "MissingServiceWarning";
pub const MISSING_BACKEND_SERVICE_WARNING: &str = "MissingBackendServiceWarning";
pub const MISSING_ROUTE_PORT_WARNING: &str = "MissingRoutePortWarning";
pub const WRONG_ROUTE_PORT_WARNING: &str = "WrongRoutePortWarning";
pub const PATH_BASED_PASSTHROUGH_ERR: &str = "PathBasedPassthroughErr";
pub const MISSING_TLS_TERMINATION_TYPE_ERR: &str = "MissingTLSTerminationTypeErr";

/// Routes whose backends are missing or whose port mapping is unclear.
pub struct MissingPortMappingPass;

impl AnalysisPass for MissingPortMappingPass {
    fn name(&self) -> &str {
        "missing-port-mapping"
    }

    fn run(&self, graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
        find_missing_port_mapping(graph, namer)
    }
}

/// Passthrough routes that also declare a path.
pub struct PathBasedPassthroughPass;

impl AnalysisPass for PathBasedPassthroughPass {
    fn name(&self) -> &str {
        "path-based-passthrough"
    }

    fn run(&self, graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
        find_path_based_passthrough_routes(graph, namer)
    }
}

/// Routes with a TLS section but no termination type.
pub struct MissingTlsTerminationPass;

impl AnalysisPass for MissingTlsTerminationPass {
    fn name(&self) -> &str {
        "missing-tls-termination"
    }

    fn run(&self, graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
        find_missing_tls_termination_type(graph, namer)
    }
}

/// For every route, inspect its `TargetsService` edges:
/// - no edge at all: the route points nowhere (`MissingServiceWarning`, error)
/// - some backends resolved, others not (`MissingBackendServiceWarning`)
/// - target service has several ports and the route picked none (`MissingRoutePortWarning`)
/// - the route picked a port the service does not expose (`WrongRoutePortWarning`)
pub fn find_missing_port_mapping(graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();

    for route_node in graph.nodes_of_kind(ObjectKind::Route) {
        let node = graph.node(route_node);
        let Some(route) = node.object.as_route() else {
            continue;
        };
        let route_name = namer.name(&node.id);
        let edges = graph.edges_from(route_node, Some(&EdgeKind::TARGETS_SERVICE));

        if edges.is_empty() {
            markers.push(
                Marker::new(
                    MISSING_SERVICE_WARNING,
                    Severity::Error,
                    format!(
                        "{route_name} is supposed to route traffic to service {:?} but that service doesn't exist.",
                        route.spec.to.name
                    ),
                )
                .with_node(node.id.clone())
                .with_suggestion(
                    "Create the missing service or point the route at an existing one. If the service is listed as skipped, fix the errors in its definition.",
                ),
            );
            continue;
        }

        let resolved: BTreeSet<&str> = edges
            .iter()
            .map(|e| graph.node(e.to).id.name.as_str())
            .collect();
        for backend in route.spec.backends() {
            if !backend.is_service()
                || backend.name.is_empty()
                || resolved.contains(backend.name.as_str())
            {
                continue;
            }
            markers.push(
                Marker::new(
                    MISSING_BACKEND_SERVICE_WARNING,
                    Severity::Warning,
                    format!(
                        "{route_name} sends part of its traffic to service {:?} but that service doesn't exist.",
                        backend.name
                    ),
                )
                .with_node(node.id.clone())
                .with_suggestion(
                    "Create the service or remove it from the route's backends. If the service is listed as skipped, fix the errors in its definition.",
                ),
            );
        }

        // Parallel edges (one per weight) must not repeat the same port finding.
        let mut reported: BTreeSet<NodeHandle> = BTreeSet::new();
        for edge in &edges {
            if !reported.insert(edge.to) {
                continue;
            }
            let service_node = graph.node(edge.to);
            let service_name = namer.name(&service_node.id);

            if edge.metadata.ambiguous_port {
                markers.push(
                    Marker::new(
                        MISSING_ROUTE_PORT_WARNING,
                        Severity::Warning,
                        format!(
                            "{route_name} doesn't have a port specified and is routing traffic to {service_name} which uses multiple ports."
                        ),
                    )
                    .with_node(node.id.clone())
                    .with_node(service_node.id.clone())
                    .with_suggestion(
                        "Set spec.port.targetPort on the route to one of the service's ports.",
                    ),
                );
            } else if let Some(port) = &edge.metadata.target_port
                && let Some(service) = service_node.object.as_service()
                && !service.spec.exposes(port)
            {
                markers.push(
                    Marker::new(
                        WRONG_ROUTE_PORT_WARNING,
                        Severity::Warning,
                        format!(
                            "{route_name} targets port {port} but {service_name} doesn't expose it."
                        ),
                    )
                    .with_node(node.id.clone())
                    .with_node(service_node.id.clone())
                    .with_suggestion(
                        "Change spec.port.targetPort on the route to a port name or number the service exposes.",
                    ),
                );
            }
        }
    }

    markers
}

/// Passthrough termination forwards encrypted traffic untouched, so the router never sees the
/// request path. A path on such a route can never match.
pub fn find_path_based_passthrough_routes(
    graph: &ResourceGraph,
    namer: &dyn Namer,
) -> Vec<Marker> {
    let mut markers = Vec::new();

    for route_node in graph.nodes_of_kind(ObjectKind::Route) {
        let node = graph.node(route_node);
        let Some(route) = node.object.as_route() else {
            continue;
        };
        if route.spec.termination() != Some(TlsTermination::Passthrough) || !route.spec.has_path()
        {
            continue;
        }
        markers.push(
            Marker::new(
                PATH_BASED_PASSTHROUGH_ERR,
                Severity::Error,
                format!(
                    "{} is a passthrough route but has a path {:?} specified. Passthrough routes cannot be path-based.",
                    namer.name(&node.id),
                    route.spec.path
                ),
            )
            .with_node(node.id.clone())
            .with_suggestion(
                "Remove the path from the route or switch its termination to edge or reencrypt.",
            ),
        );
    }

    markers
}

pub fn find_missing_tls_termination_type(
    graph: &ResourceGraph,
    namer: &dyn Namer,
) -> Vec<Marker> {
    let mut markers = Vec::new();

    for route_node in graph.nodes_of_kind(ObjectKind::Route) {
        let node = graph.node(route_node);
        let Some(route) = node.object.as_route() else {
            continue;
        };
        if route.spec.tls.is_none() || route.spec.termination().is_some() {
            continue;
        }
        markers.push(
            Marker::new(
                MISSING_TLS_TERMINATION_TYPE_ERR,
                Severity::Error,
                format!(
                    "{} has a TLS configuration but no termination type specified.",
                    namer.name(&node.id)
                ),
            )
            .with_node(node.id.clone())
            .with_suggestion(
                "Set spec.tls.termination to edge, passthrough or reencrypt, or remove spec.tls.",
            ),
        );
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::edges::RouteEdgeBuilder;
    use crate::domain::builder::GraphBuilder;
    use crate::domain::namer::DefaultNamer;
    use crate::domain::object::ObjectSet;
    use serde_json::json;

    fn graph(values: Vec<serde_json::Value>) -> ResourceGraph {
        let objects = ObjectSet::from_values(values);
        GraphBuilder::new(vec![Box::new(RouteEdgeBuilder)]).build(&objects)
    }

    fn route(name: &str, spec: serde_json::Value) -> serde_json::Value {
        json!({"kind": "Route", "metadata": {"name": name, "namespace": "ns"}, "spec": spec})
    }

    fn service(name: &str, ports: serde_json::Value) -> serde_json::Value {
        json!({"kind": "Service", "metadata": {"name": name, "namespace": "ns"}, "spec": {"ports": ports}})
    }

    fn keys(markers: &[Marker]) -> Vec<&str> {
        markers.iter().map(|m| m.key.as_str()).collect()
    }

    #[test]
    fn test_missing_service() {
        let g = graph(vec![route("r", json!({"to": {"name": "ghost"}}))]);
        let markers = find_missing_port_mapping(&g, &DefaultNamer);
        assert_eq!(keys(&markers), vec![MISSING_SERVICE_WARNING]);
        assert_eq!(markers[0].severity, Severity::Error);
        assert!(markers[0].message.starts_with("ns/r (Route)"));
        assert!(markers[0].message.contains("ghost"));
    }

    #[test]
    fn test_ambiguous_port_reported_once_per_service() {
        let g = graph(vec![
            route(
                "r",
                json!({
                    "to": {"name": "web", "weight": 50},
                    "alternateBackends": [{"name": "web", "weight": 25}]
                }),
            ),
            service("web", json!([{"port": 80}, {"port": 443}])),
        ]);
        assert_eq!(g.edge_count(), 2);
        let markers = find_missing_port_mapping(&g, &DefaultNamer);
        assert_eq!(keys(&markers), vec![MISSING_ROUTE_PORT_WARNING]);
        assert_eq!(markers[0].related_nodes.len(), 2);
    }

    #[test]
    fn test_wrong_explicit_port() {
        let g = graph(vec![
            route(
                "r",
                json!({"to": {"name": "web"}, "port": {"targetPort": "grpc"}}),
            ),
            service("web", json!([{"name": "http", "port": 80}])),
        ]);
        let markers = find_missing_port_mapping(&g, &DefaultNamer);
        assert_eq!(keys(&markers), vec![WRONG_ROUTE_PORT_WARNING]);
    }

    #[test]
    fn test_partially_missing_backends() {
        let g = graph(vec![
            route(
                "r",
                json!({"to": {"name": "web"}, "alternateBackends": [{"name": "canary"}]}),
            ),
            service("web", json!([{"port": 80}])),
        ]);
        let markers = find_missing_port_mapping(&g, &DefaultNamer);
        assert_eq!(keys(&markers), vec![MISSING_BACKEND_SERVICE_WARNING]);
        assert!(markers[0].message.contains("canary"));
    }

    #[test]
    fn test_healthy_route_has_no_markers() {
        let g = graph(vec![
            route("r", json!({"to": {"name": "web"}, "tls": {"termination": "edge"}, "path": "/api"})),
            service("web", json!([{"port": 80}])),
        ]);
        assert!(find_missing_port_mapping(&g, &DefaultNamer).is_empty());
        assert!(find_path_based_passthrough_routes(&g, &DefaultNamer).is_empty());
        assert!(find_missing_tls_termination_type(&g, &DefaultNamer).is_empty());
    }

    #[test]
    fn test_passthrough_with_path() {
        let g = graph(vec![
            route(
                "r",
                json!({"to": {"name": "web"}, "path": "/admin", "tls": {"termination": "passthrough"}}),
            ),
            route(
                "root",
                json!({"to": {"name": "web"}, "path": "/", "tls": {"termination": "passthrough"}}),
            ),
            route(
                "re",
                json!({"to": {"name": "web"}, "path": "/admin", "tls": {"termination": "reencrypt"}}),
            ),
        ]);
        let markers = find_path_based_passthrough_routes(&g, &DefaultNamer);
        assert_eq!(keys(&markers), vec![PATH_BASED_PASSTHROUGH_ERR]);
        assert_eq!(markers[0].related_nodes[0].name, "r");
    }

    #[test]
    fn test_missing_tls_termination() {
        let g = graph(vec![route(
            "r",
            json!({"to": {"name": "web"}, "tls": {}}),
        )]);
        let markers = find_missing_tls_termination_type(&g, &DefaultNamer);
        assert_eq!(keys(&markers), vec![MISSING_TLS_TERMINATION_TYPE_ERR]);
    }

    #[test]
    fn test_passes_tolerate_empty_graph() {
        let g = ResourceGraph::new();
        assert!(MissingPortMappingPass.run(&g, &DefaultNamer).is_empty());
        assert!(PathBasedPassthroughPass.run(&g, &DefaultNamer).is_empty());
        assert!(MissingTlsTerminationPass.run(&g, &DefaultNamer).is_empty());
    }
}
