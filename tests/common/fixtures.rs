//! Test fixture generators for integration tests.
#![allow(dead_code)]

use resource_graph::adapters::source::FileObjectSource;
use resource_graph::domain::object::{
    Object, ObjectMeta, ObjectSet, PortRef, Route, RoutePort, RouteSpec, RouteTargetReference,
    Service, ServicePort, ServiceSpec, TlsConfig, TlsTermination, Workload,
};
use resource_graph::domain::ports::ObjectSource;
use std::collections::BTreeMap;

pub const NAMESPACE: &str = "example";

pub const MISSING_ROUTE_PORT_YAML: &str = "tests/fixtures/missing-route-port.yaml";
pub const LONELY_ROUTE_YAML: &str = "tests/fixtures/lonely-route.yaml";
pub const INVALID_ROUTE_YAML: &str = "tests/fixtures/invalid-route.yaml";
pub const HEALTHY_ROUTE_YAML: &str = "tests/fixtures/healthy-route.yaml";
pub const MIXED_JSON: &str = "tests/fixtures/mixed.json";

pub fn load(path: &str) -> ObjectSet {
    FileObjectSource::new(path)
        .load()
        .unwrap_or_else(|e| panic!("load {path}: {e:#}"))
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn route_spec(to: &str) -> RouteSpec {
    RouteSpec {
        host: format!("{to}.example.com"),
        path: String::new(),
        to: RouteTargetReference::service(to),
        alternate_backends: Vec::new(),
        port: None,
        tls: None,
    }
}

pub fn route(name: &str, spec: RouteSpec) -> Object {
    Object::Route(Route {
        metadata: ObjectMeta::new(NAMESPACE, name),
        spec,
    })
}

pub fn route_to(name: &str, to: &str) -> Object {
    route(name, route_spec(to))
}

pub fn route_with_port(name: &str, to: &str, port: PortRef) -> Object {
    let mut spec = route_spec(to);
    spec.port = Some(RoutePort { target_port: port });
    route(name, spec)
}

pub fn passthrough_route(name: &str, to: &str, path: &str) -> Object {
    tls_route(name, to, path, Some(TlsTermination::Passthrough))
}

pub fn tls_route(name: &str, to: &str, path: &str, termination: Option<TlsTermination>) -> Object {
    let mut spec = route_spec(to);
    spec.path = path.to_string();
    spec.tls = Some(TlsConfig { termination });
    route(name, spec)
}

pub fn service(name: &str, ports: &[u16]) -> Object {
    selecting_service(name, &[], ports)
}

pub fn selecting_service(name: &str, selector: &[(&str, &str)], ports: &[u16]) -> Object {
    Object::Service(Service {
        metadata: ObjectMeta::new(NAMESPACE, name),
        spec: ServiceSpec {
            selector: labels(selector),
            ports: ports
                .iter()
                .map(|&port| ServicePort {
                    name: format!("port-{port}"),
                    port,
                    target_port: None,
                })
                .collect(),
        },
    })
}

pub fn deployment(name: &str, template: &[(&str, &str)]) -> Object {
    Object::Workload(Workload {
        workload_kind: "Deployment".to_string(),
        metadata: ObjectMeta::new(NAMESPACE, name),
        template_labels: labels(template),
    })
}

/// A namespace with one of everything: a clean route, a dangling route, an ambiguous route,
/// a passthrough route with a path and a service nothing selects.
pub fn mixed_objects() -> ObjectSet {
    [
        route_to("clean", "single"),
        route_to("dangling", "ghost"),
        route_to("ambiguous", "multi"),
        passthrough_route("admin", "single", "/admin"),
        selecting_service("single", &[("app", "single")], &[8080]),
        selecting_service("multi", &[("app", "multi")], &[8080, 8443]),
        deployment("single", &[("app", "single")]),
    ]
    .into_iter()
    .collect()
}
