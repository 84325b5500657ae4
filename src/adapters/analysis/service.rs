use crate::domain::analysis::AnalysisPass;
use crate::domain::edge::EdgeKind;
use crate::domain::graph::ResourceGraph;
use crate::domain::marker::{Marker, Severity};
use crate::domain::namer::Namer;
use crate::domain::object::ObjectKind;

pub const UNSELECTED_SERVICE_INFO: &str = "UnselectedServiceInfo";

/// Services whose selector matches no workload in the object set.
pub struct ServiceWithoutWorkloadPass;

impl AnalysisPass for ServiceWithoutWorkloadPass {
    fn name(&self) -> &str {
        "service-without-workload"
    }

    fn run(&self, graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
        find_services_without_workloads(graph, namer)
    }
}

pub fn find_services_without_workloads(graph: &ResourceGraph, namer: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();

    for service_node in graph.nodes_of_kind(ObjectKind::Service) {
        let node = graph.node(service_node);
        let Some(service) = node.object.as_service() else {
            continue;
        };
        // Selector-less services have manually managed endpoints.
        if service.spec.selector.is_empty() {
            continue;
        }
        if !graph
            .edges_to(service_node, Some(&EdgeKind::EXPOSED_THROUGH_SERVICE))
            .is_empty()
        {
            continue;
        }

        let selector = service
            .spec
            .selector
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        markers.push(
            Marker::new(
                UNSELECTED_SERVICE_INFO,
                Severity::Info,
                format!(
                    "{} selects pods with {selector} but no workload in the set matches.",
                    namer.name(&node.id)
                ),
            )
            .with_node(node.id.clone())
            .with_suggestion("Check the selector against the labels of the intended pod template."),
        );
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::edges::ServiceEdgeBuilder;
    use crate::domain::builder::GraphBuilder;
    use crate::domain::namer::DefaultNamer;
    use crate::domain::object::ObjectSet;
    use serde_json::json;

    fn graph(values: Vec<serde_json::Value>) -> ResourceGraph {
        GraphBuilder::new(vec![Box::new(ServiceEdgeBuilder)]).build(&ObjectSet::from_values(values))
    }

    #[test]
    fn test_service_without_matching_workload() {
        let g = graph(vec![
            json!({"kind": "Service", "metadata": {"name": "api"}, "spec": {"selector": {"app": "api"}}}),
            json!({"kind": "Service", "metadata": {"name": "external"}, "spec": {}}),
            json!({"kind": "Deployment", "metadata": {"name": "web"},
                   "spec": {"template": {"metadata": {"labels": {"app": "web"}}}}}),
        ]);
        let markers = find_services_without_workloads(&g, &DefaultNamer);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].key, UNSELECTED_SERVICE_INFO);
        assert_eq!(markers[0].severity, Severity::Info);
        assert!(markers[0].message.contains("app=api"));
    }

    #[test]
    fn test_selected_service_is_clean() {
        let g = graph(vec![
            json!({"kind": "Service", "metadata": {"name": "api"}, "spec": {"selector": {"app": "api"}}}),
            json!({"kind": "Pod", "metadata": {"name": "api-0", "labels": {"app": "api"}}}),
        ]);
        assert!(ServiceWithoutWorkloadPass.run(&g, &DefaultNamer).is_empty());
    }
}
