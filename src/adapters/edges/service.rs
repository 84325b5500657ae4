use crate::domain::builder::EdgeBuilder;
use crate::domain::edge::{EdgeKind, EdgeMetadata};
use crate::domain::graph::ResourceGraph;
use crate::domain::object::{ObjectKind, ObjectSet};
use std::collections::BTreeMap;
use tracing::debug;

/// Workload → Service edges for every workload whose pod template the service selects.
///
/// Selection is namespace-local. A service with an empty selector selects nothing (its
/// endpoints are managed by hand). Services and workloads are read from the graph, so only the
/// first object seen for an identity takes part.
pub struct ServiceEdgeBuilder;

impl EdgeBuilder for ServiceEdgeBuilder {
    fn name(&self) -> &str {
        "service"
    }

    fn build(&self, graph: &mut ResourceGraph, _objects: &ObjectSet) {
        let workloads = graph.objects_of_kind(ObjectKind::Workload);

        for (service_node, object) in graph.objects_of_kind(ObjectKind::Service) {
            let Some(service) = object.as_service() else {
                continue;
            };
            if service.spec.selector.is_empty() {
                continue;
            }

            for (workload_node, object) in &workloads {
                let Some(workload) = object.as_workload() else {
                    continue;
                };
                if workload.metadata.namespace != service.metadata.namespace
                    || !selects(&service.spec.selector, &workload.template_labels)
                {
                    continue;
                }
                if graph.add_edge(
                    EdgeKind::EXPOSED_THROUGH_SERVICE,
                    *workload_node,
                    service_node,
                    EdgeMetadata::default(),
                ) {
                    debug!(service = %service.id(), workload = %workload.id(), "selector match");
                }
            }
        }
    }
}

/// Equality-based label selection: every selector pair must appear in `labels`.
pub fn selects(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
    !selector.is_empty() && selector.iter().all(|(k, v)| labels.get(k) == Some(v))
}
