//! Analysis passes
//!
//! Read-only traversals over a finished graph. Marker keys are exported as constants so
//! callers and tests can match on them.

mod route;
mod service;

pub use route::{
    MISSING_BACKEND_SERVICE_WARNING, MISSING_ROUTE_PORT_WARNING, MISSING_SERVICE_WARNING,
    MISSING_TLS_TERMINATION_TYPE_ERR, MissingPortMappingPass, MissingTlsTerminationPass,
    PATH_BASED_PASSTHROUGH_ERR, PathBasedPassthroughPass, WRONG_ROUTE_PORT_WARNING,
    find_missing_port_mapping, find_missing_tls_termination_type,
    find_path_based_passthrough_routes,
};
pub use service::{
    ServiceWithoutWorkloadPass, UNSELECTED_SERVICE_INFO, find_services_without_workloads,
};

use crate::domain::analysis::AnalysisPass;

/// Every built-in pass, in the order the default pipeline runs them.
pub fn all() -> Vec<Box<dyn AnalysisPass>> {
    vec![
        Box::new(MissingPortMappingPass),
        Box::new(PathBasedPassthroughPass),
        Box::new(MissingTlsTerminationPass),
        Box::new(ServiceWithoutWorkloadPass),
    ]
}
