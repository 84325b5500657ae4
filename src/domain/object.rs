//! Typed cluster objects: the input the graph is built from.
//!
//! Documents follow the usual `{kind, metadata, spec}` shape. Only the fields read by the edge
//! builders and analysis passes are modelled; everything else in a document is ignored.

use crate::domain::node::NodeId;
use anyhow::{Context as _, Result, anyhow, bail};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Weight a route backend receives when none is declared.
pub const DEFAULT_BACKEND_WEIGHT: u32 = 100;

/// Backend kind routes use when `to.kind` is omitted.
pub const SERVICE_BACKEND_KIND: &str = "Service";

/// Workload kinds whose pod template labels can be selected by a service.
pub const WORKLOAD_KINDS: &[&str] = &[
    "Pod",
    "Deployment",
    "DeploymentConfig",
    "ReplicationController",
    "ReplicaSet",
    "StatefulSet",
    "DaemonSet",
];

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("static regex")
});

static DNS1123_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("static regex"));

/// Closed set of object kinds the graph knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Route,
    Service,
    Workload,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Route => "Route",
            ObjectKind::Service => "Service",
            ObjectKind::Workload => "Workload",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("metadata.name is required");
        }
        if self.name.len() > 253 || !DNS1123_SUBDOMAIN.is_match(&self.name) {
            bail!("metadata.name {:?} is not a valid DNS-1123 subdomain", self.name);
        }
        if !self.namespace.is_empty()
            && (self.namespace.len() > 63 || !DNS1123_LABEL.is_match(&self.namespace))
        {
            bail!(
                "metadata.namespace {:?} is not a valid DNS-1123 label",
                self.namespace
            );
        }
        Ok(())
    }
}

// ============ Ports ============

/// A port referenced by number or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortRef {
    Number(u16),
    Name(String),
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRef::Number(n) => write!(f, "{n}"),
            PortRef::Name(name) => f.write_str(name),
        }
    }
}

// ============ Route ============

/// TLS termination mode of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsTermination {
    Edge,
    Passthrough,
    Reencrypt,
}

impl FromStr for TlsTermination {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "edge" => Ok(TlsTermination::Edge),
            "passthrough" => Ok(TlsTermination::Passthrough),
            "reencrypt" => Ok(TlsTermination::Reencrypt),
            other => Err(anyhow!("unknown TLS termination {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// `None` when the document leaves termination unset or empty.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub termination: Option<TlsTermination>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<TlsTermination>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTargetReference {
    #[serde(default = "default_backend_kind")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: Option<u32>,
}

fn default_backend_kind() -> String {
    SERVICE_BACKEND_KIND.to_string()
}

impl RouteTargetReference {
    pub fn service(name: impl Into<String>) -> Self {
        Self {
            kind: default_backend_kind(),
            name: name.into(),
            weight: None,
        }
    }

    pub fn weight(&self) -> u32 {
        self.weight.unwrap_or(DEFAULT_BACKEND_WEIGHT)
    }

    pub fn is_service(&self) -> bool {
        self.kind == SERVICE_BACKEND_KIND
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: PortRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    pub to: RouteTargetReference,
    #[serde(default)]
    pub alternate_backends: Vec<RouteTargetReference>,
    #[serde(default)]
    pub port: Option<RoutePort>,
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl RouteSpec {
    /// Primary backend followed by the alternates, in declaration order.
    pub fn backends(&self) -> impl Iterator<Item = &RouteTargetReference> {
        std::iter::once(&self.to).chain(self.alternate_backends.iter())
    }

    pub fn target_port(&self) -> Option<&PortRef> {
        self.port.as_ref().map(|p| &p.target_port)
    }

    pub fn termination(&self) -> Option<TlsTermination> {
        self.tls.as_ref().and_then(|tls| tls.termination)
    }

    /// True when the route matches on anything narrower than the root path.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty() && self.path != "/"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub metadata: ObjectMeta,
    pub spec: RouteSpec,
}

impl Route {
    pub fn id(&self) -> NodeId {
        NodeId::new(ObjectKind::Route, &self.metadata.namespace, &self.metadata.name)
    }
}

// ============ Service ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    #[serde(default)]
    pub name: String,
    pub port: u16,
    #[serde(default)]
    pub target_port: Option<PortRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default)]
    pub ports: Vec<ServicePort>,
}

impl ServiceSpec {
    /// Number of distinct port numbers the service exposes.
    pub fn distinct_port_count(&self) -> usize {
        self.ports
            .iter()
            .map(|p| p.port)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Whether a route target port resolves to one of this service's ports.
    ///
    /// Numbers match either the service port or its target port; names match the port name
    /// or a named target port.
    pub fn exposes(&self, port: &PortRef) -> bool {
        self.ports.iter().any(|p| match port {
            PortRef::Number(n) => p.port == *n || p.target_port.as_ref() == Some(port),
            PortRef::Name(name) => {
                (!p.name.is_empty() && p.name == *name) || p.target_port.as_ref() == Some(port)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ServiceSpec,
}

impl Service {
    pub fn id(&self) -> NodeId {
        NodeId::new(
            ObjectKind::Service,
            &self.metadata.namespace,
            &self.metadata.name,
        )
    }
}

// ============ Workload ============

/// Anything that stamps out pods: the labels that matter are the pod template's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workload {
    /// Original document kind, e.g. `Deployment` or `Pod`.
    pub workload_kind: String,
    pub metadata: ObjectMeta,
    pub template_labels: BTreeMap<String, String>,
}

impl Workload {
    pub fn id(&self) -> NodeId {
        NodeId::new(
            ObjectKind::Workload,
            &self.metadata.namespace,
            &self.metadata.name,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawTemplateMeta {
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTemplate {
    #[serde(default)]
    metadata: RawTemplateMeta,
}

#[derive(Debug, Default, Deserialize)]
struct RawWorkloadSpec {
    #[serde(default)]
    template: Option<RawTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawWorkload {
    metadata: ObjectMeta,
    #[serde(default)]
    spec: RawWorkloadSpec,
}

// ============ Object ============

/// A decoded cluster object. Builders pattern-match on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Object {
    Route(Route),
    Service(Service),
    Workload(Workload),
}

impl Object {
    /// Decode a single document. Returns `Ok(None)` for kinds the graph does not model.
    pub fn from_value(value: Value) -> Result<Option<Object>> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("document has no kind"))?
            .to_string();

        let object = match kind.as_str() {
            "Route" => Object::Route(serde_json::from_value(value).context("invalid Route")?),
            "Service" => {
                Object::Service(serde_json::from_value(value).context("invalid Service")?)
            }
            k if WORKLOAD_KINDS.contains(&k) => {
                let raw: RawWorkload = serde_json::from_value(value)
                    .with_context(|| format!("invalid {k}"))?;
                let template_labels = if k == "Pod" {
                    raw.metadata.labels.clone()
                } else {
                    raw.spec
                        .template
                        .map(|t| t.metadata.labels)
                        .unwrap_or_default()
                };
                Object::Workload(Workload {
                    workload_kind: k.to_string(),
                    metadata: raw.metadata,
                    template_labels,
                })
            }
            _ => return Ok(None),
        };

        object.metadata().validate()?;
        Ok(Some(object))
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Route(_) => ObjectKind::Route,
            Object::Service(_) => ObjectKind::Service,
            Object::Workload(_) => ObjectKind::Workload,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Object::Route(r) => &r.metadata,
            Object::Service(s) => &s.metadata,
            Object::Workload(w) => &w.metadata,
        }
    }

    pub fn id(&self) -> NodeId {
        let meta = self.metadata();
        NodeId::new(self.kind(), &meta.namespace, &meta.name)
    }

    pub fn as_route(&self) -> Option<&Route> {
        match self {
            Object::Route(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&Service> {
        match self {
            Object::Service(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_workload(&self) -> Option<&Workload> {
        match self {
            Object::Workload(w) => Some(w),
            _ => None,
        }
    }
}

// ============ ObjectSet ============

/// A document that could not be decoded and was left out of the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedObject {
    pub kind: String,
    pub name: String,
    pub reason: String,
}

/// Finite batch of objects for one diagnostic run.
#[derive(Debug, Clone, Default)]
pub struct ObjectSet {
    objects: Vec<Arc<Object>>,
    skipped: Vec<SkippedObject>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode raw documents. `List` documents are flattened; malformed documents are recorded
    /// in [`ObjectSet::skipped`] instead of failing the batch.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut set = Self::new();
        for value in values {
            set.push_value(value);
        }
        set
    }

    fn push_value(&mut self, value: Value) {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if kind == "List" || kind.ends_with("List") {
            if let Some(Value::Array(items)) = value.get("items") {
                for item in items.clone() {
                    self.push_value(item);
                }
            }
            return;
        }

        let name = value
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match Object::from_value(value) {
            Ok(Some(object)) => self.push(object),
            Ok(None) => debug!(kind = %kind, name = %name, "ignoring unsupported kind"),
            Err(e) => {
                warn!(kind = %kind, name = %name, error = %format!("{e:#}"), "skipping malformed object");
                self.skipped.push(SkippedObject {
                    kind,
                    name,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    pub fn push(&mut self, object: Object) {
        self.objects.push(Arc::new(object));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Object>> {
        self.objects.iter()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.objects.iter().filter_map(|o| o.as_route())
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.objects.iter().filter_map(|o| o.as_service())
    }

    pub fn workloads(&self) -> impl Iterator<Item = &Workload> {
        self.objects.iter().filter_map(|o| o.as_workload())
    }

    pub fn skipped(&self) -> &[SkippedObject] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<Object> for ObjectSet {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut set = Self::new();
        for object in iter {
            set.push(object);
        }
        set
    }
}
