use crate::adapters;
use crate::app::dto::{DiagnosticReport, GraphDump, HealthResponse, MarkerDto, ReportSummary};
use crate::domain::analysis::AnalysisPass;
use crate::domain::builder::{EdgeBuilder, GraphBuilder};
use crate::domain::graph::ResourceGraph;
use crate::domain::marker::{Marker, dedup_markers, sort_markers};
use crate::domain::namer::{DefaultNamer, Namer};
use crate::domain::object::ObjectSet;
use std::thread;
use tracing::{debug, info};

/// Result of one diagnostic run.
pub struct Diagnosis {
    pub graph: ResourceGraph,
    /// Deduplicated and sorted by key.
    pub markers: Vec<Marker>,
}

/// The ingest → build edges → run passes → aggregate pipeline.
///
/// Which builders and passes run is an explicit list owned by the engine; nothing is
/// registered globally.
pub struct DiagnosticsEngine {
    builder: GraphBuilder,
    passes: Vec<Box<dyn AnalysisPass>>,
    namer: Box<dyn Namer>,
}

impl DiagnosticsEngine {
    pub fn new(
        builders: Vec<Box<dyn EdgeBuilder>>,
        passes: Vec<Box<dyn AnalysisPass>>,
        namer: Box<dyn Namer>,
    ) -> Self {
        Self {
            builder: GraphBuilder::new(builders),
            passes,
            namer,
        }
    }

    /// All built-in builders and passes with the default namer.
    pub fn default_pipeline() -> Self {
        Self::new(
            adapters::edges::all(),
            adapters::analysis::all(),
            Box::new(DefaultNamer),
        )
    }

    pub fn with_namer(mut self, namer: Box<dyn Namer>) -> Self {
        self.namer = namer;
        self
    }

    pub fn namer(&self) -> &dyn Namer {
        self.namer.as_ref()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            builders: self
                .builder
                .builder_names()
                .into_iter()
                .map(String::from)
                .collect(),
            passes: self.passes.iter().map(|p| p.name().to_string()).collect(),
        }
    }

    pub fn build_graph(&self, objects: &ObjectSet) -> ResourceGraph {
        self.builder.build(objects)
    }

    /// Run every pass against `graph`. Passes run concurrently; their outputs are concatenated
    /// in pass order, deduplicated, then stably sorted by key.
    pub fn run_passes(&self, graph: &ResourceGraph) -> Vec<Marker> {
        let namer = self.namer.as_ref();
        let outputs: Vec<Vec<Marker>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .passes
                .iter()
                .map(|pass| scope.spawn(move || (pass.name(), pass.run(graph, namer))))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    let (name, markers) = handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                    debug!(pass = name, markers = markers.len(), "analysis pass finished");
                    markers
                })
                .collect()
        });

        let mut markers = dedup_markers(outputs.into_iter().flatten().collect());
        sort_markers(&mut markers);
        markers
    }

    pub fn diagnose(&self, objects: &ObjectSet) -> Diagnosis {
        let graph = self.build_graph(objects);
        let markers = self.run_passes(&graph);
        info!(
            objects = objects.len(),
            markers = markers.len(),
            "diagnostics complete"
        );
        Diagnosis { graph, markers }
    }

    pub fn report(&self, objects: &ObjectSet) -> DiagnosticReport {
        let diagnosis = self.diagnose(objects);
        DiagnosticReport {
            summary: ReportSummary::new(&diagnosis.graph, &diagnosis.markers, objects.skipped()),
            markers: diagnosis
                .markers
                .iter()
                .map(|m| MarkerDto::from_marker(m, self.namer()))
                .collect(),
        }
    }

    pub fn graph_dump(&self, objects: &ObjectSet) -> GraphDump {
        GraphDump::new(&self.build_graph(objects), self.namer())
    }
}

impl Default for DiagnosticsEngine {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
