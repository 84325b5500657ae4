use crate::adapters::source::FileObjectSource;
use crate::app::dto::DiagnosticReport;
use crate::app::engine::DiagnosticsEngine;
use crate::domain::marker::Severity;
use crate::domain::namer::{DefaultNamer, Namer, QualifiedNamer};
use crate::domain::ports::ObjectSource;
use anyhow::{Context as _, Result};
use clap::ValueEnum;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NamerKind {
    /// `<namespace>/<name> (<kind>)`
    #[default]
    Default,
    /// `<kind>/<namespace>/<name>`
    Qualified,
}

impl NamerKind {
    pub fn namer(self) -> Box<dyn Namer> {
        match self {
            NamerKind::Default => Box::new(DefaultNamer),
            NamerKind::Qualified => Box::new(QualifiedNamer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FailOn {
    Info,
    Warning,
    #[default]
    Error,
    /// Always exit successfully.
    Never,
}

impl FailOn {
    pub fn threshold(self) -> Option<Severity> {
        match self {
            FailOn::Info => Some(Severity::Info),
            FailOn::Warning => Some(Severity::Warning),
            FailOn::Error => Some(Severity::Error),
            FailOn::Never => None,
        }
    }
}

/// Load `path`, run the engine and print the report. Returns `true` when a marker at or above
/// the `fail_on` threshold was found.
pub fn diagnose_file(
    engine: &DiagnosticsEngine,
    path: &Path,
    format: OutputFormat,
    fail_on: FailOn,
) -> Result<bool> {
    let objects = FileObjectSource::new(path).load()?;
    let report = engine.report(&objects);

    match format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    Ok(matches!(
        (fail_on.threshold(), report.highest_severity()),
        (Some(threshold), Some(highest)) if highest >= threshold
    ))
}

/// Build the graph for `path` and print nodes and edges as JSON.
pub fn dump_graph(engine: &DiagnosticsEngine, path: &Path) -> Result<()> {
    let objects = FileObjectSource::new(path).load()?;
    let dump = engine.graph_dump(&objects);
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

/// Human-readable report, markers grouped under their key.
pub fn render_text(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;
    let _ = writeln!(
        out,
        "Graph: {} nodes, {} edges",
        summary.node_count, summary.edge_count
    );
    for skipped in &summary.skipped_objects {
        let _ = writeln!(
            out,
            "Skipped {} {:?}: {}",
            skipped.kind, skipped.name, skipped.reason
        );
    }

    if report.markers.is_empty() {
        let _ = writeln!(out, "\nNo problems found.");
        return out;
    }

    let mut current_key: Option<&str> = None;
    for marker in &report.markers {
        if current_key != Some(marker.key.as_str()) {
            let _ = writeln!(out, "\n{}", marker.key);
            let _ = writeln!(out, "{}", "=".repeat(marker.key.len()));
            current_key = Some(marker.key.as_str());
        }
        let _ = writeln!(out, "  [{}] {}", marker.severity, marker.message);
        if let Some(suggestion) = &marker.suggestion {
            let _ = writeln!(out, "    try: {suggestion}");
        }
    }

    let _ = writeln!(
        out,
        "\n{} error(s), {} warning(s), {} info",
        summary.errors, summary.warnings, summary.infos
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dto::{MarkerDto, ReportSummary};

    fn report(markers: Vec<MarkerDto>) -> DiagnosticReport {
        DiagnosticReport {
            summary: ReportSummary {
                node_count: 2,
                edge_count: 1,
                errors: markers.iter().filter(|m| m.severity == Severity::Error).count(),
                warnings: 0,
                infos: 0,
                skipped_objects: Vec::new(),
            },
            markers,
        }
    }

    fn marker(key: &str, message: &str) -> MarkerDto {
        MarkerDto {
            key: key.to_string(),
            severity: Severity::Error,
            message: message.to_string(),
            related_nodes: Vec::new(),
            suggestion: Some("fix it".to_string()),
        }
    }

    #[test]
    fn test_render_groups_by_key() {
        let text = render_text(&report(vec![
            marker("MissingServiceWarning", "first"),
            marker("MissingServiceWarning", "second"),
            marker("PathBasedPassthroughErr", "third"),
        ]));
        assert_eq!(text.matches("MissingServiceWarning\n").count(), 1);
        assert!(text.contains("  [ERROR] first\n    try: fix it\n  [ERROR] second"));
        assert!(text.contains("3 error(s)"));
    }

    #[test]
    fn test_render_clean_report() {
        let text = render_text(&report(Vec::new()));
        assert!(text.contains("No problems found."));
    }

    #[test]
    fn test_fail_on_threshold() {
        assert_eq!(FailOn::Warning.threshold(), Some(Severity::Warning));
        assert_eq!(FailOn::Never.threshold(), None);
    }
}
