use crate::domain::object::ObjectSet;
use crate::domain::ports::ObjectSource;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads objects from a JSON or YAML file on disk.
///
/// `.yaml`/`.yml` files may contain several `---` separated documents; anything else is parsed
/// as JSON (a single document or an array of documents).
pub struct FileObjectSource {
    path: PathBuf,
}

impl FileObjectSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ObjectSource for FileObjectSource {
    fn load(&self) -> Result<ObjectSet> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read object file: {}", self.path.display()))?;

        let values = if is_yaml(&self.path) {
            parse_yaml_documents(&content)
        } else {
            parse_json_documents(&content)
        }
        .with_context(|| format!("Failed to parse object file: {}", self.path.display()))?;

        let objects = ObjectSet::from_values(values);
        info!(
            path = %self.path.display(),
            objects = objects.len(),
            skipped = objects.skipped().len(),
            "loaded objects"
        );
        Ok(objects)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

pub fn parse_yaml_documents(content: &str) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document).context("Failed to parse YAML document")?;
        if !value.is_null() {
            values.push(value);
        }
    }
    Ok(values)
}

pub fn parse_json_documents(content: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content).context("Failed to parse JSON")?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}
