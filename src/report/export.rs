use crate::models::SweepResults;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;

/// Write the recorded points as YAML
pub fn export_results(results: &SweepResults, path: &Utf8Path) -> Result<()> {
    let yaml_string =
        serde_yaml_ng::to_string(results).context("Failed to serialize sweep results to YAML")?;

    fs::write(path, yaml_string)
        .with_context(|| format!("Failed to write sweep results: {}", path))?;

    tracing::info!("Saved {} sweep points to {}", results.len(), path);
    Ok(())
}

/// Read results written by [`export_results`]
pub fn load_results(path: &Utf8Path) -> Result<SweepResults> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sweep results: {}", path))?;

    serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Failed to parse sweep results: {}", path))
}
