use crate::analysis::ResourceUsage;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// JSON reporter for resource reachability
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, package: &str, usage: &ResourceUsage) -> Result<()> {
        let report = ReachabilityReport::new(package, usage);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            println!("Reachability report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ReachabilityReport {
    pub version: &'static str,
    pub package: String,
    /// Hex-formatted layout id -> layout name
    pub layout_ids: BTreeMap<String, String>,
    pub reachable_ids: Vec<i32>,
    pub valid_layout_names: Vec<String>,
    pub unresolved_calls: usize,
}

impl ReachabilityReport {
    pub fn new(package: &str, usage: &ResourceUsage) -> Self {
        Self {
            version: "1.0",
            package: package.to_string(),
            layout_ids: usage
                .layout_ids
                .iter()
                .map(|(id, name)| (format!("{:#010x}", id), name.clone()))
                .collect(),
            reachable_ids: usage.reachable_ids.clone(),
            valid_layout_names: usage.valid_layout_names(),
            unresolved_calls: usage.unresolved_calls,
        }
    }
}
