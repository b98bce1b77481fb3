use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a layoutseq run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout directory relative to the apktool output
    pub layout_dir: PathBuf,

    /// Documents with this many tokens or fewer are dropped
    pub min_tokens: usize,

    /// File name prefixes of platform-bundled layouts to skip
    pub exclude_prefixes: Vec<String>,

    /// Substrings marking a screen layout (category 1)
    pub screen_keywords: Vec<String>,

    /// Name segments marking a list item layout (category 2)
    pub item_keywords: Vec<String>,

    /// Keep screen layouts only if code reaches them via setContentView
    pub reachable_only: bool,

    /// Build layouts in parallel
    pub parallel: bool,

    /// Class name prefix of the application's own code (defaults to the package)
    pub package_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout_dir: PathBuf::from("res/layout"),
            min_tokens: 5,
            exclude_prefixes: vec![
                "abc_".to_string(),
                "preference_".to_string(),
                "date_picker_".to_string(),
                "time_picker_".to_string(),
                "select_dialog_".to_string(),
                "support_simple_spinner_dropdown_item".to_string(),
            ],
            screen_keywords: vec!["activity".to_string(), "fragment".to_string()],
            item_keywords: vec![
                "item".to_string(),
                "row".to_string(),
                "card".to_string(),
                "listitem".to_string(),
            ],
            reachable_only: false,
            parallel: false,
            package_prefix: None,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        let default_names = [
            ".layoutseq.yml",
            ".layoutseq.yaml",
            ".layoutseq.toml",
            "layoutseq.yml",
            "layoutseq.yaml",
            "layoutseq.toml",
        ];

        for name in &default_names {
            let path = root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Class prefix used to select application code
    pub fn package_prefix<'a>(&'a self, package: &'a str) -> &'a str {
        self.package_prefix.as_deref().unwrap_or(package)
    }
}
