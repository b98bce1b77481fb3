use crate::config::Config;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A layout document found in the apktool output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFile {
    /// Path to the document
    pub path: PathBuf,

    /// File name including extension (e.g. "activity_main.xml")
    pub file_name: String,
}

impl LayoutFile {
    pub fn new(path: PathBuf) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        Some(Self { path, file_name })
    }

    /// Layout resource name (file name without extension)
    pub fn layout_name(&self) -> &str {
        self.file_name
            .strip_suffix(".xml")
            .unwrap_or(&self.file_name)
    }
}

/// Locates the inputs of a run inside an apktool output directory
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Layout directory under the apktool output
    pub fn layout_dir(&self, apktool_dir: &Path) -> PathBuf {
        apktool_dir.join(&self.config.layout_dir)
    }

    /// Every `.xml` document of the layout directory, sorted by file name.
    /// An unreadable directory is an error.
    pub fn find_layouts(&self, apktool_dir: &Path) -> Result<Vec<LayoutFile>> {
        let dir = self.layout_dir(apktool_dir);
        debug!("Scanning for layouts in: {}", dir.display());

        let entries = fs::read_dir(&dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read layout directory: {}", dir.display()))?;

        let mut layouts: Vec<LayoutFile> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|e| e == "xml").unwrap_or(false))
            .filter_map(LayoutFile::new)
            .collect();

        layouts.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        for layout in &layouts {
            trace!("Found layout: {}", layout.path.display());
        }
        debug!("Found {} layouts", layouts.len());
        Ok(layouts)
    }

    /// apktool's `smali` and `smali_classesN` directories
    pub fn find_smali_roots(&self, apktool_dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(apktool_dir) else {
            trace!("Cannot list {}", apktool_dir.display());
            return Vec::new();
        };

        let mut roots: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                name == "smali" || name.starts_with("smali_")
            })
            .map(|entry| entry.path())
            .collect();

        roots.sort();
        debug!("Found {} smali roots", roots.len());
        roots
    }
}
