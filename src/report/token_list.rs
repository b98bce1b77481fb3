use super::LayoutCategory;
use crate::tokens::{self, Token};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// One output row: a labeled, tokenized layout file
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub category: LayoutCategory,
    pub file_name: String,
    pub tokens: Vec<Token>,
}

impl TokenRecord {
    /// `<package> <category> <file> <tokens...>`
    pub fn to_line(&self, package: &str) -> String {
        format!(
            "{} {} {} {}",
            package,
            self.category,
            self.file_name,
            tokens::join(&self.tokens)
        )
    }
}

/// Writes `<package>-layout.lst` token list files
pub struct TokenListWriter {
    package: String,
    output_dir: PathBuf,
}

impl TokenListWriter {
    pub fn new(package: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            package: package.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}-layout.lst", self.package))
    }

    /// Lines in output order: list items first, then screens, each in input order
    pub fn lines(&self, records: &[TokenRecord]) -> Vec<String> {
        let items = records
            .iter()
            .filter(|r| r.category == LayoutCategory::ListItem);
        let screens = records
            .iter()
            .filter(|r| r.category == LayoutCategory::Screen);
        items
            .chain(screens)
            .map(|r| r.to_line(&self.package))
            .collect()
    }

    /// Write (overwriting) the token list file and return its path
    pub fn write(&self, records: &[TokenRecord]) -> Result<PathBuf> {
        let path = self.output_path();
        fs::create_dir_all(&self.output_dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create {}", self.output_dir.display()))?;

        let file = File::create(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        for line in self.lines(records) {
            writeln!(writer, "{}", line).into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;

        info!("Wrote {} rows to {}", records.len(), path.display());
        Ok(path)
    }
}
