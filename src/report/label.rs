use crate::config::Config;
use miette::{IntoDiagnostic, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Row category written to token list files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayoutCategory {
    /// Activity or fragment screen
    Screen,
    /// Row of a list, grid or recycler
    ListItem,
}

impl LayoutCategory {
    pub fn code(&self) -> u8 {
        match self {
            LayoutCategory::Screen => 1,
            LayoutCategory::ListItem => 2,
        }
    }
}

impl fmt::Display for LayoutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Labels layout files purely from their file names
pub struct FileLabeler {
    exclude_prefixes: Vec<String>,
    screen_keywords: Vec<String>,
    item_pattern: Option<Regex>,
}

impl FileLabeler {
    pub fn new(config: &Config) -> Result<Self> {
        let alternatives: Vec<String> = config
            .item_keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect();

        let item_pattern = if alternatives.is_empty() {
            None
        } else {
            // anywhere in the stem: prefix, suffix, infix or glued to other words
            let pattern = format!(r"(?:{})", alternatives.join("|"));
            Some(Regex::new(&pattern).into_diagnostic()?)
        };

        Ok(Self {
            exclude_prefixes: config.exclude_prefixes.clone(),
            screen_keywords: config.screen_keywords.clone(),
            item_pattern,
        })
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude_prefixes
            .iter()
            .any(|p| file_name.starts_with(p.as_str()))
    }

    /// Category of a layout file, `None` when it is neither a screen nor a list item.
    /// List items take precedence.
    pub fn categorize(&self, file_name: &str) -> Option<LayoutCategory> {
        let stem = file_name.strip_suffix(".xml").unwrap_or(file_name);

        if self.item_pattern.as_ref().map(|p| p.is_match(stem)).unwrap_or(false) {
            return Some(LayoutCategory::ListItem);
        }
        if self
            .screen_keywords
            .iter()
            .any(|k| stem.contains(k.as_str()))
        {
            return Some(LayoutCategory::Screen);
        }
        None
    }
}
