//! Batch conversion of layout documents into labeled token rows

use crate::analysis::WidgetClassifier;
use crate::config::Config;
use crate::discovery::LayoutFile;
use crate::hierarchy::ClassHierarchy;
use crate::parser::{LayoutError, LayoutTreeBuilder};
use crate::report::{FileLabeler, LayoutCategory, TokenRecord};
use crate::tokens::{self, Token};
use crate::tree::{LayoutTreeNode, NodeRegistry};
use miette::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// A built, classified and serialized layout document
#[derive(Debug)]
pub struct TokenizedLayout {
    pub root: Option<LayoutTreeNode>,
    pub registry: NodeRegistry,
    pub tokens: Vec<Token>,
}

/// Build, classify and serialize one document
pub struct LayoutTokenizer<'a> {
    builder: LayoutTreeBuilder,
    classifier: WidgetClassifier<'a>,
}

impl<'a> LayoutTokenizer<'a> {
    pub fn new(hierarchy: &'a dyn ClassHierarchy) -> Self {
        Self {
            builder: LayoutTreeBuilder::new(),
            classifier: WidgetClassifier::new(hierarchy),
        }
    }

    pub fn tokenize(&self, path: &Path) -> Result<TokenizedLayout, LayoutError> {
        let built = self.builder.build(path)?;
        Ok(self.finish(built.root, built.registry))
    }

    /// Same as [`tokenize`](Self::tokenize) for contents already in memory
    pub fn tokenize_str(&self, path: &Path, contents: &str) -> Result<TokenizedLayout, LayoutError> {
        let built = self.builder.build_from_str(path, contents)?;
        Ok(self.finish(built.root, built.registry))
    }

    fn finish(&self, root: Option<LayoutTreeNode>, registry: NodeRegistry) -> TokenizedLayout {
        let root = root.map(|node| self.classifier.classify(node));
        let tokens = root.as_ref().map(tokens::serialize).unwrap_or_default();
        TokenizedLayout {
            root,
            registry,
            tokens,
        }
    }
}

/// What happened to one layout file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Written(TokenRecord),
    Failed(String),
    Excluded,
    TooSmall(usize),
    Unlabeled,
    Unreachable,
}

/// Counters for a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub files: usize,
    pub parsed: usize,
    pub failed: usize,
    pub excluded: usize,
    pub too_small: usize,
    pub unlabeled: usize,
    pub unreachable: usize,
    pub screens: usize,
    pub items: usize,
}

impl BatchStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files += 1;
        match outcome {
            FileOutcome::Failed(_) => self.failed += 1,
            FileOutcome::Excluded => self.excluded += 1,
            FileOutcome::TooSmall(_) => {
                self.parsed += 1;
                self.too_small += 1;
            }
            FileOutcome::Unlabeled => {
                self.parsed += 1;
                self.unlabeled += 1;
            }
            FileOutcome::Unreachable => {
                self.parsed += 1;
                self.unreachable += 1;
            }
            FileOutcome::Written(record) => {
                self.parsed += 1;
                match record.category {
                    LayoutCategory::Screen => self.screens += 1,
                    LayoutCategory::ListItem => self.items += 1,
                }
            }
        }
    }

    pub fn written(&self) -> usize {
        self.screens + self.items
    }
}

/// Output of [`BatchProcessor::process`]
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Rows in input order
    pub records: Vec<TokenRecord>,
    pub stats: BatchStats,
}

/// Runs the tokenizer over every layout file and labels the results
pub struct BatchProcessor<'a> {
    config: &'a Config,
    hierarchy: &'a dyn ClassHierarchy,
    labeler: FileLabeler,
    reachable: Option<HashSet<String>>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(config: &'a Config, hierarchy: &'a dyn ClassHierarchy) -> Result<Self> {
        Ok(Self {
            config,
            hierarchy,
            labeler: FileLabeler::new(config)?,
            reachable: None,
        })
    }

    /// Keep screen layouts only when their name is in `names`
    pub fn with_reachable_layouts(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.reachable = Some(names.into_iter().collect());
        self
    }

    pub fn process(&self, files: &[LayoutFile]) -> BatchResult {
        self.process_with_progress(files, &|| {})
    }

    /// Process the batch, calling `on_file` once per finished file
    pub fn process_with_progress(
        &self,
        files: &[LayoutFile],
        on_file: &(dyn Fn() + Sync),
    ) -> BatchResult {
        let mode = if self.config.parallel { "parallel" } else { "sequential" };
        info!("Tokenizing {} layouts ({})", files.len(), mode);

        let outcomes: Vec<FileOutcome> = if self.config.parallel {
            files
                .par_iter()
                .map(|file| {
                    let outcome = self.process_file(file);
                    on_file();
                    outcome
                })
                .collect()
        } else {
            files
                .iter()
                .map(|file| {
                    let outcome = self.process_file(file);
                    on_file();
                    outcome
                })
                .collect()
        };

        let mut result = BatchResult::default();
        for outcome in outcomes {
            result.stats.record(&outcome);
            if let FileOutcome::Written(record) = outcome {
                result.records.push(record);
            }
        }

        info!(
            "Batch done: {} screens, {} list items, {} failed",
            result.stats.screens, result.stats.items, result.stats.failed
        );
        result
    }

    /// Outcome for a single file
    pub fn process_file(&self, file: &LayoutFile) -> FileOutcome {
        if self.labeler.is_excluded(&file.file_name) {
            trace!("Skipping platform layout {}", file.file_name);
            return FileOutcome::Excluded;
        }

        let tokenizer = LayoutTokenizer::new(self.hierarchy);
        let layout = match tokenizer.tokenize(&file.path) {
            Ok(layout) => layout,
            Err(e) => {
                warn!("Skipping {}: {}", file.file_name, e);
                return FileOutcome::Failed(e.to_string());
            }
        };

        let count = layout.tokens.len();
        if count <= self.config.min_tokens {
            debug!("{}: only {} tokens", file.file_name, count);
            return FileOutcome::TooSmall(count);
        }

        let Some(category) = self.labeler.categorize(&file.file_name) else {
            trace!("{}: neither screen nor list item", file.file_name);
            return FileOutcome::Unlabeled;
        };

        if category == LayoutCategory::Screen {
            if let Some(reachable) = &self.reachable {
                if !reachable.contains(file.layout_name()) {
                    debug!("{}: not reached by setContentView", file.file_name);
                    return FileOutcome::Unreachable;
                }
            }
        }

        FileOutcome::Written(TokenRecord {
            category,
            file_name: file.file_name.clone(),
            tokens: layout.tokens,
        })
    }
}
