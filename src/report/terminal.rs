use crate::analysis::ResourceUsage;
use crate::pipeline::BatchStats;
use colored::Colorize;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, stats: &BatchStats, output: &Path, usage: Option<&ResourceUsage>) {
        println!();
        if stats.written() == 0 {
            println!("{}", "No layouts qualified for output.".yellow().bold());
        } else {
            println!(
                "{}",
                format!("Tokenized {} of {} layouts", stats.written(), stats.files)
                    .green()
                    .bold()
            );
        }
        println!("  {} {}", "→".dimmed(), output.display().to_string().cyan());
        println!();

        self.print_counts(stats);

        if let Some(usage) = usage {
            self.print_usage(usage);
        }
    }

    fn print_counts(&self, stats: &BatchStats) {
        println!("{}", "─".repeat(60).dimmed());

        println!(
            "Written: {}, {}",
            format!("{} screens", stats.screens).green(),
            format!("{} list items", stats.items).green()
        );

        let mut skipped = Vec::new();
        if stats.failed > 0 {
            skipped.push(format!("{} failed", stats.failed).red().to_string());
        }
        if stats.too_small > 0 {
            skipped.push(format!("{} too small", stats.too_small).yellow().to_string());
        }
        if stats.excluded > 0 {
            skipped.push(format!("{} platform", stats.excluded).dimmed().to_string());
        }
        if stats.unlabeled > 0 {
            skipped.push(format!("{} unlabeled", stats.unlabeled).dimmed().to_string());
        }
        if stats.unreachable > 0 {
            skipped.push(format!("{} unreachable", stats.unreachable).blue().to_string());
        }
        if !skipped.is_empty() {
            println!("Skipped: {}", skipped.join(", "));
        }
    }

    fn print_usage(&self, usage: &ResourceUsage) {
        let valid = usage.valid_layout_names();
        println!(
            "Code:    {} layout ids, {} reached by setContentView",
            usage.layout_ids.len(),
            valid.len()
        );
        if usage.unresolved_calls > 0 {
            println!(
                "         {}",
                format!("{} calls with an unknown layout", usage.unresolved_calls).yellow()
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
