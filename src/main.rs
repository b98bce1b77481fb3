use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use layoutseq::analysis::{ResourceUsage, ResourceUsageScanner};
use layoutseq::config::Config;
use layoutseq::discovery::FileFinder;
use layoutseq::hierarchy::HierarchyTable;
use layoutseq::parser::SmaliProgram;
use layoutseq::pipeline::BatchProcessor;
use layoutseq::report::{JsonReporter, TerminalReporter, TokenListWriter};

/// layoutseq - Widget token sequences from apktool-decoded Android layouts
#[derive(Parser, Debug)]
#[command(name = "layoutseq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application package name (names the output file and the R classes)
    #[arg(short, long)]
    package: String,

    /// apktool output directory of the application
    #[arg(long, visible_alias = "atd", value_name = "DIR")]
    apktool_dir: PathBuf,

    /// Directory the token list is written to
    #[arg(long, visible_alias = "td", value_name = "DIR")]
    token_dir: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Smali directories to scan (can be specified multiple times)
    /// Defaults to every smali* directory of the apktool output
    #[arg(long, value_name = "DIR")]
    smali_dir: Vec<PathBuf>,

    /// Only keep screen layouts passed to setContentView somewhere in the code
    #[arg(long)]
    reachable_only: bool,

    /// Build layouts in parallel
    #[arg(long)]
    parallel: bool,

    /// Drop layouts with this many tokens or fewer
    #[arg(long, value_name = "N")]
    min_tokens: Option<usize>,

    /// Write the resource usage scan as JSON
    #[arg(long, value_name = "FILE")]
    reachability: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("layoutseq v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.apktool_dir)?
    };

    // Override with CLI arguments
    if cli.reachable_only {
        config.reachable_only = true;
    }
    if cli.parallel {
        config.parallel = true;
    }
    if let Some(min_tokens) = cli.min_tokens {
        config.min_tokens = min_tokens;
    }

    Ok(config)
}

fn run(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();
    let finder = FileFinder::new(config);

    // Step 1: Load smali
    let smali_roots = if cli.smali_dir.is_empty() {
        finder.find_smali_roots(&cli.apktool_dir)
    } else {
        cli.smali_dir.clone()
    };
    let program = if smali_roots.is_empty() {
        warn!("No smali directories found, class hierarchy limited to the framework");
        SmaliProgram::default()
    } else {
        SmaliProgram::load(&smali_roots).into_diagnostic()?
    };

    // Step 2: Class hierarchy and resource usage
    let mut hierarchy = HierarchyTable::android_framework();
    hierarchy.extend(program.hierarchy());
    info!("Class hierarchy has {} edges", hierarchy.len());

    let usage = if program.is_empty() {
        None
    } else {
        let package_prefix = config.package_prefix(&cli.package);
        let mut scanner = ResourceUsageScanner::new(&cli.package, package_prefix);
        scanner.scan(&program);
        Some(scanner.into_usage())
    };

    // Step 3: Enumerate layouts
    let layouts = finder.find_layouts(&cli.apktool_dir)?;
    info!("Found {} layout files", layouts.len());

    // Step 4: Tokenize and label
    let mut processor = BatchProcessor::new(config, &hierarchy)?;
    if config.reachable_only {
        match &usage {
            Some(usage) => {
                processor = processor.with_reachable_layouts(usage.valid_layout_names());
            }
            None => warn!("--reachable-only needs smali code; keeping every screen layout"),
        }
    }

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(layouts.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map_err(|e| miette::miette!("Invalid progress template: {}", e))?
            .progress_chars("#>-"),
    );
    let result = processor.process_with_progress(&layouts, &|| pb.inc(1));
    pb.finish_and_clear();

    // Step 5: Write outputs
    let writer = TokenListWriter::new(cli.package.as_str(), cli.token_dir.as_path());
    let output = writer.write(&result.records)?;

    if let Some(path) = &cli.reachability {
        let reporter = JsonReporter::new(Some(path.clone()));
        let empty = ResourceUsage::default();
        reporter.report(&cli.package, usage.as_ref().unwrap_or(&empty))?;
    }

    if !cli.quiet {
        TerminalReporter::new().report(&result.stats, &output, usage.as_ref());
        println!(
            "{}",
            format!("Done in {:.2}s", start_time.elapsed().as_secs_f64()).dimmed()
        );
    }

    Ok(())
}
