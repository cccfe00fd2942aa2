//! tabcompare - Key-aware diff for tabular data

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use tabcompare::config::{
    ComparisonOptions, Config, CountMismatchPolicy, FailurePolicy, OutputFormat,
};
use tabcompare::diff::DiffEngine;
use tabcompare::output::render_to_stdout;
use tabcompare::parser::ParserFactory;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Key-aware diff for tabular data (CSV, Excel, JSON)
#[derive(Parser, Debug)]
#[command(name = "tabcompare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Old/original file to compare
    old_file: PathBuf,

    /// New file to compare
    new_file: PathBuf,

    /// Column(s) identifying the same record (comma-separated); defaults to all columns
    #[arg(short, long, value_delimiter = ',')]
    key: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Ignore case when comparing values and keys
    #[arg(long)]
    ignore_case: bool,

    /// Ignore leading/trailing whitespace in values and keys
    #[arg(long)]
    ignore_whitespace: bool,

    /// Match rows by position instead of by key
    #[arg(long)]
    strict_order: bool,

    /// Skip the duplicate-count check
    #[arg(long)]
    ignore_duplicates: bool,

    /// Report key-count mismatches and still run the full row comparison
    #[arg(long)]
    merge_count_mismatches: bool,

    /// Fail instead of reporting no differences when an input cannot be read
    #[arg(long)]
    strict_errors: bool,

    /// For Excel files: which sheet to compare
    #[arg(long)]
    sheet: Option<String>,

    /// Only show statistics, not detailed changes
    #[arg(long)]
    stats_only: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(has_changes) => {
            if has_changes {
                ExitCode::from(1) // Differences found
            } else {
                ExitCode::SUCCESS // No differences
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var("RUST_LOG").is_err() {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        builder.filter_module("tabcompare", level);
    }
    let _ = builder.format_timestamp_millis().try_init();
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ComparisonOptions::new()
        .with_key_columns(cli.key)
        .with_ignore_case(cli.ignore_case)
        .with_ignore_whitespace(cli.ignore_whitespace)
        .with_strict_row_order(cli.strict_order)
        .with_ignore_duplicates(cli.ignore_duplicates)
        .with_key_validation(true)
        .with_failure_policy(if cli.strict_errors {
            FailurePolicy::Propagate
        } else {
            FailurePolicy::Swallow
        })
        .with_count_mismatch_policy(if cli.merge_count_mismatches {
            CountMismatchPolicy::Merge
        } else {
            CountMismatchPolicy::ShortCircuit
        });

    let mut config = Config::new(cli.old_file, cli.new_file)
        .with_output_format(cli.format.into())
        .with_stats_only(cli.stats_only)
        .with_options(options);
    config.sheet_name = cli.sheet;
    config.color = !cli.no_color && std::io::stdout().is_terminal();

    info!(
        "Comparing {} with {}",
        config.old_file.display(),
        config.new_file.display()
    );

    // Parse files
    let factory = ParserFactory::new();
    let (old_dataset, new_dataset) = factory.load_pair(&config);

    // Compute diff
    let engine = DiffEngine::new(config.options.clone());
    let diff = engine.diff_loaded(old_dataset, new_dataset)?;

    // Handle stats-only mode
    if config.stats_only {
        let stats = &diff.stats;
        println!("Old file: {} ({} rows)", config.old_file.display(), stats.old_row_count);
        println!("New file: {} ({} rows)", config.new_file.display(), stats.new_row_count);
        println!();
        println!("Columns added:   {}", stats.columns_added);
        println!("Columns removed: {}", stats.columns_removed);
        println!("Added:     {}", stats.rows_added);
        println!("Removed:   {}", stats.rows_removed);
        println!("Modified:  {}", stats.rows_modified);
        println!("Unchanged: {}", stats.rows_unchanged);
        println!("Cells changed: {}", stats.cells_changed);
        if stats.count_mismatches > 0 {
            println!("Key count mismatches: {}", stats.count_mismatches);
        }
        return Ok(diff.has_changes());
    }

    // Render output
    render_to_stdout(&diff, &config)?;

    Ok(diff.has_changes())
}
