//! equivbench - benchmark log analysis CLI
//!
//! ## Commands
//!
//! - `parse`: dump one run's parsed state as JSON
//! - `compare`: pairwise resource table for two result directories
//! - `table`: one metric across the configurations of a TOML config
//! - `summarize`: median of a metric across repeated trial directories

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};

use equivbench_core::{
    aggregate_collections, render_table_md, write_table_json, write_table_md, Aggregated,
    BenchmarkCollection, CollectionLayout, CompareConfig, Dialect, IncompletePolicy, Metric,
    MultiComparator, PairwiseComparator, Reduction, Row, RunConfig, RunRecord, Style,
    StyledTable, Table, TableArtifact, Value, METRICS,
};

#[derive(Parser)]
#[command(name = "equivbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse and compare equivalence-checking benchmark logs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one stdout/stderr capture pair and print its state as JSON
    Parse {
        /// Captured standard output
        #[arg(long)]
        stdout: PathBuf,

        /// Captured standard error
        #[arg(long)]
        stderr: PathBuf,

        /// Log dialect (cegar, milp, resources)
        #[arg(short, long, default_value = "cegar")]
        dialect: Dialect,
    },

    /// Compare runlim resources of two result directories
    Compare {
        /// First result directory
        first: PathBuf,

        /// Second result directory
        second: PathBuf,

        /// Log dialect of the first directory (and of the second unless overridden)
        #[arg(short, long, default_value = "cegar")]
        dialect: Dialect,

        /// Log dialect of the second directory
        #[arg(long)]
        second_dialect: Option<Dialect>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare one metric across every configuration of a TOML config
    Table {
        /// Comparison config file
        #[arg(short, long)]
        config: PathBuf,

        /// Metric to tabulate
        #[arg(short, long, default_value = "time")]
        metric: Metric,

        /// Append the consensus equivalence verdict
        #[arg(long)]
        consensus: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Median of a metric per benchmark across repeated trial directories
    Summarize {
        /// Trial directories (e.g. one per seed)
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Metric to reduce
        #[arg(short, long, default_value = "time")]
        metric: Metric,

        /// Log dialect of every directory
        #[arg(short, long, default_value = "cegar")]
        dialect: Dialect,

        /// Print every trial's value instead of the median
        #[arg(long)]
        raw: bool,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Suffix of captured stdout files
    #[arg(long, default_value = ".out")]
    stdout_suffix: String,

    /// Suffix of captured stderr files
    #[arg(long, default_value = ".err")]
    stderr_suffix: String,

    /// Abort on the first incomplete run instead of marking it absent
    #[arg(long)]
    strict: bool,

    /// Emit the JSON artifact instead of markdown
    #[arg(long)]
    json: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl OutputArgs {
    fn layout(&self) -> CollectionLayout {
        CollectionLayout {
            stdout_suffix: self.stdout_suffix.clone(),
            stderr_suffix: self.stderr_suffix.clone(),
        }
    }

    fn policy(&self) -> IncompletePolicy {
        if self.strict {
            IncompletePolicy::Abort
        } else {
            IncompletePolicy::Skip
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    equivbench_core::init_tracing(cli.json_logs, level);

    let result = match cli.command {
        Commands::Parse {
            stdout,
            stderr,
            dialect,
        } => cmd_parse(&stdout, &stderr, dialect),
        Commands::Compare {
            first,
            second,
            dialect,
            second_dialect,
            output,
        } => cmd_compare(
            &first,
            &second,
            dialect,
            second_dialect.unwrap_or(dialect),
            &output,
        ),
        Commands::Table {
            config,
            metric,
            consensus,
            output,
        } => cmd_table(&config, metric, consensus, &output),
        Commands::Summarize {
            dirs,
            metric,
            dialect,
            raw,
        } => cmd_summarize(&dirs, metric, dialect, raw),
    };

    METRICS.flush();
    result
}

fn cmd_parse(stdout: &Path, stderr: &Path, dialect: Dialect) -> Result<()> {
    let record = RunRecord::from_files(stdout, stderr, &RunConfig::for_dialect(dialect))
        .with_context(|| format!("Failed to parse run {:?} / {:?}", stdout, stderr))?;

    let mut json = record.to_json();
    if let Some(obj) = json.as_object_mut() {
        obj.insert("succeeded".to_string(), record.succeeded().into());
        obj.insert("is_equiv".to_string(), record.is_equiv().into());
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn load_dir(
    dir: &Path,
    dialect: Dialect,
    layout: &CollectionLayout,
    policy: IncompletePolicy,
) -> Result<BenchmarkCollection> {
    BenchmarkCollection::load(dir, &RunConfig::for_dialect(dialect), layout, policy)
        .with_context(|| format!("Failed to load results from {:?}", dir))
}

fn cmd_compare(
    first: &Path,
    second: &Path,
    first_dialect: Dialect,
    second_dialect: Dialect,
    output: &OutputArgs,
) -> Result<()> {
    let layout = output.layout();
    let c1 = load_dir(first, first_dialect, &layout, output.policy())?;
    let c2 = load_dir(second, second_dialect, &layout, output.policy())?;
    info!(
        first = c1.present_count(),
        second = c2.present_count(),
        "comparing result directories"
    );

    let styled = PairwiseComparator::new(&c1, &c2).styled();
    emit(&format!("{} vs {}", first.display(), second.display()), styled, output)
}

fn cmd_table(config_path: &Path, metric: Metric, consensus: bool, output: &OutputArgs) -> Result<()> {
    let config = CompareConfig::load(config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))?;
    let collections = config
        .load_collections(output.policy())
        .context("Failed to load configured result directories")?;

    let mut comparator =
        MultiComparator::new(collections.iter().map(|(label, c)| (label.as_str(), c)));
    if !config.benchmarks.is_empty() {
        comparator = comparator.with_benchmarks(config.benchmarks.clone());
    }

    let styled = comparator.styled(metric, consensus);
    emit(metric.name(), styled, output)
}

#[derive(Serialize)]
struct SummaryEntry {
    benchmark: String,
    succeeded: usize,
    trials: usize,
    value: Aggregated,
}

fn cmd_summarize(dirs: &[PathBuf], metric: Metric, dialect: Dialect, raw: bool) -> Result<()> {
    if dirs.is_empty() {
        bail!("at least one trial directory is required");
    }
    let layout = CollectionLayout::default();
    let mut collections = Vec::with_capacity(dirs.len());
    for dir in dirs {
        collections.push(load_dir(dir, dialect, &layout, IncompletePolicy::Skip)?);
    }

    let reduction = if raw { Reduction::Raw } else { Reduction::Central };
    let grouped = aggregate_collections(collections);

    if raw {
        let entries: Vec<SummaryEntry> = grouped
            .iter()
            .map(|(name, agg)| SummaryEntry {
                benchmark: name.clone(),
                succeeded: agg.succeeded_count(),
                trials: agg.runs().len(),
                value: agg.get(metric, reduction),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let rows = grouped
        .iter()
        .map(|(name, agg)| Row {
            benchmark: name.clone(),
            values: vec![
                agg.get(metric, reduction)
                    .central()
                    .map_or(Value::Unknown, Value::Number),
                Value::Text(format!("{}/{}", agg.succeeded_count(), agg.runs().len())),
            ],
        })
        .collect();
    let table = Table {
        columns: vec![format!("median {}", metric.name()), "ok".to_string()],
        rows,
    };
    let styled = StyledTable::new(table, |row| vec![Style::Plain; row.values.len()]);
    print!("{}", render_table_md(&styled));
    Ok(())
}

fn emit(title: &str, styled: StyledTable, output: &OutputArgs) -> Result<()> {
    if output.json {
        let artifact = TableArtifact::new(title, styled);
        match &output.output {
            Some(path) => write_table_json(path, &artifact)
                .with_context(|| format!("Failed to write {:?}", path))?,
            None => println!("{}", serde_json::to_string_pretty(&artifact)?),
        }
    } else {
        match &output.output {
            Some(path) => write_table_md(path, &styled)
                .with_context(|| format!("Failed to write {:?}", path))?,
            None => print!("{}", render_table_md(&styled)),
        }
    }
    Ok(())
}
