/// mysql-distill: group MySQL query logs by statement shape
///
/// Reads one statement from `--query`, or one statement per line from a file
/// or stdin, and prints the distilled fingerprint of each.
///
/// Modes:
/// - fingerprint (default): one fingerprint per accepted line
/// - tables: the tables each statement touches
/// - summary: fingerprints counted and sorted by frequency
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mysql_distill::cli::{
    DistillConfig, DistillMode, OutputFormat, OutputWriter, ParallelDistiller, StatementReader,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mysql-distill")]
#[command(about = "Distill MySQL statements into canonical fingerprints", long_about = None)]
#[command(version)]
struct Cli {
    /// Distill a single statement instead of reading input
    #[arg(short, long)]
    query: Option<String>,

    /// Read statements from a file instead of stdin
    #[arg(short, long, conflicts_with = "query")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormatArg,

    /// Print the tables each statement touches instead of its fingerprint
    #[arg(long, conflicts_with = "summary")]
    tables: bool,

    /// Count statements per fingerprint, most frequent first
    #[arg(long)]
    summary: bool,

    /// Number of parallel threads (defaults to CPU count)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Statements distilled per parallel batch
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Report progress on stderr
    #[arg(long)]
    progress: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormatArg {
    /// One result per line
    Text,
    /// Standard JSON array (pretty-printed)
    Json,
    /// Newline-delimited JSON (streaming)
    Ndjson,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Ndjson => OutputFormat::Ndjson,
        }
    }
}

impl Cli {
    fn config(&self) -> DistillConfig {
        let mode = if self.summary {
            DistillMode::Summary
        } else if self.tables {
            DistillMode::Tables
        } else {
            DistillMode::Fingerprint
        };

        DistillConfig {
            num_threads: self.threads.unwrap_or_else(num_cpus::get),
            batch_size: self.batch_size,
            format: self.format.clone().into(),
            mode,
            progress: self.progress,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_dir.as_deref())?;

    let distiller = ParallelDistiller::new(cli.config())?;
    let config = distiller.config();
    debug!("Configuration: {:?}", config);
    let mut writer = OutputWriter::new(config.format, config.mode);

    let processed = match (&cli.query, &cli.file) {
        // A statement given on the command line is taken as is, unfiltered
        (Some(query), _) => distiller.process([Ok(query.clone())], &mut writer)?,
        (None, Some(path)) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            distiller.process(StatementReader::new(BufReader::new(file)), &mut writer)?
        }
        (None, None) => {
            distiller.process(StatementReader::new(io::stdin().lock()), &mut writer)?
        }
    };

    writer.finish().context("Failed to write output")?;
    info!("Distilled {} statements", processed);
    Ok(())
}

/// Logs go to stderr so stdout stays clean for piped output; `--log-dir`
/// adds a daily rolling file. The returned guard must live until exit.
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("mysql_distill=warn"))
        .context("Invalid log filter")?;

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let (writer, guard) = non_blocking(rolling::daily(dir, "mysql-distill.log"));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_ansi(true),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
