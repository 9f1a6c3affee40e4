/// CLI utilities for the mysql-distill binary
///
/// This module provides the log-processing side of the crate: turning raw
/// log lines into statements, distilling them in parallel, aggregating
/// fingerprints and writing results. The distill engine itself does NOT
/// depend on anything here.
///
/// Modules:
/// - error: Error type shared by the CLI layer
/// - input: Log line filtering and statement reading
/// - output: Handles different output formats (text, JSON, NDJSON)
/// - parallel: Parallel distillation with Rayon, order preserving
/// - progress: Progress reporting for long-running operations
/// - summary: Fingerprint aggregation into counted buckets
pub mod error;
pub mod input;
pub mod output;
pub mod parallel;
pub mod progress;
pub mod summary;

pub use error::{CliError, Result};
pub use input::{StatementReader, statement_from_line};
pub use output::{DistilledQuery, OutputFormat, OutputWriter};
pub use parallel::{DistillConfig, DistillMode, ParallelDistiller};
pub use progress::{ProgressEvent, ProgressReporter};
pub use summary::{Bucket, Summary};
