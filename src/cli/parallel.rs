/// Parallel distillation engine for large query logs
///
/// Uses Rayon to fan each batch of statements out across a dedicated thread
/// pool. The distill engine is pure and shares only read-only compiled
/// patterns, so workers need no coordination; results keep input order.
use crate::cli::error::{CliError, Result};
use crate::cli::output::{DistilledQuery, OutputFormat, OutputWriter};
use crate::cli::progress::ProgressReporter;
use crate::cli::summary::Summary;
use rayon::prelude::*;
use std::io::{self, Write};
use tracing::debug;

/// What each input statement turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistillMode {
    /// One fingerprint per statement
    #[default]
    Fingerprint,

    /// The table list of each statement
    Tables,

    /// Counted fingerprint buckets for the whole input
    Summary,
}

/// Configuration for parallel distillation
#[derive(Debug, Clone)]
pub struct DistillConfig {
    /// Number of parallel threads (defaults to CPU count)
    pub num_threads: usize,

    /// Statements distilled per parallel batch
    pub batch_size: usize,

    pub format: OutputFormat,

    pub mode: DistillMode,

    /// Report progress on stderr
    pub progress: bool,
}

impl Default for DistillConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            batch_size: 1000,
            format: OutputFormat::Text,
            mode: DistillMode::Fingerprint,
            progress: false,
        }
    }
}

impl DistillConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(CliError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(CliError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// High-performance parallel distiller
pub struct ParallelDistiller {
    config: DistillConfig,
    pool: rayon::ThreadPool,
}

impl ParallelDistiller {
    /// Create a new parallel distiller with the given configuration
    pub fn new(config: DistillConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .map_err(|e| CliError::ThreadPool(e.to_string()))?;

        debug!(
            "Distiller ready: {} threads, batch size {}",
            config.num_threads, config.batch_size
        );
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &DistillConfig {
        &self.config
    }

    /// Distill one batch in parallel; output order matches input order
    pub fn distill_batch(&self, statements: &[String]) -> Vec<DistilledQuery> {
        self.pool.install(|| {
            statements
                .par_iter()
                .map(|statement| DistilledQuery::new(statement.as_str()))
                .collect()
        })
    }

    /// Distill a stream of statements batch by batch, writing each batch as it
    /// completes (or folding it into a summary in summary mode).
    ///
    /// Returns the number of statements processed.
    pub fn process<I, W>(&self, statements: I, writer: &mut OutputWriter<W>) -> Result<usize>
    where
        I: IntoIterator<Item = io::Result<String>>,
        W: Write,
    {
        let mut summary = (self.config.mode == DistillMode::Summary).then(Summary::new);
        let mut progress = self.config.progress.then(ProgressReporter::new);
        let mut batch = Vec::with_capacity(self.config.batch_size);
        let mut processed = 0;

        for statement in statements {
            let statement = match statement {
                Ok(statement) => statement,
                Err(e) => {
                    if let Some(progress) = progress.as_ref() {
                        progress.error(&e.to_string());
                    }
                    return Err(e.into());
                }
            };
            batch.push(statement);
            if batch.len() == self.config.batch_size {
                processed += self.flush_batch(&mut batch, writer, summary.as_mut())?;
                if let Some(progress) = progress.as_mut() {
                    progress.report(processed);
                }
            }
        }
        if !batch.is_empty() {
            processed += self.flush_batch(&mut batch, writer, summary.as_mut())?;
        }

        let buckets = match summary {
            Some(summary) => {
                if summary.is_empty() {
                    debug!("No statements to summarize");
                } else {
                    debug!(
                        "Summarized {} statements into {} fingerprints",
                        summary.total(),
                        summary.len()
                    );
                }
                let fingerprints = summary.len();
                writer.write_summary(&summary.into_buckets())?;
                Some(fingerprints)
            }
            None => None,
        };

        if let Some(progress) = progress {
            progress.complete(processed, buckets);
        }
        Ok(processed)
    }

    fn flush_batch<W: Write>(
        &self,
        batch: &mut Vec<String>,
        writer: &mut OutputWriter<W>,
        summary: Option<&mut Summary>,
    ) -> Result<usize> {
        let records = self.distill_batch(batch);
        batch.clear();

        match summary {
            Some(summary) => records.iter().for_each(|record| summary.record(record)),
            None => writer.write_batch(&records)?,
        }
        Ok(records.len())
    }
}
