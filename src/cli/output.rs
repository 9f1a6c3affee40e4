/// Output formatting for the CLI
///
/// Supports multiple output formats optimized for different use cases:
/// - Text: One fingerprint (or table list) per line, for shell pipelines
/// - JSON: Single array, pretty-printed
/// - NDJSON: Newline-delimited JSON, streaming-friendly (for large logs)
use crate::cli::error::Result;
use crate::cli::parallel::DistillMode;
use crate::cli::summary::Bucket;
use crate::distill::distill_with_tables;
use serde::{Deserialize, Serialize};
use std::io::{self, Stdout, Write};

/// One distilled statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistilledQuery {
    pub query: String,
    pub fingerprint: String,
    pub tables: Vec<String>,
}

impl DistilledQuery {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let (fingerprint, tables) = distill_with_tables(&query);
        Self {
            query,
            fingerprint,
            tables,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one result per line
    Text,

    /// Standard JSON array (pretty-printed)
    Json,

    /// Newline-delimited JSON (streaming)
    Ndjson,
}

pub struct OutputWriter<W: Write = Stdout> {
    format: OutputFormat,
    mode: DistillMode,
    writer: W,
    buffer: Vec<DistilledQuery>,
}

impl OutputWriter<Stdout> {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, mode: DistillMode) -> Self {
        Self::with_writer(format, mode, io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn with_writer(format: OutputFormat, mode: DistillMode, writer: W) -> Self {
        Self {
            format,
            mode,
            writer,
            buffer: Vec::new(),
        }
    }

    /// Write a single record (for streaming formats)
    pub fn write_record(&mut self, record: &DistilledQuery) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let line = match self.mode {
                    DistillMode::Tables => record.tables.join(","),
                    _ => record.fingerprint.clone(),
                };
                writeln!(self.writer, "{}", line)?;
            }
            OutputFormat::Ndjson => {
                writeln!(self.writer, "{}", serde_json::to_string(record)?)?;
            }
            OutputFormat::Json => {
                // Buffer for one array at the end
                self.buffer.push(record.clone());
            }
        }
        Ok(())
    }

    /// Write a batch of records
    pub fn write_batch(&mut self, records: &[DistilledQuery]) -> Result<()> {
        if self.format == OutputFormat::Json {
            self.buffer.extend_from_slice(records);
            return Ok(());
        }

        for record in records {
            self.write_record(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Write aggregated buckets, most frequent first
    pub fn write_summary(&mut self, buckets: &[Bucket]) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                for bucket in buckets {
                    writeln!(self.writer, "{}\t{}", bucket.count, bucket.fingerprint)?;
                }
            }
            OutputFormat::Json => {
                writeln!(self.writer, "{}", serde_json::to_string_pretty(buckets)?)?;
            }
            OutputFormat::Ndjson => {
                for bucket in buckets {
                    writeln!(self.writer, "{}", serde_json::to_string(bucket)?)?;
                }
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flush buffered records (for JSON mode) and hand back the writer
    pub fn finish(mut self) -> Result<W> {
        if self.format == OutputFormat::Json && self.mode != DistillMode::Summary {
            writeln!(
                self.writer,
                "{}",
                serde_json::to_string_pretty(&self.buffer)?
            )?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
