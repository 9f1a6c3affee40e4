/// Progress reporting for long-running CLI operations
///
/// Provides user-friendly progress updates to stderr, leaving stdout
/// clean for piped output. Input is streamed, so there is no known total:
/// progress is reported as a running count and rate.
use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Started,
    Progress { processed: usize, rate: f64 },
    Completed { total: usize, buckets: Option<usize>, duration_ms: u64 },
}

pub struct ProgressReporter {
    start_time: Instant,
    last_report: Option<Instant>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let reporter = Self {
            start_time: Instant::now(),
            last_report: None,
        };
        reporter.emit(&ProgressEvent::Started);
        reporter
    }

    /// Report progress (throttled to avoid spam)
    ///
    /// Returns the event that was printed, if any.
    pub fn report(&mut self, processed: usize) -> Option<ProgressEvent> {
        let now = Instant::now();
        if self
            .last_report
            .is_some_and(|last| now.duration_since(last) < REPORT_INTERVAL)
        {
            return None;
        }
        self.last_report = Some(now);

        let event = ProgressEvent::Progress {
            processed,
            rate: self.rate(processed),
        };
        self.emit(&event);
        Some(event)
    }

    /// Report completion
    pub fn complete(&self, total: usize, buckets: Option<usize>) -> ProgressEvent {
        let event = ProgressEvent::Completed {
            total,
            buckets,
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        };
        self.emit(&event);
        event
    }

    /// Report error
    pub fn error(&self, message: &str) {
        eprintln!("❌ Error: {}", message);
    }

    fn rate(&self, processed: usize) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            processed as f64 / elapsed
        } else {
            0.0
        }
    }

    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started => eprintln!("🚀 Distilling statements..."),
            ProgressEvent::Progress { processed, rate } => {
                eprintln!("⚡ Progress: {} statements - {:.0} statements/sec", processed, rate)
            }
            ProgressEvent::Completed {
                total,
                buckets,
                duration_ms,
            } => match buckets {
                Some(buckets) => eprintln!(
                    "✅ Distill complete: {} statements into {} fingerprints in {:.2}s",
                    total,
                    buckets,
                    *duration_ms as f64 / 1000.0
                ),
                None => eprintln!(
                    "✅ Distill complete: {} statements in {:.2}s",
                    total,
                    *duration_ms as f64 / 1000.0
                ),
            },
        }
    }
}
