/// Fingerprint aggregation
///
/// Groups distilled statements into buckets keyed by fingerprint, the core
/// of query-log analysis: millions of lines collapse into a few shapes.
use crate::cli::output::DistilledQuery;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub fingerprint: String,
    pub count: usize,
    /// First statement seen with this fingerprint
    pub sample: String,
}

#[derive(Debug, Default)]
pub struct Summary {
    index: HashMap<String, usize>,
    buckets: Vec<Bucket>,
    total: usize,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, query: &DistilledQuery) {
        self.add(&query.fingerprint, &query.query);
    }

    pub fn add(&mut self, fingerprint: &str, statement: &str) {
        self.total += 1;
        match self.index.get(fingerprint) {
            Some(&slot) => self.buckets[slot].count += 1,
            None => {
                self.index
                    .insert(fingerprint.to_string(), self.buckets.len());
                self.buckets.push(Bucket {
                    fingerprint: fingerprint.to_string(),
                    count: 1,
                    sample: statement.to_string(),
                });
            }
        }
    }

    /// Number of distinct fingerprints
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of statements recorded
    pub fn total(&self) -> usize {
        self.total
    }

    /// Buckets by descending count; equal counts keep first-seen order.
    pub fn into_buckets(self) -> Vec<Bucket> {
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| b.count.cmp(&a.count));
        buckets
    }
}
