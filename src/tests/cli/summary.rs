use crate::cli::output::DistilledQuery;
use crate::cli::summary::Summary;

#[test]
fn test_empty_summary() {
    let summary = Summary::new();
    assert!(summary.is_empty());
    assert_eq!(summary.len(), 0);
    assert_eq!(summary.total(), 0);
    assert!(summary.into_buckets().is_empty());
}

#[test]
fn test_counts_per_fingerprint() {
    let mut summary = Summary::new();
    summary.add("SELECT t", "select * from t where id = 1");
    summary.add("BEGIN", "begin");
    summary.add("SELECT t", "select * from t where id = 2");

    assert_eq!(summary.len(), 2);
    assert_eq!(summary.total(), 3);

    let buckets = summary.into_buckets();
    assert_eq!(buckets[0].fingerprint, "SELECT t");
    assert_eq!(buckets[0].count, 2);
    assert_eq!(buckets[1].fingerprint, "BEGIN");
    assert_eq!(buckets[1].count, 1);
}

#[test]
fn test_sample_is_first_statement_seen() {
    let mut summary = Summary::new();
    summary.add("UPDATE foo", "update foo set a=1");
    summary.add("UPDATE foo", "update foo set a=2");

    let buckets = summary.into_buckets();
    assert_eq!(buckets[0].sample, "update foo set a=1");
}

#[test]
fn test_ties_keep_first_seen_order() {
    let mut summary = Summary::new();
    for fingerprint in ["COMMIT", "BEGIN", "SET", "USE"] {
        summary.add(fingerprint, fingerprint);
    }
    summary.add("SET", "set x=1");

    let order: Vec<String> = summary
        .into_buckets()
        .into_iter()
        .map(|bucket| bucket.fingerprint)
        .collect();
    assert_eq!(order, vec!["SET", "COMMIT", "BEGIN", "USE"]);
}

#[test]
fn test_record_uses_distilled_fingerprint() {
    let mut summary = Summary::new();
    summary.record(&DistilledQuery::new("select * from log_2024_01"));
    summary.record(&DistilledQuery::new("select * from log_2024_02"));

    let buckets = summary.into_buckets();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].fingerprint, "SELECT log_?_?");
    assert_eq!(buckets[0].count, 2);
    assert_eq!(buckets[0].sample, "select * from log_2024_01");
}
