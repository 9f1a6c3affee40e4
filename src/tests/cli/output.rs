// Tests for output formatting and writing functionality:
// - Text output per mode
// - NDJSON streaming output
// - JSON buffering until finish

use crate::cli::output::{DistilledQuery, OutputFormat, OutputWriter};
use crate::cli::parallel::DistillMode;
use crate::cli::summary::Bucket;

fn records() -> Vec<DistilledQuery> {
    vec![
        DistilledQuery::new("select * from t1 join t2 on t1.id = t2.id"),
        DistilledQuery::new("BEGIN"),
    ]
}

fn render(format: OutputFormat, mode: DistillMode, records: &[DistilledQuery]) -> String {
    let mut writer = OutputWriter::with_writer(format, mode, Vec::new());
    writer.write_batch(records).unwrap();
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

#[test]
fn test_distilled_query_fields() {
    let record = DistilledQuery::new("SELECT * FROM db.tbl_7 WHERE id = 1");
    assert_eq!(record.query, "SELECT * FROM db.tbl_7 WHERE id = 1");
    assert_eq!(record.fingerprint, "SELECT db.tbl_?");
    assert_eq!(record.tables, vec!["db.tbl_7"]);
}

#[test]
fn test_text_fingerprints() {
    let output = render(OutputFormat::Text, DistillMode::Fingerprint, &records());
    assert_eq!(output, "SELECT t?\nBEGIN\n");
}

#[test]
fn test_text_tables() {
    let output = render(OutputFormat::Text, DistillMode::Tables, &records());
    assert_eq!(output, "t1,t2\n\n");
}

#[test]
fn test_ndjson_streaming() {
    let output = render(OutputFormat::Ndjson, DistillMode::Fingerprint, &records());
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: DistilledQuery = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first, records()[0]);

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["fingerprint"], "BEGIN");
    assert_eq!(second["tables"], serde_json::json!([]));
}

#[test]
fn test_json_array_written_on_finish() {
    let mut writer = OutputWriter::with_writer(OutputFormat::Json, DistillMode::Fingerprint, Vec::new());
    for record in records() {
        writer.write_record(&record).unwrap();
    }

    let output = String::from_utf8(writer.finish().unwrap()).unwrap();
    let parsed: Vec<DistilledQuery> = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, records());
}

#[test]
fn test_json_with_no_records_is_empty_array() {
    let output = render(OutputFormat::Json, DistillMode::Fingerprint, &[]);
    let parsed: Vec<DistilledQuery> = serde_json::from_str(&output).unwrap();
    assert!(parsed.is_empty());
}

#[test]
fn test_summary_text() {
    let buckets = vec![
        Bucket {
            fingerprint: "SELECT t".to_string(),
            count: 3,
            sample: "select * from t".to_string(),
        },
        Bucket {
            fingerprint: "BEGIN".to_string(),
            count: 1,
            sample: "begin".to_string(),
        },
    ];

    let mut writer = OutputWriter::with_writer(OutputFormat::Text, DistillMode::Summary, Vec::new());
    writer.write_summary(&buckets).unwrap();
    let output = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert_eq!(output, "3\tSELECT t\n1\tBEGIN\n");
}

#[test]
fn test_summary_json_is_not_followed_by_record_array() {
    let buckets = vec![Bucket {
        fingerprint: "SELECT t".to_string(),
        count: 2,
        sample: "select * from t".to_string(),
    }];

    let mut writer = OutputWriter::with_writer(OutputFormat::Json, DistillMode::Summary, Vec::new());
    writer.write_summary(&buckets).unwrap();
    let output = String::from_utf8(writer.finish().unwrap()).unwrap();

    let parsed: Vec<Bucket> = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, buckets);
}
