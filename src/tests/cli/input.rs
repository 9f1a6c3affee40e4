// Tests for log line filtering and statement reading:
// - Delimiter and annotation handling
// - Statement start detection
// - Reading from in-memory and on-disk sources

use crate::cli::input::{StatementReader, statement_from_line};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[test]
fn test_statement_from_line_drops_delimiter_and_tail() {
    assert_eq!(statement_from_line("select 1;\n"), Some("select 1"));
    assert_eq!(
        statement_from_line("select 1; select 2"),
        Some("select 1")
    );
}

#[test]
fn test_statement_from_line_trims_whitespace() {
    assert_eq!(statement_from_line("   SELECT * FROM t  \r\n"), Some("SELECT * FROM t"));
    assert_eq!(statement_from_line("\t(select 1)"), Some("(select 1)"));
}

#[test]
fn test_statement_from_line_skips_annotations() {
    assert_eq!(statement_from_line("# Time: 2024-01-01T00:00:00"), None);
    assert_eq!(statement_from_line("# User@Host: root[root] @ localhost []"), None);
}

#[test]
fn test_indented_hash_line_is_not_a_statement() {
    // Not an annotation, but '#' is not a statement start either
    assert_eq!(statement_from_line("  # note"), None);
}

#[test]
fn test_statement_from_line_rejects_noise() {
    assert_eq!(statement_from_line(""), None);
    assert_eq!(statement_from_line("   \n"), None);
    assert_eq!(statement_from_line(";select 1"), None);
    assert_eq!(statement_from_line("-- comment"), None);
    assert_eq!(statement_from_line("/* header */ select 1"), None);
    assert_eq!(statement_from_line("`tbl`"), None);
}

#[test]
fn test_reader_yields_only_statements() {
    let log = "# Time: 1\nselect 1;\n\n  update foo set a=1;\n-- done\nSET timestamp=134;\n";
    let statements: Vec<String> = StatementReader::new(Cursor::new(log))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        statements,
        vec!["select 1", "update foo set a=1", "SET timestamp=134"]
    );
}

#[test]
fn test_reader_handles_missing_final_newline() {
    let statements: Vec<String> = StatementReader::new(Cursor::new("select 1\nselect 2"))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(statements, vec!["select 1", "select 2"]);
}

#[test]
fn test_reader_replaces_invalid_utf8() {
    let mut bytes = b"select * from t where a = '".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b"'\nselect 2\n");

    let statements: Vec<String> = StatementReader::new(Cursor::new(bytes))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(statements.len(), 2);
    assert!(statements[0].contains('\u{fffd}'));
    assert_eq!(statements[1], "select 2");
}

#[test]
fn test_reader_over_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# slow log header").unwrap();
    writeln!(file, "SELECT * FROM orders WHERE id = 1;").unwrap();
    writeln!(file, "INSERT INTO orders VALUES (2);").unwrap();
    file.flush().unwrap();

    let reader = std::io::BufReader::new(std::fs::File::open(file.path()).unwrap());
    let statements: Vec<String> = StatementReader::new(reader)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        statements,
        vec!["SELECT * FROM orders WHERE id = 1", "INSERT INTO orders VALUES (2)"]
    );
}
