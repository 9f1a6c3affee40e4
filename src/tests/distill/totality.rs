use crate::distill::{distill, distill_verbs, get_tables, strip_comments};

fn exercise(query: &str) {
    let _ = strip_comments(query);
    let _ = distill_verbs(query);
    let _ = get_tables(query);
    let _ = distill(query);
}

#[test]
fn test_empty_and_whitespace() {
    for query in ["", " ", "\n", "\r\n", "\t\t", ";"] {
        exercise(query);
        assert!(get_tables(query).is_empty(), "no tables in {:?}", query);
    }
}

#[test]
fn test_unbalanced_punctuation() {
    let inputs = [
        "select * from (",
        "select * from `unterminated",
        "insert into 'x",
        "select \"",
        "/*",
        "*/",
        "/*!",
        "--",
        "#",
        "select * from t1 where a = '\\",
        "UPDATE",
        "INSERT",
        "LOCK TABLES",
        "LOAD DATA INTO TABLE",
        "create table",
        "drop database",
        "administrator command:",
        "SHOW",
        "XA",
        "CALL",
    ];

    for query in inputs {
        exercise(query);
    }
}

#[test]
fn test_non_ascii_input() {
    let inputs = [
        "SELECT * FROM täble WHERE name = 'ü'",
        "select * from 表 where 名 = 1",
        "SELECT '\u{0}' FROM t\u{0}",
        "\u{feff}SELECT 1",
        "SHOW /*!50002 ✓ */ STATUS",
    ];

    for query in inputs {
        exercise(query);
    }

    assert_eq!(distill("select * from 表 where 名 = 1"), "SELECT");
}

#[test]
fn test_lossy_binary_input() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let query = String::from_utf8_lossy(&bytes);
    exercise(&query);
}

#[test]
fn test_large_statement() {
    let values = vec!["(1, 'abc', NULL)"; 200_000].join(", ");
    let query = format!("INSERT INTO big_tbl_1 (a, b, c) VALUES {values}");
    assert!(query.len() > 2_000_000);

    assert_eq!(distill(&query), "INSERT big_tbl_?");
    assert_eq!(get_tables(&query), vec!["big_tbl_1"]);
}

#[test]
fn test_many_comments() {
    let query = "select 1 /* a */ ".repeat(10_000) + "from t -- end";
    exercise(&query);
    assert_eq!(distill(&query), "SELECT t");
}

#[test]
fn test_output_is_deterministic() {
    let query = "select * from a join b on a.id = b.id where x in (select id from c)";
    let first = distill(query);
    for _ in 0..10 {
        assert_eq!(distill(query), first);
    }
}
