// Statement distillation
//
// Composes the verb classifier and the table extractor into the canonical
// fingerprint used to group statements of the same shape.

pub mod comments;
pub mod tables;
pub mod verbs;

pub use comments::strip_comments;
pub use tables::{DdlVerb, get_tables};
pub use verbs::{Verbs, distill_verbs};

use regex::Regex;
use std::sync::LazyLock;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(_?)[0-9]+").unwrap());

/// SHOW synonyms, applied in order as plain substring replacements.
const SHOW_ALIASES: [(&str, &str); 3] = [
    ("SCHEMA", "DATABASE"),
    ("KEYS", "INDEX"),
    ("INDEXES", "INDEX"),
];

/// Distill a query into its canonical fingerprint.
///
/// The result is the verb sequence followed by the tables the statement
/// touches, so queries differing only in literals share one fingerprint.
/// Never fails: text that is not SQL distills to an empty or partial string.
///
/// ```
/// use mysql_distill::distill;
///
/// assert_eq!(distill("select foo_1 from foo_2_3"), "SELECT foo_?_?");
/// assert_eq!(distill("SHOW /*!50002 GLOBAL */ STATUS"), "SHOW GLOBAL STATUS");
/// assert_eq!(distill("LOCK TABLES foo READ, bar WRITE"), "LOCK foo bar");
/// ```
pub fn distill(query: &str) -> String {
    compose(distill_verbs(query), || get_tables(query))
}

/// Distill a query and also return its tables as [`get_tables`] reports
/// them, extracting the tables only once.
///
/// ```
/// use mysql_distill::distill_with_tables;
///
/// let (fingerprint, tables) = distill_with_tables("select * from log_1 join log_2");
/// assert_eq!(fingerprint, "SELECT log_?");
/// assert_eq!(tables, ["log_1", "log_2"]);
/// ```
pub fn distill_with_tables(query: &str) -> (String, Vec<String>) {
    let tables = get_tables(query);
    let fingerprint = compose(distill_verbs(query), || &tables);
    (fingerprint, tables)
}

/// Join verbs and folded tables. SHOW and LOAD DATA fingerprints are complete
/// after classification, so `tables` is only called for other statements.
fn compose<T: AsRef<[String]>>(verbs: Verbs, tables: impl FnOnce() -> T) -> String {
    let Verbs {
        verbs,
        implied_table,
    } = verbs;

    if verbs.starts_with("SHOW") {
        return SHOW_ALIASES
            .iter()
            .fold(verbs, |verbs, (alias, name)| verbs.replace(alias, name));
    }

    if verbs.starts_with("LOAD DATA") {
        return verbs;
    }

    let tables = distill_tables(tables().as_ref(), &implied_table);
    std::iter::once(verbs)
        .chain(tables)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold every digit run in a table name to `?`, keeping one underscore in
/// front of it: `foo_123` becomes `foo_?` and `tbl99` becomes `tbl?`.
pub fn fold_digits(table: &str) -> String {
    DIGITS_RE.replace_all(table, "${1}?").into_owned()
}

fn distill_tables(tables: &[String], implied_table: &str) -> Vec<String> {
    let mut tables: Vec<String> = tables
        .iter()
        .map(|table| fold_digits(&table.replace('`', "")))
        .collect();

    if !implied_table.is_empty() {
        tables.push(implied_table.to_string());
    }

    tables::unique(tables)
}
