// Table reference extraction
//
// A keyword-anchored scan over the raw statement: every FROM, JOIN, INTO and
// UPDATE is followed by a comma list of (optionally aliased) identifiers.
// Subqueries are only found through their own anchors, never by descending.

use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// `ident` or `` `quoted ident` ``, optionally qualified as `schema.table`.
pub(crate) const TABLE_IDENT: &str = r"(?:`[^`]+`|\w+)(?:\.(?:`[^`]+`|\w+))?";

// Static regexes compiled once for performance
static TABLE_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(FROM|JOIN|UPDATE|INTO)\b\s*\(?({ident}(?:(?:\s+(?:AS\s+)?\w+)?,\s*{ident})*)",
        ident = TABLE_IDENT
    ))
    .unwrap()
});
static TABLE_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\s*({TABLE_IDENT})(\s+.*)?")).unwrap());
static DDL_STMT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*(CREATE|ALTER|TRUNCATE|DROP|RENAME)\b").unwrap());
static DDL_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)TABLE\s+({TABLE_IDENT})(\s+.*)?")).unwrap());
static IF_EXISTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)IF\s+(?:NOT\s+)?EXISTS").unwrap());
static CREATE_SELECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CREATE.+?\bSELECT\b").unwrap());
static SELECT_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\b(SELECT\b.+)").unwrap());
static MODIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:LOW_PRIORITY|IGNORE|STRAIGHT_JOIN|DELAYED)\s+").unwrap()
});
static LOCK_TABLES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*LOCK TABLES\s+").unwrap());
static LOCK_MODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:READ(?:\s+LOCAL)?|WRITE)\s*").unwrap());
static ESCAPED_QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\\["']"#).unwrap());
static DOUBLE_QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?s)".*?""#).unwrap());
static SINGLE_QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)'.*?'").unwrap());
static INSERT_VERB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*(?:INSERT|REPLACE)").unwrap());
static LEADING_INTO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s+INTO").unwrap());
static INSERT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*(INSERT|REPLACE)\s+").unwrap());
static LOAD_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*LOAD DATA").unwrap());
pub(crate) static INTO_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)INTO TABLE\s+(\S+)").unwrap());
static SELECT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\ASELECT\b").unwrap());

// One pattern per DDL verb, indexed by `DdlVerb as usize`
static DDL_DATABASE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DdlVerb::ALL
        .iter()
        .map(|verb| Regex::new(&format!(r"(?i){} DATABASE\b", verb.keyword())).unwrap())
        .collect()
});
static DDL_OBJECT_KIND_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DdlVerb::ALL
        .iter()
        .map(|verb| Regex::new(&format!(r"(?i){}.+(DATABASE|TABLE)\b", verb.keyword())).unwrap())
        .collect()
});

/// Data definition verbs that name their object directly instead of through
/// a FROM/INTO clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdlVerb {
    Create,
    Alter,
    Truncate,
    Drop,
    Rename,
}

impl DdlVerb {
    pub const ALL: [DdlVerb; 5] = [
        DdlVerb::Create,
        DdlVerb::Alter,
        DdlVerb::Truncate,
        DdlVerb::Drop,
        DdlVerb::Rename,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            DdlVerb::Create => "CREATE",
            DdlVerb::Alter => "ALTER",
            DdlVerb::Truncate => "TRUNCATE",
            DdlVerb::Drop => "DROP",
            DdlVerb::Rename => "RENAME",
        }
    }

    /// The DDL verb a statement starts with, if any.
    pub fn detect(query: &str) -> Option<Self> {
        let word = DDL_STMT_RE.captures(query)?.get(1)?.as_str();
        Self::ALL
            .into_iter()
            .find(|verb| verb.keyword().eq_ignore_ascii_case(word))
    }

    /// `<VERB> DATABASE` anywhere in the statement.
    pub(crate) fn targets_database(self, query: &str) -> bool {
        DDL_DATABASE_RES[self as usize].is_match(query)
    }

    /// The last `DATABASE` or `TABLE` following the verb on the same line.
    pub(crate) fn object_kind(self, query: &str) -> Option<String> {
        DDL_OBJECT_KIND_RES[self as usize]
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|kind| kind.as_str().to_uppercase())
    }
}

/// Get all tables used in a query, in first-seen order without duplicates.
///
/// Identifiers are returned as written, so back-quotes and schema
/// qualifiers survive: `` FROM `db`.`t1` `` yields `` `db`.`t1` ``.
pub fn get_tables(query: &str) -> Vec<String> {
    debug!("Getting tables for {}", query);
    unique(collect_tables(query))
}

fn collect_tables(query: &str) -> Vec<String> {
    if let Some(verb) = DdlVerb::detect(query) {
        return ddl_tables(verb, query);
    }

    let query = MODIFIER_RE.replace_all(query, " ");
    let query = match LOCK_TABLES_RE.find(&query).map(|prefix| prefix.end()) {
        Some(end) => {
            debug!("Special table type: LOCK TABLES");
            let locked = LOCK_MODE_RE.replace_all(&query[end..], "");
            debug!("Locked tables: {}", locked);
            Cow::Owned(format!("FROM {locked}"))
        }
        None => query,
    };

    // Literal text must never look like an identifier or a clause keyword
    let query = ESCAPED_QUOTE_RE.replace_all(&query, "");
    let query = DOUBLE_QUOTED_RE.replace_all(&query, "?");
    let query = SINGLE_QUOTED_RE.replace_all(&query, "?");

    let query = match INSERT_VERB_RE.find(&query) {
        Some(verb) if !LEADING_INTO_RE.is_match(&query[verb.end()..]) => {
            INSERT_PREFIX_RE.replace(&query, "${1} INTO ")
        }
        _ => Cow::Borrowed(&*query),
    };

    if LOAD_DATA_RE.is_match(&query) {
        return INTO_TABLE_RE
            .captures(&query)
            .and_then(|caps| caps.get(1))
            .map(|table| vec![table.as_str().to_string()])
            .unwrap_or_default();
    }

    let mut tables = Vec::new();
    for clause in table_clauses(&query) {
        debug!("Match tables: {}", clause);
        if SELECT_PREFIX_RE.is_match(clause) {
            continue;
        }

        for element in clause.split(',') {
            let table = TABLE_ALIAS_RE.replace_all(element, "${1}");
            if !table.chars().any(|c| c.is_ascii_alphabetic()) {
                debug!("Skipping suspicious table name: {}", table);
                continue;
            }
            tables.push(table.into_owned());
        }
    }

    tables
}

fn ddl_tables(verb: DdlVerb, query: &str) -> Vec<String> {
    debug!("Special table type: {}", verb.keyword());
    let query = IF_EXISTS_RE.replace_all(query, "");

    if verb.targets_database(&query) {
        debug!("Query alters database, not a table");
        return Vec::new();
    }

    if CREATE_SELECT_RE.is_match(&query) {
        if let Some(select) = SELECT_TAIL_RE.captures(&query).and_then(|caps| caps.get(1)) {
            debug!("CREATE TABLE ... SELECT: {}", select.as_str());
            return collect_tables(select.as_str());
        }
    }

    let table = DDL_TABLE_RE
        .captures(&query)
        .and_then(|caps| caps.get(1))
        .map(|table| table.as_str().to_string());
    debug!("Table match: {:?}", table);
    table.into_iter().collect()
}

/// Identifier lists following each table keyword, left to right.
///
/// `UPDATE` right after `KEY ` is the `ON DUPLICATE KEY UPDATE` clause and
/// does not introduce a table; scanning resumes just past its first letter.
fn table_clauses(query: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut start = 0;

    while let Some(caps) = TABLE_CLAUSE_RE.captures_at(query, start) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        if keyword.as_str().eq_ignore_ascii_case("UPDATE") && follows_key(&query[..whole.start()]) {
            start = whole.start() + 1;
            continue;
        }

        if let Some(list) = caps.get(2) {
            clauses.push(list.as_str());
        }
        start = whole.end();
    }

    clauses
}

/// True when `prefix` ends in `KEY` plus exactly one whitespace character.
fn follows_key(prefix: &str) -> bool {
    let mut chars = prefix.chars().rev();
    if !chars.next().is_some_and(char::is_whitespace) {
        return false;
    }
    let key: String = chars.take(3).collect();
    key.eq_ignore_ascii_case("YEK")
}

/// Drop repeated entries, keeping the first occurrence of each.
pub(crate) fn unique(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
