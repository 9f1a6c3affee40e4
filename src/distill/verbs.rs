// Verb classification
//
// An ordered cascade of statement shapes. Each rule either claims the whole
// statement or passes; the first claim wins and later rules are not consulted.

use crate::distill::comments::strip_comments;
use crate::distill::tables::{DdlVerb, INTO_TABLE_RE, TABLE_IDENT};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const ADMIN_PREFIX: &str = "administrator command:";

// Static regexes compiled once for performance
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*call\s+(\S+)\(").unwrap());
static USE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s*use\s+").unwrap());
static UNLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*UNLOCK TABLES").unwrap());
static XA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s*xa\s+(\S+)").unwrap());
static LOAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s*LOAD").unwrap());

static SHOW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s*SHOW\s+").unwrap());
static SHOW_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:SESSION|FULL|STORAGE|ENGINE)\b").unwrap());
static SHOW_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+COUNT[^)]+\)").unwrap());
static SHOW_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\s+(?:FOR|FROM|LIKE|WHERE|LIMIT|IN)\b.+").unwrap());
static SHOW_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A(SHOW(?:\s+\S+){1,2}).*\z").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static DDL_IF_EXISTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+IF(?:\s+NOT)?\s+EXISTS").unwrap());
static DDL_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:TABLE|DATABASE)\s+({TABLE_IDENT})(\s+.*)?")).unwrap()
});

// Session-level verbs only count at the very start of the statement
static VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(^SHOW|^FLUSH|^COMMIT|^ROLLBACK|^BEGIN|SELECT|INSERT|UPDATE|DELETE|REPLACE|^SET|UNION|^START|^LOCK)\b",
    )
    .unwrap()
});

/// Result of classifying a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verbs {
    /// Space-separated, uppercase verb sequence (`"INSERT SELECT"`, `"SHOW STATUS"`)
    pub verbs: String,
    /// Object named directly by the statement (DDL targets); empty when none
    pub implied_table: String,
}

impl Verbs {
    fn new(verbs: impl Into<String>) -> Self {
        Self {
            verbs: verbs.into(),
            implied_table: String::new(),
        }
    }

    fn with_table(verbs: impl Into<String>, implied_table: impl Into<String>) -> Self {
        Self {
            verbs: verbs.into(),
            implied_table: implied_table.into(),
        }
    }
}

type Rule = fn(&str) -> Option<Verbs>;

/// Shapes recognised on the raw statement, in precedence order.
const RAW_RULES: &[(&str, Rule)] = &[
    ("call", call_rule),
    ("use", use_rule),
    ("unlock", unlock_rule),
    ("xa", xa_rule),
    ("load data", load_rule),
    ("admin", admin_rule),
];

/// Shapes recognised once comments are gone, in precedence order.
const STRIPPED_RULES: &[(&str, Rule)] = &[("show", show_rule), ("ddl", ddl_rule)];

/// Distill the verbs from a query.
///
/// Falls back to a plain keyword scan when no special shape matches; the
/// scan may yield an empty sequence for text that is not SQL at all.
pub fn distill_verbs(query: &str) -> Verbs {
    for (name, rule) in RAW_RULES {
        if let Some(verbs) = rule(query) {
            debug!("Special statement shape \"{}\": {}", name, verbs.verbs);
            return verbs;
        }
    }

    let query = strip_comments(query);

    for (name, rule) in STRIPPED_RULES {
        if let Some(verbs) = rule(&query) {
            debug!("Statement shape \"{}\": {}", name, verbs.verbs);
            return verbs;
        }
    }

    scan_verbs(&query)
}

fn call_rule(query: &str) -> Option<Verbs> {
    let procedure = CALL_RE.captures(query)?.get(1)?;
    Some(Verbs::new(format!("CALL {}", procedure.as_str())))
}

fn use_rule(query: &str) -> Option<Verbs> {
    USE_RE.is_match(query).then(|| Verbs::new("USE"))
}

fn unlock_rule(query: &str) -> Option<Verbs> {
    UNLOCK_RE.is_match(query).then(|| Verbs::new("UNLOCK"))
}

fn xa_rule(query: &str) -> Option<Verbs> {
    let subcommand = XA_RE.captures(query)?.get(1)?;
    Some(Verbs::new(format!("XA_{}", subcommand.as_str().to_uppercase())))
}

fn load_rule(query: &str) -> Option<Verbs> {
    if !LOAD_RE.is_match(query) {
        return None;
    }
    let table = INTO_TABLE_RE
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map_or_else(String::new, |table| table.as_str().replace('`', ""));
    Some(Verbs::new(format!("LOAD DATA {table}")))
}

fn admin_rule(query: &str) -> Option<Verbs> {
    query
        .starts_with(ADMIN_PREFIX)
        .then(|| Verbs::new(query.replace(ADMIN_PREFIX, "ADMIN").to_uppercase()))
}

fn show_rule(query: &str) -> Option<Verbs> {
    if !SHOW_RE.is_match(query) {
        return None;
    }

    let query = query.to_uppercase();
    let query = SHOW_NOISE_RE.replace_all(&query, " ");
    let query = SHOW_COUNT_RE.replace_all(&query, "");
    let query = SHOW_CLAUSE_RE.replace_all(&query, "");
    let query = SHOW_HEAD_RE.replace(&query, "${1}");
    let query = WHITESPACE_RE.replace_all(&query, " ");
    Some(Verbs::new(query))
}

fn ddl_rule(query: &str) -> Option<Verbs> {
    let verb = DdlVerb::detect(query)?;
    let query = DDL_IF_EXISTS_RE.replace_all(query, " ");

    let kind = verb.object_kind(&query);
    let object = DDL_OBJECT_RE
        .captures(&query)
        .and_then(|caps| caps.get(1))
        .map_or("", |object| object.as_str());
    debug!(
        "Data definition statement {} for {:?}: {}",
        verb.keyword(),
        kind,
        object
    );

    let verbs = match kind {
        Some(kind) => format!("{} {}", verb.keyword(), kind),
        None => verb.keyword().to_string(),
    };
    Some(Verbs::with_table(verbs, object))
}

/// Keyword scan with adjacent duplicates collapsed.
///
/// A SELECT followed by other verbs is almost always keyword text inside the
/// query body (a column named `delete`, a `replace()` call), so the sequence
/// is cut back to `SELECT`, keeping `UNION` when one was seen.
fn scan_verbs(query: &str) -> Verbs {
    let mut verbs: Vec<String> = Vec::new();
    for found in VERB_RE.find_iter(query) {
        let verb = found.as_str().to_uppercase();
        if verbs.last() != Some(&verb) {
            verbs.push(verb);
        }
    }

    if verbs.len() > 1 && verbs[0] == "SELECT" {
        debug!("False-positive verbs after SELECT: {:?}", &verbs[1..]);
        let union = verbs.iter().any(|verb| verb == "UNION");
        verbs = if union {
            vec!["SELECT".to_string(), "UNION".to_string()]
        } else {
            vec!["SELECT".to_string()]
        };
    }

    Verbs::new(verbs.join(" "))
}
