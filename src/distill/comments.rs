// Comment stripping
//
// Block and one-line comments are removed before verbs are classified.
// Version-gated comments (`/*!40001 ... */`) carry executable SQL and survive,
// except in SHOW statements where their qualifier replaces them.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

// One-line comments; a quote before the end of the line means the marker sits
// inside a literal, so nothing is removed there
static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?mR)(?:--|#)[^'"\r\n]*$"#).unwrap());

// But not /*!version */
static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*[^!].*?\*/").unwrap());

// For SHOW + /*!version */
static VERSION_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?[0-9]+.*?\*/").unwrap());
static SHOW_VERSION_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\ASHOW.*?/\*![0-9]+(.*?)\*/").unwrap());

/// Strip comments from a query.
///
/// ```
/// use mysql_distill::strip_comments;
///
/// assert_eq!(strip_comments("select foo--bar\nfoo"), "select foo\nfoo");
/// assert_eq!(strip_comments("select /*!40101 hello*/ 1"), "select /*!40101 hello*/ 1");
/// ```
pub fn strip_comments(query: &str) -> String {
    let query = BLOCK_COMMENT_RE.replace_all(query, "");
    let query = LINE_COMMENT_RE.replace_all(&query, "");
    let query = truncate_unterminated_block(&query);

    let Some(qualifier) = SHOW_VERSION_COMMENT_RE
        .captures(query)
        .map(|caps| caps.get(1).map_or_else(String::new, |m| m.as_str().to_string()))
    else {
        return query.to_string();
    };

    // Every version comment gives way to the first one's qualifier
    VERSION_COMMENT_RE
        .replace_all(query, NoExpand(&qualifier))
        .into_owned()
}

/// Cut the query at a `/*` that opens a comment and is never closed.
///
/// Openers inside quoted literals do not count, and comments that survived
/// block stripping (version-gated or empty) are skipped whole. An unclosed
/// version-gated opener is left alone, like its terminated counterpart.
fn truncate_unterminated_block(query: &str) -> &str {
    let bytes = query.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        match quote {
            Some(_) if byte == b'\\' => {
                i += 2;
                continue;
            }
            Some(open) if byte == open => quote = None,
            Some(_) => {}
            None if matches!(byte, b'\'' | b'"' | b'`') => quote = Some(byte),
            None if bytes[i..].starts_with(b"/*") => {
                let body = &bytes[i + 2..];
                match body.windows(2).position(|pair| pair == b"*/") {
                    Some(close) => {
                        i += 2 + close + 2;
                        continue;
                    }
                    None if body.starts_with(b"!") => return query,
                    None => return &query[..i],
                }
            }
            None => {}
        }
        i += 1;
    }

    query
}
