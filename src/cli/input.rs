/// Statement input for the CLI
///
/// Log files hold one statement per line, often with trailing delimiters,
/// `#` annotation lines (slow-log headers) and other noise. Only lines that
/// look like the start of a statement are handed to the distiller.
use regex::Regex;
use std::io::{self, BufRead};
use std::sync::LazyLock;

static STATEMENT_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A[\w(]").unwrap());

/// Extract the statement from one input line, or `None` when the line does
/// not look like SQL.
///
/// Everything from the first `;` on is dropped, `#` lines are skipped, and
/// what remains must start with a word character or `(`.
pub fn statement_from_line(line: &str) -> Option<&str> {
    let statement = line.trim_end().split(';').next().unwrap_or_default();
    if statement.starts_with('#') {
        return None;
    }

    let statement = statement.trim_start();
    STATEMENT_START_RE.is_match(statement).then_some(statement)
}

/// Iterator over the statements of a line-oriented reader.
///
/// Invalid UTF-8 is replaced rather than rejected so one corrupt log line
/// cannot stop a run.
pub struct StatementReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.buf);
                    if let Some(statement) = statement_from_line(&line) {
                        return Some(Ok(statement.to_string()));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
