//! Rejoining transaction rows that the PDF renderer wrapped across lines.
//!
//! A row begins with a statement date. Every following line that does not
//! begin with a date is a wrapped fragment of that row and is appended to
//! it with a single space.

use std::sync::LazyLock;

use regex::Regex;

/// Start of a transaction row: `DD Mon, YYYY`.
static ROW_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}\s[[:word:]]{3},\s[0-9]{4}").expect("valid regex"));

/// Whether `line` opens a new transaction row.
#[must_use]
pub fn starts_row(line: &str) -> bool {
    ROW_START_RE.is_match(line.trim())
}

/// Groups `lines` into one string per transaction row.
///
/// Fragments appearing before the first dated line form a group of their
/// own; there is no earlier row to attach them to.
#[must_use]
pub fn merge_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut merged = Vec::new();
    let mut group: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();

        if starts_row(line) && !group.is_empty() {
            merged.push(group.join(" ").trim().to_owned());
            group.clear();
        }
        group.push(line);
    }

    if !group.is_empty() {
        merged.push(group.join(" ").trim().to_owned());
    }

    merged
}
