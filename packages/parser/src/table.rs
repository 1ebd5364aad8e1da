//! Locating the transaction table inside a page of text.

use crate::layout::TableMarkers;

/// Returns the candidate table lines of `page`, or `None` when the page has
/// no table header.
///
/// The table starts after the first line containing the header marker and
/// ends before the first later line that starts with an end marker (or at
/// the end of the page). Blank lines and page-footer lines are dropped.
#[must_use]
pub fn locate<'a>(page: &'a str, markers: &TableMarkers) -> Option<Vec<&'a str>> {
    let lines: Vec<&str> = page.lines().collect();

    let header_idx = lines
        .iter()
        .position(|line| line.contains(markers.header_marker.as_str()))?;

    let body = &lines[header_idx + 1..];
    let end = body
        .iter()
        .position(|line| starts_with_any(line, &markers.end_markers))
        .unwrap_or(body.len());

    Some(
        body[..end]
            .iter()
            .copied()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !starts_with_any(line, &markers.page_footer_prefixes))
            .collect(),
    )
}

fn starts_with_any(line: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p.as_str()))
}
