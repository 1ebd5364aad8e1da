//! Statement layout configuration.
//!
//! A [`StatementLayout`] holds everything specific to one bank's statement
//! rendering: the table header row, the prefixes that end the table, the
//! reference rules and the description artifacts to strip. The
//! [`Default`] impl is the supported bank's layout; TOML files may override
//! any subset of fields.
//!
//! ```toml
//! [table]
//! end_markers = ["SUMMARY", "Page ", "AP-Aut", "Closing Balance"]
//!
//! [references]
//! prefixes = ["UPI", "IMPS", "NEFT"]
//!
//! [[cleanup]]
//! pattern = "3 "
//! first_only = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::reference::ReferenceRules;

/// Column header row that opens the transaction table.
pub const DEFAULT_HEADER_MARKER: &str =
    "DATE TRANSACTION DETAILS CHEQUE/REFERENCE# DEBIT CREDIT BALANCE";

/// Line prefixes that close the transaction table.
pub const DEFAULT_END_MARKERS: &[&str] = &["SUMMARY", "Page ", "AP-Aut"];

/// Line prefixes of page footers dropped from the table body.
pub const DEFAULT_PAGE_FOOTER_PREFIXES: &[&str] = &["Page "];

/// Errors that can occur while loading a layout file.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Reading the layout file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The layout file is not valid TOML for a [`StatementLayout`].
    #[error("Invalid layout: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Markers bounding the transaction table on a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableMarkers {
    /// Substring identifying the table's column header line.
    pub header_marker: String,
    /// A line starting with any of these ends the table.
    pub end_markers: Vec<String>,
    /// Lines starting with any of these are dropped from the table body.
    pub page_footer_prefixes: Vec<String>,
}

impl Default for TableMarkers {
    fn default() -> Self {
        Self {
            header_marker: DEFAULT_HEADER_MARKER.to_owned(),
            end_markers: DEFAULT_END_MARKERS.iter().map(|&s| s.to_owned()).collect(),
            page_footer_prefixes: DEFAULT_PAGE_FOOTER_PREFIXES
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
        }
    }
}

/// A literal fragment to remove from descriptions.
///
/// Some statement renderings leak stray glyphs into the details column.
/// Rules are applied in order before the description is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactRule {
    /// Literal text to remove.
    pub pattern: String,
    /// Remove only the first occurrence.
    #[serde(default)]
    pub first_only: bool,
}

impl ArtifactRule {
    /// Removes this rule's pattern from `text`.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if self.pattern.is_empty() {
            return text.to_owned();
        }
        if self.first_only {
            text.replacen(self.pattern.as_str(), "", 1)
        } else {
            text.replace(self.pattern.as_str(), "")
        }
    }
}

fn default_cleanup() -> Vec<ArtifactRule> {
    vec![ArtifactRule {
        pattern: "3 ".to_owned(),
        first_only: true,
    }]
}

const fn default_trailing_text() -> bool {
    true
}

/// Complete description of one bank's statement layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatementLayout {
    /// Table boundary markers.
    #[serde(default)]
    pub table: TableMarkers,
    /// Reference detection rules.
    #[serde(default)]
    pub references: ReferenceRules,
    /// Description artifacts to strip, in order.
    #[serde(default = "default_cleanup")]
    pub cleanup: Vec<ArtifactRule>,
    /// Accept lines where continuation text follows the amount columns,
    /// moving that text into the description.
    #[serde(default = "default_trailing_text")]
    pub trailing_text: bool,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            table: TableMarkers::default(),
            references: ReferenceRules::default(),
            cleanup: default_cleanup(),
            trailing_text: default_trailing_text(),
        }
    }
}

impl StatementLayout {
    /// Parses a layout from TOML. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Toml`] if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a layout file.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Io`] if the file cannot be read, or
    /// [`LayoutError::Toml`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = std::fs::read_to_string(path)?;
        let layout = Self::from_toml_str(&contents)?;
        log::debug!("Loaded statement layout from {}", path.display());
        Ok(layout)
    }

    /// Applies the cleanup rules to a description.
    #[must_use]
    pub fn clean_description(&self, description: &str) -> String {
        self.cleanup
            .iter()
            .fold(description.to_owned(), |text, rule| rule.apply(&text))
    }
}
