#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bank statement text parsing.
//!
//! Turns the per-page text of a bank statement into [`Transaction`]
//! records. Each page goes through three stages:
//!
//! 1. [`table::locate`] finds the transaction table between the column
//!    header row and the summary/footer.
//! 2. [`merge::merge_lines`] rejoins rows the PDF renderer wrapped onto
//!    several lines.
//! 3. [`line::parse_line`] splits each row into date, description,
//!    reference and amounts.
//!
//! Pages without a table and rows that do not parse are skipped. A
//! document that yields no transactions at all is an error
//! ([`ExtractError::NoTransactions`]).
//!
//! The primary entry point is [`StatementExtractor`]. Text extraction from
//! the PDF itself is delegated to a [`PageTextSource`].

pub mod layout;
pub mod line;
pub mod merge;
pub mod reference;
pub mod table;

pub use bank_statement_transaction_models::Transaction;
pub use layout::{LayoutError, StatementLayout};
pub use reference::{ReferenceClassifier, ReferenceRules};

/// Errors that can occur while extracting a statement.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The text source could not read the document.
    #[error("Text extraction error: {0}")]
    TextSource(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No page produced a transaction.
    ///
    /// `tables` distinguishes a statement whose layout was not recognized
    /// at all (`0`) from one whose tables held no parseable rows.
    #[error("{}", no_transactions_message(.pages, .tables))]
    NoTransactions {
        /// Number of pages scanned.
        pages: usize,
        /// Number of pages on which a transaction table was found.
        tables: usize,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_transactions_message(pages: &usize, tables: &usize) -> String {
    if *tables == 0 {
        format!("No transaction table found in {pages} page(s)")
    } else {
        format!("Transaction table found on {tables} of {pages} page(s) but no rows could be parsed")
    }
}

/// Source of per-page plain text for a document.
///
/// Implementations return one string per page, in document order.
pub trait PageTextSource {
    /// Error returned when the document cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the text of every page of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the document cannot be decoded.
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error>;
}

/// Outcome of parsing a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Whether the page had a transaction table.
    pub has_table: bool,
    /// Transactions parsed from the table, in row order.
    pub transactions: Vec<Transaction>,
}

/// Extracts transactions from statement pages using a layout and a
/// reference classifier.
#[derive(Debug, Clone)]
pub struct StatementExtractor<C = ReferenceRules> {
    layout: StatementLayout,
    classifier: C,
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new(StatementLayout::default())
    }
}

impl StatementExtractor {
    /// Creates an extractor that classifies references with the layout's
    /// own [`ReferenceRules`].
    #[must_use]
    pub fn new(layout: StatementLayout) -> Self {
        let classifier = layout.references.clone();
        Self { layout, classifier }
    }
}

impl<C: ReferenceClassifier> StatementExtractor<C> {
    /// Replaces the reference classifier.
    #[must_use]
    pub fn with_classifier<D: ReferenceClassifier>(self, classifier: D) -> StatementExtractor<D> {
        StatementExtractor {
            layout: self.layout,
            classifier,
        }
    }

    /// The layout in use.
    #[must_use]
    pub const fn layout(&self) -> &StatementLayout {
        &self.layout
    }

    /// Parses one merged row. See [`line::parse_line`].
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<Transaction> {
        line::parse_line(line, &self.layout, &self.classifier)
    }

    /// Parses the transaction table of a single page.
    #[must_use]
    pub fn parse_page(&self, page: &str) -> PageResult {
        let Some(lines) = table::locate(page, &self.layout.table) else {
            return PageResult {
                has_table: false,
                transactions: Vec::new(),
            };
        };

        let merged = merge::merge_lines(&lines);
        let transactions: Vec<Transaction> =
            merged.iter().filter_map(|row| self.parse_line(row)).collect();

        log::debug!(
            "Parsed {} of {} merged rows ({} raw lines)",
            transactions.len(),
            merged.len(),
            lines.len()
        );

        PageResult {
            has_table: true,
            transactions,
        }
    }

    /// Extracts transactions from already-extracted page texts.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NoTransactions`] if no page yields a
    /// transaction.
    pub fn extract_pages<S: AsRef<str>>(&self, pages: &[S]) -> Result<Vec<Transaction>, ExtractError> {
        let mut transactions = Vec::new();
        let mut tables = 0;

        for (idx, page) in pages.iter().enumerate() {
            let result = self.parse_page(page.as_ref());
            if result.has_table {
                tables += 1;
            } else {
                log::debug!("Page {}: no transaction table", idx + 1);
            }
            transactions.extend(result.transactions);
        }

        if transactions.is_empty() {
            return Err(ExtractError::NoTransactions {
                pages: pages.len(),
                tables,
            });
        }

        log::info!(
            "Extracted {} transactions from {} table(s) across {} page(s)",
            transactions.len(),
            tables,
            pages.len()
        );

        Ok(transactions)
    }

    /// Extracts transactions from a raw document using `source` for text
    /// extraction.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::TextSource`] if `source` fails, or
    /// [`ExtractError::NoTransactions`] if no page yields a transaction.
    pub fn extract_document<T>(&self, source: &T, bytes: &[u8]) -> Result<Vec<Transaction>, ExtractError>
    where
        T: PageTextSource + ?Sized,
    {
        let pages = source
            .page_texts(bytes)
            .map_err(|e| ExtractError::TextSource(Box::new(e)))?;

        log::debug!("Text source returned {} page(s) for {} bytes", pages.len(), bytes.len());

        self.extract_pages(&pages)
    }
}
