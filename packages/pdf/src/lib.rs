#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF text extraction for bank statements.
//!
//! Wraps [`pdf_extract`] behind the [`PageTextSource`] trait so the
//! statement parser receives one text blob per page in document order.
//! `pdf_extract` can panic on malformed input instead of returning an
//! error; those panics are caught and reported as [`PdfError::Malformed`].

use std::panic::{self, AssertUnwindSafe};

use bank_statement_parser::PageTextSource;

/// Magic bytes every PDF file starts with.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Errors specific to PDF text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The upload contained no bytes.
    #[error("Empty document")]
    Empty,

    /// The bytes do not start with a PDF header.
    #[error("Not a PDF document")]
    NotPdf,

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// The PDF decoder panicked on a malformed document.
    #[error("PDF extraction panicked (malformed document)")]
    Malformed,
}

/// [`PageTextSource`] backed by `pdf_extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    /// Creates a new `PdfTextSource`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PageTextSource for PdfTextSource {
    type Error = PdfError;

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, PdfError> {
        extract_pages(bytes)
    }
}

/// Extracts the text of each page of a PDF held in memory.
///
/// # Errors
///
/// Returns [`PdfError::Empty`] or [`PdfError::NotPdf`] when the input is
/// obviously not a PDF, [`PdfError::Extraction`] when the decoder reports
/// an error, and [`PdfError::Malformed`] when it panics.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, PdfError> {
    if bytes.is_empty() {
        return Err(PdfError::Empty);
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(PdfError::NotPdf);
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    let pages = match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            return Err(PdfError::Extraction(format!(
                "failed to extract text from PDF: {e}"
            )));
        }
        Err(_) => return Err(PdfError::Malformed),
    };

    log::debug!(
        "Extracted {} page(s), {} characters of text from {} bytes",
        pages.len(),
        pages.iter().map(String::len).sum::<usize>(),
        bytes.len()
    );

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(extract_pages(b""), Err(PdfError::Empty)));
    }

    #[test]
    fn non_pdf_input_is_rejected() {
        assert!(matches!(
            extract_pages(b"DATE,AMOUNT\n05 Jan 2024,10.00"),
            Err(PdfError::NotPdf)
        ));
    }

    #[test]
    fn truncated_pdf_is_an_error() {
        let result = PdfTextSource::new().page_texts(b"%PDF-1.7\n%truncated");
        assert!(matches!(
            result,
            Err(PdfError::Extraction(_) | PdfError::Malformed)
        ));
    }
}
