#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the bank statement server.
//!
//! Every failure response shares the [`ApiError`] shape so clients can
//! rely on `error` always being present.

use bank_statement_transaction_models::Transaction;
use serde::{Deserialize, Serialize};

/// Name of the multipart form field carrying the statement.
pub const UPLOAD_FIELD: &str = "file";

/// Content type the uploaded statement must declare.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Successful `POST /upload` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiTransactions {
    /// Parsed transactions in statement order.
    pub transactions: Vec<Transaction>,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Short, stable error message.
    pub error: String,
    /// Underlying cause, when there is one worth reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates an error body without details.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Attaches details to the error body.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
