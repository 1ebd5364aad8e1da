#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bank statement transaction record types.
//!
//! [`Transaction`] is the single output record of the statement parser and
//! the wire format of the upload API. Dates are kept as the literal text
//! printed on the statement (`"05 Jan, 2024"`) so nothing is lost to locale
//! or format conversion; [`Transaction::parsed_date`] converts on demand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// `chrono` format string for the statement date column.
pub const STATEMENT_DATE_FORMAT: &str = "%d %b, %Y";

/// Direction of money movement for a transaction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    /// Money left the account.
    Debit,
    /// Money entered the account.
    Credit,
}

/// A single row of a bank statement's transaction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Literal statement date, e.g. `"05 Jan, 2024"`.
    pub date: String,
    /// Narrative text of the transaction.
    pub description: String,
    /// Cheque number or payment-system reference, empty when absent.
    pub reference: String,
    /// Amount withdrawn. Zero for credits.
    pub debit: f64,
    /// Amount deposited. Zero for debits.
    pub credit: f64,
    /// Running balance after the transaction. Zero when not printed.
    pub balance: f64,
}

impl Transaction {
    /// Parses [`Self::date`] into a calendar date.
    ///
    /// Returns `None` when the month abbreviation is not an English one
    /// `chrono` recognizes or the day is out of range.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, STATEMENT_DATE_FORMAT).ok()
    }

    /// Whether this transaction moved money out of or into the account.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        if self.debit > 0.0 {
            TransactionKind::Debit
        } else {
            TransactionKind::Credit
        }
    }

    /// Signed amount: negative for debits, positive for credits.
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        self.credit - self.debit
    }
}

/// Aggregate figures over a list of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Number of transactions.
    pub count: usize,
    /// Earliest parseable date.
    pub first_date: Option<NaiveDate>,
    /// Latest parseable date.
    pub last_date: Option<NaiveDate>,
    /// Sum of all debits.
    pub total_debit: f64,
    /// Sum of all credits.
    pub total_credit: f64,
    /// Balance printed on the last transaction.
    pub closing_balance: Option<f64>,
}

impl TransactionSummary {
    /// Summarizes `transactions` in statement order.
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let dates = transactions.iter().filter_map(Transaction::parsed_date);

        Self {
            count: transactions.len(),
            first_date: dates.clone().min(),
            last_date: dates.max(),
            total_debit: transactions.iter().map(|t| t.debit).sum(),
            total_credit: transactions.iter().map(|t| t.credit).sum(),
            closing_balance: transactions.last().map(|t| t.balance),
        }
    }
}
