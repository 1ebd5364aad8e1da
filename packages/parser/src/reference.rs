//! Reference-number detection for the details column.
//!
//! Statements print the cheque number or payment-system reference as the
//! last token of the details text. Whether a token is a reference is the
//! part of the line grammar that differs most between banks, so it is
//! decided by a [`ReferenceClassifier`] that callers can swap out.

use serde::Deserialize;

/// Decides whether a details token is a transaction reference.
pub trait ReferenceClassifier {
    /// Returns `true` if `token` should be split off as the reference.
    fn is_reference(&self, token: &str) -> bool;
}

impl<F> ReferenceClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_reference(&self, token: &str) -> bool {
        self(token)
    }
}

/// Prefix and numeric rules for recognizing references.
///
/// The defaults match UPI, FCM and IMPS payment references plus bare
/// cheque numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReferenceRules {
    /// Tokens starting with any of these prefixes are references.
    pub prefixes: Vec<String>,
    /// Whether tokens made only of ASCII digits are references.
    pub numeric: bool,
}

impl Default for ReferenceRules {
    fn default() -> Self {
        Self {
            prefixes: vec!["UPI".to_owned(), "FCM".to_owned(), "IMPS".to_owned()],
            numeric: true,
        }
    }
}

impl ReferenceClassifier for ReferenceRules {
    fn is_reference(&self, token: &str) -> bool {
        if self.prefixes.iter().any(|p| token.starts_with(p.as_str())) {
            return true;
        }

        self.numeric && !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_match_payment_prefixes() {
        let rules = ReferenceRules::default();
        assert!(rules.is_reference("UPI123"));
        assert!(rules.is_reference("FCM/0042"));
        assert!(rules.is_reference("IMPS998877"));
        assert!(!rules.is_reference("NEFT123"));
        assert!(!rules.is_reference("Store"));
    }

    #[test]
    fn numeric_tokens_are_cheque_numbers() {
        let rules = ReferenceRules::default();
        assert!(rules.is_reference("000123"));
        assert!(!rules.is_reference("12A"));
        assert!(!rules.is_reference(""));

        let no_numeric = ReferenceRules {
            numeric: false,
            ..ReferenceRules::default()
        };
        assert!(!no_numeric.is_reference("000123"));
    }

    #[test]
    fn closures_are_classifiers() {
        let neft = |token: &str| token.starts_with("NEFT");
        assert!(neft.is_reference("NEFT-42"));
        assert!(!neft.is_reference("UPI123"));
    }
}
