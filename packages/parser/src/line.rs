//! Splitting a merged transaction row into typed fields.
//!
//! Rows follow this grammar over whitespace-separated tokens:
//!
//! ```text
//! row      := DATE detail* amount amount? trailing*
//! DATE     := [0-9]{2} ' ' [[:word:]]{3} ', ' [0-9]{4}
//! amount   := [+-]? ([0-9]{1,3} (',' [0-9]{2,3})+ | [0-9]+) '.' [0-9]{2}
//! trailing := any token
//! ```
//!
//! Digit groups may be thousands (`1,234,567.89`) or lakh/crore
//! (`12,34,567.89`). The first amount is the signed transaction amount and
//! the second, when present, is the running balance. `trailing` tokens are
//! wrapped description text that the line merger appended after the amount
//! columns; they are only accepted when the layout allows it.

use std::sync::LazyLock;

use bank_statement_transaction_models::Transaction;
use regex::Regex;

use crate::layout::StatementLayout;
use crate::reference::ReferenceClassifier;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2} [[:word:]]{3}, [0-9]{4})").expect("valid regex"));

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]{1,3}(?:,[0-9]{2,3})+|[0-9]+)\.[0-9]{2}$").expect("valid regex")
});

/// A row broken into its grammar parts. Borrowed from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTokens<'a> {
    /// Literal date text.
    pub date: &'a str,
    /// Tokens between the date and the amounts.
    pub details: Vec<&'a str>,
    /// One or two amount tokens.
    pub amounts: Vec<&'a str>,
    /// Non-amount tokens after the amounts.
    pub trailing: Vec<&'a str>,
}

/// Whether `token` has the shape of a statement amount.
#[must_use]
pub fn is_amount(token: &str) -> bool {
    AMOUNT_RE.is_match(token)
}

/// Tokenizes a merged row.
///
/// Returns `None` when the row does not start with a date or contains no
/// amount region. With `allow_trailing` unset, the amounts must be the last
/// tokens of the row. Otherwise the last pair of adjacent amounts is the
/// amount region, so decimals inside trailing text are not mistaken for
/// the amount column; a lone amount is used only when no pair exists.
#[must_use]
pub fn tokenize(line: &str, allow_trailing: bool) -> Option<RowTokens<'_>> {
    let date = DATE_RE.captures(line)?.get(1)?.as_str();
    let tokens: Vec<&str> = line[date.len()..].split_whitespace().collect();

    let last_amount = if allow_trailing {
        match (1..tokens.len())
            .rev()
            .find(|&i| is_amount(tokens[i - 1]) && is_amount(tokens[i]))
        {
            Some(i) => i,
            None => tokens.iter().rposition(|t| is_amount(t))?,
        }
    } else {
        let last = tokens.len().checked_sub(1)?;
        is_amount(tokens[last]).then_some(last)?
    };

    let first_amount = if last_amount > 0 && is_amount(tokens[last_amount - 1]) {
        last_amount - 1
    } else {
        last_amount
    };

    Some(RowTokens {
        date,
        details: tokens[..first_amount].to_vec(),
        amounts: tokens[first_amount..=last_amount].to_vec(),
        trailing: tokens[last_amount + 1..].to_vec(),
    })
}

/// Parses an amount token, ignoring grouping commas and plus signs.
///
/// Tokens that are still not a number after cleanup parse as zero.
#[must_use]
pub fn parse_amount(token: &str) -> f64 {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned.parse().unwrap_or(0.0)
}

/// Parses a merged row into a [`Transaction`].
///
/// Returns `None` for lines that are not transaction rows. This is
/// expected for headers, notes and other noise inside the table region.
#[must_use]
pub fn parse_line<C>(line: &str, layout: &StatementLayout, classifier: &C) -> Option<Transaction>
where
    C: ReferenceClassifier + ?Sized,
{
    let row = tokenize(line, layout.trailing_text)?;

    let (description_tokens, reference) = match row.details.split_last() {
        Some((last, rest)) if classifier.is_reference(last) => (rest, *last),
        _ => (row.details.as_slice(), ""),
    };

    let mut description = description_tokens.join(" ");
    if !row.trailing.is_empty() {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&row.trailing.join(" "));
    }

    let amount = parse_amount(row.amounts[0]);
    // `-0.00` lands here and must not serialize as `-0.0`.
    let (debit, credit) = if amount < 0.0 {
        (amount.abs(), 0.0)
    } else {
        (0.0, amount.abs())
    };
    let balance = row.amounts.get(1).map_or(0.0, |t| parse_amount(t));

    Some(Transaction {
        date: row.date.to_owned(),
        description: layout.clean_description(&description).trim().to_owned(),
        reference: reference.trim().to_owned(),
        debit,
        credit,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceRules;

    fn parse(line: &str) -> Option<Transaction> {
        let layout = StatementLayout::default();
        parse_line(line, &layout, &layout.references)
    }

    #[test]
    fn parses_debit_with_upi_reference() {
        let t = parse("05 Jan, 2024 Grocery Store UPI123 -250.00 4750.00").unwrap();
        assert_eq!(
            t,
            Transaction {
                date: "05 Jan, 2024".to_owned(),
                description: "Grocery Store".to_owned(),
                reference: "UPI123".to_owned(),
                debit: 250.0,
                credit: 0.0,
                balance: 4750.0,
            }
        );
    }

    #[test]
    fn parses_credit_without_reference() {
        let t = parse("12 Feb, 2024 Salary Credit 50000.00 54750.00").unwrap();
        assert_eq!(
            t,
            Transaction {
                date: "12 Feb, 2024".to_owned(),
                description: "Salary Credit".to_owned(),
                reference: String::new(),
                debit: 0.0,
                credit: 50000.0,
                balance: 54750.0,
            }
        );
    }

    #[test]
    fn rejects_line_without_amounts() {
        assert_eq!(parse("12 Feb, 2024 incomplete text"), None);
    }

    #[test]
    fn rejects_line_without_date() {
        assert_eq!(parse("Opening balance 1000.00"), None);
        assert_eq!(parse("5 Jan, 2024 Short day -1.00 9.00"), None);
    }

    #[test]
    fn continuation_after_amounts_moves_into_description() {
        let t = parse("05 Jan, 2024 Grocery Store UPI123 -250.00 4750.00 Continued note").unwrap();
        assert_eq!(t.description, "Grocery Store Continued note");
        assert_eq!(t.reference, "UPI123");
        assert!((t.debit - 250.0).abs() < f64::EPSILON);
        assert!((t.balance - 4750.0).abs() < f64::EPSILON);
    }

    #[test]
    fn continuation_after_amounts_rejected_when_disabled() {
        let layout = StatementLayout {
            trailing_text: false,
            ..StatementLayout::default()
        };
        let line = "05 Jan, 2024 Grocery Store UPI123 -250.00 4750.00 Continued note";
        assert_eq!(parse_line(line, &layout, &layout.references), None);
    }

    #[test]
    fn grouped_thousands_and_plus_sign() {
        let t = parse("03 Mar, 2024 Refund IMPS44 +1,250.50 12,345.67").unwrap();
        assert!((t.credit - 1250.5).abs() < f64::EPSILON);
        assert!((t.balance - 12345.67).abs() < f64::EPSILON);
        assert_eq!(t.reference, "IMPS44");
    }

    #[test]
    fn single_amount_has_zero_balance() {
        let t = parse("03 Mar, 2024 Service charge -10.00").unwrap();
        assert!((t.debit - 10.0).abs() < f64::EPSILON);
        assert!(t.balance.abs() < f64::EPSILON);
    }

    #[test]
    fn only_last_two_amounts_are_the_amount_region() {
        let t = parse("03 Mar, 2024 Fee on 99.00 -10.00 89.00").unwrap();
        assert_eq!(t.description, "Fee on 99.00");
        assert!((t.debit - 10.0).abs() < f64::EPSILON);
        assert!((t.balance - 89.0).abs() < f64::EPSILON);
    }

    #[test]
    fn digits_in_reference_do_not_count_as_amounts() {
        let t = parse("04 Apr, 2024 Cheque deposit 000123 5000.00 9000.00").unwrap();
        assert_eq!(t.description, "Cheque deposit");
        assert_eq!(t.reference, "000123");
        assert!((t.credit - 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_render_artifact_from_description() {
        let t = parse("04 Apr, 2024 3 ATM Withdrawal -500.00 8500.00").unwrap();
        assert_eq!(t.description, "ATM Withdrawal");
    }

    #[test]
    fn lone_reference_leaves_empty_description() {
        let t = parse("04 Apr, 2024 UPI998 -5.00 95.00").unwrap();
        assert_eq!(t.description, "");
        assert_eq!(t.reference, "UPI998");
    }

    #[test]
    fn no_details_at_all() {
        let t = parse("04 Apr, 2024 -5.00 95.00").unwrap();
        assert_eq!(t.description, "");
        assert_eq!(t.reference, "");
    }

    #[test]
    fn custom_classifier_replaces_reference_rules() {
        let layout = StatementLayout::default();
        let neft = |token: &str| token.starts_with("NEFT");

        let t = parse_line(
            "04 Apr, 2024 Transfer NEFT0042 -5.00 95.00",
            &layout,
            &neft,
        )
        .unwrap();
        assert_eq!(t.reference, "NEFT0042");

        let t = parse_line("04 Apr, 2024 Transfer UPI1 -5.00 95.00", &layout, &neft).unwrap();
        assert_eq!(t.reference, "");
        assert_eq!(t.description, "Transfer UPI1");
    }

    #[test]
    fn dyn_classifier_is_accepted() {
        let layout = StatementLayout::default();
        let rules: Box<dyn ReferenceClassifier> = Box::new(ReferenceRules::default());
        let t = parse_line("04 Apr, 2024 Shop FCM7 -5.00 95.00", &layout, rules.as_ref()).unwrap();
        assert_eq!(t.reference, "FCM7");
    }

    #[test]
    fn debit_and_credit_are_exclusive() {
        let lines = [
            "01 Jan, 2024 A -1.00 1.00",
            "01 Jan, 2024 B 1.00 2.00",
            "01 Jan, 2024 C UPI1 -1,000.00 3.00",
            "01 Jan, 2024 D 123 +7.25 3.00",
            "01 Jan, 2024 E 0.01",
        ];

        for line in lines {
            let t = parse(line).unwrap();
            assert!(
                (t.debit > 0.0) ^ (t.credit > 0.0),
                "debit/credit not exclusive for {line}: {t:?}"
            );
        }
    }

    #[test]
    fn tokenize_exposes_grammar_parts() {
        let row = tokenize("05 Jan, 2024 Shop UPI1 -1.00 9.00 more text", true).unwrap();
        assert_eq!(row.date, "05 Jan, 2024");
        assert_eq!(row.details, vec!["Shop", "UPI1"]);
        assert_eq!(row.amounts, vec!["-1.00", "9.00"]);
        assert_eq!(row.trailing, vec!["more", "text"]);
    }

    #[test]
    fn amount_shape() {
        assert!(is_amount("1.00"));
        assert!(is_amount("-1,234,567.89"));
        assert!(is_amount("+0.50"));
        assert!(!is_amount("1.0"));
        assert!(is_amount("12,34.00"));
        assert!(is_amount("-12,34,567.89"));
        assert!(!is_amount("1,2.00"));
        assert!(!is_amount("1,2345.00"));
        assert!(!is_amount("\u{661}\u{660}.00"));
        assert!(!is_amount("UPI1.00"));
        assert!(!is_amount("1234"));
    }

    #[test]
    fn lakh_grouped_amount_and_balance() {
        let t = parse("05 Jan, 2024 Salary Credit 1,50,000.00 2,04,750.00").unwrap();
        assert_eq!(t.description, "Salary Credit");
        assert!((t.credit - 150_000.0).abs() < f64::EPSILON);
        assert!((t.balance - 204_750.0).abs() < f64::EPSILON);

        let t = parse("05 Jan, 2024 Grocery Store UPI123 -250.00 1,04,750.00").unwrap();
        assert_eq!(t.description, "Grocery Store");
        assert_eq!(t.reference, "UPI123");
        assert!((t.debit - 250.0).abs() < f64::EPSILON);
        assert!((t.balance - 104_750.0).abs() < f64::EPSILON);

        let t = parse("05 Jan, 2024 Property IMPS9 -12,34,567.89 1,00,00,000.00").unwrap();
        assert!((t.debit - 1_234_567.89).abs() < 1e-6);
        assert!((t.balance - 10_000_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decimal_in_trailing_text_is_not_the_amount() {
        let t = parse("05 Jan, 2024 Transfer UPI1 -250.00 4750.00 Fee 10.00 waived").unwrap();
        assert_eq!(t.description, "Transfer Fee 10.00 waived");
        assert_eq!(t.reference, "UPI1");
        assert!((t.debit - 250.0).abs() < f64::EPSILON);
        assert!(t.credit.abs() < f64::EPSILON);
        assert!((t.balance - 4750.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_zero_amount_is_a_plain_zero_credit() {
        let t = parse("05 Jan, 2024 Reversal -0.00 100.00").unwrap();
        assert!(t.debit.abs() < f64::EPSILON);
        assert!(t.credit.is_sign_positive());
        assert!(t.debit.is_sign_positive());
        assert!((t.balance - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_ascii_digits_do_not_form_a_date() {
        assert_eq!(parse("\u{665}\u{660} Jan, 2024 Shop -1.00 9.00"), None);
        assert_eq!(parse("05 J\u{e4}n, 2024 Shop -1.00 9.00"), None);
    }

    #[test]
    fn unparseable_amount_is_zero() {
        assert!(parse_amount("--").abs() < f64::EPSILON);
        assert!((parse_amount("-1,000.50") + 1000.5).abs() < f64::EPSILON);
    }
}
