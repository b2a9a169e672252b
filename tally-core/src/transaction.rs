//! Record types flowing through the core: raw adapter rows in, finalized transactions out.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of the derived text columns.
pub const MAX_FIELD_LEN: usize = 26;

/// The minimal (date, description, amount) triple a source adapter hands to the core.
///
/// All three fields are kept as text; normalization happens in [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub description: String,
    pub amount: String,
}

impl RawRow {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
        }
    }
}

/// Who the money came from or went to.
///
/// Purely numeric extractions (tax references and the like) are kept as numbers
/// so the spreadsheet stores them as numeric cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Counterparty {
    Number(u128),
    Name(String),
}

impl Counterparty {
    /// Build from already-finalized text: all-digit text becomes a number.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = text.parse::<u128>() {
                return Counterparty::Number(n);
            }
        }
        Counterparty::Name(text)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Counterparty::Name(s) if s.is_empty())
    }
}

impl Default for Counterparty {
    fn default() -> Self {
        Counterparty::Name(String::new())
    }
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counterparty::Number(n) => write!(f, "{n}"),
            Counterparty::Name(s) => f.write_str(s),
        }
    }
}

/// A finalized, categorized statement line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Description exactly as the adapter supplied it
    pub description: String,
    /// Non-negative = incoming, negative = outgoing
    pub amount: Decimal,
    /// Capitalized category label
    pub category: String,
    /// `Invoice <digits>` or empty
    pub invoice_ref: String,
    pub counterparty: Counterparty,
}

impl Transaction {
    /// Calendar month (1-12) of the transaction date, used for row coloring.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn is_incoming(&self) -> bool {
        self.amount >= Decimal::ZERO
    }

    pub fn is_outgoing(&self) -> bool {
        !self.is_incoming()
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn txn(amount: Decimal) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            description: "SALARY".to_string(),
            amount,
            category: "Salary".to_string(),
            invoice_ref: String::new(),
            counterparty: Counterparty::default(),
        }
    }

    #[test]
    fn test_month_and_direction() {
        let t = txn(dec!(1500.00));
        assert_eq!(t.month(), 9);
        assert!(t.is_incoming());

        let t = txn(dec!(-12.50));
        assert!(t.is_outgoing());
        assert_eq!(t.abs_amount(), dec!(12.50));
    }

    #[test]
    fn test_zero_is_incoming() {
        assert!(txn(Decimal::ZERO).is_incoming());
        assert!(txn(-Decimal::ZERO).is_incoming());
    }

    #[test]
    fn test_counterparty_numeric_text() {
        assert_eq!(Counterparty::from_text("123456"), Counterparty::Number(123456));
        assert_eq!(
            Counterparty::from_text("Abc ltd"),
            Counterparty::Name("Abc ltd".to_string())
        );
        assert!(Counterparty::from_text("").is_empty());
        // every finalized digit run (at most 26 characters) fits
        let big = "9".repeat(MAX_FIELD_LEN);
        assert_eq!(
            Counterparty::from_text(big.as_str()),
            Counterparty::Number(99_999_999_999_999_999_999_999_999)
        );
    }

    #[test]
    fn test_counterparty_serializes_untagged() {
        let json = serde_json::to_string(&Counterparty::Number(42)).unwrap();
        assert_eq!(json, "42");
        let json = serde_json::to_string(&Counterparty::Name("Acme".into())).unwrap();
        assert_eq!(json, "\"Acme\"");
    }
}
