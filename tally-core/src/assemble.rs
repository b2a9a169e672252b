//! Turns adapter rows into finalized transactions and the incoming/outgoing partitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::category::classify;
use crate::extract::{extract_counterparty, extract_invoice};
use crate::normalize::{finalize_text, parse_amount, parse_date};
use crate::transaction::{Counterparty, RawRow, Transaction};

/// Derived columns for one description, already in output form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub invoice_ref: String,
    pub counterparty: Counterparty,
}

/// Run the classifier and both extractors over a description.
pub fn describe(description: &str) -> Classification {
    let category = classify(&description.to_lowercase());
    Classification {
        category: finalize_text(category.as_str()),
        invoice_ref: finalize_text(&extract_invoice(description)),
        counterparty: Counterparty::from_text(finalize_text(&extract_counterparty(description))),
    }
}

/// Normalize one row. `None` when the date cannot be parsed.
pub fn finalize_row(row: &RawRow) -> Option<Transaction> {
    let Some(date) = parse_date(&row.date) else {
        debug!(date = %row.date, description = %row.description, "dropping row with unparseable date");
        return None;
    };

    let Classification {
        category,
        invoice_ref,
        counterparty,
    } = describe(&row.description);

    Some(Transaction {
        date,
        description: row.description.clone(),
        amount: parse_amount(&row.amount),
        category,
        invoice_ref,
        counterparty,
    })
}

/// Finalize every row, keeping input order and dropping undated rows.
pub fn finalize(rows: &[RawRow]) -> Vec<Transaction> {
    rows.iter().filter_map(finalize_row).collect()
}

/// Split by sign (>= 0 incoming) and sort each side by date. Ties keep input order.
pub fn partition(txns: Vec<Transaction>) -> (Vec<Transaction>, Vec<Transaction>) {
    let (mut incoming, mut outgoing): (Vec<_>, Vec<_>) =
        txns.into_iter().partition(Transaction::is_incoming);
    incoming.sort_by_key(|t| t.date);
    outgoing.sort_by_key(|t| t.date);
    (incoming, outgoing)
}

/// Rows in, (incoming, outgoing) out.
pub fn assemble(rows: &[RawRow]) -> (Vec<Transaction>, Vec<Transaction>) {
    partition(finalize(rows))
}

/// The three record sets handed to the report renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Every finalized transaction, in the order the adapter produced them
    pub source: Vec<Transaction>,
    pub incoming: Vec<Transaction>,
    pub outgoing: Vec<Transaction>,
}

/// Counts and totals for a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_count: usize,
    pub incoming_count: usize,
    pub outgoing_count: usize,
    pub incoming_total: Decimal,
    pub outgoing_total: Decimal,
}

impl LedgerSummary {
    pub fn net(&self) -> Decimal {
        self.incoming_total + self.outgoing_total
    }
}

impl Ledger {
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let source = finalize(rows);
        let (incoming, outgoing) = partition(source.clone());
        info!(
            rows = rows.len(),
            kept = source.len(),
            incoming = incoming.len(),
            outgoing = outgoing.len(),
            "assembled ledger"
        );
        Self {
            source,
            incoming,
            outgoing,
        }
    }

    /// No transaction survived normalization.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            total_count: self.source.len(),
            incoming_count: self.incoming.len(),
            outgoing_count: self.outgoing.len(),
            incoming_total: self.incoming.iter().map(|t| t.amount).sum(),
            outgoing_total: self.outgoing.iter().map(|t| t.amount).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(date: &str, desc: &str, amount: &str) -> RawRow {
        RawRow::new(date, desc, amount)
    }

    #[test]
    fn test_empty_input() {
        let (incoming, outgoing) = assemble(&[]);
        assert!(incoming.is_empty());
        assert!(outgoing.is_empty());
        assert!(Ledger::from_rows(&[]).is_empty());
    }

    #[test]
    fn test_undated_rows_are_dropped() {
        let rows = vec![
            row("2025/09/01", "refund", "10.00"),
            row("not a date", "refund", "10.00"),
            row("", "refund", "10.00"),
        ];
        assert_eq!(finalize(&rows).len(), 1);
    }

    #[test]
    fn test_partition_and_sort_are_stable() {
        let rows = vec![
            row("2025/09/30", "late in", "5.00"),
            row("2025/09/01", "first tie", "1.00"),
            row("2025/09/01", "second tie", "2.00"),
            row("2025/09/15", "out", "-3.00"),
            row("2025/09/02", "zero", "0"),
        ];
        let (incoming, outgoing) = assemble(&rows);

        let descs: Vec<_> = incoming.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["first tie", "second tie", "zero", "late in"]);
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].amount, dec!(-3.00));
    }

    #[test]
    fn test_describe_finalizes_text() {
        let c = describe("Payment INV 4521 to Mr John Smith");
        assert_eq!(c.category, "Other");
        assert_eq!(c.invoice_ref, "Invoice 4521");
        assert_eq!(c.counterparty, Counterparty::Name("Mr john smith".to_string()));
    }

    #[test]
    fn test_numeric_counterparty() {
        let c = describe("TAX ADMINISTRATIO 123456789");
        assert_eq!(c.category, "Tax payment");
        assert_eq!(c.counterparty, Counterparty::Number(123456789));
    }

    #[test]
    fn test_long_numeric_counterparty_stays_numeric() {
        let c = describe("TAX ADMINISTRATIO 123456789012345678901234");
        assert_eq!(
            c.counterparty,
            Counterparty::Number(123_456_789_012_345_678_901_234)
        );
    }

    #[test]
    fn test_summary_totals() {
        let rows = vec![
            row("2025/09/01", "salary", "1,500.00"),
            row("2025/09/02", "cheque returned fee", "(12.50)"),
            row("2025/09/03", "refund", "20.00"),
        ];
        let ledger = Ledger::from_rows(&rows);
        let s = ledger.summary();
        assert_eq!(s.total_count, 3);
        assert_eq!(s.incoming_count, 2);
        assert_eq!(s.outgoing_count, 1);
        assert_eq!(s.incoming_total, dec!(1520.00));
        assert_eq!(s.outgoing_total, dec!(-12.50));
        assert_eq!(s.net(), dec!(1507.50));
        assert_eq!(
            ledger.source[1].date,
            NaiveDate::from_ymd_opt(2025, 9, 2).unwrap()
        );
    }
}
