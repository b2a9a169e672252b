//! Sheet column layouts, computed as plain cell values before anything is written.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{Counterparty, Transaction};

/// A header plus its column width (Excel character units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

const fn col(header: &'static str, width: f64) -> Column {
    Column { header, width }
}

/// One cell's value; the writer picks the number format from the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Date(NaiveDate),
    Text(String),
    Money(Decimal),
    Number(u128),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn blank() -> Self {
        Cell::Text(String::new())
    }
}

impl From<&Counterparty> for Cell {
    fn from(c: &Counterparty) -> Self {
        match c {
            Counterparty::Number(n) => Cell::Number(*n),
            Counterparty::Name(s) => Cell::Text(s.clone()),
        }
    }
}

pub const SOURCE_COLUMNS: &[Column] = &[col("Date", 12.0), col("Detail", 70.0), col("Amount", 15.0)];

const STANDARD_COLUMNS: &[Column] = &[
    col("Date", 12.0),
    col("Detail", 50.0),
    col("Amount", 15.0),
    col("Type", 26.0),
    col("Invoice", 26.0),
    col("Counterparty", 26.0),
];

const ACCOUNTING_COLUMNS: &[Column] = &[
    col("Type", 20.0),
    col("Account Reference", 18.0),
    col("Nominal A/C Ref", 18.0),
    col("Department Code", 18.0),
    col("Date", 12.0),
    col("reference", 15.0),
    col("Details", 40.0),
    col("Net Amount", 15.0),
    col("Tax Code", 12.0),
    col("Tax Amount", 12.0),
    col("Exchange Rate", 15.0),
    col("Extra Reference", 18.0),
    col("User Name", 15.0),
    col("Project Refn", 15.0),
    col("Cost Code Refn", 15.0),
    col("Invoice", 20.0),
    col("Counterparty", 26.0),
];

/// Column set used for the INCOMING and OUTGOING sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Date, Detail, Amount, Type, Invoice, Counterparty
    #[default]
    Standard,
    /// Bookkeeping import layout: absolute net amount, tax code, blank ledger references
    Accounting,
}

impl Layout {
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Layout::Standard => STANDARD_COLUMNS,
            Layout::Accounting => ACCOUNTING_COLUMNS,
        }
    }

    /// Cells of one transaction row, in `columns()` order.
    pub fn cells(&self, t: &Transaction, tax_code: &str) -> Vec<Cell> {
        match self {
            Layout::Standard => vec![
                Cell::Date(t.date),
                Cell::text(&t.description),
                Cell::Money(t.amount),
                Cell::text(&t.category),
                Cell::text(&t.invoice_ref),
                Cell::from(&t.counterparty),
            ],
            Layout::Accounting => vec![
                Cell::text(&t.category),
                Cell::blank(),
                Cell::blank(),
                Cell::blank(),
                Cell::Date(t.date),
                Cell::blank(),
                Cell::text(&t.description),
                Cell::Money(t.abs_amount()),
                Cell::text(tax_code),
                Cell::Money(Decimal::ZERO),
                Cell::blank(),
                Cell::blank(),
                Cell::blank(),
                Cell::blank(),
                Cell::blank(),
                Cell::text(&t.invoice_ref),
                Cell::from(&t.counterparty),
            ],
        }
    }
}

/// SOURCE sheet cells: the finalized date and amount next to the raw description.
pub fn source_cells(t: &Transaction) -> Vec<Cell> {
    vec![
        Cell::Date(t.date),
        Cell::text(&t.description),
        Cell::Money(t.amount),
    ]
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Standard => f.write_str("standard"),
            Layout::Accounting => f.write_str("accounting"),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Layout::Standard),
            "accounting" => Ok(Layout::Accounting),
            other => Err(format!("unknown layout '{other}' (expected standard or accounting)")),
        }
    }
}
