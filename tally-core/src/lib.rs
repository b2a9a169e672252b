//! tally-core: normalization, classification and reference extraction for bank statement lines.
//!
//! Everything here is a pure function of its input. Adapters hand in [`RawRow`]s;
//! the renderer receives a [`Ledger`].

pub mod assemble;
pub mod category;
pub mod extract;
pub mod normalize;
pub mod transaction;

pub use assemble::{
    Classification, Ledger, LedgerSummary, assemble, describe, finalize, finalize_row, partition,
};
pub use category::{Category, classify};
pub use extract::{
    DEFAULT_SHORTCUTS, ShortcutStrategy, extract_counterparty, extract_counterparty_with,
    extract_invoice, tax_administration_ref,
};
pub use normalize::{capitalize_first, finalize_text, limit_length, parse_amount, parse_date};
pub use transaction::{Counterparty, MAX_FIELD_LEN, RawRow, Transaction};
