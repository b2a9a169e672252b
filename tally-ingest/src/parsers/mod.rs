//! Bank-specific statement parsers. Each one yields the core's `RawRow` shape.

pub mod bov_csv;
pub mod wamo_pdf;

pub use bov_csv::{parse_bov_csv, parse_bov_csv_text};
pub use wamo_pdf::{parse_wamo_pdf, parse_wamo_text};
