//! tally-report: renders a categorized ledger as an `.xlsx` workbook

pub mod colors;
pub mod layout;
pub mod xlsx;

pub use layout::{Cell, Column, Layout};
pub use xlsx::{ReportError, ReportOptions, build_workbook, report_bytes, write_report};
