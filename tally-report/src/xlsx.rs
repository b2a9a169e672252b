//! Workbook writer: SOURCE, INCOMING and OUTGOING sheets as Excel tables.

use std::path::Path;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatBorder, Table, TableColumn, TableStyle, Workbook,
    Worksheet, XlsxError,
};
use serde::{Deserialize, Serialize};
use tally_core::{Ledger, Transaction};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::colors::{DEFAULT_COLOR, hex, month_color};
use crate::layout::{Cell, Column, Layout, SOURCE_COLUMNS, source_cells};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const MONEY_FORMAT: &str = "#,##0.00";
const HEADER_COLOR: u32 = 0x4472C4;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// How the INCOMING / OUTGOING sheets are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub layout: Layout,
    /// Tax code written in the accounting layout
    pub tax_code: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Standard,
            tax_code: "T9".to_string(),
        }
    }
}

/// Date / text / money formats sharing one background color.
struct RowFormats {
    date: Format,
    text: Format,
    money: Format,
}

impl RowFormats {
    fn with_background(color: u32) -> Self {
        let bg = Color::RGB(color);
        Self {
            date: Format::new().set_num_format(DATE_FORMAT).set_background_color(bg),
            text: Format::new().set_background_color(bg),
            money: Format::new().set_num_format(MONEY_FORMAT).set_background_color(bg),
        }
    }

    fn plain() -> Self {
        Self {
            date: Format::new().set_num_format(DATE_FORMAT),
            text: Format::new(),
            money: Format::new().set_num_format(MONEY_FORMAT),
        }
    }
}

/// A partition sheet's fixed settings.
struct PartitionSheet {
    name: &'static str,
    table_name: &'static str,
    style: TableStyle,
}

const INCOMING: PartitionSheet = PartitionSheet {
    name: "INCOMING",
    table_name: "INCOMING_TABLE",
    style: TableStyle::Medium9,
};

const OUTGOING: PartitionSheet = PartitionSheet {
    name: "OUTGOING",
    table_name: "OUTGOING_TABLE",
    style: TableStyle::Medium4,
};

/// Build the workbook for a ledger.
pub fn build_workbook(ledger: &Ledger, options: &ReportOptions) -> Result<Workbook, ReportError> {
    let mut workbook = Workbook::new();

    write_source_sheet(workbook.add_worksheet(), &ledger.source)?;
    write_partition_sheet(workbook.add_worksheet(), &INCOMING, &ledger.incoming, options)?;
    write_partition_sheet(workbook.add_worksheet(), &OUTGOING, &ledger.outgoing, options)?;

    Ok(workbook)
}

/// Render a ledger to an `.xlsx` file.
pub fn write_report(
    ledger: &Ledger,
    path: impl AsRef<Path>,
    options: &ReportOptions,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let mut workbook = build_workbook(ledger, options)?;
    workbook.save(path)?;
    info!(path = %path.display(), layout = %options.layout, "wrote report");
    Ok(())
}

/// Render a ledger to in-memory `.xlsx` bytes.
pub fn report_bytes(ledger: &Ledger, options: &ReportOptions) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(ledger, options)?;
    Ok(workbook.save_to_buffer()?)
}

fn write_source_sheet(sheet: &mut Worksheet, txns: &[Transaction]) -> Result<(), ReportError> {
    sheet.set_name("SOURCE")?;
    set_widths(sheet, SOURCE_COLUMNS)?;

    if txns.is_empty() {
        return write_header_row(sheet, SOURCE_COLUMNS);
    }

    add_table(sheet, SOURCE_COLUMNS, txns.len(), "SOURCE_TABLE", TableStyle::Medium2)?;
    let formats = RowFormats::plain();
    for (i, t) in txns.iter().enumerate() {
        write_row(sheet, i as u32 + 1, &source_cells(t), &formats)?;
    }
    Ok(())
}

fn write_partition_sheet(
    sheet: &mut Worksheet,
    part: &PartitionSheet,
    txns: &[Transaction],
    options: &ReportOptions,
) -> Result<(), ReportError> {
    let columns = options.layout.columns();
    sheet.set_name(part.name)?;
    set_widths(sheet, columns)?;

    if txns.is_empty() {
        debug!(sheet = part.name, "no transactions; writing headers only");
        return write_header_row(sheet, columns);
    }

    add_table(sheet, columns, txns.len(), part.table_name, part.style.clone())?;

    // one format set per month, built lazily
    let mut by_month: [Option<RowFormats>; 12] = Default::default();
    for (i, t) in txns.iter().enumerate() {
        let slot = &mut by_month[(t.month() - 1) as usize];
        let formats = slot.get_or_insert_with(|| {
            let color = month_color(t.month());
            debug!(sheet = part.name, month = t.month(), color = %hex(color), "month format");
            RowFormats::with_background(color)
        });
        write_row(sheet, i as u32 + 1, &options.layout.cells(t, &options.tax_code), formats)?;
    }
    Ok(())
}

fn add_table(
    sheet: &mut Worksheet,
    columns: &[Column],
    rows: usize,
    name: &str,
    style: TableStyle,
) -> Result<(), ReportError> {
    let table_columns: Vec<TableColumn> = columns
        .iter()
        .map(|c| TableColumn::new().set_header(c.header))
        .collect();

    let table = Table::new()
        .set_name(name)
        .set_style(style)
        .set_columns(&table_columns);

    sheet.add_table(0, 0, rows as u32, (columns.len() - 1) as u16, &table)?;
    Ok(())
}

fn write_header_row(sheet: &mut Worksheet, columns: &[Column]) -> Result<(), ReportError> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_COLOR))
        .set_font_color(Color::RGB(DEFAULT_COLOR))
        .set_border(FormatBorder::Thin);

    for (c, column) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, column.header, &header)?;
    }
    Ok(())
}

fn set_widths(sheet: &mut Worksheet, columns: &[Column]) -> Result<(), ReportError> {
    for (c, column) in columns.iter().enumerate() {
        sheet.set_column_width(c as u16, column.width)?;
    }
    Ok(())
}

fn write_row(
    sheet: &mut Worksheet,
    row: u32,
    cells: &[Cell],
    formats: &RowFormats,
) -> Result<(), ReportError> {
    for (c, cell) in cells.iter().enumerate() {
        let col = c as u16;
        match cell {
            Cell::Date(d) => match excel_date(*d) {
                Some(dt) => {
                    sheet.write_datetime_with_format(row, col, &dt, &formats.date)?;
                }
                None => {
                    warn!(date = %d, row, "date outside the spreadsheet range; writing it as text");
                    let text = d.format("%Y-%m-%d").to_string();
                    sheet.write_string_with_format(row, col, text, &formats.text)?;
                }
            },
            Cell::Text(s) => {
                sheet.write_string_with_format(row, col, s, &formats.text)?;
            }
            Cell::Money(m) => {
                let value = m.to_f64().unwrap_or_default();
                sheet.write_number_with_format(row, col, value, &formats.money)?;
            }
            Cell::Number(n) => {
                sheet.write_number_with_format(row, col, *n as f64, &formats.text)?;
            }
        }
    }
    Ok(())
}

/// `None` outside Excel's 1900-9999 range.
fn excel_date(d: chrono::NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(d.year()).ok()?;
    ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8).ok()
}
