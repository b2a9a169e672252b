//! Bank of Valletta CSV statement export.
//!
//! The export starts with account metadata, then:
//!   Transaction History
//!   Date,Detail,Amount,Balance
//!   2025/09/30,"SALARY PAYMENT ABC LTD REF: 12345","1,500.00","2,345.67"
//!
//! Only `Date`, `Detail` and `Amount` are read; other columns are ignored.

use std::fs;
use std::path::Path;

use tally_core::RawRow;
use tracing::{debug, warn};

use crate::types::IngestError;

const SECTION_MARKER: &str = "Transaction History";

/// Parse a BoV CSV export from disk.
pub fn parse_bov_csv(path: impl AsRef<Path>) -> Result<Vec<RawRow>, IngestError> {
    let bytes = fs::read(path.as_ref())?;
    parse_bov_csv_text(&String::from_utf8_lossy(&bytes))
}

/// Parse the text of a BoV CSV export.
///
/// Fails when the section marker or one of the required columns is missing.
/// Rows with a blank date are skipped; everything else goes to the core as-is.
pub fn parse_bov_csv_text(text: &str) -> Result<Vec<RawRow>, IngestError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    if !lines.by_ref().any(|line| line.contains(SECTION_MARKER)) {
        warn!("no '{SECTION_MARKER}' marker in CSV export");
        return Err(IngestError::MissingSectionMarker(SECTION_MARKER));
    }
    let table: String = lines.collect();

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(table.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let (Some(date_col), Some(detail_col), Some(amount_col)) =
        (column("date"), column("detail"), column("amount"))
    else {
        warn!(?headers, "CSV export is missing required columns");
        return Err(IngestError::MissingColumns { found: headers });
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let date = record.get(date_col).unwrap_or("").trim();
        if date.is_empty() {
            continue;
        }

        rows.push(RawRow::new(
            date,
            record.get(detail_col).unwrap_or("").trim(),
            record.get(amount_col).unwrap_or("").trim(),
        ));
    }

    debug!("Parsed {} BoV rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\u{feff}Account Name,ACME TRADING\n\
Account Number,40012345678\n\
\n\
Transaction History\n\
 Date , Detail ,Amount,Balance\n\
2025/09/30,\"SALARY PAYMENT ABC LTD REF: 12345\",\"1,500.00\",\"2,345.67\"\n\
2025/09/02,Cheque returned fee,(12.50),845.67\n\
,Balance brought forward,,858.17\n";

    #[test]
    fn test_parses_rows_after_marker() {
        let rows = parse_bov_csv_text(EXPORT).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawRow::new("2025/09/30", "SALARY PAYMENT ABC LTD REF: 12345", "1,500.00")
        );
        assert_eq!(rows[1].amount, "(12.50)");
    }

    #[test]
    fn test_missing_marker() {
        let err = parse_bov_csv_text("Date,Detail,Amount\n2025/09/30,x,1\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingSectionMarker(_)));
    }

    #[test]
    fn test_missing_columns() {
        let text = "Transaction History\nDate,Narrative,Amount\n2025/09/30,x,1\n";
        match parse_bov_csv_text(text).unwrap_err() {
            IngestError::MissingColumns { found } => {
                assert_eq!(found, vec!["Date", "Narrative", "Amount"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_names_are_case_insensitive() {
        let text = "Transaction History\nAMOUNT,date,DETAIL\n-3.00,01/09/2025,fee\n";
        let rows = parse_bov_csv_text(text).unwrap();
        assert_eq!(rows, vec![RawRow::new("01/09/2025", "fee", "-3.00")]);
    }

    #[test]
    fn test_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bov.csv");
        std::fs::write(&path, EXPORT).unwrap();
        assert_eq!(parse_bov_csv(&path).unwrap().len(), 2);
    }
}
