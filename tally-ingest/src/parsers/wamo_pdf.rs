//! Wamo PDF statement parser (text)
//!
//! Expected extracted-text section:
//!   Date Description Incoming Outgoing Amount
//!   Card payment Bolt Food
//!   30 September 2025 Transaction: CARD-1234567890 -18.40 1,204.11
//!   2 September 2025 Top up from ACME LTD 500.00 1,222.51
//!   Closing Balance ...
//!
//! Descriptions often sit on the line *above* the dated line, so one pending
//! line is carried forward and prefixed to the next entry. Longer wrapped
//! descriptions lose everything but their last line.
//!
//! The statement text does not say which column an unsigned amount came from,
//! so unsigned amounts are read as incoming.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use tally_core::{RawRow, parse_amount};
use tracing::debug;

use crate::types::IngestError;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Description\s+Incoming\s+Outgoing\s+Amount").expect("header regex")
    })
}

fn footer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(Opening Balance|Closing Balance|Total|Page \d+)").expect("footer regex")
    })
}

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^(\d{{1,2}}\s+(?:{MONTHS})\s+\d{{4}})\s+(.+)"))
            .expect("entry regex")
    })
}

fn date_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^\d{{1,2}}\s+(?:{MONTHS})")).expect("date prefix regex"))
}

fn uuid_txn_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Transaction:\s*[A-Z_]+-[a-f0-9-]{36}").expect("uuid txn id regex")
    })
}

fn card_txn_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Transaction:\s*[A-Z]+-\d{10}").expect("card txn id regex"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"-?\b(?:\d{1,3}(?:,\d{3})*|\d+)\.\d{2}\b").expect("amount regex")
    })
}

/// One dated entry while the block is being read.
#[derive(Debug)]
struct Entry {
    date: String,
    description: String,
    amount: Decimal,
}

impl Entry {
    fn into_row(self) -> Option<RawRow> {
        let description = self.description.trim();
        if description.is_empty() {
            return None;
        }
        Some(RawRow::new(self.date, description, self.amount.to_string()))
    }
}

/// Extract the text of a Wamo PDF and parse it.
pub fn parse_wamo_pdf(path: impl AsRef<Path>) -> Result<Vec<RawRow>, IngestError> {
    let text = pdf_extract::extract_text(path.as_ref())
        .map_err(|e| IngestError::Pdf(e.to_string()))?;
    debug!("Extracted {} bytes of text from {}", text.len(), path.as_ref().display());
    Ok(parse_wamo_text(&text))
}

/// Parse extracted statement text into rows.
///
/// Scans for the column header, collects dated entries until a balance, total or
/// page footer, and re-enters on the next header (the header repeats per page).
pub fn parse_wamo_text(text: &str) -> Vec<RawRow> {
    let mut in_block = false;
    let mut pending = String::new();
    let mut current: Option<Entry> = None;
    let mut out = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if header_re().is_match(line) {
            in_block = true;
            pending.clear();
            continue;
        }

        if !in_block {
            continue;
        }

        if footer_re().is_match(line) {
            in_block = false;
            continue;
        }

        let Some(caps) = entry_re().captures(line) else {
            pending = line.to_string();
            continue;
        };

        if let Some(row) = current.take().and_then(Entry::into_row) {
            out.push(row);
        }

        current = Some(read_entry(&caps[1], &caps[2], &pending));
        pending.clear();
    }

    if let Some(row) = current.and_then(Entry::into_row) {
        out.push(row);
    }

    debug!("Parsed {} Wamo rows", out.len());
    out
}

fn read_entry(date: &str, rest: &str, pending: &str) -> Entry {
    let clean = uuid_txn_id_re().replace_all(rest, "Transaction: [ID]");
    let clean = card_txn_id_re().replace_all(&clean, "Transaction: [ID]");

    let amounts: Vec<&str> = amount_re().find_iter(&clean).map(|m| m.as_str()).collect();

    // last amount is the running balance; the one before it is the movement
    let amount = match amounts.len() {
        0 | 1 => Decimal::ZERO,
        n => {
            let raw = amounts[n - 2];
            let value = parse_amount(raw).abs();
            if raw.starts_with('-') { -value } else { value }
        }
    };

    let mut description = String::new();
    if !pending.is_empty() && !date_prefix_re().is_match(pending) {
        description.push_str(pending);
        description.push(' ');
    }

    let mut detail = clean.to_string();
    for amt in &amounts {
        detail = detail.replace(amt, "");
    }
    description.push_str(detail.trim());

    Entry {
        date: date.to_string(),
        description,
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = r#"
Wamo Statement
Account holder ACME LTD
Date Description Incoming Outgoing Amount
Card payment Bolt Food
30 September 2025 Transaction: CARD-1234567890 -18.40 1,204.11
2 September 2025 Top up from ACME LTD 500.00 1,222.51
Balance cashback
3 September 2025 Transaction: BALANCE_CASHBACK-0f8fad5b-d9cb-469f-a165-70867728950e 1.25 1,223.76
Page 1 of 2
Stray line outside the block 9 September 2025 x 1.00 2.00
Date Description Incoming Outgoing Amount
Transfer to Mr Paul Vella
4 October 2025 Transaction: TRANSFER-9876543210 -40.00 1,183.76
Closing Balance 1,183.76
"#;

    #[test]
    fn test_parses_entries_across_pages() {
        let rows = parse_wamo_text(STATEMENT);
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].date, "30 September 2025");
        assert_eq!(rows[0].description, "Card payment Bolt Food Transaction: [ID]");
        assert_eq!(rows[0].amount, "-18.40");

        assert_eq!(rows[1].description, "Top up from ACME LTD");
        assert_eq!(rows[1].amount, "500.00");

        assert_eq!(rows[2].description, "Balance cashback Transaction: [ID]");
        assert_eq!(rows[2].amount, "1.25");

        assert_eq!(rows[3].date, "4 October 2025");
        assert_eq!(rows[3].description, "Transfer to Mr Paul Vella Transaction: [ID]");
        assert_eq!(rows[3].amount, "-40.00");
    }

    #[test]
    fn test_single_amount_means_zero_movement() {
        let text = "Description Incoming Outgoing Amount\n5 May 2025 Interest 10.00\n";
        let rows = parse_wamo_text(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, "0");
        assert_eq!(rows[0].description, "Interest");
    }

    #[test]
    fn test_nothing_before_header() {
        let text = "30 September 2025 Payment 1.00 2.00\n";
        assert!(parse_wamo_text(text).is_empty());
    }

    #[test]
    fn test_only_last_continuation_line_survives() {
        let text = "Description Incoming Outgoing Amount\n\
                    first wrapped line\n\
                    second wrapped line\n\
                    1 June 2025 rest -2.00 8.00\n";
        let rows = parse_wamo_text(text);
        assert_eq!(rows[0].description, "second wrapped line rest");
    }
}
