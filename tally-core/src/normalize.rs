//! Lenient amount/date parsing and output-text finalization.
//!
//! Nothing in here fails: malformed amounts become zero, malformed dates become
//! `None` and the caller drops the row.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::transaction::MAX_FIELD_LEN;

/// Day-first textual forms tried after the numeric patterns.
const DATE_FALLBACK_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%Y.%m.%d",
];

const DATETIME_FALLBACK_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

fn parens_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\(.*\)$").expect("parens regex"))
}

fn year_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").expect("ymd regex"))
}

fn day_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("dmy regex"))
}

/// Parse a statement amount.
///
/// Handles `€1,234.56`, `(123.45)`, `123.45-`, `-123.45` and quoted cells.
/// Anything that is still not a number after cleaning yields zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let val = raw.trim().trim_matches('"');
    if val.is_empty() {
        return Decimal::ZERO;
    }

    let negative = parens_re().is_match(val) || val.ends_with('-') || val.starts_with('-');

    let cleaned: String = val
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '$' | '£' | '-' | '(' | ')' | ','))
        .collect();

    let parsed = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned));
    match parsed {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => Decimal::ZERO,
    }
}

/// Parse a statement date.
///
/// Order: `YYYY/M/D` (or `-`), then `D/M/YYYY` (or `-`), then day-first textual forms
/// such as `30 September 2025`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = year_first_re().captures(s) {
        if let Some(d) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(d);
        }
    }

    if let Some(caps) = day_first_re().captures(s) {
        if let Some(d) = ymd(&caps[3], &caps[2], &caps[1]) {
            return Some(d);
        }
    }

    DATE_FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FALLBACK_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Keep at most `max_len` characters.
pub fn limit_length(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

/// Output form of every derived text column.
pub fn finalize_text(text: &str) -> String {
    limit_length(&capitalize_first(text), MAX_FIELD_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_negative_forms_agree() {
        assert_eq!(parse_amount("(123.45)"), dec!(-123.45));
        assert_eq!(parse_amount("-123.45"), dec!(-123.45));
        assert_eq!(parse_amount("123.45-"), dec!(-123.45));
    }

    #[test]
    fn test_currency_and_thousands() {
        assert_eq!(parse_amount("€1,234.56"), dec!(1234.56));
        assert_eq!(parse_amount("$ 2,000"), dec!(2000));
        assert_eq!(parse_amount("\"1,500.00\""), dec!(1500.00));
        assert_eq!(parse_amount("-£10.00"), dec!(-10.00));
    }

    #[test]
    fn test_garbage_amount_is_zero() {
        assert_eq!(parse_amount("not a number"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("()"), Decimal::ZERO);
        assert_eq!(parse_amount("€"), Decimal::ZERO);
    }

    #[test]
    fn test_sign_is_read_before_symbols() {
        // the leading symbol hides the minus
        assert_eq!(parse_amount("€-5.00"), dec!(5.00));
    }

    #[test]
    fn test_numeric_date_orders() {
        assert_eq!(parse_date("2025/09/30"), Some(date(2025, 9, 30)));
        assert_eq!(parse_date("30/09/2025"), Some(date(2025, 9, 30)));
        assert_eq!(parse_date("2025-9-3"), Some(date(2025, 9, 3)));
        assert_eq!(parse_date("30-09-2025"), Some(date(2025, 9, 30)));
        // day first, never month first
        assert_eq!(parse_date("01/02/2025"), Some(date(2025, 2, 1)));
    }

    #[test]
    fn test_textual_dates() {
        assert_eq!(parse_date("30 September 2025"), Some(date(2025, 9, 30)));
        assert_eq!(parse_date("2 Sep 2025"), Some(date(2025, 9, 2)));
        assert_eq!(parse_date("September 30, 2025"), Some(date(2025, 9, 30)));
        assert_eq!(parse_date("30.09.2025"), Some(date(2025, 9, 30)));
        assert_eq!(parse_date("2025-09-30 14:05:00"), Some(date(2025, 9, 30)));
    }

    #[test]
    fn test_bad_dates_are_none() {
        assert_eq!(parse_date("garbage"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2025/13/40"), None);
        assert_eq!(parse_date("31/02/2025"), None);
    }

    #[test]
    fn test_finalize_text() {
        assert_eq!(capitalize_first("SALARY PAYMENT"), "Salary payment");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(limit_length("abcdef", 3), "abc");
        assert_eq!(finalize_text("loan principal repayment extra"), "Loan principal repayment e");
        assert_eq!(finalize_text("éclair"), "Éclair");
    }
}
