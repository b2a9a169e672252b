//! Invoice-number and counterparty extraction from free-text descriptions.
//!
//! Counterparty extraction is a cascade of best-effort passes; the first pass that
//! produces something wins and none of them can fail.

use std::sync::OnceLock;

use regex::Regex;

/// A pass that short-circuits the cascade for a statement-specific reference format.
pub type ShortcutStrategy = fn(&str) -> Option<String>;

/// Shortcuts tried before any boilerplate stripping.
pub const DEFAULT_SHORTCUTS: &[ShortcutStrategy] = &[tax_administration_ref];

/// Boilerplate removed from descriptions, in order. Each pattern runs against the
/// output of the previous one.
const BOILERPLATE: &[&str] = &[
    r"24x7\s*pay\s*third\s*parties",
    r"24x7\s*pay",
    r"third\s*parties",
    r"payment order outwards same day",
    r"payment order outwards",
    r"account to account transfer express deposits",
    r"account to account transfer",
    r"transfer between own accounts",
    r"sct instant payments inwards",
    r"sct inwards",
    r"sct outwards",
    r"standing instruction charge",
    r"standing instruction",
    r"administration fee",
    r"unprocessed standing instruction charge",
    r"sdd outwards fee",
    r"atm cash deposit",
    r"cheque deposit.*$",
    r"cheque returned fee.*$",
    r"cheque book order fee.*$",
    r"cheque\s+\d+.*",
    r"relation:\s*[^,]+",
    r"reason:\s*[^,]+",
    r"value date\s*-\s*[0-9/]+",
    r"ref\s*:\s*[-0-9A-Za-z.]+.*$",
    r"\s+eur\s+[0-9.,]+",
];

fn invoice_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(invoice|inv|fatt(?:ura)?\s*nr?)\s*([0-9]+)").expect("invoice regex")
    })
}

fn tax_admin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)ADMINISTRATIO\s+([0-9]+)").expect("tax admin regex"))
}

fn boilerplate_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        BOILERPLATE
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("boilerplate regex"))
            .collect()
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

fn trailer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)ref\s*:|value date|relation:").expect("trailer regex"))
}

fn company_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b([A-Z][A-Za-z &.'-]*\s(?:ltd|limited|plc|co|company))\b")
            .expect("company regex")
    })
}

fn eur_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+eur\s+").expect("eur regex"))
}

fn person_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(Mr|Ms|Mrs|Dr)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\b").expect("person regex")
    })
}

fn upper_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z][A-Z &.'-]{2,})\b").expect("upper regex"))
}

fn capitalized_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,4})\b").expect("capitalized regex")
    })
}

/// `invoice <digits>` when the description carries an invoice number, else empty.
pub fn extract_invoice(description: &str) -> String {
    invoice_re()
        .captures(description)
        .map(|caps| format!("invoice {}", &caps[2]))
        .unwrap_or_default()
}

/// Tax-administration payments carry the taxpayer reference right after the marker.
pub fn tax_administration_ref(description: &str) -> Option<String> {
    tax_admin_re()
        .captures(description)
        .map(|caps| caps[1].to_string())
}

/// Best-effort payer/payee name using the default shortcut list.
pub fn extract_counterparty(description: &str) -> String {
    extract_counterparty_with(description, DEFAULT_SHORTCUTS)
}

/// Best-effort payer/payee name with a caller-supplied shortcut list.
pub fn extract_counterparty_with(description: &str, shortcuts: &[ShortcutStrategy]) -> String {
    if description.is_empty() {
        return String::new();
    }

    if let Some(found) = shortcuts.iter().find_map(|shortcut| shortcut(description)) {
        return found;
    }

    let cleaned = strip_boilerplate(description);

    if let Some(caps) = company_re().captures(&cleaned) {
        return caps[1].to_string();
    }

    let head = eur_re().split(&cleaned).next().unwrap_or("").trim();
    let cleaned = if head.chars().count() >= 3 {
        head.to_string()
    } else {
        cleaned
    };

    if let Some(m) = person_re().find(&cleaned) {
        return m.as_str().to_string();
    }

    if let Some(caps) = upper_run_re().captures(&cleaned) {
        return caps[1].to_string();
    }

    if let Some(caps) = capitalized_run_re().captures(&cleaned) {
        return caps[1].to_string();
    }

    cleaned
        .split_whitespace()
        .take(5)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove rail names, references and amount trailers, then cut at the first
/// remaining reference marker.
fn strip_boilerplate(description: &str) -> String {
    let mut cleaned = description.to_string();
    for re in boilerplate_res() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }

    let cleaned = whitespace_re().replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();

    trailer_re()
        .split(cleaned)
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
