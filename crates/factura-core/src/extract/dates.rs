//! Issue date normalization for English and Spanish date strings.
//!
//! The output table keeps the raw extracted date; this is a convenience for
//! display and downstream filtering.

use chrono::NaiveDate;

/// Spanish month abbreviations mapped to the English ones chrono knows.
const SPANISH_MONTHS: &[(&str, &str)] = &[
    ("ene", "Jan"),
    ("feb", "Feb"),
    ("mar", "Mar"),
    ("abr", "Apr"),
    ("may", "May"),
    ("jun", "Jun"),
    ("jul", "Jul"),
    ("ago", "Aug"),
    ("sep", "Sep"),
    ("oct", "Oct"),
    ("nov", "Nov"),
    ("dic", "Dec"),
];

/// Parses a raw invoice date in any of the known layouts: numeric
/// day-first forms, ISO, or `12-Ene-23` style month abbreviations.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in ["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    let english = translate_month(raw);
    for format in ["%d-%b-%y", "%d-%b-%Y", "%d %b %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&english, format) {
            return Some(date);
        }
    }

    None
}

fn translate_month(raw: &str) -> String {
    if !raw.is_ascii() {
        return raw.to_string();
    }
    let lowered = raw.to_lowercase();
    for (es, en) in SPANISH_MONTHS {
        if let Some(i) = lowered.find(es) {
            return format!("{}{}{}", &raw[..i], en, &raw[i + es.len()..]);
        }
    }
    raw.to_string()
}
