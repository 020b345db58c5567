//! Common regex patterns for invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Product code at the start of a line item row: a 5-digit id or the
    // literal sample prefix "990".
    pub static ref PRODUCT_CODE: Regex = Regex::new(
        r"^(\d{5}|990)"
    ).unwrap();

    // Monetary tokens, "." thousands / "," decimals (Spanish layout)
    pub static ref AMOUNT_DOT_THOUSANDS: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})*(?:,\d+)?"
    ).unwrap();

    // Monetary tokens, "," thousands / "." decimals (English layout)
    pub static ref AMOUNT_COMMA_THOUSANDS: Regex = Regex::new(
        r"\d{1,3}(?:,\d{3})*(?:\.\d+)?"
    ).unwrap();

    // Telltale for the dot-thousands convention
    pub static ref DOT_THOUSANDS_HINT: Regex = Regex::new(
        r"\.\d{1,3},"
    ).unwrap();

    // Splits a run-on numeric column string into tokens
    pub static ref COLUMN_SPLIT: Regex = Regex::new(
        r"[^0-9.,]+"
    ).unwrap();

    // Collapses linear PDF lines into pseudo table cells
    pub static ref CELL_SPLIT: Regex = Regex::new(
        r"\s{2,}|\t"
    ).unwrap();
}
