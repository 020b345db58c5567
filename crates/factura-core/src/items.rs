//! Line item parsing.
//!
//! The source layout stores each numeric column as a single run-on table
//! cell string, so individual rows are recovered by positional alignment
//! across four parallel sequences: product codes from the line block, and
//! the area/unit-price/total-price token lists from the cell set.

use tracing::debug;

use crate::error::NumericParseError;
use crate::extract::fields::{extract_field, starts_with_any};
use crate::extract::keywords::{AREA, BLOCK_END, BLOCK_START, Keyword, TOTAL_PRICE, UNIT_PRICE};
use crate::extract::patterns::{COLUMN_SPLIT, PRODUCT_CODE};
use crate::models::invoice::LineItem;
use crate::numeric;

/// Parsed line items plus extraction incidents worth a manual look.
#[derive(Debug, Default)]
pub struct ParsedItems {
    pub items: Vec<LineItem>,
    pub warnings: Vec<String>,
}

/// Parses the line items of one document from its line sequence and table
/// cell set. Assembly failure yields an empty collection, not an error.
pub fn parse_line_items(lines: &[String], cells: &[String], precision: u32) -> ParsedItems {
    let trimmed: Vec<&str> = lines.iter().map(|line| line.trim_start()).collect();
    let block = isolate_block(&trimmed);
    let mut codes = extract_codes(block);

    let mut areas = split_columns(&extract_field(AREA, cells));
    let mut unit_prices = split_columns(&extract_field(UNIT_PRICE, cells));
    let mut total_prices = split_columns(&extract_field(TOTAL_PRICE, cells));

    let mut result = ParsedItems::default();
    if align_to_shortest(&mut [
        &mut codes,
        &mut areas,
        &mut unit_prices,
        &mut total_prices,
    ]) {
        result.warnings.push(
            "line item columns had unequal lengths; trailing entries were dropped".to_string(),
        );
    }

    for i in 0..codes.len() {
        match parse_row(&codes[i], &areas[i], &unit_prices[i], &total_prices[i], precision) {
            Ok(item) => result.items.push(item),
            Err(e) => result
                .warnings
                .push(format!("dropped line item {}: {e}", codes[i])),
        }
    }

    debug!("parsed {} line items", result.items.len());
    result
}

/// The inclusive slice between the first line starting with a block-start
/// marker and the first line starting with a block-end marker. Either marker
/// absent falls back to the entire sequence.
pub fn isolate_block<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let start = position_of(lines, BLOCK_START);
    let end = position_of(lines, BLOCK_END);

    match (start, end) {
        (Some(s), Some(e)) if e >= s => &lines[s..=e],
        (Some(_), Some(_)) => &[],
        _ => lines,
    }
}

fn position_of(lines: &[&str], keywords: &[Keyword]) -> Option<usize> {
    lines.iter().position(|line| starts_with_any(line, keywords))
}

/// Lines starting with a 5-digit number or the literal "990" prefix; the
/// matched prefix is the product code.
pub fn extract_codes(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| PRODUCT_CODE.captures(line).map(|caps| caps[1].to_string()))
        .collect()
}

/// Splits a run-on column string on runs of non-numeric characters.
pub fn split_columns(extract: &str) -> Vec<String> {
    COLUMN_SPLIT
        .split(extract)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Truncate-to-shortest alignment policy: every column is cut to the
/// shortest column's length before zipping. Returns true when entries were
/// actually discarded, so callers can flag the invoice for manual review.
pub fn align_to_shortest(columns: &mut [&mut Vec<String>]) -> bool {
    let min = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut truncated = false;
    for column in columns.iter_mut() {
        if column.len() > min {
            truncated = true;
            column.truncate(min);
        }
    }
    truncated
}

fn parse_row(
    code: &str,
    area: &str,
    unit_price: &str,
    total_price: &str,
    precision: u32,
) -> Result<LineItem, NumericParseError> {
    Ok(LineItem {
        product_code: code.to_string(),
        product_name: None,
        size: None,
        sqm: numeric::normalize(area, precision)?,
        unit_price: numeric::normalize(unit_price, precision)?,
        total_price: numeric::normalize(total_price, precision)?,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_isolate_block() {
        let lines = [
            "COMMERCIAL INVOICE",
            "Description of Goods",
            "10001 GLAZED TILE",
            "Signature",
            "Footer",
        ];

        let block = isolate_block(&lines);
        assert_eq!(block, &lines[1..=3]);
    }

    #[test]
    fn test_isolate_block_spanish_markers() {
        let lines = [
            "FACTURA COMERCIAL",
            "Descripcion de las Mercancias",
            "10001 AZULEJO",
            "Visto Bueno",
        ];

        let block = isolate_block(&lines);
        assert_eq!(block, &lines[1..=3]);
    }

    #[test]
    fn test_isolate_block_missing_marker_falls_back() {
        let lines = ["10001 GLAZED TILE", "10002 RUSTIC TILE"];
        assert_eq!(isolate_block(&lines), &lines[..]);
    }

    #[test]
    fn test_extract_codes() {
        let lines = [
            "Description of Goods",
            "10001 GLAZED TILE 30x30",
            "990 SAMPLE BOX",
            "99012 SPECIAL ORDER",
            "Subtotal 850.00",
        ];

        assert_eq!(extract_codes(&lines), vec!["10001", "990", "99012"]);
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(
            split_columns("100.00 200,50  1.000,00"),
            vec!["100.00", "200,50", "1.000,00"]
        );
        assert_eq!(split_columns(""), Vec::<String>::new());
        assert_eq!(split_columns("USD EUR"), Vec::<String>::new());
    }

    #[test]
    fn test_align_to_shortest_truncates_and_reports() {
        let mut codes = strings(&["a", "b", "c"]);
        let mut areas = strings(&["1", "2"]);
        let mut prices = strings(&["x", "y", "z"]);
        let mut totals = strings(&["p", "q"]);

        let truncated =
            align_to_shortest(&mut [&mut codes, &mut areas, &mut prices, &mut totals]);

        assert!(truncated);
        assert_eq!(codes, vec!["a", "b"]);
        assert_eq!(areas, vec!["1", "2"]);
        assert_eq!(prices, vec!["x", "y"]);
        assert_eq!(totals, vec!["p", "q"]);
    }

    #[test]
    fn test_align_to_shortest_equal_lengths() {
        let mut codes = strings(&["a"]);
        let mut areas = strings(&["1"]);

        assert!(!align_to_shortest(&mut [&mut codes, &mut areas]));
        assert_eq!(codes, vec!["a"]);
    }

    #[test]
    fn test_parse_line_items_end_to_end() {
        let lines = strings(&[
            "COMMERCIAL INVOICE",
            "Description of Goods",
            "10001 GLAZED TILE",
            "10002 RUSTIC TILE",
            "Signature",
        ]);
        let cells = strings(&[
            "Invoice number WCF-101",
            "Sqm 100.00 200.00",
            "Unit.price 2.50 3.00",
            "Total 250.00 600.00",
        ]);

        let parsed = parse_line_items(&lines, &cells, 2);

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].product_code, "10001");
        assert_eq!(parsed.items[0].sqm, Decimal::from_str("100.00").unwrap());
        assert_eq!(
            parsed.items[1].total_price,
            Decimal::from_str("600.00").unwrap()
        );
        assert_eq!(parsed.items[1].product_name, None);
    }

    #[test]
    fn test_parse_line_items_no_codes_yields_empty() {
        let lines = strings(&["No product rows here"]);
        let cells = strings(&["Sqm 1,00", "Precio un 2,00", "Importe 2,00"]);

        let parsed = parse_line_items(&lines, &cells, 2);
        assert!(parsed.items.is_empty());
    }
}
