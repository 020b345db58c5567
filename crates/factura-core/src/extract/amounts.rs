//! Monetary amount extraction from the full document text.
//!
//! Unlike header fields, amounts are not line-anchored: the sub-total
//! keyword is located as a substring of the lowercased document text and the
//! monetary tokens are pulled from the remainder with the numeric convention
//! inferred from the text itself.

use rust_decimal::Decimal;
use tracing::warn;

use super::keywords::{Keyword, SUB_TOTAL};
use super::patterns::{AMOUNT_COMMA_THOUSANDS, AMOUNT_DOT_THOUSANDS, DOT_THOUSANDS_HINT};
use crate::numeric;

/// Amounts pulled from the sub-total block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountFields {
    pub sub_total: Option<Decimal>,
    pub fumigation: Option<Decimal>,
    pub fob: Option<Decimal>,
}

/// Extracts the sub-total block amounts using the default keyword table.
pub fn extract_amounts(text: &str, precision: u32) -> AmountFields {
    extract_amounts_with(SUB_TOTAL, text, precision)
}

/// Token-to-field assignment: the first token is the sub-total; with exactly
/// two tokens the second is the FOB and fumigation stays unset; with three or
/// more the second is fumigation and the third is the FOB. No keyword or no
/// tokens leaves all three unset.
pub fn extract_amounts_with(keywords: &[Keyword], text: &str, precision: u32) -> AmountFields {
    let lowered = text.to_lowercase();

    let Some(rest) = keywords
        .iter()
        .find_map(|k| lowered.find(k.text).map(|i| &lowered[i + k.text.len()..]))
    else {
        return AmountFields::default();
    };

    let pattern = if DOT_THOUSANDS_HINT.is_match(rest) {
        &*AMOUNT_DOT_THOUSANDS
    } else {
        &*AMOUNT_COMMA_THOUSANDS
    };

    let tokens: Vec<&str> = pattern.find_iter(rest).map(|m| m.as_str()).collect();

    let mut fields = AmountFields {
        sub_total: tokens.first().and_then(|t| parse_token(t, precision)),
        ..AmountFields::default()
    };

    if tokens.len() == 2 {
        fields.fob = parse_token(tokens[1], precision);
    } else if tokens.len() > 2 {
        fields.fumigation = parse_token(tokens[1], precision);
        fields.fob = parse_token(tokens[2], precision);
    }

    fields
}

fn parse_token(token: &str, precision: u32) -> Option<Decimal> {
    match numeric::normalize(token, precision) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("skipping unparseable amount token: {e}");
            None
        }
    }
}
