//! Exact-decimal normalization of ambiguous numeric strings.
//!
//! Source documents mix `1,234.56`, `1.234,56` and single-separator forms;
//! this module decides which separator is the decimal point and parses the
//! result with `rust_decimal` so repeated conversions never drift.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::NumericParseError;

/// Default number of fractional digits kept after normalization.
pub const DEFAULT_PRECISION: u32 = 2;

/// Parses a numeric string in any of the supported locale conventions into
/// an exact decimal rounded to `precision` fractional digits.
///
/// When both separators occur, the one appearing later is the decimal point
/// and the other is stripped. A lone separator type is treated as thousands
/// (and stripped) when it occurs more than once or sits more than two
/// characters from the end; otherwise it is the decimal point.
pub fn normalize(value: &str, precision: u32) -> Result<Decimal, NumericParseError> {
    let cleaned = disambiguate_separators(value.trim());
    Decimal::from_str(&cleaned)
        .map(|d| d.round_dp(precision))
        .map_err(|_| NumericParseError {
            value: value.to_string(),
        })
}

fn disambiguate_separators(value: &str) -> String {
    let has_dot = value.contains('.');
    let has_comma = value.contains(',');

    if has_dot && has_comma {
        if value.rfind('.') > value.rfind(',') {
            value.replace(',', "")
        } else {
            value.replace('.', "").replace(',', ".")
        }
    } else {
        let dots = value.matches('.').count();
        let commas = value.matches(',').count();

        let stripped = if dots > 1 || (dots == 1 && !in_decimal_position(value, '.')) {
            value.replace('.', "")
        } else if commas > 1 || (commas == 1 && !in_decimal_position(value, ',')) {
            value.replace(',', "")
        } else {
            value.to_string()
        };

        stripped.replace(',', ".")
    }
}

/// A decimal separator has at most two characters after it.
fn in_decimal_position(value: &str, sep: char) -> bool {
    value
        .rfind(sep)
        .is_some_and(|i| i + sep.len_utf8() + 2 >= value.len())
}
