//! Invoice data models for the flat output table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::extract::dates::parse_invoice_date;

/// A structured invoice extracted from one source document.
///
/// Header fields keep the raw extracted strings (an unmatched keyword leaves
/// the field empty). `line_items` may be de-duplicated in place and `flag`
/// set once during reconciliation; everything else is write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number/identifier (empty if unmatched).
    pub invoice_number: String,

    /// Issue date as printed on the document (locale-dependent format).
    pub issue_date: String,

    /// Client (importer) name.
    pub client_name: String,

    /// Currency code.
    pub currency: String,

    /// Destination port.
    pub destination_port: String,

    /// Declared sub-total amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_total_amount: Option<Decimal>,

    /// Fumigation charge, present only when the amount block lists one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fumigation: Option<Decimal>,

    /// FOB amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fob: Option<Decimal>,

    /// Line items in document order.
    pub line_items: Vec<LineItem>,

    /// True when reconciliation failed; flagged invoices are excluded from
    /// the clean output set.
    pub flag: bool,

    /// Extraction incidents worth a manual look (truncated columns,
    /// unparseable rows).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Invoice {
    /// Issue date as a calendar date, when the raw string is one of the
    /// known English/Spanish formats.
    pub fn issue_date_parsed(&self) -> Option<NaiveDate> {
        parse_invoice_date(&self.issue_date)
    }

    /// Sum of line item totals, rounded to the given precision.
    pub fn line_total(&self, precision: u32) -> Decimal {
        self.line_items
            .iter()
            .map(|item| item.total_price)
            .sum::<Decimal>()
            .round_dp(precision)
    }
}

/// A single product row within an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Product code: 5-digit zero-padded id, or a literal "990" prefix.
    pub product_code: String,

    /// Catalog product name (absent when the catalog join misses).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Catalog size (absent when the catalog join misses).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Area in square meters.
    pub sqm: Decimal,

    /// Price per square meter.
    pub unit_price: Decimal,

    /// Total price for this row.
    pub total_price: Decimal,
}
