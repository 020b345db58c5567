//! Output tables for the downstream loader.
//!
//! The clean table carries one row per line item of every non-flagged
//! invoice; flagged invoices go to a separate table for inspection.

use std::path::Path;

use crate::error::Result;
use crate::models::invoice::{Invoice, LineItem};

/// Column contract of the clean output table.
pub const OUTPUT_HEADER: [&str; 12] = [
    "Product_code",
    "Product_name",
    "Size",
    "Sqm",
    "Unit_price",
    "Total_price",
    "Invoice_number",
    "Client",
    "Date",
    "Currency",
    "Destination",
    "FOB",
];

/// One output record for a line item with its invoice header fields.
pub fn record_for(item: &LineItem, invoice: &Invoice) -> [String; 12] {
    [
        item.product_code.clone(),
        item.product_name.clone().unwrap_or_default(),
        item.size.clone().unwrap_or_default(),
        item.sqm.to_string(),
        item.unit_price.to_string(),
        item.total_price.to_string(),
        invoice.invoice_number.clone(),
        invoice.client_name.clone(),
        invoice.issue_date.clone(),
        invoice.currency.clone(),
        invoice.destination_port.clone(),
        invoice.fob.map(|d| d.to_string()).unwrap_or_default(),
    ]
}

/// Writes the clean table: line items of non-flagged invoices, in input
/// order. Returns the number of rows written.
pub fn write_clean_csv(path: &Path, invoices: &[Invoice]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(OUTPUT_HEADER)?;

    let mut rows = 0;
    for invoice in invoices.iter().filter(|invoice| !invoice.flag) {
        for item in &invoice.line_items {
            writer.write_record(record_for(item, invoice))?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

/// Writes the broken table: flagged invoices with expected vs. computed
/// sums. Returns the number of invoices written.
pub fn write_broken_csv(path: &Path, invoices: &[Invoice], precision: u32) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Invoice_number",
        "Client",
        "Date",
        "Sub_total_amount",
        "Computed_total",
        "Line_items",
        "Warnings",
    ])?;

    let mut rows = 0;
    for invoice in invoices.iter().filter(|invoice| invoice.flag) {
        writer.write_record([
            invoice.invoice_number.clone(),
            invoice.client_name.clone(),
            invoice.issue_date.clone(),
            invoice
                .sub_total_amount
                .map(|d| d.to_string())
                .unwrap_or_default(),
            invoice.line_total(precision).to_string(),
            invoice.line_items.len().to_string(),
            invoice.warnings.join("; "),
        ])?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
