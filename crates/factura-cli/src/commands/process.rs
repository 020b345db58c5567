//! Process command - extract data from a single invoice document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use factura_core::{Catalog, Invoice, Pipeline, output};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Catalog CSV path (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per line item)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let is_pdf = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        anyhow::bail!("Unsupported file format: expected a .pdf input");
    }

    if let Some(catalog_path) = args.catalog {
        config.catalog_path = catalog_path;
    }
    if let Some(parent) = args.input.parent() {
        config.source_dir = parent.to_path_buf();
    }

    let catalog = Catalog::load(&config.catalog_path, &config.catalog_columns).map_err(|e| {
        anyhow::anyhow!(
            "failed to load catalog {}: {e}",
            config.catalog_path.display()
        )
    })?;

    let key = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    info!("Processing file: {}", args.input.display());

    let precision = config.precision;
    let pipeline = Pipeline::new(config, catalog);
    let invoice = pipeline.process_document(&key)?;

    let rendered = format_invoice(&invoice, args.format, precision)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{rendered}");
    }

    if invoice.flag {
        eprintln!(
            "{} sub-total does not match the sum of line items",
            style("⚠").yellow()
        );
    }
    for warning in &invoice.warnings {
        eprintln!("  - {warning}");
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_invoice(
    invoice: &Invoice,
    format: OutputFormat,
    precision: u32,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice, precision)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(output::OUTPUT_HEADER)?;
    for item in &invoice.line_items {
        wtr.write_record(output::record_for(item, invoice))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &Invoice, precision: u32) -> String {
    let mut out = String::new();

    out.push_str(&format!("Invoice: {}\n", invoice.invoice_number));
    match invoice.issue_date_parsed() {
        Some(date) => out.push_str(&format!("Date: {} ({})\n", invoice.issue_date, date)),
        None => out.push_str(&format!("Date: {}\n", invoice.issue_date)),
    }
    out.push_str(&format!("Client: {}\n", invoice.client_name));
    out.push_str(&format!("Currency: {}\n", invoice.currency));
    out.push_str(&format!("Destination: {}\n", invoice.destination_port));
    out.push('\n');

    out.push_str("Items:\n");
    for item in &invoice.line_items {
        out.push_str(&format!(
            "  {} {} x {} = {}\n",
            item.product_code,
            item.product_name.as_deref().unwrap_or("-"),
            item.unit_price,
            item.total_price
        ));
    }
    out.push('\n');

    out.push_str("Amounts:\n");
    if let Some(sub_total) = invoice.sub_total_amount {
        out.push_str(&format!("  Sub-total: {sub_total}\n"));
    }
    if let Some(fumigation) = invoice.fumigation {
        out.push_str(&format!("  Fumigation: {fumigation}\n"));
    }
    if let Some(fob) = invoice.fob {
        out.push_str(&format!("  FOB: {fob}\n"));
    }
    out.push_str(&format!(
        "  Computed total: {}\n",
        invoice.line_total(precision)
    ));
    out.push_str(&format!(
        "  Reconciled: {}\n",
        if invoice.flag { "NO (flagged)" } else { "yes" }
    ));

    out
}
