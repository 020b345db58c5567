//! Per-document extraction pipeline.
//!
//! Each document flows: text model → header fields → amounts → line items →
//! catalog enrichment → reconciliation. Assembly is pure given the extracted
//! text, so the batch driver can run documents on a worker pool against the
//! read-only catalog.

use std::fs;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::document::{Converter, DocxReader, PdfReader, SourceDocument};
use crate::error::DocumentError;
use crate::extract::amounts::extract_amounts;
use crate::extract::fields::extract_field;
use crate::extract::keywords;
use crate::items;
use crate::models::config::PipelineConfig;
use crate::models::invoice::Invoice;
use crate::reconcile::{Outcome, Reconciler};

/// One run's pipeline: configuration, the shared catalog and the
/// reconciliation engine.
pub struct Pipeline {
    config: PipelineConfig,
    catalog: Catalog,
    reconciler: Reconciler,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, catalog: Catalog) -> Self {
        let reconciler = Reconciler::new(config.precision);
        Self {
            config,
            catalog,
            reconciler,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Document keys (`.pdf` file stems) of the source directory, sorted for
    /// stable output ordering.
    pub fn list_keys(&self) -> std::io::Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.config.source_dir)? {
            let path = entry?.path();
            let is_pdf = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
            if path.is_file() && is_pdf {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Reads both renditions of one document and assembles its invoice.
    pub fn process_document(&self, key: &str) -> Result<Invoice, DocumentError> {
        let pdf_path = self.config.source_dir.join(format!("{key}.pdf"));
        debug!("reading {}", pdf_path.display());
        let (pdf_text, pdf) = PdfReader::read(&pdf_path)?;

        let converter = Converter::from_config(&self.config);
        let docx = converter
            .ensure_converted(key, &pdf_path)
            .and_then(|path| match DocxReader::read(&path) {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!("falling back to PDF-only extraction for {key}: {e}");
                    None
                }
            });

        let document = SourceDocument {
            key: key.to_string(),
            pdf_text,
            pdf,
            docx,
        };

        Ok(self.assemble(&document))
    }

    /// Builds and reconciles an invoice from one document's extracted text.
    pub fn assemble(&self, document: &SourceDocument) -> Invoice {
        let cells = document.cells();
        let precision = self.config.precision;

        let amounts = extract_amounts(document.full_text(), precision);
        let parsed = items::parse_line_items(document.lines(), cells, precision);

        let mut invoice = Invoice {
            invoice_number: extract_field(keywords::INVOICE_NUMBER, cells),
            issue_date: extract_field(keywords::ISSUE_DATE, cells),
            client_name: extract_field(keywords::CLIENT, cells),
            currency: extract_field(keywords::CURRENCY, cells),
            destination_port: extract_field(keywords::DESTINATION_PORT, cells),
            sub_total_amount: amounts.sub_total,
            fumigation: amounts.fumigation,
            fob: amounts.fob,
            line_items: parsed.items,
            flag: false,
            warnings: parsed.warnings,
        };

        self.catalog.enrich(&mut invoice.line_items);

        match self.reconciler.reconcile(&mut invoice) {
            Outcome::Clean => {}
            Outcome::Repaired { strategy } => {
                debug!("invoice {} repaired by {strategy}", invoice.invoice_number);
            }
            Outcome::Flagged { .. } => {
                info!(
                    "{}: invoice {} flagged for review",
                    document.key, invoice.invoice_number
                );
            }
        }

        invoice
    }
}
