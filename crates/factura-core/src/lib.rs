//! Core library for bilingual commercial invoice processing.
//!
//! This crate provides:
//! - Document text modelling over PDF sources and converted DOCX artifacts
//! - Keyword-driven header field and amount extraction (English/Spanish)
//! - Line item parsing with positional column alignment
//! - Catalog enrichment and subtotal reconciliation

pub mod catalog;
pub mod document;
pub mod error;
pub mod extract;
pub mod items;
pub mod models;
pub mod numeric;
pub mod output;
pub mod pipeline;
pub mod reconcile;

pub use catalog::{Catalog, CatalogEntry};
pub use document::{Converter, DocumentText, DocxReader, PdfReader, SourceDocument};
pub use error::{CatalogError, DocumentError, FacturaError, NumericParseError, Result};
pub use models::config::{CatalogColumns, PipelineConfig};
pub use models::invoice::{Invoice, LineItem};
pub use pipeline::Pipeline;
pub use reconcile::{DedupByProductCode, Outcome, Reconciler, RepairStrategy};
