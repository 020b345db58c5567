//! Document text model over PDF and converted DOCX sources.
//!
//! Every backend exposes the same two outputs: a flat ordered line sequence
//! from a linear extraction pass, and a de-duplicated set of table cell
//! strings from every table in the document.

mod convert;
mod docx;
mod pdf;

pub use convert::Converter;
pub use docx::DocxReader;
pub use pdf::PdfReader;

use std::collections::HashSet;

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Extracted text of one document rendition.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    /// Ordered text lines from the linear extraction pass.
    pub lines: Vec<String>,

    /// Unique table cell texts; iteration order is not meaningful.
    pub cells: Vec<String>,
}

/// Keeps the first occurrence of each value, dropping later duplicates.
pub(crate) fn dedup_keep_first(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Both renditions of one source document. The converted DOCX rendition is
/// preferred for lines and cells when available; amount extraction always
/// reads the PDF text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Document key (the file stem shared by the `.pdf`/`.docx` pair).
    pub key: String,

    /// Full linear text of the PDF.
    pub pdf_text: String,

    /// PDF rendition.
    pub pdf: DocumentText,

    /// Converted DOCX rendition, absent when conversion was unavailable.
    pub docx: Option<DocumentText>,
}

impl SourceDocument {
    pub fn lines(&self) -> &[String] {
        self.docx
            .as_ref()
            .map(|d| d.lines.as_slice())
            .unwrap_or(&self.pdf.lines)
    }

    pub fn cells(&self) -> &[String] {
        self.docx
            .as_ref()
            .map(|d| d.cells.as_slice())
            .unwrap_or(&self.pdf.cells)
    }

    pub fn full_text(&self) -> &str {
        &self.pdf_text
    }
}
