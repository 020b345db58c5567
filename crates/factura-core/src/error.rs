//! Error types for the factura-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// Document reading/conversion error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Numeric normalization error.
    #[error("numeric parse error: {0}")]
    Numeric(#[from] NumericParseError),

    /// Catalog loading error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while reading a source document. These are caught at the
/// batch call site: the document is logged and skipped, the batch continues.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The source file is missing or unreadable.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not a well-formed document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The document loaded but text could not be extracted.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document is empty.
    #[error("document has no pages")]
    NoPages,
}

/// A string did not clean up into a valid decimal literal.
#[derive(Error, Debug)]
#[error("not a recognized numeric value: {value:?}")]
pub struct NumericParseError {
    pub value: String,
}

/// Errors raised while loading the product catalog. Catalog load failure is
/// the only batch-fatal condition.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read or parse the catalog file.
    #[error("failed to read catalog: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("catalog is missing required column: {0}")]
    MissingColumn(String),
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;
