//! Configuration structures for the extraction pipeline.
//!
//! All paths live in one explicit struct passed into the pipeline; there is
//! no process-wide mutable path state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the factura pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the source `<key>.pdf` documents.
    pub source_dir: PathBuf,

    /// Directory holding converted `<key>.docx` artifacts (read-through cache).
    pub converted_dir: PathBuf,

    /// Path to the product catalog CSV.
    pub catalog_path: PathBuf,

    /// Path of the clean output table.
    pub output_path: PathBuf,

    /// Fractional digits kept by numeric normalization.
    pub precision: u32,

    /// External PDF-to-DOCX converter command with `{input}` and `{output}`
    /// placeholders. When unset, documents are processed PDF-only.
    pub convert_command: Option<String>,

    /// Per-document processing timeout in seconds.
    pub document_timeout_secs: u64,

    /// Number of parallel document workers.
    pub jobs: usize,

    /// Catalog column names.
    pub catalog_columns: CatalogColumns,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("invoices/pdf"),
            converted_dir: PathBuf::from("invoices/docx"),
            catalog_path: PathBuf::from("catalog.csv"),
            output_path: PathBuf::from("invoices.csv"),
            precision: 2,
            convert_command: None,
            document_timeout_secs: 120,
            jobs: 4,
            catalog_columns: CatalogColumns::default(),
        }
    }
}

/// Header names of the catalog columns used by the enricher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogColumns {
    /// Raw product code column.
    pub code: String,

    /// Product name column.
    pub name: String,

    /// Product size column.
    pub size: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            code: "COD".to_string(),
            name: "REFERÊNCIA".to_string(),
            size: "TAMANHO".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Path of the broken-invoice table, derived from the output path.
    pub fn broken_output_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoices");
        let ext = self
            .output_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("csv");
        self.output_path
            .with_file_name(format!("{stem}-broken.{ext}"))
    }
}
