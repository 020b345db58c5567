//! PDF text extraction using lopdf and pdf-extract.

use std::fs;
use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::{DocumentText, Result, dedup_keep_first};
use crate::error::DocumentError;
use crate::extract::patterns::CELL_SPLIT;

/// Native PDF extraction path.
pub struct PdfReader;

impl PdfReader {
    /// Reads a PDF and returns its full linear text plus the line/cell model.
    pub fn read(path: &Path) -> Result<(String, DocumentText)> {
        let data = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut doc =
            Document::load_mem(&data).map_err(|e| DocumentError::Parse(e.to_string()))?;

        let data = if doc.is_encrypted() {
            // PDFs with empty-password encryption are common; anything else
            // is unreadable.
            doc.decrypt("")
                .map_err(|_| DocumentError::Parse("document is encrypted".to_string()))?;
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| DocumentError::Parse(e.to_string()))?;
            decrypted
        } else {
            data
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(DocumentError::NoPages);
        }
        debug!("loaded PDF with {} pages", page_count);

        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| DocumentError::TextExtraction(e.to_string()))?;

        let model = Self::model_from_text(&text);
        Ok((text, model))
    }

    /// Builds the line/cell model from linear text. The linear extractor
    /// flattens table geometry, so cells are approximated by splitting each
    /// line on runs of whitespace.
    pub fn model_from_text(text: &str) -> DocumentText {
        let lines: Vec<String> = text.split('\n').map(|l| l.trim_end().to_string()).collect();

        let cells = lines
            .iter()
            .flat_map(|line| CELL_SPLIT.split(line))
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(String::from)
            .collect();

        DocumentText {
            lines,
            cells: dedup_keep_first(cells),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_model_from_text() {
        let text = "COMMERCIAL INVOICE\nInvoice number   WCF-101\nCurrency   USD\nCurrency   USD\n";
        let model = PdfReader::model_from_text(text);

        assert_eq!(model.lines.len(), 5);
        assert_eq!(model.lines[1], "Invoice number   WCF-101");
        // Cells are split on whitespace runs and de-duplicated.
        assert!(model.cells.contains(&"Invoice number".to_string()));
        assert!(model.cells.contains(&"WCF-101".to_string()));
        assert_eq!(
            model.cells.iter().filter(|c| *c == "Currency").count(),
            1
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = PdfReader::read(Path::new("no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
