//! Converted-document (DOCX) extraction using zip and quick-xml.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::{DocumentText, Result, dedup_keep_first};
use crate::error::DocumentError;

const DOC_XML_PATH: &str = "word/document.xml";

/// Converted tabular-document extraction path.
pub struct DocxReader;

impl DocxReader {
    /// Reads a DOCX file into the line/cell model.
    pub fn read(path: &Path) -> Result<DocumentText> {
        let data = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }

    /// Parses DOCX bytes into the line/cell model.
    pub fn parse(bytes: &[u8]) -> Result<DocumentText> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocumentError::Parse(format!("failed to open docx archive: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name(DOC_XML_PATH)
            .map_err(|e| DocumentError::Parse(format!("docx missing document.xml: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| DocumentError::Parse(format!("failed to read document.xml: {e}")))?;

        Ok(Self::model_from_xml(&xml))
    }

    /// One event pass over `word/document.xml`: paragraphs become lines
    /// (table paragraphs included, like the linear extractors), table cells
    /// become cell strings with their paragraphs joined by newlines.
    fn model_from_xml(xml: &str) -> DocumentText {
        let mut reader = XmlReader::from_str(xml);

        let mut lines = Vec::new();
        let mut cells = Vec::new();
        let mut paragraph = String::new();
        let mut cell: Option<String> = None;
        let mut cell_depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:p" => paragraph.clear(),
                    b"w:tc" => {
                        cell_depth += 1;
                        if cell_depth == 1 {
                            cell = Some(String::new());
                        }
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => {
                    if matches!(e.name().as_ref(), b"w:br" | b"w:tab") {
                        paragraph.push(' ');
                    }
                }
                Ok(Event::Text(t)) => {
                    if let Ok(content) = t.unescape() {
                        paragraph.push_str(&content);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:p" => {
                        let line = paragraph.trim().to_string();
                        if let Some(current) = cell.as_mut() {
                            if !current.is_empty() {
                                current.push('\n');
                            }
                            current.push_str(&line);
                        }
                        if !line.is_empty() {
                            lines.push(line);
                        }
                        paragraph.clear();
                    }
                    b"w:tc" => {
                        cell_depth = cell_depth.saturating_sub(1);
                        if cell_depth == 0 {
                            if let Some(text) = cell.take() {
                                cells.push(text.trim().to_string());
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
        }

        DocumentText {
            lines,
            cells: dedup_keep_first(cells),
        }
    }
}
