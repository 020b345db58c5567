//! Product catalog loading and line item enrichment.
//!
//! The catalog is loaded once per run and treated as read-only shared state;
//! enrichment is a pure left join on the normalized product code.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::models::config::CatalogColumns;
use crate::models::invoice::LineItem;

/// One catalog row keyed by its normalized code.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
    pub size: String,
}

/// Reference table mapping product codes to canonical name/size.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    /// Loads the catalog from a delimited file. Any failure here is
    /// batch-fatal; the run must abort before document processing begins.
    pub fn load(path: &Path, columns: &CatalogColumns) -> Result<Self, CatalogError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let code_idx = column_index(&headers, &columns.code)?;
        let name_idx = column_index(&headers, &columns.name)?;
        let size_idx = column_index(&headers, &columns.size)?;

        let mut entries = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let Some(code) = normalize_code(record.get(code_idx).unwrap_or("")) else {
                continue;
            };

            match entries.entry(code.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(CatalogEntry {
                        code,
                        name: record.get(name_idx).unwrap_or("").trim().to_string(),
                        size: record.get(size_idx).unwrap_or("").trim().to_string(),
                    });
                }
                Entry::Occupied(_) => {
                    warn!("duplicate catalog code {code}; keeping the first occurrence");
                }
            }
        }

        debug!("loaded {} catalog entries", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Left join: attaches name/size to every item whose code is known;
    /// misses keep `None` name/size.
    pub fn enrich(&self, items: &mut [LineItem]) {
        for item in items {
            if let Some(entry) = self.entries.get(&item.product_code) {
                item.product_name = Some(entry.name.clone());
                item.size = Some(entry.size.clone());
            }
        }
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, CatalogError> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
}

/// Normalizes a raw catalog code: strip non-digits, drop the trailing check
/// digit, left-pad with zeros to 5 characters. Codes with no digit body are
/// skipped.
pub fn normalize_code(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 2 {
        return None;
    }
    Some(format!("{:0>5}", &digits[..digits.len() - 1]))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;

    fn write_catalog(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn item(code: &str) -> LineItem {
        LineItem {
            product_code: code.to_string(),
            product_name: None,
            size: None,
            sqm: Decimal::ONE,
            unit_price: Decimal::ONE,
            total_price: Decimal::from_str("1.00").unwrap(),
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("12345X"), Some("01234".to_string()));
        assert_eq!(normalize_code("100011"), Some("10001".to_string()));
        assert_eq!(normalize_code("99.01-23"), Some("99012".to_string()));
        assert_eq!(normalize_code("45"), Some("00004".to_string()));
        assert_eq!(normalize_code("X"), None);
        assert_eq!(normalize_code(""), None);
    }

    #[test]
    fn test_load_and_enrich() {
        let file = write_catalog(
            "COD,REFERÊNCIA,TAMANHO\n100011,GLAZED TILE,30x30\n100034,RUSTIC STONE,40x40\n",
        );
        let catalog = Catalog::load(file.path(), &CatalogColumns::default()).unwrap();
        assert_eq!(catalog.len(), 2);

        let mut items = vec![item("10001"), item("10002")];
        catalog.enrich(&mut items);

        assert_eq!(items[0].product_name.as_deref(), Some("GLAZED TILE"));
        assert_eq!(items[0].size.as_deref(), Some("30x30"));
        // Unmatched code keeps nulls, not an error.
        assert_eq!(items[1].product_name, None);
        assert_eq!(items[1].size, None);
    }

    #[test]
    fn test_duplicate_codes_keep_first() {
        let file = write_catalog("COD,REFERÊNCIA,TAMANHO\n100011,FIRST,1\n100011,SECOND,2\n");
        let catalog = Catalog::load(file.path(), &CatalogColumns::default()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("10001").unwrap().name, "FIRST");
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let file = write_catalog("CODE,NAME\n1,2\n");
        let err = Catalog::load(file.path(), &CatalogColumns::default()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(_)));
    }
}
