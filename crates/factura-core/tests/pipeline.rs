//! End-to-end pipeline tests over synthetic document text.

use std::fs;
use std::io::Write;
use std::str::FromStr;

use rust_decimal::Decimal;

use factura_core::document::{DocumentText, SourceDocument};
use factura_core::models::config::{CatalogColumns, PipelineConfig};
use factura_core::{Catalog, Pipeline, output};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn load_catalog() -> Catalog {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    // Raw codes carry a trailing check digit that normalization drops.
    write!(
        file,
        "COD,REFERÊNCIA,TAMANHO\n100011,GLAZED TILE,30x30\n100034,RUSTIC STONE,40x40\n"
    )
    .unwrap();
    file.flush().unwrap();
    Catalog::load(file.path(), &CatalogColumns::default()).unwrap()
}

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default(), load_catalog())
}

/// English-layout document whose sums match on the first comparison.
fn clean_document() -> SourceDocument {
    SourceDocument {
        key: "wcf-101".to_string(),
        pdf_text: "COMMERCIAL INVOICE\nPayment conditions 30 days\n\
                   Sub-Total Amount USD 850.00\nFumigation 100.00\nTotal FOB 950.00\n"
            .to_string(),
        pdf: DocumentText::default(),
        docx: Some(DocumentText {
            lines: strings(&[
                "COMMERCIAL INVOICE",
                "Description of Goods",
                "10001 GLAZED TILE",
                "10002 RUSTIC TILE",
                "Signature",
            ]),
            cells: strings(&[
                "Invoice number WCF-101",
                "Issue date 15/03/2023",
                "Bill to Acme Imports",
                "Currency USD",
                "Destination port Veracruz",
                "Sqm 100.00 200.00",
                "Unit.price 2.50 3.00",
                "Total 250.00 600.00",
            ]),
        }),
    }
}

/// Spanish-layout document with a duplicated row that dedup repairs.
fn duplicated_document() -> SourceDocument {
    SourceDocument {
        key: "fc-202".to_string(),
        pdf_text: "FACTURA COMERCIAL\nCondiciones de pago 60 dias\n\
                   VALOR SUB-TOTAL EUR 2.000,00\nFOB 2.100,00\n"
            .to_string(),
        pdf: DocumentText::default(),
        docx: Some(DocumentText {
            lines: strings(&[
                "FACTURA COMERCIAL",
                "Descripcion de las Mercancias",
                "10001 AZULEJO",
                "10001 AZULEJO",
                "10003 PIEDRA",
                "Visto Bueno",
            ]),
            cells: strings(&[
                "Invoice nr FC-202",
                "Fecha 12-Ene-23",
                "Importador Cliente SA",
                "Moneda EUR",
                "Puerto de destino Bilbao",
                "M2 10,00 10,00 20,00",
                "Precio un 100,00 100,00 50,00",
                "Importe 1.000,00 1.000,00 1.000,00",
            ]),
        }),
    }
}

/// Document whose subtotal never matches; stays flagged.
fn broken_document() -> SourceDocument {
    SourceDocument {
        key: "bad-303".to_string(),
        pdf_text: "COMMERCIAL INVOICE\nSub-Total Amount USD 999.00\nFOB 1,050.00\n".to_string(),
        pdf: DocumentText::default(),
        docx: Some(DocumentText {
            lines: strings(&[
                "Description of Goods",
                "10001 GLAZED TILE",
                "Signature",
            ]),
            cells: strings(&[
                "Invoice number BAD-303",
                "Sqm 100.00",
                "Unit.price 2.50",
                "Total 250.00",
            ]),
        }),
    }
}

#[test]
fn assembles_clean_english_invoice() {
    let invoice = pipeline().assemble(&clean_document());

    assert_eq!(invoice.invoice_number, "WCF-101");
    assert_eq!(invoice.issue_date, "15/03/2023");
    assert_eq!(invoice.client_name, "Acme Imports");
    assert_eq!(invoice.currency, "USD");
    assert_eq!(invoice.destination_port, "Veracruz");

    assert_eq!(invoice.sub_total_amount, Some(dec("850.00")));
    assert_eq!(invoice.fumigation, Some(dec("100.00")));
    assert_eq!(invoice.fob, Some(dec("950.00")));

    assert!(!invoice.flag);
    assert_eq!(invoice.line_items.len(), 2);

    // Catalog join: first code matches, second misses with null fill.
    assert_eq!(
        invoice.line_items[0].product_name.as_deref(),
        Some("GLAZED TILE")
    );
    assert_eq!(invoice.line_items[0].size.as_deref(), Some("30x30"));
    assert_eq!(invoice.line_items[1].product_name, None);

    assert_eq!(invoice.line_items[1].unit_price, dec("3.00"));
    assert_eq!(invoice.line_items[1].total_price, dec("600.00"));
}

#[test]
fn repairs_duplicated_spanish_invoice() {
    let invoice = pipeline().assemble(&duplicated_document());

    assert_eq!(invoice.invoice_number, "FC-202");
    assert_eq!(invoice.currency, "EUR");

    // Spanish numeric convention, two amount tokens: second token is FOB and
    // fumigation stays unset.
    assert_eq!(invoice.sub_total_amount, Some(dec("2000.00")));
    assert_eq!(invoice.fumigation, None);
    assert_eq!(invoice.fob, Some(dec("2100.00")));

    // The duplicated 10001 row was dropped by the dedup repair.
    assert!(!invoice.flag);
    assert_eq!(invoice.line_items.len(), 2);
    assert_eq!(invoice.line_items[0].product_code, "10001");
    assert_eq!(invoice.line_items[1].product_code, "10003");
    assert_eq!(invoice.line_total(2), dec("2000.00"));

    assert_eq!(invoice.issue_date_parsed().map(|d| d.to_string()).as_deref(), Some("2023-01-12"));
}

#[test]
fn flags_persistent_mismatch() {
    let invoice = pipeline().assemble(&broken_document());

    assert!(invoice.flag);
    assert_eq!(invoice.sub_total_amount, Some(dec("999.00")));
    assert_eq!(invoice.line_total(2), dec("250.00"));
}

#[test]
fn clean_output_excludes_flagged_invoices() {
    let pipeline = pipeline();
    let invoices = vec![
        pipeline.assemble(&clean_document()),
        pipeline.assemble(&duplicated_document()),
        pipeline.assemble(&broken_document()),
    ];

    let dir = tempfile::tempdir().unwrap();
    let clean_path = dir.path().join("invoices.csv");
    let broken_path = dir.path().join("invoices-broken.csv");

    let rows = output::write_clean_csv(&clean_path, &invoices).unwrap();
    let broken = output::write_broken_csv(&broken_path, &invoices, 2).unwrap();

    // Two items from the clean invoice plus two from the de-duplicated one.
    assert_eq!(rows, 4);
    assert_eq!(broken, 1);

    let clean = fs::read_to_string(&clean_path).unwrap();
    let mut lines = clean.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Product_code,Product_name,Size,Sqm,Unit_price,Total_price,\
         Invoice_number,Client,Date,Currency,Destination,FOB"
    );
    assert_eq!(clean.lines().count(), 5);
    assert!(clean.contains("WCF-101"));
    assert!(clean.contains("FC-202"));
    assert!(!clean.contains("BAD-303"));

    let broken_table = fs::read_to_string(&broken_path).unwrap();
    assert!(broken_table.contains("BAD-303"));
    assert!(broken_table.contains("999.00"));
}
