//! Declarative keyword tables for the two known invoice layouts.
//!
//! Keywords are lowercase ASCII; matching is case-insensitive. Language
//! selection is implicit in which keyword matched.

/// Language a keyword variant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lang {
    En,
    Es,
}

/// One keyword variant of a labeled field.
#[derive(Clone, Copy, Debug)]
pub struct Keyword {
    pub lang: Lang,
    pub text: &'static str,
}

const fn en(text: &'static str) -> Keyword {
    Keyword {
        lang: Lang::En,
        text,
    }
}

const fn es(text: &'static str) -> Keyword {
    Keyword {
        lang: Lang::Es,
        text,
    }
}

// Header fields, matched against table cell text.
pub const INVOICE_NUMBER: &[Keyword] = &[en("invoice number"), en("invoice nr")];
pub const ISSUE_DATE: &[Keyword] = &[en("issue date"), es("fecha")];
pub const CLIENT: &[Keyword] = &[en("bill to"), es("importador")];
pub const CURRENCY: &[Keyword] = &[en("currency"), es("moneda")];
pub const DESTINATION_PORT: &[Keyword] = &[en("destination port"), es("puerto de destino")];

// Amount block, located as a substring of the full document text.
pub const SUB_TOTAL: &[Keyword] = &[
    en("sub-total amount"),
    en("sub-total"),
    es("valor sub-total"),
];

// Line item block boundaries, matched against document lines.
pub const BLOCK_START: &[Keyword] = &[
    en("description of goods"),
    es("descripcion de las mercancias"),
];
pub const BLOCK_END: &[Keyword] = &[en("signature"), es("visto")];

// Numeric columns, matched against table cell text. "prieco un" tolerates a
// transposition seen in converted documents.
pub const AREA: &[Keyword] = &[en("sqm"), es("m2")];
pub const UNIT_PRICE: &[Keyword] = &[en("unit.price"), es("precio un"), es("prieco un")];
pub const TOTAL_PRICE: &[Keyword] = &[en("total"), es("importe")];
