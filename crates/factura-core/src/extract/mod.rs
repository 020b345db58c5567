//! Keyword-driven field extraction for bilingual invoices.
//!
//! Matching is declarative: each field owns a table of language-tagged
//! keywords in [`keywords`]; adding a language or a field is new data, not a
//! new code path.

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod keywords;
pub mod patterns;

pub use amounts::{AmountFields, extract_amounts};
pub use fields::extract_field;
pub use keywords::{Keyword, Lang};
