//! Line-anchored keyword field extraction.

use super::keywords::Keyword;

/// Scans `texts` in order and returns the remainder of the first one whose
/// content starts (case-insensitively) with any keyword, stripped of the
/// matched keyword and surrounding whitespace. Returns an empty string when
/// nothing matches.
pub fn extract_field<S: AsRef<str>>(keywords: &[Keyword], texts: &[S]) -> String {
    for text in texts {
        for keyword in keywords {
            if let Some(rest) = strip_keyword(text.as_ref(), keyword.text) {
                return rest.trim().to_string();
            }
        }
    }
    String::new()
}

/// Case-insensitive prefix strip. Keywords are ASCII, so byte-wise ASCII
/// comparison is safe on any UTF-8 input.
pub(crate) fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    if text.len() >= keyword.len()
        && text.is_char_boundary(keyword.len())
        && text[..keyword.len()].eq_ignore_ascii_case(keyword)
    {
        Some(&text[keyword.len()..])
    } else {
        None
    }
}

/// True when the text starts with any of the keywords.
pub(crate) fn starts_with_any(text: &str, keywords: &[Keyword]) -> bool {
    keywords
        .iter()
        .any(|k| strip_keyword(text, k.text).is_some())
}
