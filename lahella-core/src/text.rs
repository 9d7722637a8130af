//! Loose text comparison for authored and server-rendered rich text.

use scraper::Html;

/// Lowercases `text` and collapses every whitespace run into one space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Same as [`normalize_text`] for an optional value; `None` becomes `""`.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}

/// Extracts the normalized text content of an HTML fragment.
///
/// Tags and attributes are dropped and entities decoded. Text nodes are
/// concatenated in document order with nothing inserted at tag boundaries, so
/// `<p>A</p><p>B</p>` yields `"ab"`. Plain text passes through.
pub fn extract_html_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let raw: String = fragment.root_element().text().collect();
    normalize_text(&raw)
}

/// True when both fragments carry the same extracted text.
pub fn html_texts_equal(a: &str, b: &str) -> bool {
    extract_html_text(a) == extract_html_text(b)
}
