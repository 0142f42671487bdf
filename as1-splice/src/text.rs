use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

/// True when `html` contains at least one element, not just text and
/// character references.
pub fn has_markup(html: &str) -> bool {
    Html::parse_fragment(html)
        .root_element()
        .descendants()
        .skip(1)
        .any(|node| node.value().is_element())
}

/// Decodes character references and drops any tags.
pub fn unescape(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

/// Plain text rendering of an HTML fragment. Line and paragraph breaks
/// survive as newlines.
pub fn html_to_text(html: &str) -> String {
    lazy_static! {
        static ref BREAK: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
        static ref PARAGRAPH: Regex = Regex::new(r"(?i)</p>\s*").unwrap();
        static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
    }
    let html = BREAK.replace_all(html, "\n");
    let html = PARAGRAPH.replace_all(&html, "\n\n");
    let text = unescape(&html);
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}
