//! Converts episode descriptions from Markdown to HTML and escapes plain text
//! for the page. Inline HTML in descriptions passes through untouched.
//!
//! [`escape`] leaves `'` alone, so templates must double-quote attribute
//! values which interpolate data.

use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{html, Options, Parser};

/// Renders `markdown` as an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// Escapes `text` for use in HTML element content or a double-quoted
/// attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html(&mut out, text);
    out
}
