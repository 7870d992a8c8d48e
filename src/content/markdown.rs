//! Markdown to HTML conversion.
//!
//! Thin wrapper around `pulldown-cmark`. Fenced code blocks are core
//! CommonMark; footnotes, tables and strikethrough are enabled on top.
//! Output is an HTML fragment, injected unescaped into templates.

use pulldown_cmark::{Options, Parser, html};

/// Convert Markdown body text to an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let options = Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH;

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}
