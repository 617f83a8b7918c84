//! HTML helpers: escaping for the renderers, text extraction for re-parsing.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Visible text of an HTML document or fragment, one block per line.
///
/// `<script>` and `<style>` content is dropped. Whitespace inside each text
/// node is collapsed; empty nodes are skipped.
pub fn html_to_text(html: &str) -> String {
    static SKIP_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("script, style").expect("valid selector"));

    let doc = Html::parse_document(html);
    let skipped: Vec<_> = doc.select(&SKIP_SEL).map(|el| el.id()).collect();

    let mut lines = Vec::new();
    for node in doc.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if node.ancestors().any(|a| skipped.contains(&a.id())) {
            continue;
        }
        let collapsed = crate::normalize::collapse_whitespace(text);
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

/// Remove a surrounding Markdown code fence (```html ... ```), if present.
pub fn strip_code_fences(text: &str) -> String {
    static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n(.*?)\n?\s*```\s*$").expect("valid regex")
    });

    match FENCE_RE.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Whether the text contains at least one HTML element tag.
pub fn looks_like_html(text: &str) -> bool {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<(?:[a-zA-Z][a-zA-Z0-9]*)(?:\s[^>]*)?>").expect("valid regex"));

    TAG_RE.is_match(text)
}
