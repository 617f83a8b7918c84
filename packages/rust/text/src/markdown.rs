//! Markdown export for rendered documents.
//!
//! Rendered BRD/FRD/wireframe HTML is converted with `htmd`, after tables are
//! rewritten to pipe syntax, then passed through a short cleanup chain.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use reqdraft_shared::{ReqDraftError, Result};

/// Convert a rendered document to Markdown.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let html = preprocess_tables(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "head", "nav"])
        .build();

    let raw = converter
        .convert(&html)
        .map_err(|e| ReqDraftError::parse(format!("markdown conversion failed: {e}")))?;

    debug!(raw_len = raw.len(), "htmd conversion complete");

    let mut result = clean_blank_lines(&raw);
    result = trim_line_ends(&result);
    result = ensure_trailing_newline(&result);
    Ok(result)
}

// ---------------------------------------------------------------------------
// Table pre-processing
// ---------------------------------------------------------------------------

/// Replace each `<table>` with pipe-table Markdown before htmd runs.
fn preprocess_tables(html: &str) -> String {
    static TABLE_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("table").expect("valid selector"));

    let doc = Html::parse_fragment(html);
    if doc.select(&TABLE_SEL).next().is_none() {
        return html.to_string();
    }

    // Re-serialize through scraper so table HTML matches byte for byte.
    let mut result = doc.root_element().inner_html();
    for table in doc.select(&TABLE_SEL) {
        let table_html = table.html();
        let md_table = table_to_markdown(&table);
        result = result.replacen(&table_html, &md_table, 1);
    }
    result
}

fn table_to_markdown(table: &ElementRef) -> String {
    static TR_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
    static CELL_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("th, td").expect("valid selector"));

    let rows: Vec<Vec<String>> = table
        .select(&TR_SEL)
        .map(|tr| {
            tr.select(&CELL_SEL)
                .map(|cell| {
                    crate::normalize::collapse_whitespace(&cell.text().collect::<String>())
                        .replace('|', "\\|")
                })
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    let mut md = String::from("\n\n");
    for (i, row) in rows.iter().enumerate() {
        let mut cells = row.clone();
        cells.resize(col_count, String::new());
        md.push_str("| ");
        md.push_str(&cells.join(" | "));
        md.push_str(" |\n");
        if i == 0 {
            md.push_str("| ");
            md.push_str(&vec!["---"; col_count].join(" | "));
            md.push_str(" |\n");
        }
    }
    md.push('\n');
    md
}

// ---------------------------------------------------------------------------
// Cleanup passes
// ---------------------------------------------------------------------------

/// Collapse runs of 3+ blank lines into exactly 2.
fn clean_blank_lines(md: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{4,}").expect("valid regex"));

    MULTI_BLANK_RE.replace_all(md, "\n\n\n").to_string()
}

fn trim_line_ends(md: &str) -> String {
    md.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}

fn ensure_trailing_newline(md: &str) -> String {
    format!("{}\n", md.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_headings_and_lists() {
        let html = "<h1>Business Requirements</h1><ul><li>OBJ-1: Grow revenue</li></ul>";
        let md = html_to_markdown(html).unwrap();
        assert!(md.contains("# Business Requirements"));
        assert!(md.contains("OBJ-1: Grow revenue"));
        assert!(md.ends_with('\n'));
    }

    #[test]
    fn converts_tables_to_pipe_syntax() {
        let html = r#"<table>
            <tr><th>ID</th><th>Metric</th></tr>
            <tr><td>KPI-1</td><td>Conversion Rate</td></tr>
        </table>"#;
        let md = html_to_markdown(html).unwrap();
        assert!(md.contains("| ID | Metric |"));
        assert!(md.contains("| KPI-1 | Conversion Rate |"));
    }

    #[test]
    fn drops_style_blocks() {
        let html = "<style>h1 { color: red }</style><p>Body text</p>";
        let md = html_to_markdown(html).unwrap();
        assert!(md.contains("Body text"));
        assert!(!md.contains("color"));
    }

    #[test]
    fn blank_line_runs_are_collapsed() {
        assert_eq!(clean_blank_lines("a\n\n\n\n\nb"), "a\n\n\nb");
    }
}
