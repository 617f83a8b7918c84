//! Text segmentation and normalization for stakeholder input.
//!
//! [`segment`] turns a free-text block into ordered [`ExtractedItem`]s:
//! it splits on line breaks, bullet glyphs, tabs and semicolons, strips leading
//! enumerators, and drops fragments too short to carry meaning. The
//! [`normalize`] passes and [`html`] helpers are shared by the extractor and
//! renderers; [`markdown`] exports rendered documents.

pub mod html;
pub mod markdown;
pub mod normalize;

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use reqdraft_shared::{ExtractedItem, Section};

pub use html::{escape_html, html_to_text, looks_like_html, strip_code_fences};
pub use markdown::html_to_markdown;
pub use normalize::{
    collapse_whitespace, comparison_key, dedupe_case_insensitive, ensure_period,
    lowercase_first, sentence_case, split_list, strip_enumerators, strip_terminal_punct,
    title_from, truncate_words,
};

/// Items shorter than this (in characters, after cleanup) are discarded.
pub const MIN_ITEM_CHARS: usize = 10;

/// Split a free-text block into cleaned items, preserving order.
///
/// Segmenting the newline-joined output again yields the same items.
pub fn segment(text: &str, section: Section) -> Vec<ExtractedItem> {
    segment_text(text)
        .into_iter()
        .enumerate()
        .map(|(index, text)| ExtractedItem {
            text,
            section,
            index,
        })
        .collect()
}

/// [`segment`] without the section bookkeeping.
pub fn segment_text(text: &str) -> Vec<String> {
    static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\r?\n|\r|\t|;|[•●▪◦‣■□➤►✓✔]").expect("valid regex")
    });

    let items: Vec<String> = SPLIT_RE
        .split(text)
        .map(normalize::clean_item)
        .filter(|item| item.chars().count() >= MIN_ITEM_CHARS)
        .collect();

    trace!(count = items.len(), "segmented text block");
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_lines_bullets_and_semicolons() {
        let text = "1. Capture inbound leads\n• Score leads by engagement; Route hot leads to sales";
        let items = segment_text(text);
        assert_eq!(
            items,
            vec![
                "Capture inbound leads",
                "Score leads by engagement",
                "Route hot leads to sales",
            ]
        );
    }

    #[test]
    fn drops_short_fragments() {
        let items = segment_text("- ok\n- n/a\n- Reconcile bank statements daily");
        assert_eq!(items, vec!["Reconcile bank statements daily"]);
    }

    #[test]
    fn preserves_order_and_indexes() {
        let items = segment("Third priority item\nFirst listed here\n", Section::Objectives);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "Third priority item");
        assert_eq!(items[0].index, 0);
        assert_eq!(items[1].index, 1);
        assert_eq!(items[1].section, Section::Objectives);
    }

    #[test]
    fn segmentation_is_idempotent() {
        let text = "  * 1) Automate invoice capture ;; 2) Three-way match\r\n\t- Vendor portal onboarding  ";
        let first = segment_text(text);
        let second = segment_text(&first.join("\n"));
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);

        for text in [
            "Track opportunities by stage , :",
            "and 1. Capture inbound web leads",
            "or 2) and - Reconcile vendor statements ;",
        ] {
            let first = segment_text(text);
            assert_eq!(segment_text(&first.join("\n")), first, "input: {text}");
            assert_eq!(first.len(), 1, "input: {text}");
        }
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(segment_text("").is_empty());
        assert!(segment_text("   \n\t  ").is_empty());
    }
}
