//! Normalization passes for extracted items.
//!
//! Each pass is a function `&str -> String` so callers can chain them in
//! whatever order their section needs. [`clean_item`] is the fixed chain the
//! segmenter applies to every candidate item.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Run the segmenter's cleanup chain on one candidate item.
///
/// The chain repeats until the item stops changing: dropping a leading "and"
/// can expose another enumerator, and vice versa.
pub(crate) fn clean_item(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let mut next = strip_enumerators(&current);
        next = collapse_whitespace(&next);
        next = trim_dangling_separators(&next);
        if next == current {
            return current;
        }
        current = next;
    }
}

// ---------------------------------------------------------------------------
// Pass 1: Strip leading enumerators and bullet markers
// ---------------------------------------------------------------------------

/// Remove `1.`, `2)`, `(3)`, `a)`, `-`, `*` style prefixes, repeatedly.
pub fn strip_enumerators(item: &str) -> String {
    static ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\s*(?:\d{1,3}[.)](?:\s+|$)|\(\d{1,3}\)\s*|\(?[a-z]\)\s+|[-*+–—]+\s*)")
            .expect("valid regex")
    });

    let mut current = item.trim().to_string();
    loop {
        let next = ENUM_RE.replace(&current, "").trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

// ---------------------------------------------------------------------------
// Pass 2: Collapse whitespace
// ---------------------------------------------------------------------------

/// Replace every whitespace run with a single space and trim.
pub fn collapse_whitespace(item: &str) -> String {
    static WS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(item.trim(), " ").to_string()
}

// ---------------------------------------------------------------------------
// Pass 3: Trim dangling separators
// ---------------------------------------------------------------------------

/// Drop trailing commas/colons and leading conjunction leftovers.
fn trim_dangling_separators(item: &str) -> String {
    let trimmed = item
        .trim()
        .trim_end_matches(|c: char| matches!(c, ',' | ':' | ';') || c.is_whitespace());
    let lower = trimmed.to_ascii_lowercase();
    let stripped = ["and ", "or ", "& "]
        .iter()
        .find(|p| lower.starts_with(**p))
        .map(|p| trimmed[p.len()..].trim_start())
        .unwrap_or(trimmed);
    stripped.to_string()
}

// ---------------------------------------------------------------------------
// Casing
// ---------------------------------------------------------------------------

/// Uppercase the first character.
pub fn sentence_case(item: &str) -> String {
    let mut chars = item.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character unless the first word is an acronym.
pub fn lowercase_first(item: &str) -> String {
    let first_word = item.split_whitespace().next().unwrap_or("");
    if is_acronym(first_word) {
        return item.to_string();
    }
    let mut chars = item.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `CRM`, `KYC`, `GL`, `SIM` and similar all-caps tokens.
fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

/// Build a short title from the first `max_words` words of an item.
///
/// Trailing connective words are dropped and each remaining word is
/// capitalized except short joiners; acronyms are kept as written.
pub fn title_from(item: &str, max_words: usize) -> String {
    const JOINERS: &[&str] = &[
        "and", "or", "of", "the", "a", "an", "to", "for", "with", "in", "on", "by", "via",
    ];

    let base = strip_terminal_punct(item);
    let mut words: Vec<&str> = base.split_whitespace().take(max_words).collect();
    while let Some(last) = words.last() {
        let lower = last.to_ascii_lowercase();
        if JOINERS.contains(&lower.trim_matches(|c: char| !c.is_alphanumeric())) {
            words.pop();
        } else {
            break;
        }
    }

    words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let lower = w.to_lowercase();
            if is_acronym(w) {
                (*w).to_string()
            } else if i > 0 && JOINERS.contains(&lower.as_str()) {
                lower
            } else {
                sentence_case(&lower)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([',', ':', ';', '-'])
        .to_string()
}

// ---------------------------------------------------------------------------
// Punctuation
// ---------------------------------------------------------------------------

/// Remove trailing sentence punctuation.
pub fn strip_terminal_punct(item: &str) -> String {
    item.trim()
        .trim_end_matches(['.', '!', '?', ',', ';', ':'])
        .trim_end()
        .to_string()
}

/// Terminate with a period unless the text already ends a sentence.
pub fn ensure_period(item: &str) -> String {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.ends_with(['.', '!', '?']) {
        return trimmed.to_string();
    }
    format!("{}.", trimmed.trim_end_matches([',', ';', ':']).trim_end())
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Key used for case-insensitive comparison: lowercase alphanumerics only.
pub fn comparison_key(item: &str) -> String {
    item.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Drop later items whose [`comparison_key`] was already seen. Order is kept.
pub fn dedupe_case_insensitive<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|item| seen.insert(comparison_key(item)))
        .collect()
}

/// Split on commas that are not inside parentheses.
///
/// A leading "and"/"or" on a piece is dropped, so "billing, rating and
/// collections" yields `["billing", "rating and collections"]`.
pub fn split_list(item: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for ch in item.chars() {
        match ch {
            '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    parts.push(current);

    parts
        .iter()
        .map(|p| trim_dangling_separators(&collapse_whitespace(p)))
        .map(|p| strip_terminal_punct(&p))
        .filter(|p| !p.is_empty())
        .collect()
}

/// First `max_chars` characters on a word boundary, with an ellipsis when cut.
pub fn truncate_words(item: &str, max_chars: usize) -> String {
    if item.chars().count() <= max_chars {
        return item.to_string();
    }
    let mut out = String::new();
    for word in item.split_whitespace() {
        if out.chars().count() + word.chars().count() + 1 > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    format!("{}...", strip_terminal_punct(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numeric_and_bullet_prefixes() {
        assert_eq!(strip_enumerators("1. Capture leads"), "Capture leads");
        assert_eq!(strip_enumerators("2) Score leads"), "Score leads");
        assert_eq!(strip_enumerators("(3) Route leads"), "Route leads");
        assert_eq!(strip_enumerators("a) Merge duplicates"), "Merge duplicates");
        assert_eq!(strip_enumerators("- * Nested bullet"), "Nested bullet");
    }

    #[test]
    fn keeps_decimal_numbers() {
        assert_eq!(
            strip_enumerators("3.5% uplift in renewals"),
            "3.5% uplift in renewals"
        );
        assert_eq!(strip_enumerators("2024 roadmap items"), "2024 roadmap items");
    }

    #[test]
    fn clean_item_is_idempotent() {
        let once = clean_item("  -  1.  Track   opportunities,  ");
        assert_eq!(once, "Track opportunities");
        assert_eq!(clean_item(&once), once);
    }

    #[test]
    fn clean_item_finishes_in_one_call() {
        assert_eq!(
            clean_item("Track opportunities by stage , :"),
            "Track opportunities by stage"
        );
        assert_eq!(
            clean_item("and 1. Capture inbound web leads"),
            "Capture inbound web leads"
        );
        assert_eq!(clean_item("1. or - and Route hot leads"), "Route hot leads");
    }

    #[test]
    fn casing_helpers() {
        assert_eq!(sentence_case("reduce churn"), "Reduce churn");
        assert_eq!(lowercase_first("Reduce churn"), "reduce churn");
        assert_eq!(lowercase_first("CRM adoption"), "CRM adoption");
    }

    #[test]
    fn title_drops_trailing_joiners() {
        assert_eq!(
            title_from("lead and account management for sales", 4),
            "Lead and Account Management"
        );
        assert_eq!(title_from("KYC checks and", 5), "KYC Checks");
    }

    #[test]
    fn ensure_period_variants() {
        assert_eq!(ensure_period("Mask card numbers"), "Mask card numbers.");
        assert_eq!(ensure_period("Mask card numbers:"), "Mask card numbers.");
        assert_eq!(ensure_period("Done!"), "Done!");
        assert_eq!(ensure_period("   "), "");
    }

    #[test]
    fn dedupe_ignores_case_and_punctuation() {
        let items = dedupe_case_insensitive(vec![
            "Reduce churn.",
            "reduce CHURN",
            "Grow revenue",
        ]);
        assert_eq!(items, vec!["Reduce churn.", "Grow revenue"]);
    }

    #[test]
    fn split_list_respects_parentheses() {
        let parts = split_list("lead capture (web, events), scoring, and routing.");
        assert_eq!(parts, vec!["lead capture (web, events)", "scoring", "routing"]);
    }

    #[test]
    fn truncate_on_word_boundary() {
        let text = "one two three four five six";
        assert_eq!(truncate_words(text, 100), text);
        assert_eq!(truncate_words(text, 13), "one two three...");
    }
}
