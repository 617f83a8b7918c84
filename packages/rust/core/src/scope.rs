//! Scope splitting and budget screening.
//!
//! Scope text often carries both halves of a boundary in one block
//! ("Included — lead management ... Excluded — payroll"). Only the included
//! half may feed EPIC extraction, and nothing that looks like a budget figure
//! may reach it either.

use std::sync::LazyLock;

use regex::Regex;

use reqdraft_text::{comparison_key, segment_text};

/// Scope text separated at its inclusion/exclusion markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSplit {
    pub included: String,
    pub excluded: String,
}

/// Split scope text at "Included"/"Excluded"/"In scope"/"Out of scope"
/// markers.
///
/// A marker is one of those words followed by a colon or dash, or standing
/// alone at the end of a line. Text before the first marker counts as
/// included.
pub fn split_scope(text: &str) -> ScopeSplit {
    static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?im)\b(out[- ]of[- ]scope|not[- ]in[- ]scope|not[- ]included|exclusions?|excluded|in[- ]scope|included|inclusions?)\b[ \t]*(?:[:—–-]+|$)",
        )
        .expect("valid regex")
    });

    let mut included = Vec::new();
    let mut excluded = Vec::new();
    let mut in_excluded = false;
    let mut cursor = 0;

    for caps in MARKER_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_part(&text[cursor..whole.start()], in_excluded, &mut included, &mut excluded);
        let keyword = caps[1].to_ascii_lowercase();
        in_excluded = keyword.starts_with("out") || keyword.starts_with("not") || keyword.starts_with("exclu");
        cursor = whole.end();
    }
    push_part(&text[cursor..], in_excluded, &mut included, &mut excluded);

    ScopeSplit {
        included: included.join("\n"),
        excluded: excluded.join("\n"),
    }
}

fn push_part(part: &str, excluded_part: bool, included: &mut Vec<String>, excluded: &mut Vec<String>) {
    let trimmed = part.trim().trim_matches(|c: char| c == '.' || c == ',').trim();
    if trimmed.is_empty() {
        return;
    }
    if excluded_part {
        excluded.push(trimmed.to_string());
    } else {
        included.push(trimmed.to_string());
    }
}

/// Only the included half of a scope block.
pub fn strip_excluded(text: &str) -> String {
    split_scope(text).included
}

// ---------------------------------------------------------------------------
// Budget screening
// ---------------------------------------------------------------------------

/// Whether an item reads like a budget line: a budget/CAPEX/OPEX mention or
/// a currency amount.
pub fn is_budget_like(item: &str) -> bool {
    static BUDGET_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)\b(?:budget(?:ed|s)?|capex|opex|funding|cost estimate)\b|[$€£₹]\s?\d|\b(?:usd|eur|gbp|inr|rs\.?)\s?\d|\d[\d,.]*\s?(?:usd|eur|gbp|inr)\b|\d[\d,.]*\s?(?:lakh|lakhs|crore|crores)\b",
        )
        .expect("valid regex")
    });

    BUDGET_RE.is_match(item)
}

/// Matches text that repeats the caller's budget or reads like a budget
/// figure.
#[derive(Debug, Clone, Default)]
pub struct BudgetScreen {
    keys: Vec<String>,
}

impl BudgetScreen {
    pub fn new(budget: &str) -> Self {
        let keys = segment_text(budget)
            .iter()
            .map(|item| comparison_key(item))
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    pub fn matches(&self, piece: &str) -> bool {
        if is_budget_like(piece) {
            return true;
        }
        let key = comparison_key(piece);
        self.keys
            .iter()
            .any(|b| key.contains(b.as_str()) || (key.chars().count() >= 10 && b.contains(key.as_str())))
    }
}

/// Remove the parts of `text` that repeat the caller's budget text or look
/// like budget figures.
///
/// Screening works on parenthesised asides and comma-separated clauses, so
/// "lead scoring, campaign tracking (USD 50k licence)" keeps both
/// capabilities. Thousands separators ("250,000") do not split a clause.
pub fn strip_budget(text: &str, budget: &str) -> String {
    static ASIDE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s*(?:\([^()]*\)|\[[^\[\]]*\])").expect("valid regex"));
    static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s+").expect("valid regex"));

    let screen = BudgetScreen::new(budget);
    let mut kept_segments = Vec::new();
    for segment in text.lines().flat_map(|line| line.split(';')) {
        if segment.trim().is_empty() {
            kept_segments.push(String::new());
            continue;
        }
        let without_asides = ASIDE_RE.replace_all(segment, |caps: &regex::Captures| {
            if screen.matches(&caps[0]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        });
        let clauses: Vec<&str> = CLAUSE_RE
            .split(&without_asides)
            .map(str::trim)
            .filter(|clause| !clause.is_empty() && !screen.matches(clause))
            .collect();
        if !clauses.is_empty() {
            kept_segments.push(clauses.join(", "));
        }
    }
    kept_segments.join("\n")
}

/// First currency figure found in free text, formatted for the Budget
/// section when the caller gave no budget.
pub fn find_budget_figure(text: &str) -> Option<String> {
    static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(\bINR|\bUSD|\bEUR|\bGBP|\bRs\.?|₹|\$|€|£)\s?([0-9][0-9,]*(?:\.\d+)?(?:\s?(?:k|m|mn|million|lakh|crore)\b)?)")
            .expect("valid regex")
    });

    AMOUNT_RE
        .captures(text)
        .map(|caps| format!("Estimated budget: {} {}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_inline_markers() {
        let split = split_scope(
            "Included — lead and account management, campaign tracking. Excluded — payroll and HR onboarding",
        );
        assert_eq!(split.included, "lead and account management, campaign tracking");
        assert_eq!(split.excluded, "payroll and HR onboarding");
    }

    #[test]
    fn splits_line_markers() {
        let text = "In scope:\n- Invoice capture\n- Vendor portal\nOut of scope:\n- Treasury";
        let split = split_scope(text);
        assert!(split.included.contains("Invoice capture"));
        assert!(split.included.contains("Vendor portal"));
        assert!(!split.included.contains("Treasury"));
        assert!(split.excluded.contains("Treasury"));
    }

    #[test]
    fn text_without_markers_is_included() {
        let split = split_scope("Online ordering and delivery tracking");
        assert_eq!(split.included, "Online ordering and delivery tracking");
        assert!(split.excluded.is_empty());
    }

    #[test]
    fn excluded_word_in_prose_is_not_a_marker() {
        let split = split_scope("Returns excluded from promotions are handled manually");
        assert!(split.excluded.is_empty());
    }

    #[test]
    fn detects_budget_lines() {
        assert!(is_budget_like("Budget of 2 crore approved"));
        assert!(is_budget_like("USD 250,000 for phase one"));
        assert!(is_budget_like("$40k licence spend"));
        assert!(is_budget_like("Capex limited to 10 lakhs"));
        assert!(!is_budget_like("Reduce cost per shipment"));
        assert!(!is_budget_like("Lead scoring for 3 regions"));
    }

    #[test]
    fn strips_budget_segments() {
        let text = "Lead capture\nPhase one funded at 1.2M\nCampaign tracking";
        let cleaned = strip_budget(text, "Phase one funded at 1.2M");
        assert_eq!(cleaned, "Lead capture\nCampaign tracking");
    }

    #[test]
    fn not_included_marker_starts_exclusions() {
        let split = split_scope(
            "Included: lead scoring and campaign tracking\nNot included: payroll processing and HR onboarding",
        );
        assert_eq!(split.included, "lead scoring and campaign tracking");
        assert_eq!(split.excluded, "payroll processing and HR onboarding");
    }

    #[test]
    fn strips_only_the_budget_aside() {
        let text = "lead scoring, campaign tracking and account management (USD 50k licence)";
        assert_eq!(
            strip_budget(text, ""),
            "lead scoring, campaign tracking and account management"
        );
    }

    #[test]
    fn strips_budget_clause_and_keeps_neighbours() {
        let text = "- Lead scoring for 3 regions, capex of USD 250,000, partner portal";
        assert_eq!(strip_budget(text, ""), "- Lead scoring for 3 regions, partner portal");

        let text = "Vendor onboarding; Approval workflow, Phase one funded at 1.2M";
        assert_eq!(
            strip_budget(text, "Phase one funded at 1.2M"),
            "Vendor onboarding\nApproval workflow"
        );
    }

    #[test]
    fn keeps_non_budget_asides() {
        let text = "lead capture (web, events), scoring";
        assert_eq!(strip_budget(text, ""), text);
    }

    #[test]
    fn finds_budget_figure() {
        assert_eq!(
            find_budget_figure("Rollout needs roughly USD 120,000 in year one"),
            Some("Estimated budget: USD 120,000".to_string())
        );
        assert_eq!(find_budget_figure("no money mentioned"), None);
    }
}
