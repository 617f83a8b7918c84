//! Reads EPICs and validation rules back out of a rendered BRD.
//!
//! Structured markup (`div.epic`, `ul.validation-rules`) is preferred. BRDs
//! that were edited by hand or produced by the AI path may lack it, so each
//! parser falls back to `EPIC-`/`V-` prefixed text lines, and EPICs finally
//! fall back to Business Requirements list items.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use reqdraft_shared::{Epic, Provenance, RuleSource, ValidationRule};
use reqdraft_text::{collapse_whitespace, html_to_text, title_from};

use crate::assembler::BRD_MARKUP_VERSION;

/// Upper bound on EPICs recovered from a single BRD.
const MAX_PARSED_EPICS: usize = 24;

static EPIC_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(EPIC-(?:[A-Z]+-)?\d+)\s*[:\-–—]\s*(.+)$").expect("valid regex")
});

static EPIC_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.epic").expect("valid selector"));
static HEADING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3, h2, h4").expect("valid selector"));
static PROBLEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.epic-problem").expect("valid selector"));
static VALUE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.epic-value").expect("valid selector"));
static CAPABILITY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.epic-capabilities li").expect("valid selector"));
static CONSTRAINT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.epic-constraints li").expect("valid selector"));
static ACCEPTANCE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.epic-acceptance li").expect("valid selector"));

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn first_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel).next().map(element_text).unwrap_or_default()
}

fn list_texts(el: ElementRef<'_>, sel: &Selector) -> Vec<String> {
    el.select(sel)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// The `data-markup` version a BRD declares, if any.
pub fn markup_version(html: &str) -> Option<String> {
    static ARTICLE_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("article[data-markup]").expect("valid selector"));

    Html::parse_document(html)
        .select(&ARTICLE_SEL)
        .next()
        .and_then(|el| el.value().attr("data-markup"))
        .map(str::to_string)
}

/// Recover EPICs from BRD HTML. Returns an empty list when nothing
/// EPIC-like is found.
pub fn parse_epics(html: &str) -> Vec<Epic> {
    if let Some(version) = markup_version(html).filter(|v| v != BRD_MARKUP_VERSION) {
        warn!(%version, expected = BRD_MARKUP_VERSION, "unknown BRD markup version, parsing anyway");
    }

    let structured = parse_epic_blocks(html);
    if !structured.is_empty() {
        debug!(count = structured.len(), "parsed epic blocks");
        return structured;
    }

    let from_text = parse_epic_lines(&html_to_text(html));
    if !from_text.is_empty() {
        debug!(count = from_text.len(), "parsed epics from text lines");
        return from_text;
    }

    let from_requirements = parse_requirement_items(html);
    debug!(count = from_requirements.len(), "parsed epics from business requirements");
    from_requirements
}

fn parse_epic_blocks(html: &str) -> Vec<Epic> {
    let doc = Html::parse_document(html);
    let mut epics = Vec::new();

    for block in doc.select(&EPIC_SEL).take(MAX_PARSED_EPICS) {
        let heading = block.select(&HEADING_SEL).next().map(element_text).unwrap_or_default();
        let caps = EPIC_LINE_RE.captures(&heading);

        let id = block
            .value()
            .attr("data-epic-id")
            .map(str::to_string)
            .or_else(|| caps.as_ref().map(|c| c[1].to_string()));
        let Some(id) = id else {
            continue;
        };
        let title = caps
            .as_ref()
            .map(|c| c[2].trim().to_string())
            .unwrap_or_else(|| heading.clone());

        epics.push(Epic {
            area: area_of(&id),
            title: if title.is_empty() { id.clone() } else { title },
            problem: first_text(block, &PROBLEM_SEL),
            value: first_text(block, &VALUE_SEL),
            capabilities: list_texts(block, &CAPABILITY_SEL),
            constraints: list_texts(block, &CONSTRAINT_SEL),
            acceptance: list_texts(block, &ACCEPTANCE_SEL),
            objective_ref: block.value().attr("data-objective-ref").map(str::to_string),
            provenance: Provenance::Extracted,
            id,
        });
    }
    epics
}

/// `EPIC-AP-1` → `AP`.
fn area_of(id: &str) -> Option<String> {
    let mut parts = id.split('-');
    let (_, area, _) = (parts.next()?, parts.next()?, parts.next()?);
    Some(area.to_string())
}

/// Text fallback: each `EPIC-x: Title` line starts an EPIC and the lines
/// after it, up to the next EPIC line, are its capabilities.
fn parse_epic_lines(text: &str) -> Vec<Epic> {
    let mut epics: Vec<Epic> = Vec::new();
    for line in text.lines().map(str::trim) {
        if let Some(caps) = EPIC_LINE_RE.captures(line) {
            if epics.len() >= MAX_PARSED_EPICS {
                break;
            }
            let id = caps[1].to_string();
            if epics.iter().any(|e| e.id == id) {
                continue;
            }
            epics.push(Epic {
                area: area_of(&id),
                title: caps[2].trim().to_string(),
                problem: String::new(),
                value: String::new(),
                capabilities: Vec::new(),
                constraints: Vec::new(),
                acceptance: Vec::new(),
                objective_ref: None,
                provenance: Provenance::Extracted,
                id,
            });
        } else if let Some(current) = epics.last_mut() {
            if current.capabilities.len() < 6 && line.chars().count() >= 10 {
                current.capabilities.push(line.to_string());
            }
        }
    }
    epics
}

fn parse_requirement_items(html: &str) -> Vec<Epic> {
    static REQ_SEL: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("#business-requirements li, .business-requirements li")
            .expect("valid selector")
    });
    static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^(?:BR-\d+\s*:\s*)?(?:the system (?:shall|must|should|will)\s+(?:support\s+)?)?")
            .expect("valid regex")
    });

    let doc = Html::parse_document(html);
    doc.select(&REQ_SEL)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .take(MAX_PARSED_EPICS)
        .enumerate()
        .map(|(i, text)| {
            let core = PREFIX_RE.replace(&text, "").to_string();
            Epic {
                id: format!("EPIC-{}", i + 1),
                area: None,
                title: title_from(&core, 6),
                problem: String::new(),
                value: String::new(),
                capabilities: vec![text],
                constraints: Vec::new(),
                acceptance: Vec::new(),
                objective_ref: None,
                provenance: Provenance::Extracted,
            }
        })
        .collect()
}

/// Recover validation rules, preferring `ul.validation-rules` markup.
pub fn parse_validation_rules(html: &str) -> Vec<ValidationRule> {
    static RULE_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("ul.validation-rules li").expect("valid selector"));
    static RULE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(V-\d{3})\s*[:\-–—]\s*(.+)$").expect("valid regex")
    });

    let doc = Html::parse_document(html);
    let mut rules: Vec<ValidationRule> = doc
        .select(&RULE_SEL)
        .filter_map(|li| {
            let text = element_text(li);
            let caps = RULE_LINE_RE.captures(&text);
            let id = li
                .value()
                .attr("data-id")
                .map(str::to_string)
                .or_else(|| caps.as_ref().map(|c| c[1].to_string()))?;
            let body = caps.as_ref().map(|c| c[2].trim().to_string()).unwrap_or(text.clone());
            let source = match li.value().attr("data-source") {
                Some("domain") => RuleSource::DomainDefault,
                _ => RuleSource::User,
            };
            Some(ValidationRule { id, text: body, source })
        })
        .collect();

    if rules.is_empty() {
        rules = html_to_text(html)
            .lines()
            .filter_map(|line| {
                let caps = RULE_LINE_RE.captures(line.trim())?;
                Some(ValidationRule {
                    id: caps[1].to_string(),
                    text: caps[2].trim().to_string(),
                    source: RuleSource::User,
                })
            })
            .collect();
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{render_epic, validations_section};

    fn sample_epic(id: &str, title: &str) -> Epic {
        Epic {
            id: id.into(),
            area: None,
            title: title.into(),
            problem: "Manual billing runs.".into(),
            value: "Accurate invoices.".into(),
            capabilities: vec!["Rate usage records.".into(), "Issue invoices.".into()],
            constraints: vec!["Subject to validation rules V-001.".into()],
            acceptance: vec!["Invoices match rated usage.".into()],
            objective_ref: Some("OBJ-2".into()),
            provenance: Provenance::Extracted,
        }
    }

    #[test]
    fn reads_back_rendered_epics() {
        let original = vec![
            sample_epic("EPIC-1", "Billing & Charging"),
            sample_epic("EPIC-BANK-2", "Bank Reconciliation"),
        ];
        let html = format!(
            "<article data-markup=\"brd/1\"><section id=\"epics\">{}</section></article>",
            original.iter().map(render_epic).collect::<String>()
        );
        let parsed = parse_epics(&html);
        assert_eq!(parsed, {
            let mut expected = original.clone();
            expected[1].area = Some("BANK".into());
            expected
        });
    }

    #[test]
    fn falls_back_to_epic_lines() {
        let html = "<h2>EPICs</h2><p>EPIC-1: Customer Onboarding &amp; SIM Activation</p>\
                    <p>Capture KYC documents at the counter</p>\
                    <p>EPIC-2 - Billing &amp; Charging</p>";
        let parsed = parse_epics(html);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "EPIC-1");
        assert_eq!(parsed[0].title, "Customer Onboarding & SIM Activation");
        assert_eq!(parsed[0].capabilities, vec!["Capture KYC documents at the counter"]);
        assert_eq!(parsed[1].title, "Billing & Charging");
    }

    #[test]
    fn falls_back_to_business_requirements() {
        let html = "<section id=\"business-requirements\"><ol>\
                    <li><strong>BR-1:</strong> The system shall support lead scoring by engagement.</li>\
                    <li>The system shall capture leads from web forms.</li></ol></section>";
        let parsed = parse_epics(html);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "EPIC-1");
        assert_eq!(parsed[0].title, "Lead Scoring by Engagement");
        assert_eq!(parsed[1].title, "Capture Leads From Web Forms");
    }

    #[test]
    fn no_epics_in_unrelated_html() {
        assert!(parse_epics("<p>Nothing to see here</p>").is_empty());
        assert!(parse_epics("").is_empty());
    }

    #[test]
    fn reads_back_validation_rules() {
        let rules = vec![
            ValidationRule {
                id: "V-001".into(),
                text: "Enforce consent capture.".into(),
                source: RuleSource::User,
            },
            ValidationRule {
                id: "V-002".into(),
                text: "Validate email format.".into(),
                source: RuleSource::DomainDefault,
            },
        ];
        let parsed = parse_validation_rules(&validations_section(&rules));
        assert_eq!(parsed, rules);
    }

    #[test]
    fn validation_rules_from_text() {
        let parsed = parse_validation_rules("<p>V-001: Enforce MFA for admins.</p><p>V-002 - Mask PANs.</p>");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].text, "Mask PANs.");
    }
}
