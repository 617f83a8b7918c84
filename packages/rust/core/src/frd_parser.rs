//! Reads user stories back out of a rendered FRD.
//!
//! `div.user-story` markup is preferred. Hand-edited or AI-written FRDs fall
//! back to "As a ..., I want ..." sentences, and finally to `FR-` headings.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use reqdraft_shared::UserStory;
use reqdraft_text::{collapse_whitespace, html_to_text, sentence_case, strip_terminal_punct, title_from};

/// Upper bound on stories recovered from a single FRD.
const MAX_PARSED_STORIES: usize = 24;

static STORY_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(US-\d+)\s*[:\-–—]\s*(.+)$").expect("valid regex")
});

static FR_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^FR-\d+\s*[:\-–—]\s*(.+)$").expect("valid regex")
});

static STORY_SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bas an?\s+([^,]+),\s*I want(?: to)?\s+(.+?)(?:,?\s+so that\s+(.+?))?\.?$")
        .expect("valid regex")
});

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Recover user stories from FRD HTML. Returns an empty list when nothing
/// story-like is found.
pub fn parse_user_stories(html: &str) -> Vec<UserStory> {
    let structured = parse_story_blocks(html);
    if !structured.is_empty() {
        debug!(count = structured.len(), "parsed user story blocks");
        return structured;
    }

    let text = html_to_text(html);
    let from_sentences = parse_story_sentences(&text);
    if !from_sentences.is_empty() {
        debug!(count = from_sentences.len(), "parsed user stories from sentences");
        return from_sentences;
    }

    let from_requirements = parse_requirement_headings(&text);
    debug!(count = from_requirements.len(), "parsed user stories from functional requirements");
    from_requirements
}

fn parse_story_blocks(html: &str) -> Vec<UserStory> {
    static STORY_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.user-story").expect("valid selector"));
    static HEADING_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("h3, h2, h4").expect("valid selector"));
    static DESCRIPTION_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("p").expect("valid selector"));
    static ACCEPTANCE_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("ul.us-acceptance li").expect("valid selector"));

    let doc = Html::parse_document(html);
    let mut stories = Vec::new();
    for block in doc.select(&STORY_SEL).take(MAX_PARSED_STORIES) {
        let heading = block.select(&HEADING_SEL).next().map(element_text).unwrap_or_default();
        let caps = STORY_HEADING_RE.captures(&heading);
        let id = block
            .value()
            .attr("data-us-id")
            .map(str::to_string)
            .or_else(|| caps.as_ref().map(|c| c[1].to_string()))
            .unwrap_or_else(|| format!("US-{:03}", stories.len() + 1));
        let title = caps
            .as_ref()
            .map(|c| c[2].trim().to_string())
            .unwrap_or(heading);

        stories.push(UserStory {
            title: if title.is_empty() { id.clone() } else { title },
            description: block.select(&DESCRIPTION_SEL).next().map(element_text).unwrap_or_default(),
            acceptance_criteria: block
                .select(&ACCEPTANCE_SEL)
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect(),
            id,
        });
    }
    stories
}

/// "As a <role>, I want <goal>, so that <benefit>" lines. A preceding
/// `US-nnn: title` line supplies the id and title.
fn parse_story_sentences(text: &str) -> Vec<UserStory> {
    let mut stories: Vec<UserStory> = Vec::new();
    let mut heading: Option<(String, String)> = None;

    for line in text.lines().map(str::trim) {
        if let Some(caps) = STORY_HEADING_RE.captures(line) {
            heading = Some((caps[1].to_string(), caps[2].trim().to_string()));
            continue;
        }
        let Some(caps) = STORY_SENTENCE_RE.captures(line) else {
            continue;
        };
        if stories.len() >= MAX_PARSED_STORIES {
            break;
        }
        let goal = strip_terminal_punct(&caps[2]);
        let (id, title) = match heading.take() {
            Some((id, title)) if !stories.iter().any(|s| s.id == id) => (id, title),
            _ => (format!("US-{:03}", stories.len() + 1), title_from(&goal, 6)),
        };
        stories.push(UserStory {
            id,
            title,
            description: line.to_string(),
            acceptance_criteria: Vec::new(),
        });
    }
    stories
}

fn parse_requirement_headings(text: &str) -> Vec<UserStory> {
    text.lines()
        .filter_map(|line| FR_HEADING_RE.captures(line.trim()).map(|caps| caps[1].trim().to_string()))
        .take(MAX_PARSED_STORIES)
        .enumerate()
        .map(|(i, title)| UserStory {
            id: format!("US-{:03}", i + 1),
            description: format!("As a user, I want to {}.", title.to_lowercase()),
            title: sentence_case(&title),
            acceptance_criteria: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqdraft_shared::{DomainId, Epic, Provenance};

    use crate::frd::{FrdContent, assemble_frd, derive_requirements};
    use crate::priority::prioritize;

    fn rendered_frd() -> String {
        let epics = vec![
            Epic {
                id: "EPIC-1".into(),
                area: None,
                title: "Shipment Tracking".into(),
                problem: String::new(),
                value: String::new(),
                capabilities: vec!["Track parcels in real time.".into()],
                constraints: Vec::new(),
                acceptance: Vec::new(),
                objective_ref: None,
                provenance: Provenance::Extracted,
            },
        ];
        let (requirements, stories) = derive_requirements(&epics, &[], DomainId::Logistics);
        let priorities = prioritize(&stories, DomainId::Logistics);
        assemble_frd(&FrdContent {
            project: "Parcel Hub".into(),
            version: 1,
            domain: DomainId::Logistics,
            epics,
            requirements,
            stories,
            rules: Vec::new(),
            priorities,
        })
        .to_html()
    }

    #[test]
    fn reads_back_rendered_stories() {
        let stories = parse_user_stories(&rendered_frd());
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].id, "US-001");
        assert_eq!(stories[0].title, "Shipment Tracking");
        assert!(stories[0].description.starts_with("As a "));
        assert!(!stories[0].acceptance_criteria.is_empty());
    }

    #[test]
    fn falls_back_to_story_sentences() {
        let html = "<h3>US-004: Course Enrolment</h3>\
                    <p>As a student, I want to enrol in a course, so that I can attend classes.</p>\
                    <p>As an instructor, I want to publish grades.</p>";
        let stories = parse_user_stories(html);
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].id, "US-004");
        assert_eq!(stories[0].title, "Course Enrolment");
        assert_eq!(stories[1].id, "US-002");
        assert_eq!(stories[1].title, "Publish Grades");
        assert!(stories[1].description.starts_with("As an instructor"));
    }

    #[test]
    fn falls_back_to_requirement_headings() {
        let html = "<h3>FR-001: Invoice approval</h3><p>Approvers sign off invoices.</p>";
        let stories = parse_user_stories(html);
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].id, "US-001");
        assert_eq!(stories[0].title, "Invoice approval");
        assert_eq!(stories[0].description, "As a user, I want to invoice approval.");
    }

    #[test]
    fn nothing_story_like() {
        assert!(parse_user_stories("<p>Meeting notes only.</p>").is_empty());
        assert!(parse_user_stories("").is_empty());
    }
}
