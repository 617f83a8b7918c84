//! Generation entry points: raw text → BRD, BRD → FRD, stories → wireframes.
//!
//! Each `generate_*` call first offers the whole document to the AI
//! orchestrator and, when it declines, renders the deterministic document.
//! Only an unusable project name is reported back as an error.

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use reqdraft_domain::{detect_domain_text, profile};
use reqdraft_shared::{DomainId, RawInput, ReqDraftError, Result, UserStory, ValidationMode};
use reqdraft_text::{html_to_text, segment_text};

use crate::assembler::{BrdContent, Document, DocumentKind, assemble_brd, fingerprint};
use crate::brd_parser::{parse_epics, parse_validation_rules};
use crate::enrichment::{Orchestrator, brd_prompt, frd_prompt, wireframe_prompt};
use crate::extract::{
    MIN_SOURCE_CHARS, attach_validations, business_requirements, default_epics, extract_epics,
    extract_kpis, extract_objectives, extract_risks, extract_validations, list_items, stakeholders,
};
use crate::frd::{FrdContent, assemble_frd, derive_requirements};
use crate::frd_parser::parse_user_stories;
use crate::priority::prioritize;
use crate::scope::{BudgetScreen, find_budget_figure, split_scope, strip_budget};
use crate::wireframe::assemble_wireframes;

const BRD_MARKERS: &[&str] = &["EPIC-", "OBJ-", "KPI-", "RISK-", "V-0"];
const FRD_MARKERS: &[&str] = &["FR-", "US-", "EPIC-"];
const WIREFRAME_MARKERS: &[&str] = &["Login", "Dashboard"];

/// Assumption items mentioning one of these feed "Boundaries & Dependencies".
const DEPENDENCY_WORDS: &[&str] = &[
    "depend", "integrat", "api", "third-party", "third party", "vendor", "provider", "external",
    "upstream", "interface",
];

// ---------------------------------------------------------------------------
// Requests and results
// ---------------------------------------------------------------------------

/// One BRD generation call.
#[derive(Debug, Clone)]
pub struct BrdRequest {
    pub project: String,
    pub inputs: RawInput,
    pub version: u32,
    /// Printed in the header when set. Never taken from the clock.
    pub date: Option<NaiveDate>,
    pub validation_mode: ValidationMode,
}

impl BrdRequest {
    pub fn new(project: impl Into<String>, inputs: RawInput) -> Self {
        Self {
            project: project.into(),
            inputs,
            version: 1,
            date: None,
            validation_mode: ValidationMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Ai,
    Fallback,
}

impl GenerationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Fallback => "fallback",
        }
    }
}

/// A finished document.
#[derive(Debug, Clone)]
pub struct Generated {
    pub html: String,
    pub source: GenerationSource,
    pub domain: DomainId,
    /// SHA-256 of `html`.
    pub fingerprint: String,
}

impl Generated {
    fn new(html: String, source: GenerationSource, domain: DomainId) -> Self {
        let fingerprint = fingerprint(&html);
        Self {
            html,
            source,
            domain,
            fingerprint,
        }
    }
}

/// Progress callback for reporting generation status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the document is ready.
    fn done(&self, generated: &Generated);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _generated: &Generated) {}
}

fn require_project(project: &str) -> Result<&str> {
    let trimmed = project.trim();
    if trimmed.is_empty() {
        return Err(ReqDraftError::input("project name must not be empty"));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Deterministic renderers
// ---------------------------------------------------------------------------

/// Render a BRD without consulting the AI service.
#[instrument(skip_all, fields(project = %request.project, version = request.version))]
pub fn render_brd(request: &BrdRequest) -> Result<Document> {
    let project = require_project(&request.project)?;
    let inputs = &request.inputs;
    let domain = detect_domain_text(&format!("{project}\n{}", inputs.combined_text()));
    let p = profile(domain);

    let budget = inputs.budget.as_str();
    let scope = split_scope(&inputs.scope);
    let included = strip_budget(&scope.included, budget);
    let objectives_text = strip_budget(&inputs.objectives, budget);
    let constraints_text = strip_budget(&inputs.constraints, budget);
    let assumptions_text = strip_budget(&inputs.assumptions, budget);

    let mut in_scope = list_items(&included);
    if included.trim().chars().count() < MIN_SOURCE_CHARS || in_scope.is_empty() {
        debug!(%domain, "scope is sparse, using domain scope");
        in_scope = p.scope.iter().map(|s| s.to_string()).collect();
    }
    let out_of_scope = list_items(&strip_budget(&scope.excluded, budget));

    let assumptions = list_items(&assumptions_text);
    let dependencies: Vec<String> = assumptions
        .iter()
        .filter(|item| {
            let lower = item.to_lowercase();
            DEPENDENCY_WORDS.iter().any(|w| lower.contains(w))
        })
        .cloned()
        .collect();

    let objectives = extract_objectives(&objectives_text, domain);
    let mut epics = extract_epics(&objectives_text, &included, domain);
    let validations = extract_validations(&inputs.validations, domain, request.validation_mode);
    attach_validations(&mut epics, &validations);
    let kpis = extract_kpis(&objectives, &epics, domain);
    let risks = extract_risks(&included, &constraints_text, domain);
    let (requirements, _) =
        business_requirements(&strip_budget(&inputs.brief_requirements, budget), domain);

    let budget_lines = if budget.trim().is_empty() {
        find_budget_figure(&inputs.combined_text()).into_iter().collect()
    } else {
        let items = segment_text(budget);
        if items.is_empty() {
            vec![budget.trim().to_string()]
        } else {
            items
        }
    };

    info!(
        %domain,
        objectives = objectives.len(),
        epics = epics.len(),
        kpis = kpis.len(),
        risks = risks.len(),
        rules = validations.len(),
        "brd entities extracted"
    );

    Ok(assemble_brd(&BrdContent {
        project: project.to_string(),
        version: request.version,
        domain,
        date: request.date,
        in_scope,
        out_of_scope,
        dependencies,
        stakeholders: stakeholders(domain),
        objectives,
        epics,
        requirements,
        kpis,
        risks,
        assumptions,
        constraints: list_items(&constraints_text),
        validations,
        budget: budget_lines,
    }))
}

/// Render an FRD from a previously generated BRD.
#[instrument(skip_all, fields(project = %project, version = version))]
pub fn render_frd(project: &str, brd_html: &str, version: u32) -> Result<Document> {
    let project = require_project(project)?;
    let brd_text = html_to_text(brd_html);
    let domain = detect_domain_text(&format!("{project}\n{brd_text}"));

    let mut epics = parse_epics(brd_html);
    if epics.is_empty() {
        warn!(%domain, "no EPICs found in BRD, using domain defaults");
        epics = default_epics(domain);
    }

    let mut rules = parse_validation_rules(brd_html);
    if rules.is_empty() {
        debug!(%domain, "no validation rules in BRD, using domain rules");
        rules = extract_validations("", domain, ValidationMode::DomainDefaults);
    }

    let (requirements, stories) = derive_requirements(&epics, &rules, domain);
    let priorities = prioritize(&stories, domain);
    info!(%domain, epics = epics.len(), requirements = requirements.len(), "frd derived");

    Ok(assemble_frd(&FrdContent {
        project: project.to_string(),
        version,
        domain,
        epics,
        requirements,
        stories,
        rules,
        priorities,
    }))
}

/// Resolve the wireframe domain: an explicit, recognised name wins; anything
/// else is detected from the stories.
fn wireframe_domain(project: &str, stories: &[UserStory], domain: Option<&str>) -> DomainId {
    if let Some(name) = domain.filter(|d| !d.trim().is_empty()) {
        match name.parse::<DomainId>() {
            Ok(id) => return id,
            Err(e) => warn!(error = %e, "ignoring domain, detecting from stories"),
        }
    }
    let text: Vec<String> = std::iter::once(project.to_string())
        .chain(stories.iter().map(|s| format!("{} {}", s.title, s.description)))
        .collect();
    detect_domain_text(&text.join("\n"))
}

/// Render wireframes for a set of user stories.
#[instrument(skip_all, fields(project = %project, stories = stories.len()))]
pub fn render_wireframes(project: &str, stories: &[UserStory], domain: Option<&str>) -> Result<Document> {
    let project = require_project(project)?;
    let domain = wireframe_domain(project, stories, domain);
    Ok(assemble_wireframes(project, stories, domain))
}

/// User stories and domain recovered from an FRD. An explicit domain wins;
/// otherwise it is detected from the whole FRD text.
fn frd_stories(project: &str, frd_html: &str, domain: Option<&str>) -> Result<(Vec<UserStory>, DomainId)> {
    let stories = parse_user_stories(frd_html);
    if stories.is_empty() {
        return Err(ReqDraftError::parse("no user stories found in FRD"));
    }
    let explicit = domain.filter(|d| !d.trim().is_empty()).and_then(|name| match name.parse::<DomainId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "ignoring domain, detecting from FRD");
            None
        }
    });
    let domain = explicit.unwrap_or_else(|| detect_domain_text(&format!("{project}\n{}", html_to_text(frd_html))));
    debug!(stories = stories.len(), domain = %domain, "read FRD");
    Ok((stories, domain))
}

/// Render wireframes for the user stories of an FRD.
#[instrument(skip_all, fields(project = %project))]
pub fn render_wireframes_from_frd(project: &str, frd_html: &str, domain: Option<&str>) -> Result<Document> {
    let project = require_project(project)?;
    let (stories, domain) = frd_stories(project, frd_html, domain)?;
    Ok(assemble_wireframes(project, &stories, domain))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

async fn try_ai(
    orchestrator: &Orchestrator,
    progress: &dyn ProgressReporter,
    prompt: impl FnOnce() -> crate::enrichment::Prompt,
    markers: &[&str],
    check: impl Fn(&str) -> Result<()> + Sync,
) -> Option<String> {
    if !orchestrator.is_enabled() {
        return None;
    }
    progress.phase("Requesting AI draft");
    orchestrator.generate_checked(&prompt(), markers, check).await
}

/// Reject an AI BRD whose EPICs repeat the budget or quote money.
fn check_ai_brd(html: &str, budget: &str) -> Result<()> {
    let screen = BudgetScreen::new(budget);
    let leaked = parse_epics(html).into_iter().find(|epic| {
        std::iter::once(&epic.title)
            .chain(&epic.capabilities)
            .any(|text| screen.matches(text))
    });
    match leaked {
        Some(epic) => Err(ReqDraftError::upstream(format!(
            "{} carries budget text",
            epic.id
        ))),
        None => Ok(()),
    }
}

fn finish(progress: &dyn ProgressReporter, generated: Generated) -> Generated {
    info!(
        source = generated.source.as_str(),
        domain = %generated.domain,
        bytes = generated.html.len(),
        "document ready"
    );
    progress.done(&generated);
    generated
}

/// Generate a BRD, trying the AI service first.
#[instrument(skip_all, fields(project = %request.project, version = request.version))]
pub async fn generate_brd(
    request: &BrdRequest,
    orchestrator: &Orchestrator,
    progress: &dyn ProgressReporter,
) -> Result<Generated> {
    let project = require_project(&request.project)?;
    progress.phase("Detecting domain");
    let domain = detect_domain_text(&format!("{project}\n{}", request.inputs.combined_text()));

    let prompt = || brd_prompt(project, domain, &request.inputs);
    let check = |html: &str| check_ai_brd(html, &request.inputs.budget);
    if let Some(html) = try_ai(orchestrator, progress, prompt, BRD_MARKERS, check).await {
        let envelope = Document::new(DocumentKind::Brd, project, request.version, domain, request.date);
        return Ok(finish(
            progress,
            Generated::new(envelope.enclose(&html), GenerationSource::Ai, domain),
        ));
    }

    progress.phase("Assembling BRD");
    let doc = render_brd(request)?;
    Ok(finish(
        progress,
        Generated::new(doc.to_html(), GenerationSource::Fallback, doc.domain),
    ))
}

/// Generate an FRD from BRD HTML, trying the AI service first.
#[instrument(skip_all, fields(project = %project, version = version))]
pub async fn generate_frd_from_brd(
    project: &str,
    brd_html: &str,
    version: u32,
    orchestrator: &Orchestrator,
    progress: &dyn ProgressReporter,
) -> Result<Generated> {
    let project = require_project(project)?;
    progress.phase("Reading BRD");
    let brd_text = html_to_text(brd_html);
    let domain = detect_domain_text(&format!("{project}\n{brd_text}"));

    let prompt = || frd_prompt(project, domain, &brd_text);
    if let Some(html) = try_ai(orchestrator, progress, prompt, FRD_MARKERS, |_| Ok(())).await {
        let envelope = Document::new(DocumentKind::Frd, project, version, domain, None);
        return Ok(finish(
            progress,
            Generated::new(envelope.enclose(&html), GenerationSource::Ai, domain),
        ));
    }

    progress.phase("Deriving functional requirements");
    let doc = render_frd(project, brd_html, version)?;
    Ok(finish(
        progress,
        Generated::new(doc.to_html(), GenerationSource::Fallback, doc.domain),
    ))
}

/// Generate wireframes for user stories, trying the AI service first.
#[instrument(skip_all, fields(project = %project, stories = stories.len()))]
pub async fn generate_wireframes(
    project: &str,
    stories: &[UserStory],
    domain: Option<&str>,
    orchestrator: &Orchestrator,
    progress: &dyn ProgressReporter,
) -> Result<Generated> {
    let project = require_project(project)?;
    let domain = wireframe_domain(project, stories, domain);

    let prompt = || wireframe_prompt(project, domain, stories);
    if let Some(html) = try_ai(orchestrator, progress, prompt, WIREFRAME_MARKERS, |_| Ok(())).await {
        let envelope = Document::new(DocumentKind::Wireframes, project, 1, domain, None);
        return Ok(finish(
            progress,
            Generated::new(envelope.enclose(&html), GenerationSource::Ai, domain),
        ));
    }

    progress.phase("Laying out pages");
    let doc = assemble_wireframes(project, stories, domain);
    Ok(finish(
        progress,
        Generated::new(doc.to_html(), GenerationSource::Fallback, domain),
    ))
}

/// Generate wireframes from an FRD, trying the AI service first.
#[instrument(skip_all, fields(project = %project))]
pub async fn generate_wireframes_from_frd(
    project: &str,
    frd_html: &str,
    domain: Option<&str>,
    orchestrator: &Orchestrator,
    progress: &dyn ProgressReporter,
) -> Result<Generated> {
    let project = require_project(project)?;
    progress.phase("Reading FRD");
    let (stories, domain) = frd_stories(project, frd_html, domain)?;
    generate_wireframes(project, &stories, Some(domain.as_str()), orchestrator, progress).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::enrichment::{CompletionProvider, Prompt};
    use crate::extract::DEFAULT_OBJECTIVE_EPIC;

    struct Fixed(&'static str);

    #[async_trait]
    impl CompletionProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _prompt: &Prompt) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn crm_request() -> BrdRequest {
        BrdRequest::new(
            "CRM System",
            RawInput {
                scope: "Included — lead and account management, campaign tracking and email marketing. \
                        Excluded — payroll processing and HR onboarding"
                    .into(),
                objectives: "Increase qualified lead conversion by 20%\nImprove campaign ROI visibility for marketing"
                    .into(),
                validations: String::new(),
                budget: "USD 250,000 approved for phase one".into(),
                ..RawInput::default()
            },
        )
    }

    fn epics_body(doc: &Document) -> String {
        doc.section("epics").map(|s| s.body.clone()).unwrap_or_default()
    }

    #[test]
    fn crm_brd_end_to_end() {
        let doc = render_brd(&crm_request()).expect("brd");
        assert_eq!(doc.domain, DomainId::Crm);

        let html = doc.to_html();
        for marker in ["EPIC-", "OBJ-", "KPI-", "RISK-", "V-001"] {
            assert!(html.contains(marker), "missing {marker}");
        }
        assert!(html.contains("customer consent validation"));

        let epics = epics_body(&doc);
        assert!(!epics.contains("250,000"));
        assert!(!epics.contains("phase one"));
        assert!(!epics.to_lowercase().contains("payroll"));
        assert!(!epics.contains("HR onboarding"));

        let budget = doc.section("budget").expect("budget section");
        assert!(budget.body.contains("USD 250,000 approved for phase one"));
    }

    #[test]
    fn inline_budget_aside_keeps_user_scope() {
        let request = BrdRequest::new(
            "CRM System",
            RawInput {
                scope: "Included — lead scoring, campaign tracking and account management (USD 50k licence)\n\
                        Not included: payroll processing and HR onboarding"
                    .into(),
                objectives: "Increase qualified lead conversion by 20%".into(),
                ..RawInput::default()
            },
        );
        let doc = render_brd(&request).expect("brd");
        assert_eq!(doc.domain, DomainId::Crm);

        let scope = doc.section("scope").expect("scope section");
        assert!(scope.body.contains("campaign tracking and account management"));
        assert!(!scope.body.contains("Opportunity pipeline tracking"));
        assert!(!scope.body.contains("50k"));

        let epics = epics_body(&doc).to_lowercase();
        assert!(epics.contains("campaign"));
        assert!(!epics.contains("payroll"));
        assert!(!epics.contains("50k"));
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let first = render_brd(&crm_request()).expect("brd").to_html();
        let second = render_brd(&crm_request()).expect("brd").to_html();
        assert_eq!(first, second);
        assert_eq!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn empty_inputs_still_produce_every_entity() {
        let doc = render_brd(&BrdRequest::new("Portal", RawInput::default())).expect("brd");
        let html = doc.to_html();
        for marker in ["EPIC-1", "OBJ-1", "KPI-1", "RISK-1", "V-001"] {
            assert!(html.contains(marker), "missing {marker}");
        }
        assert_eq!(doc.domain, DomainId::Generic);
    }

    #[test]
    fn requirements_never_become_epics() {
        let request = BrdRequest::new(
            "Field Portal",
            RawInput {
                brief_requirements: "Users must be able to export quarterly summaries to PDF".into(),
                ..RawInput::default()
            },
        );
        let doc = render_brd(&request).expect("brd");
        let epics = epics_body(&doc);
        assert!(epics.contains(DEFAULT_OBJECTIVE_EPIC));
        assert!(!epics.contains("PDF"));

        let requirements = doc.section("business-requirements").expect("section");
        assert!(requirements.body.contains("PDF"));
    }

    #[test]
    fn budget_figure_is_found_when_budget_is_blank() {
        let request = BrdRequest::new(
            "Clinic Scheduling",
            RawInput {
                scope: "Patient appointment booking; rollout costs roughly USD 120,000".into(),
                ..RawInput::default()
            },
        );
        let doc = render_brd(&request).expect("brd");
        let budget = doc.section("budget").expect("budget section");
        assert!(budget.body.contains("Estimated budget: USD 120,000"));
        assert!(!epics_body(&doc).contains("120,000"));
    }

    #[test]
    fn blank_project_is_an_input_error() {
        let err = render_brd(&BrdRequest::new("   ", RawInput::default())).expect_err("blank");
        assert!(matches!(err, ReqDraftError::Input { .. }));
        assert!(matches!(
            render_frd("", "<p></p>", 1),
            Err(ReqDraftError::Input { .. })
        ));
        assert!(matches!(
            render_wireframes("", &[], None),
            Err(ReqDraftError::Input { .. })
        ));
    }

    #[test]
    fn frd_follows_brd_epics() {
        let brd = render_brd(&crm_request()).expect("brd").to_html();
        let frd = render_frd("CRM System", &brd, 1).expect("frd");
        let html = frd.to_html();
        assert!(html.contains("FR-001"));
        assert!(html.contains("US-001"));
        assert!(html.contains("EPIC-1"));
        assert_eq!(frd.domain, DomainId::Crm);
    }

    #[test]
    fn frd_from_empty_brd_uses_default_epics() {
        let frd = render_frd("Portal", "", 2).expect("frd");
        let html = frd.to_html();
        assert!(html.contains("FR-001"));
        assert!(html.contains(DEFAULT_OBJECTIVE_EPIC));
        assert!(html.contains("Version 2"));
    }

    #[test]
    fn wireframe_domain_resolution() {
        let stories = [UserStory {
            id: "US-001".into(),
            title: "Patient intake".into(),
            description: "As a nurse, I want to register a patient at the clinic.".into(),
            acceptance_criteria: Vec::new(),
        }];
        assert_eq!(
            render_wireframes("Intake", &stories, Some("logistics")).expect("doc").domain,
            DomainId::Logistics
        );
        assert_eq!(
            render_wireframes("Intake", &stories, Some("astrology")).expect("doc").domain,
            DomainId::Healthcare
        );
        assert_eq!(
            render_wireframes("Intake", &stories, None).expect("doc").domain,
            DomainId::Healthcare
        );
    }

    #[tokio::test]
    async fn disabled_ai_uses_fallback() {
        let generated = generate_brd(&crm_request(), &Orchestrator::disabled(), &SilentProgress)
            .await
            .expect("brd");
        assert_eq!(generated.source, GenerationSource::Fallback);
        assert_eq!(generated.html, render_brd(&crm_request()).expect("brd").to_html());
        assert_eq!(generated.fingerprint, fingerprint(&generated.html));
    }

    #[tokio::test]
    async fn accepted_ai_document_is_returned() {
        let html = "<section><p>EPIC-1 OBJ-1 KPI-1 RISK-1 V-001</p></section>";
        let orchestrator = Orchestrator::with_provider(Arc::new(Fixed(html)), 1, Duration::from_secs(1));
        let generated = generate_brd(&crm_request(), &orchestrator, &SilentProgress)
            .await
            .expect("brd");
        assert_eq!(generated.source, GenerationSource::Ai);
        assert!(generated.html.contains(html));
        assert!(generated.html.contains("<h1>CRM System: Business Requirements Document</h1>"));
        assert!(generated.html.contains("Version 1 | Domain: CRM &amp; Marketing"));
    }

    #[tokio::test]
    async fn ai_brd_quoting_the_budget_falls_back() {
        let html = "<section><p>EPIC-1: USD 250,000 approved for phase one</p>\
                    <p>OBJ-1 KPI-1 RISK-1 V-001</p></section>";
        let orchestrator = Orchestrator::with_provider(Arc::new(Fixed(html)), 2, Duration::from_secs(1));
        let generated = generate_brd(&crm_request(), &orchestrator, &SilentProgress)
            .await
            .expect("brd");
        assert_eq!(generated.source, GenerationSource::Fallback);
        assert!(!generated.html.contains("EPIC-1: USD"));
    }

    #[test]
    fn budget_check_passes_clean_epics() {
        let clean = "<div class=\"epic\" data-epic-id=\"EPIC-1\"><h3>EPIC-1: Lead Capture</h3>\
                     <ul class=\"epic-capabilities\"><li>Score web leads</li></ul></div>";
        assert!(check_ai_brd(clean, "USD 250,000 approved for phase one").is_ok());

        let leaky = "<div class=\"epic\" data-epic-id=\"EPIC-1\"><h3>EPIC-1: Lead Capture</h3>\
                     <ul class=\"epic-capabilities\"><li>Phase one approved for USD 250,000</li></ul></div>";
        assert!(check_ai_brd(leaky, "USD 250,000 approved for phase one").is_err());
    }

    #[tokio::test]
    async fn malformed_ai_answer_falls_back() {
        let orchestrator =
            Orchestrator::with_provider(Arc::new(Fixed("no markup here")), 2, Duration::from_secs(1));
        let generated = generate_frd_from_brd("CRM System", "", 1, &orchestrator, &SilentProgress)
            .await
            .expect("frd");
        assert_eq!(generated.source, GenerationSource::Fallback);
        assert!(generated.html.contains("FR-001"));
    }

    #[tokio::test]
    async fn wireframes_fall_back_without_ai() {
        let generated = generate_wireframes("Shop", &[], Some("ecommerce"), &Orchestrator::disabled(), &SilentProgress)
            .await
            .expect("wireframes");
        assert_eq!(generated.domain, DomainId::Ecommerce);
        assert!(generated.html.contains("Login"));
        assert!(generated.html.contains("Dashboard"));
    }

    #[test]
    fn frd_stories_drive_wireframes() {
        let brd = render_brd(&crm_request()).expect("brd").to_html();
        let frd = render_frd("CRM System", &brd, 1).expect("frd").to_html();
        let doc = render_wireframes_from_frd("CRM System", &frd, None).expect("wireframes");
        assert_eq!(doc.domain, DomainId::Crm);
        assert!(doc.to_html().contains("from US-001"));

        let forced = render_wireframes_from_frd("CRM System", &frd, Some("ecommerce")).expect("wireframes");
        assert_eq!(forced.domain, DomainId::Ecommerce);
    }

    #[test]
    fn frd_without_stories_is_a_parse_error() {
        assert!(matches!(
            render_wireframes_from_frd("CRM System", "<p>Minutes of the kickoff call.</p>", None),
            Err(ReqDraftError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn frd_wireframes_fall_back_without_ai() {
        let frd = "<div class=\"user-story\" data-us-id=\"US-001\"><h3>US-001: Course Enrolment</h3>\
                   <p>As a student, I want to register for a course.</p></div>";
        let generated = generate_wireframes_from_frd("Campus", frd, Some("education"), &Orchestrator::disabled(), &SilentProgress)
            .await
            .expect("wireframes");
        assert_eq!(generated.source, GenerationSource::Fallback);
        assert_eq!(generated.domain, DomainId::Education);
        assert!(generated.html.contains("from US-001"));
    }

    #[tokio::test]
    async fn blank_project_fails_before_ai() {
        let err = generate_brd(&BrdRequest::new("", RawInput::default()), &Orchestrator::disabled(), &SilentProgress)
            .await
            .expect_err("blank");
        assert!(matches!(err, ReqDraftError::Input { .. }));
    }
}
