//! AI orchestrator.
//!
//! Asks an OpenAI-compatible completion service for a whole document and
//! accepts the answer only if it is HTML carrying the document's required ID
//! markers. Every failure (transport, status, timeout, malformed or
//! unacceptable output) is logged and absorbed; the caller then renders the
//! deterministic document instead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use reqdraft_shared::{
    AiSettings, DomainId, MAX_AI_RETRIES, RawInput, ReqDraftError, Result, Section, UserStory,
};
use reqdraft_text::{looks_like_html, strip_code_fences, truncate_words};

/// BRD text handed to the FRD prompt is cut to this many characters.
const MAX_PROMPT_SOURCE_CHARS: usize = 12_000;

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// A system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Something that turns a prompt into completion text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Return the raw completion text. Errors are [`ReqDraftError::Upstream`].
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible provider
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Provider for any `/chat/completions` endpoint speaking the OpenAI schema.
pub struct OpenAiCompatProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<Secret<String>>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatProvider {
    pub fn new(settings: &AiSettings) -> Result<Self> {
        let endpoint = settings
            .endpoint
            .as_ref()
            .ok_or_else(|| ReqDraftError::config("no completion endpoint configured"))?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ReqDraftError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ReqDraftError::upstream("request timed out")
            } else if e.is_connect() {
                ReqDraftError::upstream(format!("connection failed: {e}"))
            } else {
                ReqDraftError::upstream(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = truncate_words(&detail, 200);
            return Err(match status.as_u16() {
                401 | 403 => ReqDraftError::upstream(format!("authentication rejected ({status})")),
                429 => ReqDraftError::upstream(format!("rate limited: {detail}")),
                500..=599 => ReqDraftError::upstream(format!("server error {status}: {detail}")),
                _ => ReqDraftError::upstream(format!("unexpected status {status}: {detail}")),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReqDraftError::upstream(format!("malformed response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ReqDraftError::upstream("response carried no completion text"))
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Check a completion before it may replace the deterministic document.
///
/// Code fences are stripped; the rest must contain HTML and every marker.
pub fn accept_response(raw: &str, required_markers: &[&str]) -> Result<String> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ReqDraftError::upstream("empty completion"));
    }
    if !looks_like_html(&cleaned) {
        return Err(ReqDraftError::upstream("completion is not HTML"));
    }
    let missing: Vec<&str> = required_markers
        .iter()
        .copied()
        .filter(|m| !cleaned.contains(m))
        .collect();
    if !missing.is_empty() {
        return Err(ReqDraftError::upstream(format!(
            "completion lacks required markers: {}",
            missing.join(", ")
        )));
    }
    Ok(cleaned)
}

/// Runs at most `attempts` completions, each under a timeout.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Option<Arc<dyn CompletionProvider>>,
    attempts: u32,
    timeout: Duration,
}

impl Orchestrator {
    /// An orchestrator that never calls out.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            attempts: 0,
            timeout: Duration::ZERO,
        }
    }

    /// Build from resolved settings. A disabled config or an HTTP client
    /// that cannot be built yields [`Orchestrator::disabled`].
    pub fn from_settings(settings: &AiSettings) -> Self {
        if !settings.enabled {
            debug!("AI generation disabled by configuration");
            return Self::disabled();
        }
        if settings.api_key.is_none() {
            debug!(
                endpoint = ?settings.endpoint.as_ref().map(|u| u.as_str()),
                "no API key; requests are sent unauthenticated"
            );
        }
        match OpenAiCompatProvider::new(settings) {
            Ok(provider) => Self::with_provider(Arc::new(provider), settings.attempts(), settings.timeout),
            Err(e) => {
                warn!(error = %e, "AI provider unavailable, using deterministic generation");
                Self::disabled()
            }
        }
    }

    pub fn with_provider(provider: Arc<dyn CompletionProvider>, attempts: u32, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            attempts: attempts.clamp(1, 1 + MAX_AI_RETRIES),
            timeout,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Try to obtain an acceptable document. `None` means "fall back".
    pub async fn generate(&self, prompt: &Prompt, required_markers: &[&str]) -> Option<String> {
        self.generate_checked(prompt, required_markers, |_| Ok(())).await
    }

    /// [`generate`](Self::generate) with an extra document check. An answer
    /// that fails `check` counts as a failed attempt.
    #[instrument(skip_all, fields(attempts = self.attempts))]
    pub async fn generate_checked<F>(&self, prompt: &Prompt, required_markers: &[&str], check: F) -> Option<String>
    where
        F: Fn(&str) -> Result<()> + Sync,
    {
        let provider = self.provider.as_ref()?;

        for attempt in 1..=self.attempts {
            let outcome = match tokio::time::timeout(self.timeout, provider.complete(prompt)).await {
                Ok(Ok(raw)) => accept_response(&raw, required_markers)
                    .and_then(|html| check(&html).map(|()| html)),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(ReqDraftError::upstream(format!(
                    "no answer within {}s",
                    self.timeout.as_secs_f32()
                ))),
            };

            match outcome {
                Ok(html) => {
                    info!(provider = provider.name(), attempt, "AI document accepted");
                    return Some(html);
                }
                Err(e) => {
                    warn!(provider = provider.name(), attempt, error = %e, "AI attempt failed");
                }
            }
        }

        warn!(provider = provider.name(), "falling back to deterministic generation");
        None
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

const SYSTEM_PROMPT: &str = "You are a senior business analyst. Answer with a single HTML fragment \
(no Markdown, no code fences, no <html> or <body> wrapper). Use <section>, <h2>, <h3>, <ul>, \
<table> and <p> only. Never invent budget figures.";

fn section_label(section: Section) -> &'static str {
    match section {
        Section::Scope => "Scope",
        Section::Objectives => "Objectives",
        Section::BriefRequirements => "Brief requirements",
        Section::Assumptions => "Assumptions",
        Section::Constraints => "Constraints",
        Section::Validations => "Validations",
        Section::Budget => "Budget",
    }
}

pub fn brd_prompt(project: &str, domain: DomainId, input: &RawInput) -> Prompt {
    let mut user = format!(
        "Write a Business Requirements Document for the project \"{project}\" in the {} domain.\n\
Sections in order: Executive Summary, Scope (In Scope, Out of Scope, Boundaries & Dependencies), \
Stakeholders, Business Objectives (OBJ-n), EPICs (EPIC-n with problem, value, capabilities, \
constraints and acceptance criteria), Business Requirements, KPIs, Risks (RISK-n), Assumptions, \
Constraints, Validation Rules (V-nnn), Budget.\n\
EPICs come only from objectives and in-scope items, never from requirements, budget or \
out-of-scope text.\n\n",
        domain.label()
    );
    for section in Section::ALL {
        let text = input.get(section).trim();
        if !text.is_empty() {
            user.push_str(&format!("## {}\n{text}\n\n", section_label(section)));
        }
    }
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn frd_prompt(project: &str, domain: DomainId, brd_text: &str) -> Prompt {
    let source = truncate_words(brd_text, MAX_PROMPT_SOURCE_CHARS);
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "Write a Functional Requirements Document for \"{project}\" ({} domain) from the BRD \
below. Give each EPIC its own functional requirement (FR-nnn) with acceptance criteria and \
field validations specific to that EPIC, a user story (US-nnn) per requirement, and a \
traceability table linking FR, US, EPIC and objective IDs.\n\nBRD:\n{source}",
            domain.label()
        ),
    }
}

pub fn wireframe_prompt(project: &str, domain: DomainId, stories: &[UserStory]) -> Prompt {
    let mut user = format!(
        "Produce static HTML wireframes for \"{project}\" ({} domain): a Login page, a Dashboard, \
then at most six more pages implied by the stories below. Wrap each page in \
<div class=\"wireframe-page\">.\n\n",
        domain.label()
    );
    for story in stories {
        user.push_str(&format!("- {}: {} {}\n", story.id, story.title, story.description));
    }
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use reqdraft_shared::AiConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Scripted {
        answers: Vec<Result<String>>,
        calls: AtomicU32,
        delay: Duration,
    }

    impl Scripted {
        fn new(answers: Vec<Result<String>>) -> Self {
            Self {
                answers,
                calls: AtomicU32::new(0),
                delay: Duration::ZERO,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _prompt: &Prompt) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.answers.get(n) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(e)) => Err(ReqDraftError::upstream(e.to_string())),
                None => Err(ReqDraftError::upstream("no scripted answer")),
            }
        }
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "s".into(),
            user: "u".into(),
        }
    }

    fn settings_for(server: &MockServer) -> AiSettings {
        let config = AiConfig {
            base_url: format!("{}/v1", server.uri()),
            timeout_secs: 2,
            ..AiConfig::default()
        };
        AiSettings::from_config(&config, Some("sk-test".into())).expect("settings")
    }

    #[test]
    fn accepts_fenced_html_with_markers() {
        let raw = "```html\n<section><h3>EPIC-1: Leads</h3><p>V-001</p></section>\n```";
        let html = accept_response(raw, &["EPIC-", "V-"]).expect("accepted");
        assert!(html.starts_with("<section>"));
    }

    #[test]
    fn rejects_plain_text_and_missing_markers() {
        assert!(accept_response("EPIC-1 only prose", &["EPIC-"]).is_err());
        let err = accept_response("<p>no ids</p>", &["FR-", "US-"]).expect_err("rejected");
        assert!(err.to_string().contains("FR-, US-"));
    }

    #[tokio::test]
    async fn disabled_orchestrator_never_answers() {
        let orchestrator = Orchestrator::disabled();
        assert!(!orchestrator.is_enabled());
        assert_eq!(orchestrator.generate(&prompt(), &[]).await, None);

        let off = Orchestrator::from_settings(&AiSettings::disabled());
        assert!(!off.is_enabled());
        assert!(OpenAiCompatProvider::new(&AiSettings::disabled()).is_err());
    }

    #[tokio::test]
    async fn retries_once_after_a_failure() {
        let provider = Arc::new(Scripted::new(vec![
            Err(ReqDraftError::upstream("boom")),
            Ok("<p>FR-001 US-001</p>".into()),
        ]));
        let orchestrator = Orchestrator::with_provider(provider.clone(), 2, Duration::from_secs(1));
        let html = orchestrator.generate(&prompt(), &["FR-", "US-"]).await;
        assert_eq!(html.as_deref(), Some("<p>FR-001 US-001</p>"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn unacceptable_answers_fall_back() {
        let provider = Arc::new(Scripted::new(vec![
            Ok("plain words".into()),
            Ok("<p>missing ids</p>".into()),
        ]));
        let orchestrator = Orchestrator::with_provider(provider.clone(), 2, Duration::from_secs(1));
        assert_eq!(orchestrator.generate(&prompt(), &["EPIC-"]).await, None);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failed_check_counts_as_an_attempt() {
        let provider = Arc::new(Scripted::new(vec![
            Ok("<p>EPIC-1: Budget USD 50k</p>".into()),
            Ok("<p>EPIC-1: Lead capture</p>".into()),
        ]));
        let orchestrator = Orchestrator::with_provider(provider.clone(), 2, Duration::from_secs(1));
        let html = orchestrator
            .generate_checked(&prompt(), &["EPIC-"], |html| {
                if html.contains("USD") {
                    Err(ReqDraftError::upstream("quotes money"))
                } else {
                    Ok(())
                }
            })
            .await;
        assert_eq!(html.as_deref(), Some("<p>EPIC-1: Lead capture</p>"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn attempts_are_capped_at_one_retry() {
        let provider = Arc::new(Scripted::new(Vec::new()));
        let orchestrator = Orchestrator::with_provider(provider.clone(), 5, Duration::from_secs(1));
        assert_eq!(orchestrator.generate(&prompt(), &["EPIC-"]).await, None);
        assert_eq!(provider.calls(), 1 + MAX_AI_RETRIES);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let mut scripted = Scripted::new(vec![Ok("<p>EPIC-1</p>".into())]);
        scripted.delay = Duration::from_millis(500);
        let orchestrator =
            Orchestrator::with_provider(Arc::new(scripted), 1, Duration::from_millis(20));
        assert_eq!(orchestrator.generate(&prompt(), &["EPIC-"]).await, None);
    }

    #[tokio::test]
    async fn provider_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "<p>EPIC-1</p>" } }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(&settings_for(&server)).expect("provider");
        let text = provider.complete(&prompt()).await.expect("completion");
        assert_eq!(text, "<p>EPIC-1</p>");
    }

    #[tokio::test]
    async fn provider_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(&settings_for(&server)).expect("provider");
        let err = provider.complete(&prompt()).await.expect_err("server error");
        assert!(err.is_upstream());
        assert!(err.to_string().contains("server error 500"));
    }

    #[tokio::test]
    async fn provider_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = OpenAiCompatProvider::new(&settings_for(&server)).expect("provider");
        let err = provider.complete(&prompt()).await.expect_err("malformed");
        assert!(err.to_string().contains("malformed"));
    }

    #[tokio::test]
    async fn orchestrator_falls_back_on_http_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({
                        "choices": [{ "message": { "content": "<p>EPIC-1</p>" } }]
                    })),
            )
            .mount(&server)
            .await;

        let mut settings = settings_for(&server);
        settings.timeout = Duration::from_millis(100);
        settings.max_retries = 0;
        let orchestrator = Orchestrator::from_settings(&settings);
        assert!(orchestrator.is_enabled());
        assert_eq!(orchestrator.generate(&prompt(), &["EPIC-"]).await, None);
    }

    #[test]
    fn brd_prompt_lists_only_supplied_sections() {
        let input = RawInput {
            scope: "Lead management".into(),
            ..RawInput::default()
        };
        let p = brd_prompt("Pipeline", DomainId::Crm, &input);
        assert!(p.user.contains("## Scope\nLead management"));
        assert!(!p.user.contains("## Budget"));
        assert!(p.user.contains("CRM & Marketing"));
    }
}
