//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;

use reqdraft_core::{
    BrdRequest, Generated, Orchestrator, ProgressReporter, generate_brd, generate_frd_from_brd,
    generate_wireframes, generate_wireframes_from_frd, write_output,
};
use reqdraft_domain::{DomainRegistry, detect_domain};
use reqdraft_shared::{
    AiSettings, AppConfig, RawInput, UserStory, ValidationMode, init_config, load_config,
    read_api_key,
};
use reqdraft_text::html_to_markdown;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// reqdraft: BRDs, FRDs and wireframes from stakeholder notes.
#[derive(Parser)]
#[command(
    name = "reqdraft",
    version,
    about = "Generate business and functional requirement documents and wireframes from free text.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Html,
    Md,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Md => "md",
        }
    }
}

/// How validation text is treated (overrides `defaults.validation_mode`).
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ValidationArg {
    Auto,
    User,
    Domain,
}

impl From<ValidationArg> for ValidationMode {
    fn from(arg: ValidationArg) -> Self {
        match arg {
            ValidationArg::Auto => Self::Auto,
            ValidationArg::User => Self::UserOnly,
            ValidationArg::Domain => Self::DomainDefaults,
        }
    }
}

/// Options shared by every generating command.
#[derive(clap::Args, Debug)]
pub(crate) struct OutputArgs {
    /// Output file (defaults to `<output_dir>/<project>-<kind>-v<N>.<ext>`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "html")]
    pub format: OutputFormat,

    /// Skip the AI service and render deterministically.
    #[arg(long)]
    pub no_ai: bool,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a Business Requirements Document.
    Brd {
        /// Project name.
        #[arg(short, long)]
        project: String,

        /// Input sections as TOML or JSON (scope, objectives, requirements, ...).
        #[arg(short, long)]
        input: PathBuf,

        /// Document version.
        #[arg(long, default_value_t = 1)]
        version: u32,

        /// Date printed in the header (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Validation handling.
        #[arg(long, value_enum)]
        validation: Option<ValidationArg>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Convert a BRD into a Functional Requirements Document.
    Frd {
        /// Project name.
        #[arg(short, long)]
        project: String,

        /// Previously generated BRD (HTML).
        #[arg(long)]
        brd: PathBuf,

        /// Document version.
        #[arg(long, default_value_t = 1)]
        version: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate wireframe pages from user stories.
    Wireframes {
        /// Project name.
        #[arg(short, long)]
        project: String,

        /// User stories as JSON (an array, or an object with `user_stories`).
        #[arg(short, long, required_unless_present = "frd", conflicts_with = "frd")]
        stories: Option<PathBuf>,

        /// FRD HTML to read the user stories from instead.
        #[arg(long)]
        frd: Option<PathBuf>,

        /// Domain name; detected from the stories when omitted.
        #[arg(short, long)]
        domain: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the detected domain and per-domain keyword scores.
    Detect {
        /// Input file (TOML, JSON or plain text).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "reqdraft=info",
        1 => "reqdraft=debug",
        _ => "reqdraft=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Brd {
            project,
            input,
            version,
            date,
            validation,
            output,
        } => cmd_brd(&project, &input, version, date, validation, &output).await,
        Command::Frd {
            project,
            brd,
            version,
            output,
        } => cmd_frd(&project, &brd, version, &output).await,
        Command::Wireframes {
            project,
            stories,
            frd,
            domain,
            output,
        } => {
            let source = match (stories, frd) {
                (_, Some(frd)) => StorySource::Frd(frd),
                (Some(stories), None) => StorySource::Json(stories),
                (None, None) => return Err(eyre!("either --stories or --frd is required")),
            };
            cmd_wireframes(&project, &source, domain.as_deref(), &output).await
        }
        Command::Detect { input } => cmd_detect(&input),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Input files
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("cannot read '{}'", path.display()))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Parse generation input: TOML or JSON keyed by section name.
fn parse_raw_input(path: &Path, content: &str) -> Result<RawInput> {
    let parsed = if has_extension(path, "toml") {
        RawInput::from_toml_str(content)
    } else {
        RawInput::from_json_str(content)
    };
    parsed.wrap_err_with(|| format!("cannot read input sections from '{}'", path.display()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoriesFile {
    List(Vec<UserStory>),
    Wrapped {
        #[serde(alias = "userStories", alias = "stories")]
        user_stories: Vec<UserStory>,
    },
}

fn parse_stories(content: &str) -> Result<Vec<UserStory>> {
    let parsed: StoriesFile =
        serde_json::from_str(content).map_err(|e| eyre!("invalid user stories JSON: {e}"))?;
    Ok(match parsed {
        StoriesFile::List(stories) => stories,
        StoriesFile::Wrapped { user_stories } => user_stories,
    })
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Lowercase, dash-separated file stem for a project name.
fn slug(project: &str) -> String {
    let mut out = String::new();
    for ch in project.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

fn default_output_path(config: &AppConfig, project: &str, kind: &str, version: u32, format: OutputFormat) -> PathBuf {
    PathBuf::from(&config.defaults.output_dir).join(format!(
        "{}-{kind}-v{version}.{}",
        slug(project),
        format.extension()
    ))
}

fn orchestrator_for(config: &AppConfig, no_ai: bool) -> Result<Orchestrator> {
    if no_ai {
        return Ok(Orchestrator::disabled());
    }
    let settings = AiSettings::from_config(&config.ai, read_api_key(config))?;
    Ok(Orchestrator::from_settings(&settings))
}

fn emit(generated: &Generated, path: &Path, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Html => generated.html.clone(),
        OutputFormat::Md => html_to_markdown(&generated.html)?,
    };
    let meta = write_output(path, &content)?;

    println!();
    println!("  Document written!");
    println!("  Path:        {}", meta.path.display());
    println!("  Domain:      {}", generated.domain.label());
    println!("  Source:      {}", generated.source.as_str());
    println!("  Size:        {} bytes", meta.size_bytes);
    println!("  Fingerprint: {}", generated.fingerprint);
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_brd(
    project: &str,
    input: &Path,
    version: u32,
    date: Option<NaiveDate>,
    validation: Option<ValidationArg>,
    output: &OutputArgs,
) -> Result<()> {
    let config = load_config()?;
    let inputs = parse_raw_input(input, &read_file(input)?)?;

    let request = BrdRequest {
        project: project.to_string(),
        inputs,
        version,
        date,
        validation_mode: validation
            .map(ValidationMode::from)
            .unwrap_or(config.defaults.validation_mode),
    };
    let orchestrator = orchestrator_for(&config, output.no_ai)?;

    info!(project, version, ai = orchestrator.is_enabled(), "generating BRD");
    let reporter = CliProgress::new();
    let generated = generate_brd(&request, &orchestrator, &reporter).await?;

    let path = output
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&config, project, "brd", version, output.format));
    emit(&generated, &path, output.format)
}

async fn cmd_frd(project: &str, brd: &Path, version: u32, output: &OutputArgs) -> Result<()> {
    let config = load_config()?;
    let brd_html = read_file(brd)?;
    let orchestrator = orchestrator_for(&config, output.no_ai)?;

    info!(project, version, brd = %brd.display(), "generating FRD");
    let reporter = CliProgress::new();
    let generated = generate_frd_from_brd(project, &brd_html, version, &orchestrator, &reporter).await?;

    let path = output
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&config, project, "frd", version, output.format));
    emit(&generated, &path, output.format)
}

/// Where `wireframes` reads its user stories from.
enum StorySource {
    Json(PathBuf),
    Frd(PathBuf),
}

async fn cmd_wireframes(
    project: &str,
    source: &StorySource,
    domain: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let config = load_config()?;
    let orchestrator = orchestrator_for(&config, output.no_ai)?;
    let reporter = CliProgress::new();

    let generated = match source {
        StorySource::Json(path) => {
            let stories = parse_stories(&read_file(path)?)?;
            info!(project, stories = stories.len(), "generating wireframes");
            generate_wireframes(project, &stories, domain, &orchestrator, &reporter).await?
        }
        StorySource::Frd(path) => {
            let frd_html = read_file(path)?;
            info!(project, frd = %path.display(), "generating wireframes from FRD");
            generate_wireframes_from_frd(project, &frd_html, domain, &orchestrator, &reporter).await?
        }
    };

    let path = output
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&config, project, "wireframes", 1, output.format));
    emit(&generated, &path, output.format)
}

fn cmd_detect(input: &Path) -> Result<()> {
    let content = read_file(input)?;
    let registry = DomainRegistry::global();
    let (detected, text) = if has_extension(input, "toml") || has_extension(input, "json") {
        let raw = parse_raw_input(input, &content)?;
        (detect_domain(&raw), raw.combined_text())
    } else {
        (registry.classify(&content), content)
    };

    println!("Detected domain: {} ({})", detected.label(), detected.as_str());
    let mut scores = registry.scores(&text);
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    for score in scores.iter().filter(|s| s.score > 0) {
        println!(
            "  {:<12} {:>4}  {}",
            score.domain.as_str(),
            score.score,
            score.hits.join(", ")
        );
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _generated: &Generated) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_project_names() {
        assert_eq!(slug("CRM System"), "crm-system");
        assert_eq!(slug("  R&D: Lab 2 "), "r-d-lab-2");
        assert_eq!(slug("***"), "document");
    }

    #[test]
    fn parses_toml_and_json_inputs() {
        let toml_input = parse_raw_input(
            Path::new("in.toml"),
            "scope = \"Lead management\"\nrequirements = \"Export to CSV\"\n",
        )
        .expect("toml");
        assert_eq!(toml_input.scope, "Lead management");
        assert_eq!(toml_input.brief_requirements, "Export to CSV");

        let json_input = parse_raw_input(
            Path::new("in.json"),
            r#"{"objectives": "Grow revenue", "briefRequirements": "Audit trail"}"#,
        )
        .expect("json");
        assert_eq!(json_input.objectives, "Grow revenue");
        assert_eq!(json_input.brief_requirements, "Audit trail");
    }

    #[test]
    fn wireframes_take_stories_or_frd() {
        let cli = Cli::try_parse_from(["reqdraft", "wireframes", "-p", "Shop", "--frd", "frd.html"])
            .expect("frd only");
        assert!(matches!(
            cli.command,
            Command::Wireframes { stories: None, frd: Some(_), .. }
        ));
        assert!(Cli::try_parse_from(["reqdraft", "wireframes", "-p", "Shop", "-s", "s.json"]).is_ok());
        assert!(Cli::try_parse_from(["reqdraft", "wireframes", "-p", "Shop"]).is_err());
        assert!(
            Cli::try_parse_from(["reqdraft", "wireframes", "-p", "Shop", "-s", "s.json", "--frd", "f.html"]).is_err()
        );
    }

    #[test]
    fn parses_story_files() {
        let list = parse_stories(r#"[{"id": "US-001", "title": "Browse courses"}]"#).expect("list");
        assert_eq!(list.len(), 1);

        let wrapped = parse_stories(
            r#"{"userStories": [{"id": "US-002", "title": "Add lead", "acceptanceCriteria": ["Saved"]}]}"#,
        )
        .expect("wrapped");
        assert_eq!(wrapped[0].acceptance_criteria, vec!["Saved".to_string()]);
    }

    #[test]
    fn default_path_uses_output_dir() {
        let config = AppConfig::default();
        let path = default_output_path(&config, "CRM System", "brd", 2, OutputFormat::Md);
        assert_eq!(path, PathBuf::from("reqdraft-out/crm-system-brd-v2.md"));
    }
}
