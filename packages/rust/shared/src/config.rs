//! Application configuration for reqdraft.
//!
//! User config lives at `~/.reqdraft/reqdraft.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ReqDraftError, Result};
use crate::types::ValidationMode;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "reqdraft.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".reqdraft";

/// Upper bound on AI retries. One retry, then the deterministic path.
pub const MAX_AI_RETRIES: u32 = 1;

// ---------------------------------------------------------------------------
// Config structs (matching reqdraft.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Generative completion service settings.
    #[serde(default)]
    pub ai: AiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory generated documents are written to when `--out` is omitted.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// How user-supplied validation text is treated.
    #[serde(default)]
    pub validation_mode: ValidationMode,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            validation_mode: ValidationMode::default(),
        }
    }
}

fn default_output_dir() -> String {
    "reqdraft-out".into()
}

/// `[ai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Try the completion service before the deterministic pipeline.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// OpenAI-compatible API base (the `/chat/completions` path is appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt. Clamped to [`MAX_AI_RETRIES`].
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token ceiling.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    1
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    4000
}

// ---------------------------------------------------------------------------
// AI settings (runtime, merged from config + CLI flags + resolved key)
// ---------------------------------------------------------------------------

/// Runtime settings for the completion service.
///
/// Built once at the edge of the program and handed to the orchestrator;
/// nothing below this struct reads the process environment.
#[derive(Debug, Clone)]
pub struct AiSettings {
    /// Whether an AI attempt should be made at all.
    pub enabled: bool,
    /// Fully resolved `/chat/completions` endpoint. `None` for
    /// [`AiSettings::disabled`].
    pub endpoint: Option<Url>,
    /// Model identifier.
    pub model: String,
    /// Bearer token, if one was resolved.
    pub api_key: Option<Secret<String>>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries after the first attempt (0 or 1).
    pub max_retries: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token ceiling.
    pub max_tokens: u32,
}

impl AiSettings {
    /// Merge the `[ai]` section with an already-resolved API key.
    pub fn from_config(config: &AiConfig, api_key: Option<String>) -> Result<Self> {
        let endpoint = completions_endpoint(&config.base_url)?;

        Ok(Self {
            enabled: config.enabled,
            endpoint: Some(endpoint),
            model: config.model.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(Secret::new),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            max_retries: config.max_retries.min(MAX_AI_RETRIES),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Settings that never attempt a completion.
    pub fn disabled() -> Self {
        let config = AiConfig {
            enabled: false,
            ..AiConfig::default()
        };
        Self {
            enabled: false,
            endpoint: None,
            model: config.model,
            api_key: None,
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: 0,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Total number of attempts the orchestrator may make.
    pub fn attempts(&self) -> u32 {
        1 + self.max_retries.min(MAX_AI_RETRIES)
    }
}

/// Append `chat/completions` to an API base URL.
fn completions_endpoint(base: &str) -> Result<Url> {
    let trimmed = base.trim().trim_end_matches('/');
    let joined = format!("{trimmed}/chat/completions");
    Url::parse(&joined)
        .map_err(|e| ReqDraftError::config(format!("invalid ai.base_url '{base}': {e}")))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.reqdraft/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ReqDraftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.reqdraft/reqdraft.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ReqDraftError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ReqDraftError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ReqDraftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ReqDraftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ReqDraftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API key named by `ai.api_key_env`. Empty values count as missing.
pub fn read_api_key(config: &AppConfig) -> Option<String> {
    let var_name = &config.ai.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => {
            tracing::debug!(var = %var_name, "no API key in environment");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("OPENAI_API_KEY"));
        assert!(toml_str.contains("validation_mode = \"auto\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.ai.timeout_secs, 30);
        assert_eq!(parsed.ai.max_retries, 1);
        assert_eq!(parsed.defaults.validation_mode, ValidationMode::Auto);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[ai]
enabled = false
model = "local-model"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.model, "local-model");
        assert_eq!(config.ai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.defaults.output_dir, "reqdraft-out");
    }

    #[test]
    fn validation_mode_parses_from_toml() {
        let toml_str = r#"
[defaults]
validation_mode = "domain"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.validation_mode, ValidationMode::DomainDefaults);
    }

    #[test]
    fn settings_clamp_retries_and_join_endpoint() {
        let config = AiConfig {
            base_url: "http://localhost:8080/v1/".into(),
            max_retries: 5,
            ..AiConfig::default()
        };
        let settings = AiSettings::from_config(&config, Some("sk-test".into())).expect("settings");
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.attempts(), 2);
        assert_eq!(
            settings.endpoint.as_ref().map(Url::as_str),
            Some("http://localhost:8080/v1/chat/completions")
        );
        assert_eq!(
            settings.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
    }

    #[test]
    fn disabled_settings_have_no_endpoint() {
        let settings = AiSettings::disabled();
        assert!(!settings.enabled);
        assert!(settings.endpoint.is_none());
        assert_eq!(settings.attempts(), 1);
    }

    #[test]
    fn settings_drop_blank_key() {
        let settings =
            AiSettings::from_config(&AiConfig::default(), Some("   ".into())).expect("settings");
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn settings_reject_bad_base_url() {
        let config = AiConfig {
            base_url: "not a url".into(),
            ..AiConfig::default()
        };
        let err = AiSettings::from_config(&config, None).expect_err("bad url");
        assert!(err.to_string().contains("ai.base_url"));
    }

    #[test]
    fn disabled_settings_make_one_attempt_at_most() {
        let settings = AiSettings::disabled();
        assert!(!settings.enabled);
        assert_eq!(settings.attempts(), 1);
    }

    #[test]
    fn missing_api_key_env_is_none() {
        let mut config = AppConfig::default();
        config.ai.api_key_env = "REQDRAFT_TEST_KEY_THAT_IS_NEVER_SET".into();
        assert!(read_api_key(&config).is_none());
    }
}
