//! Shared types, error model, and configuration for reqdraft.
//!
//! This crate is the foundation depended on by all other reqdraft crates.
//! It provides:
//! - [`ReqDraftError`]: the unified error type
//! - Domain types ([`RawInput`], [`Epic`], [`Objective`], [`Kpi`], [`Risk`], ...)
//! - Configuration ([`AppConfig`], [`AiSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AiConfig, AiSettings, AppConfig, DefaultsConfig, MAX_AI_RETRIES, config_dir,
    config_file_path, init_config, load_config, load_config_from, read_api_key,
};
pub use error::{ReqDraftError, Result};
pub use types::{
    DomainId, Epic, ExtractedItem, FunctionalRequirement, Kpi, Level, Objective, Provenance,
    RawInput, Risk, RuleSource, Section, UserStory, ValidationMode, ValidationRule,
};
