//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use quiz_generator_core::{GenerationSettings, PromptPolicy};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub completion_model: String,
    pub completion_timeout: Duration,
    pub temperature: f32,
    pub questions_max_tokens: u32,
    pub questions_policy: PromptPolicy,
    pub deep_dive_policy: PromptPolicy,
    pub shuffle_deep_dive_choices: bool,
    pub cors_allowed_origin: HeaderValue,
    pub max_body_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address: SocketAddr = parse_or(&lookup, "BIND_ADDRESS", "0.0.0.0:3000".parse().ok())?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin: HeaderValue = parse_or(
            &lookup,
            "CORS_ALLOWED_ORIGIN",
            Some(HeaderValue::from_static("http://localhost:3000")),
        )?;
        let max_body_bytes: usize = parse_or(&lookup, "MAX_BODY_BYTES", Some(1024 * 1024))?;

        // --- Completion Service (API key stays optional; calls fail without it) ---
        let openai_api_key = lookup("OPEN_AI_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|key| !key.trim().is_empty());
        let openai_base_url = lookup("OPENAI_BASE_URL");
        let completion_model = lookup("COMPLETION_MODEL")
            .unwrap_or_else(|| "gpt-4o-mini-2024-07-18".to_string());
        let timeout_secs: u64 = parse_or(&lookup, "COMPLETION_TIMEOUT_SECS", Some(20))?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "COMPLETION_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let temperature: f32 = parse_or(&lookup, "COMPLETION_TEMPERATURE", Some(0.7))?;
        let questions_max_tokens: u32 = parse_or(&lookup, "QUESTIONS_MAX_TOKENS", Some(2000))?;

        // --- Generation Behaviour ---
        let questions_policy =
            parse_or(&lookup, "QUESTIONS_PROMPT_POLICY", Some(PromptPolicy::Curriculum))?;
        let deep_dive_policy =
            parse_or(&lookup, "DEEP_DIVE_PROMPT_POLICY", Some(PromptPolicy::Teacher))?;
        let shuffle_deep_dive_choices: bool =
            parse_or(&lookup, "SHUFFLE_DEEP_DIVE_CHOICES", Some(false))?;

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            openai_base_url,
            completion_model,
            completion_timeout: Duration::from_secs(timeout_secs),
            temperature,
            questions_max_tokens,
            questions_policy,
            deep_dive_policy,
            shuffle_deep_dive_choices,
            cors_allowed_origin,
            max_body_bytes,
        })
    }

    /// The subset of settings the core generator needs.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            questions_policy: self.questions_policy,
            deep_dive_policy: self.deep_dive_policy,
            completion_timeout: self.completion_timeout,
            temperature: self.temperature,
            questions_max_tokens: self.questions_max_tokens,
            shuffle_deep_dive_choices: self.shuffle_deep_dive_choices,
        }
    }
}

/// Parses `name` when set, otherwise falls back to `default`.
/// A missing variable without a default is an error.
fn parse_or<F, T>(lookup: &F, name: &str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => default.ok_or_else(|| ConfigError::MissingVar(name.to_string())),
    }
}
