//! Server Configuration
//!
//! Read from the environment (after `.env` is loaded) with defaults for
//! everything but the text-generation endpoint.

use std::path::PathBuf;

use agent_core::GenerationOptions;
use agent_runtime::OpenAiConfig;
use thiserror::Error;
use wallet_analytics::trend::{Window, DEFAULT_WINDOWS};

#[derive(Error, Debug)]
#[error("invalid {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    reason: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// JSON array of wallet records loaded at startup
    pub wallet_data_path: PathBuf,

    /// Directory that receives report artifacts
    pub report_dir: PathBuf,

    /// Lookback windows in days
    pub trend_windows: Vec<u32>,

    /// `None` when no text-generation endpoint is configured
    pub llm: Option<OpenAiConfig>,

    pub generation: GenerationOptions,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let trend_windows = match lookup("TREND_WINDOWS") {
            Some(raw) => parse_windows(&raw)?,
            None => DEFAULT_WINDOWS.to_vec(),
        };

        let defaults = GenerationOptions::default();
        let generation = GenerationOptions {
            model: lookup("LLM_MODEL").unwrap_or(defaults.model),
            temperature: parse_or("LLM_TEMPERATURE", &lookup, defaults.temperature)?,
            top_p: parse_or("LLM_TOP_P", &lookup, defaults.top_p)?,
            max_tokens: parse_or("LLM_MAX_TOKENS", &lookup, defaults.max_tokens)?,
            json_response: true,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            wallet_data_path: lookup("WALLET_DATA_PATH")
                .unwrap_or_else(|| "data/wallets.json".into())
                .into(),
            report_dir: lookup("REPORT_DIR").unwrap_or_else(|| "reports".into()).into(),
            trend_windows,
            llm: OpenAiConfig::from_lookup(&lookup).map_err(|e| ConfigError {
                key: "LLM_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            generation,
        })
    }
}

fn parse_windows(raw: &str) -> Result<Vec<u32>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Window>().map(Window::as_days).map_err(|e| ConfigError {
                key: "TREND_WINDOWS",
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_or<T>(key: &'static str, lookup: impl Fn(&str) -> Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}
