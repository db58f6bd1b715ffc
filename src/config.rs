//! Configuration loaded from environment variables.

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Mimir, a warm and concise assistant that helps people \
find mental health support. When the user describes what they are looking for, use the \
search_therapists tool if it is available and summarize the matches in plain language.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Origins allowed by the cross-origin policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Bearer token for the completion provider
    pub api_key: String,
    /// OpenAI-compatible base URL, without the `/chat/completions` suffix
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub llm_timeout: Duration,
    pub max_tool_rounds: usize,
    /// JSON file of therapist profiles; enables the search tool when set
    pub directory_path: Option<PathBuf>,
    pub cors_origins: AllowedOrigins,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let api_key = var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let timeout_secs = parse_number(var("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS", 60)?;
        let max_tool_rounds = parse_number(var("MAX_TOOL_ROUNDS"), "MAX_TOOL_ROUNDS", 3)?;

        Ok(Self {
            bind_addr,
            api_key,
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: var("SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            llm_timeout: Duration::from_secs(timeout_secs),
            max_tool_rounds: max_tool_rounds as usize,
            directory_path: var("THERAPIST_DIRECTORY_PATH").map(PathBuf::from),
            cors_origins: parse_origins(var("CORS_ALLOW_ORIGIN").as_deref()),
        })
    }
}

fn parse_number(raw: Option<String>, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed: Result<u64, _> = value.trim().parse();
            parsed.map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn parse_origins(raw: Option<&str>) -> AllowedOrigins {
    let origins: Vec<String> = raw
        .unwrap_or("*")
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowedOrigins::Any
    } else {
        AllowedOrigins::List(origins)
    }
}
