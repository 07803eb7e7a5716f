use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How `/api/generate` delivers the model's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One schema-constrained call; the validated document is returned as JSON.
    Blocking,
    /// Fragments are forwarded to the client as `text/plain` while they arrive.
    Streaming,
}

impl FromStr for DeliveryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocking" => Ok(DeliveryMode::Blocking),
            "streaming" => Ok(DeliveryMode::Streaming),
            other => Err(anyhow!(
                "GENERATION_MODE must be 'blocking' or 'streaming', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Blocking => f.write_str("blocking"),
            DeliveryMode::Streaming => f.write_str("streaming"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// `API_KEY` is optional here: a missing credential is reported
/// per request by the generation endpoint, not at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub delivery_mode: DeliveryMode,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("delivery_mode", &self.delivery_mode)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key: optional_env("API_KEY"),
            delivery_mode: optional_env("GENERATION_MODE")
                .map(|v| v.parse::<DeliveryMode>())
                .transpose()?
                .unwrap_or(DeliveryMode::Blocking),
            model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: optional_env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: parse_env("GEMINI_TEMPERATURE", 0.7)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 120)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
