use thiserror::Error;

use crate::llm_client::{LlmError, MISSING_CREDENTIAL_MESSAGE};

pub const UPSTREAM_FALLBACK_MESSAGE: &str =
    "Could not generate funnel. The model may have returned an unexpected response.";

/// Everything that can go wrong between the form and a validated document.
///
/// `Display` is the user-visible message. Raw model output is kept for
/// logging only and never rendered.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No model credential configured; raised before any network call.
    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    Configuration,

    /// Backend unreachable, non-success status or broken stream.
    #[error("{}", upstream_message(.0))]
    Upstream(String),

    /// No `{...}` span in the model's text.
    #[error("Failed to generate valid funnel structure. The model's response was not in the expected format.")]
    Decode { raw: String },

    /// The candidate text is not valid JSON.
    #[error("The model returned a malformed structure. Details: {detail}")]
    Parse { detail: String, raw: String },

    /// Valid JSON, but `meta` or `layout` (or their shape) is missing.
    #[error("Received invalid data structure from API. Required fields are missing.")]
    Validation { detail: String },
}

fn upstream_message(message: &str) -> &str {
    if message.trim().is_empty() {
        UPSTREAM_FALLBACK_MESSAGE
    } else {
        message
    }
}

impl GenerationError {
    /// Short machine-readable kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Configuration => "configuration",
            GenerationError::Upstream(_) => "upstream",
            GenerationError::Decode { .. } => "decode",
            GenerationError::Parse { .. } => "parse",
            GenerationError::Validation { .. } => "validation",
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => GenerationError::Configuration,
            LlmError::Api { message, .. } => GenerationError::Upstream(message),
            LlmError::EmptyContent => GenerationError::Upstream(String::new()),
            other => GenerationError::Upstream(other.to_string()),
        }
    }
}
