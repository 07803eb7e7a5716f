//! Turning model text into a validated `FunnelDocument`.
//!
//! Three independent stages, each with its own failure kind:
//! span extraction (`Decode`), JSON parsing (`Parse`), field validation
//! (`Validation`).

use serde_json::Value;
use tracing::warn;

use super::error::GenerationError;
use super::models::FunnelDocument;

/// Fields whose absence makes a document unusable.
pub const REQUIRED_FIELDS: [&str; 2] = ["meta", "layout"];

/// Sections the schema requires but rendering can do without.
const SOFT_REQUIRED_FIELDS: [&str; 12] = [
    "hero",
    "social_proof",
    "benefits",
    "how_it_works",
    "offer",
    "bonus",
    "faq",
    "guarantee",
    "cta_block",
    "branding",
    "extras",
    "systeme_sections",
];

/// Finds the first balanced top-level `{...}` span.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count. Returns `None` when no opening brace is ever closed.
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

pub fn parse_json(text: &str) -> Result<Value, GenerationError> {
    serde_json::from_str(text).map_err(|e| GenerationError::Parse {
        detail: e.to_string(),
        raw: text.to_string(),
    })
}

/// Checks the required fields and converts to the typed document.
pub fn validate_document(value: Value) -> Result<FunnelDocument, GenerationError> {
    let object = value.as_object().ok_or_else(|| GenerationError::Validation {
        detail: "top-level value is not an object".to_string(),
    })?;

    let is_absent = |field: &str| object.get(field).map_or(true, Value::is_null);

    let missing: Vec<&str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| is_absent(*field))
        .collect();
    if !missing.is_empty() {
        return Err(GenerationError::Validation {
            detail: format!("missing required fields: {}", missing.join(", ")),
        });
    }

    let absent: Vec<&str> = SOFT_REQUIRED_FIELDS
        .into_iter()
        .filter(|field| is_absent(*field))
        .collect();
    if !absent.is_empty() {
        warn!(
            "Funnel document is missing sections, rendering them empty: {}",
            absent.join(", ")
        );
    }

    serde_json::from_value(value).map_err(|e| GenerationError::Validation {
        detail: e.to_string(),
    })
}

/// Blocking path: the text may wrap the JSON object in prose.
pub fn decode_blocking_response(raw: &str) -> Result<FunnelDocument, GenerationError> {
    let span = extract_json_span(raw).ok_or_else(|| GenerationError::Decode {
        raw: raw.to_string(),
    })?;
    validate_document(parse_json(span)?)
}

/// Streaming path: the accumulated text is parsed as a whole, once.
pub fn decode_streamed_response(text: &str) -> Result<FunnelDocument, GenerationError> {
    let value = parse_json(strip_json_fences(text)).map_err(|err| match err {
        GenerationError::Parse { detail, .. } => GenerationError::Parse {
            detail,
            raw: text.to_string(),
        },
        other => other,
    })?;
    validate_document(value)
}
