//! Funnel generation: orchestrates one request against the model.
//!
//! Blocking flow:  build prompt → schema-constrained call → extract span →
//!                 parse → validate.
//! Streaming flow: build prompt (schema inline) → open stream → forward each
//!                 fragment to the sink while accumulating → parse → validate.

use futures::Stream;
use tracing::{error, info};

use crate::generation::error::GenerationError;
use crate::generation::models::{FunnelDocument, FunnelFormState};
use crate::generation::prompts::{build_funnel_prompt, build_streaming_prompt};
use crate::generation::response::{decode_blocking_response, decode_streamed_response};
use crate::generation::schema::funnel_response_schema;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError, TextStream};
use crate::stream::reassemble;

/// Runs a blocking generation and returns the validated document.
pub async fn generate_funnel(
    llm: &LlmClient,
    form: &FunnelFormState,
) -> Result<FunnelDocument, GenerationError> {
    let prompt = build_funnel_prompt(form);
    let schema = funnel_response_schema();

    let raw = llm.generate(&prompt, JSON_ONLY_SYSTEM, &schema).await?;
    info!("Model returned {} bytes", raw.len());

    decode_blocking_response(&raw).map_err(log_rejected_output)
}

/// Opens the streaming call. Credential, connection and status failures
/// surface here, before any fragment has been forwarded.
pub async fn open_funnel_stream(
    llm: &LlmClient,
    form: &FunnelFormState,
) -> Result<TextStream, GenerationError> {
    let prompt = build_streaming_prompt(form);
    Ok(llm.stream(&prompt, JSON_ONLY_SYSTEM).await?)
}

/// Drains an open stream, forwarding every fragment to `sink` as it
/// arrives, then parses the accumulated text once.
pub async fn reassemble_funnel<S, F>(
    fragments: S,
    sink: F,
) -> Result<FunnelDocument, GenerationError>
where
    S: Stream<Item = Result<String, LlmError>>,
    F: FnMut(&str),
{
    let text = reassemble(fragments, sink).await?;
    info!("Stream finished with {} bytes", text.len());

    decode_streamed_response(&text).map_err(log_rejected_output)
}

/// Logs the raw model output behind a decode/parse failure. The output
/// itself never reaches the client.
fn log_rejected_output(err: GenerationError) -> GenerationError {
    match &err {
        GenerationError::Decode { raw } => {
            error!("Model response did not contain a JSON object. Response: {raw}");
        }
        GenerationError::Parse { detail, raw } => {
            error!("Failed to parse JSON from model ({detail}). Raw text: {raw}");
        }
        GenerationError::Validation { detail } => {
            error!("Model output failed validation: {detail}");
        }
        _ => {}
    }
    err
}
