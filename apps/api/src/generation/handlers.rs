//! Axum route handlers for the Generation API.

use std::io;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DeliveryMode;
use crate::errors::AppError;
use crate::generation::error::GenerationError;
use crate::generation::generator::{generate_funnel, open_funnel_stream, reassemble_funnel};
use crate::generation::models::{
    FunnelFormState, FunnelMode, DEFAULT_INDUSTRY, DEFAULT_TONE, INDUSTRY_OPTIONS, TONE_OPTIONS,
};
use crate::llm_client::LlmClient;
use crate::state::AppState;

const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const FORWARD_BUFFER: usize = 32;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FormDefaults {
    pub industry: &'static str,
    pub tone: &'static str,
    pub mode: FunnelMode,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub industries: &'static [&'static str],
    pub tones: &'static [&'static str],
    pub modes: [FunnelMode; 2],
    pub defaults: FormDefaults,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate
///
/// The credential is checked before the body so a misconfigured server
/// answers every request the same way. Blocking mode replies with the
/// validated document; streaming mode forwards raw model text as it arrives.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<FunnelFormState>, JsonRejection>,
) -> Result<Response, AppError> {
    state
        .llm
        .ensure_credential()
        .map_err(GenerationError::from)?;

    let Json(form) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    form.validate().map_err(AppError::BadRequest)?;

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        mode = %state.config.delivery_mode,
        industry = %form.industry,
        tone = %form.tone,
        funnel_mode = %form.mode,
        "Generating funnel"
    );

    match state.config.delivery_mode {
        DeliveryMode::Blocking => {
            let doc = generate_funnel(&state.llm, &form).await?;
            info!(%request_id, sections = doc.layout.len(), "Funnel generated");
            Ok(Json(doc).into_response())
        }
        DeliveryMode::Streaming => stream_funnel(&state.llm, &form, request_id).await,
    }
}

/// Any other method on /api/generate.
///
/// A server without a credential answers 500 whatever the method, matching
/// the POST path; otherwise 405.
pub async fn handle_generate_other_method(State(state): State<AppState>) -> AppError {
    match state.llm.ensure_credential() {
        Ok(_) => AppError::MethodNotAllowed,
        Err(e) => GenerationError::from(e).into(),
    }
}

/// GET /api/options
pub async fn handle_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        industries: INDUSTRY_OPTIONS,
        tones: TONE_OPTIONS,
        modes: FunnelMode::ALL,
        defaults: FormDefaults {
            industry: DEFAULT_INDUSTRY,
            tone: DEFAULT_TONE,
            mode: FunnelMode::Quick,
        },
    })
}

/// Opens the upstream stream, then tees it: a spawned task reassembles and
/// validates the text while every fragment is forwarded to the response body.
///
/// The body channel holds at most `FORWARD_BUFFER` fragments, so a slow
/// client slows the upstream read instead of growing memory.
///
/// Failures before the first fragment become a normal error response. A
/// failure mid-stream aborts the body. Once the body is complete the parse
/// outcome is only logged; the client parses the text itself.
async fn stream_funnel(
    llm: &LlmClient,
    form: &FunnelFormState,
    request_id: Uuid,
) -> Result<Response, AppError> {
    let fragments = open_funnel_stream(llm, form).await?;
    let (tx, rx) = mpsc::channel::<Result<Bytes, io::Error>>(FORWARD_BUFFER);

    tokio::spawn(async move {
        let body_tx = tx.clone();
        // Send errors mean the client went away; keep draining upstream.
        let forwarded = fragments.then(move |item| {
            let body_tx = body_tx.clone();
            async move {
                if let Ok(text) = &item {
                    let _ = body_tx.send(Ok(Bytes::from(text.clone()))).await;
                }
                item
            }
        });

        match reassemble_funnel(forwarded, |_| {}).await {
            Ok(doc) => info!(%request_id, sections = doc.layout.len(), "Streamed funnel validated"),
            Err(GenerationError::Upstream(message)) => {
                warn!(%request_id, "Stream broke off: {message}");
                let _ = tx.send(Err(io::Error::other(message))).await;
            }
            Err(e) => warn!(%request_id, kind = e.kind(), "Streamed funnel rejected: {e}"),
        }
    });

    let body = Body::from_stream(futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }));

    Ok(([(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)], body).into_response())
}
