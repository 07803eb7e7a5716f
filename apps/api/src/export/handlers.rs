//! Axum route handlers for the export endpoints.
//!
//! All of them take a `FunnelDocument` as the request body, so a client can
//! export whatever it previously received from `/api/generate`.

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::{build_full_page_html, build_full_page_snippet};
use crate::errors::AppError;
use crate::generation::error::GenerationError;
use crate::generation::models::{FunnelDocument, FRAGMENT_SECTIONS};
use crate::generation::response::validate_document;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const FULL_PAGE_FILENAME: &str = "launchlab_funnel.html";

/// Reads a client-supplied document. Unlike model output, a bad document
/// here is the caller's fault and answers 400.
pub fn read_document(payload: Result<Json<Value>, JsonRejection>) -> Result<FunnelDocument, AppError> {
    let Json(value) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    validate_document(value).map_err(|e| match e {
        GenerationError::Validation { ref detail } => {
            tracing::debug!("Rejected document: {detail}");
            AppError::BadRequest(e.to_string())
        }
        other => AppError::Generation(other),
    })
}

fn html_response(html: String, filename: Option<&str>) -> Response {
    let mut response = ([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], html).into_response();
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    if let Some(name) = filename {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{name}\"")) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }
    response
}

/// POST /api/export/html
pub async fn handle_export_html(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let doc = read_document(payload)?;
    Ok(html_response(build_full_page_html(&doc), Some(FULL_PAGE_FILENAME)))
}

/// POST /api/export/snippet
pub async fn handle_export_snippet(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let doc = read_document(payload)?;
    Ok(html_response(build_full_page_snippet(&doc), None))
}

/// POST /api/export/sections/:section
///
/// `section` is a layout token (`Hero`, `Benefits`, `Offer`, `FAQ`, `CTA`).
pub async fn handle_export_section(
    Path(section): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let doc = read_document(payload)?;

    let filename = FRAGMENT_SECTIONS
        .iter()
        .find(|(token, _)| *token == section)
        .map(|(_, file)| *file)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section: {section}")))?;

    let html = doc
        .systeme_sections
        .fragment(&section)
        .ok_or_else(|| AppError::NotFound(format!("Section {section} has no HTML")))?;

    Ok(html_response(html.to_string(), Some(filename)))
}
