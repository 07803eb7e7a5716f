use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use super::{render_funnel, FunnelView};
use crate::errors::AppError;
use crate::export::handlers::read_document;

/// POST /api/preview
pub async fn handle_preview(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FunnelView>, AppError> {
    let doc = read_document(payload)?;
    Ok(Json(render_funnel(&doc)))
}
