use std::sync::MutexGuard;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::SharedStore;
use crate::error::DocError;
use crate::models::{schema, Document, SectionKey};
use crate::render::{self, ExportFormat};
use crate::store::DocumentStore;

// ============================================================
// Error Handling
// ============================================================

type ApiError = (StatusCode, String);

/// Map a store error to a response. Caller mistakes are returned verbatim;
/// anything else is logged and sanitized.
fn doc_error(e: DocError) -> ApiError {
    match e {
        DocError::InvalidImport(_)
        | DocError::InvalidSection { .. }
        | DocError::UnknownField { .. }
        | DocError::RecordNotFound { .. } => {
            tracing::warn!("Rejected request: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        DocError::UnknownSection(_) | DocError::UnknownFormat(_) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
        other => internal_error(other),
    }
}

fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn lock(store: &SharedStore) -> Result<MutexGuard<'_, DocumentStore>, ApiError> {
    store.lock().map_err(|_| internal_error("store lock poisoned"))
}

fn section_key(key: &str) -> Result<SectionKey, ApiError> {
    SectionKey::from_str(key).ok_or_else(|| doc_error(DocError::UnknownSection(key.to_string())))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Document
// ============================================================

pub async fn get_document(State(store): State<SharedStore>) -> Result<Json<Document>, ApiError> {
    let store = lock(&store)?;
    Ok(Json(store.document().clone()))
}

pub async fn clear_document(State(store): State<SharedStore>) -> Result<StatusCode, ApiError> {
    lock(&store)?.clear_data();
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub percentage: u8,
    pub last_saved: Option<DateTime<Utc>>,
    /// Set when the last write could not be persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

pub async fn get_completion(
    State(store): State<SharedStore>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let store = lock(&store)?;
    Ok(Json(CompletionResponse {
        percentage: store.completion_percentage(),
        last_saved: store.last_saved(),
        persistence_error: store.persistence_error().map(str::to_string),
    }))
}

// ============================================================
// Sections
// ============================================================

pub async fn get_section(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let key = section_key(&key)?;
    let section = lock(&store)?.section(key);
    section.to_value().map(Json).map_err(internal_error)
}

pub async fn put_section(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let key = section_key(&key)?;
    lock(&store)?
        .update_section_json(key, value)
        .map_err(doc_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_schema() -> Json<Vec<schema::SectionSchema>> {
    Json(schema::all())
}

// ============================================================
// Export / Import
// ============================================================

pub async fn export(
    State(store): State<SharedStore>,
    Path(format): Path<String>,
) -> Result<Response, ApiError> {
    let format = ExportFormat::from_str(&format)
        .ok_or_else(|| doc_error(DocError::UnknownFormat(format.clone())))?;
    let doc = lock(&store)?.document().clone();

    let filename = render::export_filename(&doc, format);
    let bytes = render::render_detached(doc, format)
        .await
        .map_err(doc_error)?;

    tracing::info!("Exported {} ({} bytes)", filename, bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn import(State(store): State<SharedStore>, body: String) -> Result<StatusCode, ApiError> {
    lock(&store)?.try_import_data(&body).map_err(doc_error)?;
    Ok(StatusCode::NO_CONTENT)
}
