//! Document routes — upload (multipart), list, remove.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info};

use classpilot_chat::UploadedDocument;
use classpilot_extract::{content_type_for, extract_text};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents", post(upload).get(list))
        .route("/documents/{name}", delete(remove))
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024))
}

#[derive(Debug, Serialize)]
struct UploadOutcome {
    name: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Accept one or more files, extract their text, and store each under its
/// filename. Extraction failures are reported per file and store nothing;
/// a duplicate filename is treated as already processed and skipped.
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadOutcome>>, (StatusCode, String)> {
    let mut outcomes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("malformed multipart body: {}", e)))?
    {
        let name = field
            .file_name()
            .unwrap_or("upload")
            .to_string();
        let declared = field
            .content_type()
            .filter(|ct| *ct != "application/octet-stream")
            .map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("failed to read {}: {}", name, e)))?;

        let content_type = declared
            .or_else(|| content_type_for(&name).map(str::to_string))
            .unwrap_or_default();

        match extract_text(&bytes, &content_type) {
            Ok(text) if text.trim().is_empty() => {
                outcomes.push(UploadOutcome {
                    name,
                    status: "error",
                    size: None,
                    error: Some("document contains no usable text".into()),
                });
            }
            Ok(text) => {
                let size = bytes.len();
                let stored = state.session.write().add_document(UploadedDocument {
                    name: name.clone(),
                    content: text,
                    size,
                });
                if stored {
                    info!("Stored document {} ({} bytes)", name, size);
                }
                outcomes.push(UploadOutcome {
                    name,
                    status: if stored { "stored" } else { "skipped" },
                    size: Some(size),
                    error: None,
                });
            }
            Err(e) => {
                error!("Extraction of {} failed: {}", name, e);
                outcomes.push(UploadOutcome {
                    name,
                    status: "error",
                    size: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(Json(outcomes))
}

#[derive(Debug, Serialize)]
struct DocumentSummary {
    name: String,
    size: usize,
}

async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<DocumentSummary>> {
    let session = state.session.read();
    Json(
        session
            .documents()
            .iter()
            .map(|d| DocumentSummary {
                name: d.name.clone(),
                size: d.size,
            })
            .collect(),
    )
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, StatusCode> {
    if state.session.write().remove_document(&name) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
