//! Session routes — transcript, clear, pipeline runs, facet options.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use classpilot_chat::filters::{ALL_GRADES, ALL_SUBJECTS, GRADE_LEVELS, SUBJECTS, US_STATES};
use classpilot_chat::{Message, PipelineRun};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session/messages", get(messages))
        .route("/session/clear", post(clear))
        .route("/session/runs", get(runs))
        .route("/options", get(options))
}

async fn messages(State(state): State<Arc<AppState>>) -> Json<Vec<Message>> {
    Json(state.session.read().messages().to_vec())
}

async fn clear(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.session.write().clear();
    Json(serde_json::json!({ "cleared": true }))
}

async fn runs(State(state): State<Arc<AppState>>) -> Json<Vec<PipelineRun>> {
    Json(state.session.read().runs().to_vec())
}

/// Facet option lists for the front end, defaults first.
async fn options() -> Json<serde_json::Value> {
    let grades: Vec<&str> = std::iter::once(ALL_GRADES)
        .chain(GRADE_LEVELS.iter().copied())
        .collect();
    let subjects: Vec<&str> = std::iter::once(ALL_SUBJECTS)
        .chain(SUBJECTS.iter().copied())
        .collect();
    Json(serde_json::json!({
        "states": US_STATES,
        "gradeLevels": grades,
        "subjects": subjects,
    }))
}
