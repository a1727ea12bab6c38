//! Sample lesson-plan routes — generate, list, remove.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use classpilot_chat::lesson_plans::sample_lesson_plan;
use classpilot_chat::{FilterContext, LessonPlan};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lesson-plans", post(generate).get(list))
        .route("/lesson-plans/{index}", delete(remove))
}

#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    filters: FilterContext,
}

/// Generate a templated plan from the supplied facets and store it on the
/// session. The new plan is returned in full.
async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Json<LessonPlan> {
    let plan = sample_lesson_plan(&request.filters);
    info!("Generated sample lesson plan \"{}\"", plan.title);
    state.session.write().add_lesson_plan(plan.clone());
    Json(plan)
}

async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<LessonPlan>> {
    Json(state.session.read().lesson_plans().to_vec())
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<StatusCode, StatusCode> {
    if state.session.write().remove_lesson_plan(index) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
