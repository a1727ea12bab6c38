//! API route registration.

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

mod chat;
mod documents;
mod lesson_plans;
mod session;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(chat::routes())
        .merge(documents::routes())
        .merge(lesson_plans::routes())
        .merge(session::routes())
}
