//! ClassPilot — retrieval-augmented lesson-planning chat server.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = classpilot_core::ServerConfig::from_env();
    let port = config.port;

    info!(
        "Region {}, model {}, knowledge base {}",
        config.bedrock.region,
        config.bedrock.model_id,
        config
            .bedrock
            .knowledge_base_id
            .as_deref()
            .unwrap_or("(unset)")
    );

    let state = Arc::new(AppState::new(config)?);

    let app = axum::Router::new()
        .nest("/api", routes::api_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    info!("ClassPilot listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
