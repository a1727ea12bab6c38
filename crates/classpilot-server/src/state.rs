//! Shared application state.

use std::sync::Arc;

use classpilot_chat::{BedrockClient, Orchestrator, Session};
use classpilot_core::{Result, ServerConfig};
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
///
/// The session is mutated only by the single active interaction; the lock is
/// held for snapshots and appends, never across a service call.
pub struct AppState {
    pub config: ServerConfig,
    pub orchestrator: Orchestrator,
    pub session: RwLock<Session>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let client = Arc::new(BedrockClient::new(config.bedrock.clone())?);
        let orchestrator = Orchestrator::new(client.clone(), client);
        Ok(Self {
            config,
            orchestrator,
            session: RwLock::new(Session::new()),
        })
    }
}
