/// API request handlers
use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::session::SessionManager;
use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::PincodeServices;

pub mod search;
pub mod sessions;
pub mod support;

pub use search::*;
pub use sessions::*;
pub use support::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub services: PincodeServices,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(services: PincodeServices, sessions: Arc<SessionManager>) -> Self {
        Self { services, sessions }
    }

    /// Must be called inside a tokio runtime
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            PincodeServices::from_config(config)?,
            Arc::new(SessionManager::new(config.server.session_timeout_secs)),
        ))
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.session_count(),
    }))
}
