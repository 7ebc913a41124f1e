//! HTTP API for the restaurant menu service.
//!
//! Serves `/health` and mounts the MCP SSE transport at the root.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::mcp::{SessionManager, mcp_router};
use crate::service::MenuService;
use crate::tools::ToolRegistry;

/// Application state
pub struct AppState {
    pub service: Arc<MenuService>,
    pub sessions: Arc<SessionManager>,
    pub start_time: Instant,
}

/// Build the HTTP router
pub fn router(service: Arc<MenuService>, registry: Arc<ToolRegistry>) -> Router {
    let sessions = Arc::new(SessionManager::new());

    let state = Arc::new(AppState {
        service: service.clone(),
        sessions: sessions.clone(),
        start_time: Instant::now(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(mcp_router(service, registry, sessions))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        upstream_configured: state.service.is_configured(),
        open_sessions: state.sessions.len(),
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    upstream_configured: bool,
    open_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    fn state_with(config: UpstreamConfig) -> Arc<AppState> {
        Arc::new(AppState {
            service: Arc::new(MenuService::new(config).unwrap()),
            sessions: Arc::new(SessionManager::new()),
            start_time: Instant::now(),
        })
    }

    #[test]
    fn test_health_reports_unconfigured_upstream() {
        let Json(health) =
            tokio_test::block_on(health_handler(State(state_with(UpstreamConfig::default()))));
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert!(!health.upstream_configured);
    }

    #[test]
    fn test_health_reports_configured_upstream() {
        let config = UpstreamConfig {
            base_url: Some("http://localhost:9".to_string()),
            authorization: Some("Bearer token".to_string()),
            uuid: Some("device".to_string()),
            ..UpstreamConfig::default()
        };
        let Json(health) = tokio_test::block_on(health_handler(State(state_with(config))));
        assert!(health.upstream_configured);
    }

    #[test]
    fn test_health_counts_open_sessions() {
        let state = state_with(UpstreamConfig::default());
        let (first, _rx1) = state.sessions.open();
        let (_second, _rx2) = state.sessions.open();

        let Json(health) = tokio_test::block_on(health_handler(State(state.clone())));
        assert_eq!(health.open_sessions, 2);

        state.sessions.close(&first);
        let Json(health) = tokio_test::block_on(health_handler(State(state)));
        assert_eq!(health.open_sessions, 1);
    }
}
