//! Server bootstrap: configuration, shared state, routes, listener.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use meridian_core::InfoProvider;

use crate::registry::SessionRegistry;
use crate::router;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
    /// Bounded queue size for each session's server-push stream.
    pub stream_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            stream_queue: 64,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub info: Arc<dyn InfoProvider>,
    pub stream_queue: usize,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/mcp",
            post(router::post_exchange)
                .get(router::open_stream)
                .delete(router::terminate),
        )
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Create and start the server. Returns a handle to the bound port and the
/// registry that owns the live sessions.
pub async fn start(
    config: ServerConfig,
    info: Arc<dyn InfoProvider>,
) -> Result<ServerHandle, std::io::Error> {
    let registry = Arc::new(SessionRegistry::new());
    let state = AppState {
        registry: Arc::clone(&registry),
        info,
        stream_queue: config.stream_queue,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "meridian server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        registry,
        _server: server_handle,
    })
}

/// Handle returned by `start()` — keeps the accept loop alive.
pub struct ServerHandle {
    pub port: u16,
    pub registry: Arc<SessionRegistry>,
    _server: tokio::task::JoinHandle<()>,
}

/// Liveness probe. Stateless; no session coupling.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.registry.count(),
    }))
}

/// Root info document naming the endpoint.
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "meridian",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoint": "/mcp",
        "transport": "streamable-http",
    }))
}
