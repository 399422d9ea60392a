//! Request router: classifies each exchange by verb and token presence.
//!
//! One fixed path serves three exchange kinds. POST carries a JSON-RPC
//! envelope, so its rejections answer in kind with an error envelope; GET
//! (stream open) and DELETE (terminate) are transport-level exchanges and
//! reject with a bare status code.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;

use meridian_core::rpc::{RequestEnvelope, ResponseEnvelope};
use meridian_core::SessionToken;

use crate::engine::RpcEngine;
use crate::server::AppState;
use crate::session::{SessionHandle, SessionStream};

/// Header carrying the session token; echoed by the server on creation.
pub const SESSION_HEADER: &str = "mcp-session-id";

fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(SessionToken::from_raw)
}

/// POST — send-request exchange.
pub async fn post_exchange(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let envelope: RequestEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) if e.is_syntax() || e.is_eof() => {
            return (StatusCode::BAD_REQUEST, Json(ResponseEnvelope::parse_error()))
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ResponseEnvelope::invalid_request("not a request envelope")),
            )
                .into_response();
        }
    };
    if !envelope.valid_version() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ResponseEnvelope::invalid_request("unsupported jsonrpc version")),
        )
            .into_response();
    }

    match session_token(&headers) {
        Some(token) => match state.registry.get(&token) {
            Some(handle) => envelope_response(handle.process(&envelope)),
            None => (
                StatusCode::NOT_FOUND,
                Json(ResponseEnvelope::invalid_session("no valid session")),
            )
                .into_response(),
        },
        None if envelope.is_initialize() => create_session(&state, &envelope),
        None => (
            StatusCode::BAD_REQUEST,
            Json(ResponseEnvelope::invalid_session(
                "no valid session or not an initialization request",
            )),
        )
            .into_response(),
    }
}

/// First contact: mint a token, register the session, then run the
/// initialize request through the new handle. The token is registered and
/// discoverable before the acknowledgment can be observed, and it rides
/// back on the session header.
fn create_session(state: &AppState, envelope: &RequestEnvelope) -> Response {
    let token = SessionToken::generate();
    let finalize = {
        let registry = Arc::clone(&state.registry);
        let token = token.clone();
        Box::new(move || registry.remove(&token))
    };
    let engine = RpcEngine::new(Arc::clone(&state.info));
    let handle = Arc::new(SessionHandle::new(
        token.clone(),
        engine,
        state.stream_queue,
        finalize,
    ));

    if let Err(e) = state.registry.create(token.clone(), Arc::clone(&handle)) {
        tracing::error!(error = %e, "failed to register new session");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResponseEnvelope::internal_error(envelope.id.clone())),
        )
            .into_response();
    }
    tracing::info!(token = %token, "session created");

    let mut response = envelope_response(handle.process(envelope));
    if let Ok(value) = HeaderValue::from_str(token.as_str()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// GET — attach the server-push stream to an existing session.
pub async fn open_stream(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(handle) = state.registry.get(&token) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match handle.attach_stream() {
        Ok(rx) => {
            tracing::debug!(token = %token, "stream attached");
            let stream = SessionStream::new(handle, rx);
            Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
        }
        // The session closed between lookup and attach.
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// DELETE — explicit terminate. The handle's finalize callback removes the
/// token from the registry, so a second DELETE misses the lookup.
pub async fn terminate(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(handle) = state.registry.get(&token) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    handle.close();
    tracing::info!(token = %token, "session terminated");
    StatusCode::OK.into_response()
}

/// Requests answer with their envelope; notifications are accepted silently.
fn envelope_response(response: Option<ResponseEnvelope>) -> Response {
    match response {
        Some(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
