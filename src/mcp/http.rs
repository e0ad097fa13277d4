//! Streamable-HTTP transport: JSON replies over `POST /mcp`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::protocol::{self, JsonRpcError};
use super::server::McpServer;
use crate::constants::mcp::{SESSION_HEADER, SESSION_IDLE_TTL_SECS};

#[derive(Debug, Clone)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

pub struct HttpState {
    pub server: McpServer,
    pub sessions: DashMap<String, Session>,
    idle_ttl: Duration,
}

impl HttpState {
    pub fn new(server: McpServer) -> Self {
        Self::with_idle_ttl(server, Duration::seconds(SESSION_IDLE_TTL_SECS))
    }

    pub fn with_idle_ttl(server: McpServer, idle_ttl: Duration) -> Self {
        Self { server, sessions: DashMap::new(), idle_ttl }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.last_seen) >= self.idle_ttl
    }

    /// Drops sessions idle for at least the TTL. Returns how many went.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !self.is_expired(session, now));
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!("🧹 Evicted {} idle MCP session(s)", evicted);
        }
        evicted
    }

    pub fn open_session(&self) -> String {
        let now = Utc::now();
        self.evict_idle(now);

        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), Session { created_at: now, last_seen: now });
        info!("🆕 MCP session {} opened ({} active)", id, self.sessions.len());
        id
    }

    /// Marks the session as used. False when the id is unknown or expired.
    pub fn touch(&self, id: &str) -> bool {
        let now = Utc::now();
        if let Some(mut session) = self.sessions.get_mut(id) {
            if !self.is_expired(&session, now) {
                session.last_seen = now;
                return true;
            }
        }
        self.sessions.remove(id);
        false
    }
}

pub fn router(server: McpServer) -> Router {
    router_with_state(Arc::new(HttpState::new(server)))
}

pub fn router_with_state(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_post).delete(handle_delete))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(server: McpServer, host: &str, port: u16) -> std::io::Result<()> {
    let app = router(server);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("📡 MCP server listening on http://{}/mcp", listener.local_addr()?);
    axum::serve(listener, app).await
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_initialize(message: &Value) -> bool {
    let single = |m: &Value| m.get("method").and_then(Value::as_str) == Some("initialize");
    match message {
        Value::Array(batch) => batch.iter().any(single),
        other => single(other),
    }
}

fn rpc_error(status: StatusCode, error: JsonRpcError) -> Response {
    (status, Json(protocol::failure(Value::Null, error))).into_response()
}

async fn handle_post(State(state): State<Arc<HttpState>>, headers: HeaderMap, body: String) -> Response {
    let message: Value = match serde_json::from_str(&body) {
        Ok(message) => message,
        Err(e) => return rpc_error(StatusCode::BAD_REQUEST, JsonRpcError::parse_error(e.to_string())),
    };

    let session = if is_initialize(&message) {
        Some(state.open_session())
    } else {
        match session_id(&headers) {
            Some(id) if state.touch(&id) => Some(id),
            Some(id) => {
                warn!("⚠️ Request for unknown MCP session {}", id);
                return rpc_error(StatusCode::NOT_FOUND, JsonRpcError::invalid_request("unknown session"));
            }
            None => None,
        }
    };

    let reply = state.server.handle_value(message).await;

    let mut response = match reply {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    };
    if let Some(id) = session.and_then(|id| HeaderValue::from_str(&id).ok()) {
        response.headers_mut().insert(SESSION_HEADER, id);
    }
    response
}

async fn handle_delete(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> Response {
    let Some(id) = session_id(&headers) else {
        return rpc_error(StatusCode::BAD_REQUEST, JsonRpcError::invalid_request("missing session id"));
    };
    match state.sessions.remove(&id) {
        Some((_, session)) => {
            let age = Utc::now().signed_duration_since(session.created_at);
            info!("👋 MCP session {} closed after {}s", id, age.num_seconds());
            StatusCode::NO_CONTENT.into_response()
        }
        None => rpc_error(StatusCode::NOT_FOUND, JsonRpcError::invalid_request("unknown session")),
    }
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    state.evict_idle(Utc::now());
    let ctx = state.server.context();
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({
            "status": "ok",
            "name": state.server.info().name,
            "version": state.server.info().version,
            "freqtrade_connected": ctx.is_connected(),
            "trading_mode": ctx.mode().as_str(),
            "sessions": state.sessions.len(),
        })),
    )
}
