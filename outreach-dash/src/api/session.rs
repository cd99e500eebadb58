//! Dashboard password gate
//!
//! A single shared password unlocks the dashboard views. A successful login
//! sets a session cookie holding a token derived from the password and a
//! per-process nonce, so sessions end when the service restarts. An empty
//! password disables the gate.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use rand::RngCore;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::AppState;

pub const SESSION_COOKIE: &str = "outreach_session";

/// Session token issuer and validator
#[derive(Debug, Clone)]
pub struct SessionGate {
    password: String,
    /// `None` when the gate is disabled
    token: Option<String>,
}

impl SessionGate {
    pub fn new(password: &str) -> Self {
        if password.is_empty() {
            return Self::disabled();
        }

        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut hasher = Sha256::new();
        hasher.update(nonce);
        hasher.update(password.as_bytes());
        let token = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();

        Self {
            password: password.to_string(),
            token: Some(token),
        }
    }

    pub fn disabled() -> Self {
        Self {
            password: String::new(),
            token: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Session token for a correct password
    pub fn login(&self, password: &str) -> Option<&str> {
        match &self.token {
            Some(token) if password == self.password => Some(token),
            _ => None,
        }
    }

    pub fn is_valid(&self, candidate: Option<&str>) -> bool {
        match &self.token {
            None => true,
            Some(token) => candidate == Some(token.as_str()),
        }
    }
}

/// Value of the session cookie in a request's `Cookie` headers
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Rejects requests without a valid session cookie
pub async fn session_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, SessionError> {
    if !state.gate.is_valid(session_cookie(request.headers())) {
        return Err(SessionError::Unauthorized);
    }
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, SessionError> {
    if !state.gate.is_enabled() {
        return Ok(Json(json!({ "authenticated": true, "gate": false })).into_response());
    }

    let token = state.gate.login(&request.password).ok_or_else(|| {
        warn!("Rejected dashboard login");
        SessionError::WrongPassword
    })?;

    info!("Dashboard session opened");
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict",
        SESSION_COOKIE, token
    );
    set_cookie_response(&cookie, json!({ "authenticated": true, "gate": true }))
}

/// POST /api/logout
pub async fn logout() -> Result<Response, SessionError> {
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0",
        SESSION_COOKIE
    );
    set_cookie_response(&cookie, json!({ "authenticated": false }))
}

/// GET /api/session
pub async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    Json(json!({
        "gate": state.gate.is_enabled(),
        "authenticated": state.gate.is_valid(session_cookie(&headers)),
    }))
}

fn set_cookie_response(cookie: &str, body: serde_json::Value) -> Result<Response, SessionError> {
    let value =
        HeaderValue::from_str(cookie).map_err(|e| SessionError::Internal(e.to_string()))?;
    let mut response = Json(body).into_response();
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

#[derive(Debug)]
pub enum SessionError {
    Unauthorized,
    WrongPassword,
    Internal(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionError::Unauthorized => (StatusCode::UNAUTHORIZED, "Login required".to_string()),
            SessionError::WrongPassword => (StatusCode::UNAUTHORIZED, "Wrong password".to_string()),
            SessionError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Session error: {}", msg))
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
