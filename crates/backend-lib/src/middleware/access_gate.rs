// ============================
// crates/backend-lib/src/middleware/access_gate.rs
// ============================
//! Session cookie transport and the anonymous/authenticated request gate.
use std::time::Duration;

use axum::http::{header, HeaderMap};

use crate::storage::{Account, CredentialStore};
use crate::AppState;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// Session state resolved for an incoming request, evaluated once before
/// any protected logic runs.
pub enum AuthContext {
    Authenticated(Account),
    Anonymous,
}

/// Extract the session id from the request's Cookie headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, token)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE_NAME {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

/// Build the Set-Cookie value establishing a session. Tokens are UUIDs, so
/// the value needs no escaping.
pub fn session_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    )
}

/// Build the Set-Cookie value clearing the session cookie
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Evaluate the session state for a request. Authenticated only when the
/// cookie's session validates and its account still resolves.
pub async fn authenticate_request<S>(state: &AppState<S>, headers: &HeaderMap) -> AuthContext
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    let Some(token) = session_id_from_headers(headers) else {
        return AuthContext::Anonymous;
    };
    match state.auth.current_account(&token).await {
        Some(account) => AuthContext::Authenticated(account),
        None => AuthContext::Anonymous,
    }
}

/// Find a session context that can carry a flash message across a redirect:
/// the request's own live session when there is one, otherwise a fresh
/// anonymous session. Returns the token and whether a cookie must be set.
pub async fn flash_context<S>(state: &AppState<S>, headers: &HeaderMap) -> (String, bool)
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    if let Some(token) = session_id_from_headers(headers) {
        if state.sessions.get(&token).await.is_some() {
            return (token, false);
        }
    }
    (state.sessions.anonymous().await, true)
}
