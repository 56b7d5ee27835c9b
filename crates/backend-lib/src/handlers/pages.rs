// ============================
// crates/backend-lib/src/handlers/pages.rs
// ============================
//! Request handlers for the account and session pages.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Form,
};

use crate::error::AppError;
use crate::middleware::{
    authenticate_request, clear_session_cookie, flash_context, session_cookie,
    session_id_from_headers, AuthContext,
};
use crate::render::Renderer;
use crate::storage::CredentialStore;
use crate::validation;
use crate::AppState;
use gatehouse_common::{FlashMessage, FormValues, SigninForm, SignupForm, ViewData};

/// Build a 302 redirect, optionally setting a session cookie
fn redirect(location: &'static str, cookie: Option<String>) -> Result<Response, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static(location));
    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(format!("invalid cookie value: {e}")))?;
        headers.insert(header::SET_COOKIE, value);
    }
    Ok((StatusCode::FOUND, headers).into_response())
}

/// Render a view into a response with the given status
fn page(
    status: StatusCode,
    renderer: &dyn Renderer,
    view: &str,
    data: &ViewData,
) -> Result<Response, AppError> {
    let body = renderer.render(view, data)?;
    Ok((
        status,
        [(header::CONTENT_TYPE, renderer.content_type())],
        body,
    )
        .into_response())
}

/// Re-render a form submission that failed, preserving the email field
fn form_error<S>(
    state: &AppState<S>,
    view: &str,
    email: String,
    err: &AppError,
) -> Result<Response, AppError> {
    if err.is_storage_fault() {
        tracing::error!(error = %err, view, "request failed on a storage fault");
    }
    let data = ViewData {
        values: FormValues { email },
        error: Some(err.sanitized_message()),
        ..ViewData::default()
    };
    page(err.status_code(), &*state.renderer, view, &data)
}

/// `GET /` — home page, with the user resolved when a session is live
pub async fn home<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    let user = match authenticate_request(&state, &headers).await {
        AuthContext::Authenticated(account) => Some(account.public()),
        AuthContext::Anonymous => None,
    };
    let flash = match session_id_from_headers(&headers) {
        Some(token) => state.sessions.take_flash(&token).await,
        None => None,
    };
    let data = ViewData {
        user,
        flash,
        ..ViewData::default()
    };
    page(StatusCode::OK, &*state.renderer, "index", &data)
}

/// `GET /signup` — empty signup form
pub async fn signup_form<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    let flash = match session_id_from_headers(&headers) {
        Some(token) => state.sessions.take_flash(&token).await,
        None => None,
    };
    let data = ViewData {
        flash,
        ..ViewData::default()
    };
    page(StatusCode::OK, &*state.renderer, "signup", &data)
}

/// `POST /signup` — register, establish a session, redirect to the dashboard
pub async fn signup<S>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    let email = validation::normalize_email(&form.email);
    match state
        .auth
        .register(&form.email, form.password, form.confirm_password)
        .await
    {
        Ok(account) => {
            let token = state.sessions.create(account.id).await;
            state
                .sessions
                .set_flash(&token, FlashMessage::success("Welcome!"))
                .await;
            redirect(
                "/dashboard",
                Some(session_cookie(&token, state.session_ttl())),
            )
        },
        Err(err) => form_error(&state, "signup", email, &err),
    }
}

/// `GET /signin` — empty signin form
pub async fn signin_form<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    let flash = match session_id_from_headers(&headers) {
        Some(token) => state.sessions.take_flash(&token).await,
        None => None,
    };
    let data = ViewData {
        flash,
        ..ViewData::default()
    };
    page(StatusCode::OK, &*state.renderer, "signin", &data)
}

/// `POST /signin` — verify credentials, establish a session
pub async fn signin<S>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<SigninForm>,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    let email = validation::normalize_email(&form.email);
    match state.auth.authenticate(&form.email, form.password).await {
        Ok(account) => {
            let token = state.sessions.create(account.id).await;
            state
                .sessions
                .set_flash(&token, FlashMessage::success("Signed in successfully."))
                .await;
            redirect(
                "/dashboard",
                Some(session_cookie(&token, state.session_ttl())),
            )
        },
        Err(err) => form_error(&state, "signin", email, &err),
    }
}

/// `GET /logout` — destroy the session, clear the cookie
pub async fn logout<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    if let Some(token) = session_id_from_headers(&headers) {
        state.sessions.destroy(&token).await;
    }
    redirect("/", Some(clear_session_cookie()))
}

/// `GET /dashboard` — requires an authenticated session
pub async fn dashboard<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: CredentialStore + Send + Sync + Clone + 'static,
{
    match authenticate_request(&state, &headers).await {
        AuthContext::Authenticated(account) => {
            let flash = match session_id_from_headers(&headers) {
                Some(token) => state.sessions.take_flash(&token).await,
                None => None,
            };
            let data = ViewData {
                user: Some(account.public()),
                flash,
                ..ViewData::default()
            };
            page(StatusCode::OK, &*state.renderer, "dashboard", &data)
        },
        AuthContext::Anonymous => {
            let (token, fresh) = flash_context(&state, &headers).await;
            state
                .sessions
                .set_flash(&token, FlashMessage::error("Please sign in first."))
                .await;
            let cookie = fresh.then(|| session_cookie(&token, state.session_ttl()));
            redirect("/signin", cookie)
        },
    }
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(uri.path().to_string()).into_response()
}
