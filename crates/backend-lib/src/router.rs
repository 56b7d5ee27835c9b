// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router assembly.
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::pages;
use crate::storage::CredentialStore;
use crate::AppState;

/// Create the application router
pub fn create_router<S: CredentialStore + Send + Sync + Clone + 'static>(
    state: Arc<AppState<S>>,
) -> Router {
    Router::new()
        .route("/", get(pages::home::<S>))
        .route("/signup", get(pages::signup_form::<S>).post(pages::signup::<S>))
        .route("/signin", get(pages::signin_form::<S>).post(pages::signin::<S>))
        .route("/logout", get(pages::logout::<S>))
        .route("/dashboard", get(pages::dashboard::<S>))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
