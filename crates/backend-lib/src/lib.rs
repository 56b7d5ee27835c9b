// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality for the Gatehouse credential and session service.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod render;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, DefaultAuth, SessionManager};
use crate::config::Settings;
use crate::render::{JsonRenderer, Renderer};
use crate::storage::CredentialStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Account service
    pub auth: Arc<dyn AuthService>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Settings
    pub settings: Arc<Settings>,
    /// Credential store
    pub storage: S,
    /// Render boundary
    pub renderer: Arc<dyn Renderer>,
}

impl<S: CredentialStore + Send + Sync + Clone + 'static> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> Self {
        let sessions = Arc::new(SessionManager::with_ttl(Duration::from_secs(
            settings.session_ttl_secs,
        )));
        let auth = Arc::new(DefaultAuth::new(storage.clone(), (*sessions).clone()));

        Self {
            auth,
            sessions,
            settings: Arc::new(settings),
            storage,
            renderer: Arc::new(JsonRenderer),
        }
    }

    /// Replace the render backend
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Session lifetime, used for both session expiry and cookie max-age
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.settings.session_ttl_secs)
    }
}
