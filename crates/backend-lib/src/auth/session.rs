// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use metrics::{counter, gauge};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics as keys;
use gatehouse_common::{AccountId, FlashMessage};

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// Interval between eviction sweeps
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60); // 1 hour

/// Session information
#[derive(Clone)]
pub struct Session {
    /// Owning account. `None` for anonymous flash-carrier sessions. Weak
    /// reference: the session never extends the account's lifetime.
    pub account_id: Option<AccountId>,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
    /// One-shot message, consumed by at most one reader
    pub flash: Option<FlashMessage>,
}

impl Session {
    fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

/// Session manager for handling authentication tokens
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    /// Create a new session manager with an explicit TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        let manager = SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        // Spawn the session cleanup task
        let manager_clone = manager.clone();
        tokio::spawn(async move {
            manager_clone.cleanup_task().await;
        });

        manager
    }

    /// Create a new session bound to an account
    pub async fn create(&self, account_id: AccountId) -> String {
        self.insert(Some(account_id)).await
    }

    /// Create an anonymous session. Carries no identity; used to hold a
    /// flash message across the redirect-to-sign-in hop.
    pub async fn anonymous(&self) -> String {
        self.insert(None).await
    }

    async fn insert(&self, account_id: Option<AccountId>) -> String {
        let token = Uuid::new_v4().to_string();
        let now = SystemTime::now();
        let session = Session {
            account_id,
            created_at: now,
            expires_at: now + self.ttl,
            flash: None,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSIONS_ACTIVE).set(sessions.len() as f64);

        token
    }

    /// Get a session by token. Expired sessions are never returned, whether
    /// or not the cleanup task has evicted them yet.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(token).filter(|s| !s.is_expired()).cloned()
    }

    /// Resolve a token to its account id. `None` when the session is
    /// absent, expired, or anonymous.
    pub async fn validate(&self, token: &str) -> Option<AccountId> {
        self.get(token).await.and_then(|s| s.account_id)
    }

    /// Destroy a session. Idempotent: destroying an absent session is fine.
    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            counter!(keys::SESSION_DESTROYED).increment(1);
            gauge!(keys::SESSIONS_ACTIVE).set(sessions.len() as f64);
        }
    }

    /// Attach a flash message to a live session
    pub async fn set_flash(&self, token: &str, flash: FlashMessage) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(token).filter(|s| !s.is_expired()) {
            session.flash = Some(flash);
        }
    }

    /// Take the session's flash message, clearing it. At most one caller
    /// observes a given flash.
    pub async fn take_flash(&self, token: &str) -> Option<FlashMessage> {
        let mut sessions = self.sessions.write().await;
        sessions
            .get_mut(token)
            .filter(|s| !s.is_expired())
            .and_then(|s| s.flash.take())
    }

    /// Cleanup task that runs periodically to remove expired sessions
    async fn cleanup_task(&self) {
        loop {
            tokio::time::sleep(CLEANUP_INTERVAL).await;

            let mut sessions = self.sessions.write().await;
            let now = SystemTime::now();
            let before_count = sessions.len();

            sessions.retain(|_, session| now < session.expires_at);

            let after_count = sessions.len();
            let removed = before_count - after_count;

            if removed > 0 {
                counter!(keys::SESSION_EXPIRED).increment(removed as u64);
                gauge!(keys::SESSIONS_ACTIVE).set(after_count as f64);
            }
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_validate() {
        let manager = SessionManager::new();
        let token = manager.create(42).await;

        assert_eq!(manager.validate(&token).await, Some(42));
        assert!(manager.get(&token).await.is_some());
        assert!(manager.validate("no-such-token").await.is_none());
    }

    #[tokio::test]
    async fn anonymous_sessions_never_validate() {
        let manager = SessionManager::new();
        let token = manager.anonymous().await;

        assert!(manager.get(&token).await.is_some());
        assert_eq!(manager.validate(&token).await, None);
    }

    #[tokio::test]
    async fn destroyed_session_never_validates_again() {
        let manager = SessionManager::new();
        let token = manager.create(7).await;

        manager.destroy(&token).await;
        assert_eq!(manager.validate(&token).await, None);
        assert!(manager.get(&token).await.is_none());

        // Idempotent
        manager.destroy(&token).await;
    }

    #[tokio::test]
    async fn expired_session_is_invalid_before_eviction() {
        let manager = SessionManager::with_ttl(Duration::ZERO);
        let token = manager.create(7).await;

        // The cleanup task has not run; the expiry check alone must gate
        assert_eq!(manager.validate(&token).await, None);
        assert!(manager.get(&token).await.is_none());
        assert!(manager.take_flash(&token).await.is_none());
    }

    #[tokio::test]
    async fn flash_is_consumed_at_most_once() {
        let manager = SessionManager::new();
        let token = manager.create(7).await;

        manager
            .set_flash(&token, FlashMessage::success("Welcome!"))
            .await;

        let flash = manager.take_flash(&token).await.unwrap();
        assert_eq!(flash.message, "Welcome!");
        assert!(manager.take_flash(&token).await.is_none());
    }

    #[tokio::test]
    async fn flash_on_anonymous_session() {
        let manager = SessionManager::new();
        let token = manager.anonymous().await;

        manager
            .set_flash(&token, FlashMessage::error("Please sign in first."))
            .await;
        let flash = manager.take_flash(&token).await.unwrap();
        assert_eq!(flash.message, "Please sign in first.");
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let manager = SessionManager::new();
        let first = manager.create(1).await;
        let second = manager.create(1).await;
        assert_ne!(first, second);
    }
}
