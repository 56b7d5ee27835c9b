use async_trait::async_trait;

use crate::{error::AppError, storage::Account};

/// Account-facing operations: registration, credential verification, and
/// session-token resolution for the access gate.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account. Owns the plaintext buffers so they can be
    /// zeroized after hashing.
    async fn register(
        &self,
        email: &str,
        password: String,
        confirm: String,
    ) -> Result<Account, AppError>;

    /// Verify credentials and return the account. Unknown email and wrong
    /// password are indistinguishable to the caller.
    async fn authenticate(&self, email: &str, password: String) -> Result<Account, AppError>;

    /// Resolve a session token to a live account. `None` when the session
    /// is absent, expired, anonymous, or its account no longer resolves.
    async fn current_account(&self, token: &str) -> Option<Account>;
}
