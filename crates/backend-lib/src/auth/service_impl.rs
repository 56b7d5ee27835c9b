use async_trait::async_trait;
use metrics::counter;
use zeroize::Zeroize;

use crate::auth::{password, AuthService, SessionManager};
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::{Account, CredentialStore};
use crate::validation;

/// Default [`AuthService`] implementation over a credential store and the
/// in-process session manager.
pub struct DefaultAuth<S> {
    store: S,
    sessions: SessionManager,
}

impl<S> DefaultAuth<S> {
    pub fn new(store: S, sessions: SessionManager) -> Self {
        Self { store, sessions }
    }
}

#[async_trait]
impl<S: CredentialStore + Clone + Send + Sync + 'static> AuthService for DefaultAuth<S> {
    async fn register(
        &self,
        email: &str,
        mut password: String,
        mut confirm: String,
    ) -> Result<Account, AppError> {
        let email = validation::normalize_email(email);
        validation::validate_signup(&email, &password, &confirm)?;
        confirm.zeroize();

        // Friendly pre-check; the store's reservation is the authority
        // under concurrent registration of the same email.
        if self.store.find_by_email(&email).await?.is_some() {
            password.zeroize();
            return Err(AppError::DuplicateEmail);
        }

        // The KDF is deliberately slow, keep it off the dispatch threads.
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password_secure(&mut password))
                .await
                .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
                .map_err(|e| AppError::Internal(e.to_string()))?;

        let account = self.store.create_account(&email, &password_hash).await?;

        counter!(keys::ACCOUNT_CREATED).increment(1);
        tracing::info!(account_id = account.id, "account registered");
        Ok(account)
    }

    async fn authenticate(&self, email: &str, mut password: String) -> Result<Account, AppError> {
        let email = validation::normalize_email(email);
        validation::validate_signin(&email, &password)?;

        let account = match self.store.find_by_email(&email).await? {
            Some(account) => account,
            None => {
                password.zeroize();
                counter!(keys::SIGNIN_FAILURE).increment(1);
                return Err(AppError::InvalidCredentials);
            },
        };

        let password_hash = account.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || {
            password::verify_password_secure(&password_hash, &mut password)
        })
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?
        .map_err(|e| AppError::Internal(e.to_string()))?;

        if !matched {
            counter!(keys::SIGNIN_FAILURE).increment(1);
            return Err(AppError::InvalidCredentials);
        }

        counter!(keys::SIGNIN_SUCCESS).increment(1);
        tracing::debug!(account_id = account.id, "sign-in verified");
        Ok(account)
    }

    async fn current_account(&self, token: &str) -> Option<Account> {
        let account_id = self.sessions.validate(token).await?;
        match self.store.find_by_id(account_id).await {
            Ok(Some(account)) => Some(account),
            // A session whose account no longer resolves is invalid, and a
            // storage fault during resolution fails closed.
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(%err, "account lookup failed during session resolution");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FlatFileStore;
    use tempfile::tempdir;

    fn service(dir: &std::path::Path) -> (DefaultAuth<FlatFileStore>, SessionManager) {
        let store = FlatFileStore::new(dir).unwrap();
        let sessions = SessionManager::new();
        (DefaultAuth::new(store, sessions.clone()), sessions)
    }

    #[tokio::test]
    async fn register_normalizes_email() {
        let dir = tempdir().unwrap();
        let (auth, _) = service(dir.path());

        let account = auth
            .register("  A@B.com ", "pw12345".into(), "pw12345".into())
            .await
            .unwrap();
        assert_eq!(account.email, "a@b.com");
        assert!(account.password_hash.starts_with("$scrypt$"));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_case_insensitively() {
        let dir = tempdir().unwrap();
        let (auth, _) = service(dir.path());

        auth.register("a@b.com", "pw12345".into(), "pw12345".into())
            .await
            .unwrap();
        let err = auth
            .register("A@B.COM", "other-pw".into(), "other-pw".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let dir = tempdir().unwrap();
        let (auth, _) = service(dir.path());

        let err = auth
            .register("", "pw12345".into(), "pw12345".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = auth
            .register("a@b.com", "pw12345".into(), "pw54321".into())
            .await
            .unwrap_err();
        assert_eq!(err.sanitized_message(), "Passwords do not match.");
    }

    #[tokio::test]
    async fn authenticate_accepts_correct_password_only() {
        let dir = tempdir().unwrap();
        let (auth, _) = service(dir.path());

        auth.register("a@b.com", "pw12345".into(), "pw12345".into())
            .await
            .unwrap();

        let account = auth.authenticate("A@B.com", "pw12345".into()).await.unwrap();
        assert_eq!(account.email, "a@b.com");

        let wrong = auth
            .authenticate("a@b.com", "pw54321".into())
            .await
            .unwrap_err();
        let unknown = auth
            .authenticate("nobody@b.com", "pw12345".into())
            .await
            .unwrap_err();
        // Same kind and message for both failure shapes
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.sanitized_message(), unknown.sanitized_message());
    }

    #[tokio::test]
    async fn current_account_resolves_live_sessions_only() {
        let dir = tempdir().unwrap();
        let (auth, sessions) = service(dir.path());

        let account = auth
            .register("a@b.com", "pw12345".into(), "pw12345".into())
            .await
            .unwrap();

        let token = sessions.create(account.id).await;
        let resolved = auth.current_account(&token).await.unwrap();
        assert_eq!(resolved.id, account.id);

        sessions.destroy(&token).await;
        assert!(auth.current_account(&token).await.is_none());

        // A session bound to an id with no stored account is invalid
        let orphan = sessions.create(account.id + 999).await;
        assert!(auth.current_account(&orphan).await.is_none());
    }
}
