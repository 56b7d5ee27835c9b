// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Credential storage abstraction with flat-file implementation.
use std::{
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;

use crate::error::AppError;
use gatehouse_common::{AccountId, PublicAccount};

/// A stored account. Append-only: created once at registration, never
/// mutated or deleted afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier
    pub id: AccountId,
    /// Normalized (trimmed, lowercased) email, globally unique
    pub email: String,
    /// PHC-format hash string, only ever compared through the hasher
    pub password_hash: String,
    /// Set by the store at creation
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Projection handed to the render layer
    pub fn public(&self) -> PublicAccount {
        PublicAccount {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

// The hash never goes to logs, not even in debug output.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Trait for credential storage backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create an account. The uniqueness check and the insert are atomic
    /// per email: under concurrent calls for the same email exactly one
    /// succeeds and the others observe [`AppError::DuplicateEmail`].
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AppError>;

    /// Look up an account by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Look up an account by id
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AppError>;
}

/// Flat-file implementation of the [`CredentialStore`] trait.
///
/// One JSON document per account under `<root>/accounts/`. The email index
/// is rebuilt from those documents at startup; its entry reservation is the
/// uniqueness constraint under concurrent registration.
#[derive(Clone)]
pub struct FlatFileStore {
    root: PathBuf,
    email_index: Arc<DashMap<String, AccountId>>,
    next_id: Arc<AtomicU64>,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let accounts_dir = root.join("accounts");
        fs::create_dir_all(&accounts_dir)?;

        let email_index = DashMap::new();
        let mut max_id = 0u64;
        for entry in fs::read_dir(&accounts_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            let account: Account = serde_json::from_str(&content)?;
            max_id = max_id.max(account.id);
            email_index.insert(account.email.clone(), account.id);
        }

        Ok(Self {
            root,
            email_index: Arc::new(email_index),
            next_id: Arc::new(AtomicU64::new(max_id + 1)),
        })
    }

    fn account_path(&self, id: AccountId) -> PathBuf {
        self.root.join("accounts").join(format!("{id}.json"))
    }

    async fn read_account(&self, id: AccountId) -> Result<Option<Account>, AppError> {
        let path = self.account_path(id);
        let content = match tokio_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::from(e)),
        };
        let account: Account = serde_json::from_str(&content)?;
        Ok(Some(account))
    }
}

#[async_trait]
impl CredentialStore for FlatFileStore {
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        // Reserve the email before touching disk; the index entry is the
        // uniqueness constraint under concurrent registration.
        match self.email_index.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(AppError::DuplicateEmail),
            Entry::Vacant(slot) => {
                slot.insert(id);
            },
        }

        let account = Account {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        let json = match serde_json::to_string_pretty(&account) {
            Ok(json) => json,
            Err(e) => {
                self.email_index.remove(email);
                return Err(AppError::from(e));
            },
        };
        if let Err(e) = tokio_fs::write(self.account_path(id), json).await {
            // Roll the reservation back so the email is not burned.
            self.email_index.remove(email);
            return Err(AppError::from(e));
        }

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let id = match self.email_index.get(email) {
            Some(entry) => *entry,
            None => return Ok(None),
        };
        self.read_account(id).await
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AppError> {
        self.read_account(id).await
    }
}
