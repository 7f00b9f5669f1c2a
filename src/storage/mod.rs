//! Store contracts for OAuth state, revoked session tokens and books
//!
//! Every contract has an in-memory implementation ([`memory`]) and a
//! persistent one backed by the sea-orm DAOs ([`database`]). Handlers and
//! services only ever see the trait objects collected in [`Stores`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

use crate::database::{
    DatabaseError,
    entities::{Book, OAuthState},
};

pub mod config;
pub mod database;
pub mod factory;
pub mod memory;

pub use config::StorageConfig;
pub use factory::StorageFactory;

/// Lifetime of an OAuth state value
pub const OAUTH_STATE_TTL_MINUTES: i64 = 15;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Duplicate key: {0}")]
    Duplicate(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<DatabaseError> for StorageError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Constraint(msg) => StorageError::Duplicate(msg),
            other => StorageError::Backend(other.to_string()),
        }
    }
}

/// One-time, time-limited OAuth state values
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Persist a new state value valid for the store's TTL
    async fn create(&self, state: &str) -> StorageResult<OAuthState>;

    /// Atomically take an unexpired state. `None` when there is no unexpired match.
    async fn find_and_delete(&self, state: &str) -> StorageResult<Option<OAuthState>>;

    /// Remove expired records, returning how many were removed
    async fn cleanup_expired(&self) -> StorageResult<u64>;
}

/// Revoked session tokens
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Record a token as revoked. Revoking twice is not an error.
    async fn blacklist(&self, token: &str) -> StorageResult<()>;

    async fn is_blacklisted(&self, token: &str) -> StorageResult<bool>;

    /// Remove records blacklisted before `cutoff`
    async fn cleanup_before(&self, cutoff: DateTime<Utc>) -> StorageResult<u64>;
}

/// Book records
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, book: &Book) -> StorageResult<()>;

    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Book>>;

    /// Books owned by `user_id`, newest first
    async fn find_by_user_id(&self, user_id: &str) -> StorageResult<Vec<Book>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: &str) -> StorageResult<bool>;
}

/// Blacklist key for a session token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The set of stores a server instance runs against
#[derive(Clone)]
pub struct Stores {
    pub states: Arc<dyn StateStore>,
    pub blacklist: Arc<dyn BlacklistStore>,
    pub books: Arc<dyn BookStore>,
}

impl Stores {
    /// Process-local stores, lost on restart
    pub fn memory() -> Self {
        Self {
            states: Arc::new(memory::MemoryStateStore::new()),
            blacklist: Arc::new(memory::MemoryBlacklistStore::new()),
            books: Arc::new(memory::MemoryBookStore::new()),
        }
    }
}
