use super::{
    BlacklistStore, BookStore, OAUTH_STATE_TTL_MINUTES, StateStore, StorageResult, hash_token,
};
use crate::database::{
    DatabaseManager,
    entities::{Book, OAuthState},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// OAuth state store backed by the `oauth_states` table
pub struct DatabaseStateStore {
    database: Arc<dyn DatabaseManager>,
    ttl: Duration,
}

impl DatabaseStateStore {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self {
            database,
            ttl: Duration::minutes(OAUTH_STATE_TTL_MINUTES),
        }
    }
}

#[async_trait]
impl StateStore for DatabaseStateStore {
    async fn create(&self, state: &str) -> StorageResult<OAuthState> {
        let now = Utc::now();
        Ok(self
            .database
            .oauth_states()
            .insert(state, now, now + self.ttl)
            .await?)
    }

    async fn find_and_delete(&self, state: &str) -> StorageResult<Option<OAuthState>> {
        Ok(self.database.oauth_states().take_unexpired(state).await?)
    }

    async fn cleanup_expired(&self) -> StorageResult<u64> {
        Ok(self.database.oauth_states().delete_expired().await?)
    }
}

/// Token blacklist backed by the `blacklisted_tokens` table
pub struct DatabaseBlacklistStore {
    database: Arc<dyn DatabaseManager>,
}

impl DatabaseBlacklistStore {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl BlacklistStore for DatabaseBlacklistStore {
    async fn blacklist(&self, token: &str) -> StorageResult<()> {
        Ok(self
            .database
            .blacklisted_tokens()
            .insert(&hash_token(token), Utc::now())
            .await?)
    }

    async fn is_blacklisted(&self, token: &str) -> StorageResult<bool> {
        Ok(self
            .database
            .blacklisted_tokens()
            .exists(&hash_token(token))
            .await?)
    }

    async fn cleanup_before(&self, cutoff: DateTime<Utc>) -> StorageResult<u64> {
        Ok(self.database.blacklisted_tokens().delete_before(cutoff).await?)
    }
}

/// Book store backed by the `books` table
pub struct DatabaseBookStore {
    database: Arc<dyn DatabaseManager>,
}

impl DatabaseBookStore {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl BookStore for DatabaseBookStore {
    async fn create(&self, book: &Book) -> StorageResult<()> {
        Ok(self.database.books().insert(book).await?)
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Book>> {
        Ok(self.database.books().find_by_id(id).await?)
    }

    async fn find_by_user_id(&self, user_id: &str) -> StorageResult<Vec<Book>> {
        Ok(self.database.books().find_by_user_id(user_id).await?)
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        Ok(self.database.books().delete(id).await? > 0)
    }
}
