use super::{
    BlacklistStore, BookStore, OAUTH_STATE_TTL_MINUTES, StateStore, StorageError, StorageResult,
    hash_token,
};
use crate::database::entities::{Book, OAuthState};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, mapref::entry::Entry};

/// In-memory OAuth state store
pub struct MemoryStateStore {
    states: DashMap<String, OAuthState>,
    ttl: Duration,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(OAUTH_STATE_TTL_MINUTES))
    }

    /// Store with a custom lifetime; a negative TTL yields already expired states
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            states: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn create(&self, state: &str) -> StorageResult<OAuthState> {
        let now = Utc::now();
        let record = OAuthState {
            state: state.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        match self.states.entry(state.to_string()) {
            Entry::Occupied(_) => Err(StorageError::Duplicate(state.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_and_delete(&self, state: &str) -> StorageResult<Option<OAuthState>> {
        let now = Utc::now();
        Ok(self
            .states
            .remove_if(state, |_, record| record.expires_at > now)
            .map(|(_, record)| record))
    }

    async fn cleanup_expired(&self) -> StorageResult<u64> {
        let now = Utc::now();
        let mut removed = 0u64;
        self.states.retain(|_, record| {
            let keep = record.expires_at > now;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

/// In-memory token blacklist keyed by token hash
#[derive(Default)]
pub struct MemoryBlacklistStore {
    tokens: DashMap<String, DateTime<Utc>>,
}

impl MemoryBlacklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a revocation with an explicit timestamp
    pub fn blacklist_at(&self, token: &str, at: DateTime<Utc>) {
        self.tokens.entry(hash_token(token)).or_insert(at);
    }
}

#[async_trait]
impl BlacklistStore for MemoryBlacklistStore {
    async fn blacklist(&self, token: &str) -> StorageResult<()> {
        self.blacklist_at(token, Utc::now());
        Ok(())
    }

    async fn is_blacklisted(&self, token: &str) -> StorageResult<bool> {
        Ok(self.tokens.contains_key(&hash_token(token)))
    }

    async fn cleanup_before(&self, cutoff: DateTime<Utc>) -> StorageResult<u64> {
        let mut removed = 0u64;
        self.tokens.retain(|_, created_at| {
            let keep = *created_at >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

/// In-memory book store
#[derive(Default)]
pub struct MemoryBookStore {
    books: DashMap<String, Book>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: &Book) -> StorageResult<()> {
        match self.books.entry(book.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Duplicate(book.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(book.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Book>> {
        Ok(self.books.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_user_id(&self, user_id: &str) -> StorageResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(books)
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        Ok(self.books.remove(id).is_some())
    }
}
