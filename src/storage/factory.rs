use super::{
    StorageError, StorageResult, Stores,
    database::{DatabaseBlacklistStore, DatabaseBookStore, DatabaseStateStore},
};
use crate::config::Config;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use std::sync::Arc;
use tracing::info;

/// Storage backend types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Database,
}

impl StorageBackend {
    pub fn from_config(config: &Config) -> Self {
        if config.storage.is_memory() {
            StorageBackend::Memory
        } else {
            StorageBackend::Database
        }
    }
}

/// Stores plus the database manager behind them, if any
pub struct StorageHandles {
    pub stores: Stores,
    pub database: Option<Arc<DatabaseManagerImpl>>,
}

/// Storage factory for creating the configured backend
pub struct StorageFactory;

impl StorageFactory {
    /// Create storage from application config
    pub async fn create_from_config(config: &Config) -> StorageResult<StorageHandles> {
        match StorageBackend::from_config(config) {
            StorageBackend::Memory => {
                info!("Using in-memory storage; data is lost on restart");
                Ok(StorageHandles {
                    stores: Stores::memory(),
                    database: None,
                })
            }
            StorageBackend::Database => {
                let manager = DatabaseManagerImpl::new_from_config(config)
                    .await
                    .map_err(StorageError::from)?;

                // Run database migrations if enabled
                if config.database.migration_on_startup {
                    manager.migrate().await.map_err(StorageError::from)?;
                }

                let manager = Arc::new(manager);
                Ok(StorageHandles {
                    stores: Stores::database(manager.clone()),
                    database: Some(manager),
                })
            }
        }
    }
}

impl Stores {
    /// Stores persisted through the given database manager
    pub fn database(database: Arc<dyn DatabaseManager>) -> Self {
        Self {
            states: Arc::new(DatabaseStateStore::new(database.clone())),
            blacklist: Arc::new(DatabaseBlacklistStore::new(database.clone())),
            books: Arc::new(DatabaseBookStore::new(database)),
        }
    }
}
