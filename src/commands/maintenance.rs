use crate::{
    Config,
    jobs::{AuthCleanupJob, Job},
    storage::StorageFactory,
};
use clap::Subcommand;
use tracing::{info, warn};

#[derive(Subcommand, Debug)]
pub enum MaintenanceTask {
    /// Delete expired OAuth states and blacklist entries older than the token lifetime
    Cleanup,
}

pub async fn handle_maintenance_command(
    task: MaintenanceTask,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    // The blacklist cutoff derives from the token lifetime
    config.validate()?;

    match task {
        MaintenanceTask::Cleanup => {
            let token_ttl = config
                .jwt
                .token_ttl()
                .ok_or("jwt.token_ttl_hours is out of range")?;
            let storage = StorageFactory::create_from_config(config).await?;
            let job = AuthCleanupJob::new(
                storage.stores.states.clone(),
                storage.stores.blacklist.clone(),
                token_ttl,
            );

            info!("Running {} once...", job.name());
            let result = job.execute().await?;
            if result.success {
                info!(
                    "Cleanup completed: {} records removed",
                    result.items_processed
                );
            } else {
                warn!("Cleanup finished with errors: {}", result.message);
                return Err(result.message.into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEST_SECRET: &str = "dGVzdF9zZWNyZXRfZm9yX2p3dF90ZXN0aW5nXzMyYnl0ZXM=";

    fn file_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.jwt.secret = TEST_SECRET.to_string();
        config.database.url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("pages.db").display()
        );
        config
    }

    #[tokio::test]
    async fn test_cleanup_on_memory_database() {
        let mut config = Config::default();
        config.jwt.secret = TEST_SECRET.to_string();
        config.database.url = "sqlite::memory:".to_string();

        let result = handle_maintenance_command(MaintenanceTask::Cleanup, &config).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_keeps_live_blacklist_entries() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        let storage = StorageFactory::create_from_config(&config).await.unwrap();
        storage
            .stores
            .blacklist
            .blacklist("just-logged-out")
            .await
            .unwrap();

        handle_maintenance_command(MaintenanceTask::Cleanup, &config)
            .await
            .unwrap();

        assert!(
            storage
                .stores
                .blacklist
                .is_blacklisted("just-logged-out")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_cleanup_refuses_invalid_token_ttl() {
        let dir = TempDir::new().unwrap();
        let mut config = file_config(&dir);

        let storage = StorageFactory::create_from_config(&config).await.unwrap();
        storage
            .stores
            .blacklist
            .blacklist("just-logged-out")
            .await
            .unwrap();

        config.jwt.token_ttl_hours = 0;
        let result = handle_maintenance_command(MaintenanceTask::Cleanup, &config).await;
        assert!(result.is_err());
        assert!(
            storage
                .stores
                .blacklist
                .is_blacklisted("just-logged-out")
                .await
                .unwrap()
        );
    }
}
