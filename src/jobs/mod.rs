pub mod cleanup;
pub mod scheduler;

use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cleanup::AuthCleanupJob;
pub use scheduler::JobScheduler;

/// Configuration for the job system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Enable/disable internal job scheduler
    #[serde(default = "default_jobs_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub auth_cleanup: AuthCleanupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCleanupConfig {
    /// Cron schedule expression (sec min hour day month dow, UTC)
    #[serde(default = "default_auth_cleanup_schedule")]
    pub schedule: String,
}

fn default_jobs_enabled() -> bool {
    true
}

fn default_auth_cleanup_schedule() -> String {
    "0 0 3 * * *".to_string() // Daily at 3 AM
}

impl Default for AuthCleanupConfig {
    fn default() -> Self {
        Self {
            schedule: default_auth_cleanup_schedule(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: default_jobs_enabled(),
            auth_cleanup: AuthCleanupConfig::default(),
        }
    }
}

/// Result of job execution
#[derive(Debug, Clone)]
pub struct JobResult {
    pub success: bool,
    pub message: String,
    pub items_processed: u64,
}

impl JobResult {
    pub fn success_with_count(count: u64) -> Self {
        Self {
            success: true,
            message: format!("Successfully processed {count} items"),
            items_processed: count,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            items_processed: 0,
        }
    }
}

/// Trait for executable jobs
#[async_trait]
pub trait Job: Send + Sync {
    /// Get the job name for logging and identification
    fn name(&self) -> &str;

    /// Execute the job and return the result
    async fn execute(&self) -> Result<JobResult, AppError>;
}
