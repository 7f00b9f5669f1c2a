use super::{Job, JobResult};
use crate::{
    error::AppError,
    storage::{BlacklistStore, StateStore},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Sweeps expired OAuth states and blacklist records that outlived every session token
pub struct AuthCleanupJob {
    states: Arc<dyn StateStore>,
    blacklist: Arc<dyn BlacklistStore>,
    token_ttl: Duration,
}

impl AuthCleanupJob {
    pub const NAME: &'static str = "auth_cleanup";

    pub fn new(
        states: Arc<dyn StateStore>,
        blacklist: Arc<dyn BlacklistStore>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            states,
            blacklist,
            token_ttl,
        }
    }
}

#[async_trait]
impl Job for AuthCleanupJob {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&self) -> Result<JobResult, AppError> {
        let mut total_cleaned = 0;
        let mut failures = Vec::new();

        // One failing sweep does not stop the other
        match self.states.cleanup_expired().await {
            Ok(count) => {
                info!("Cleaned up {} expired OAuth states", count);
                total_cleaned += count;
            }
            Err(e) => {
                error!(error = %e, "Failed to clean up expired OAuth states");
                failures.push(format!("oauth states: {}", e));
            }
        }

        let cutoff = Utc::now() - self.token_ttl;
        match self.blacklist.cleanup_before(cutoff).await {
            Ok(count) => {
                info!("Cleaned up {} blacklisted tokens older than {}", count, cutoff);
                total_cleaned += count;
            }
            Err(e) => {
                error!(error = %e, "Failed to clean up blacklisted tokens");
                failures.push(format!("blacklisted tokens: {}", e));
            }
        }

        if failures.is_empty() {
            Ok(JobResult::success_with_count(total_cleaned))
        } else {
            Ok(JobResult::failure(format!(
                "Cleanup incomplete ({} items removed): {}",
                total_cleaned,
                failures.join("; ")
            )))
        }
    }
}
