use super::{AuthCleanupJob, Job, JobsConfig};
use crate::error::AppError;
use chrono::Utc;
use cron::Schedule;
use std::{str::FromStr, sync::Arc};
use tokio::{
    sync::{RwLock, broadcast, watch},
    task::JoinHandle,
    time::{Duration, sleep},
};
use tracing::{error, info, warn};

/// Job scheduler that manages periodic execution of jobs
pub struct JobScheduler {
    config: JobsConfig,
    handles: Arc<RwLock<Vec<JoinHandle<()>>>>,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_coordinator: Option<watch::Receiver<bool>>,
}

impl JobScheduler {
    pub fn new(config: JobsConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            config,
            handles: Arc::new(RwLock::new(Vec::new())),
            shutdown_tx,
            shutdown_coordinator: None,
        }
    }

    /// Create JobScheduler with graceful shutdown integration
    pub fn with_shutdown_coordinator(
        config: JobsConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let mut scheduler = Self::new(config);
        scheduler.shutdown_coordinator = Some(shutdown_rx);
        scheduler
    }

    /// Start the job scheduler with registered jobs
    pub async fn start(&self, jobs: Vec<Arc<dyn Job>>) -> Result<(), AppError> {
        if !self.config.enabled {
            info!("Job scheduler disabled in configuration");
            return Ok(());
        }

        info!("Starting job scheduler with {} jobs", jobs.len());

        let mut handles = self.handles.write().await;
        for job in jobs {
            let handle = self.spawn_job_with_schedule(job)?;
            handles.push(handle);
        }

        info!("Job scheduler started successfully");
        Ok(())
    }

    /// Stop the job scheduler and wait for running jobs
    pub async fn stop(&self) {
        info!("Stopping job scheduler...");

        if self.shutdown_tx.send(()).is_err() {
            // No receivers means no job was started
            return;
        }

        let mut handles = self.handles.write().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Job handle failed during shutdown: {}", e);
            }
        }

        info!("Job scheduler stopped");
    }

    /// Spawn a job with its configured schedule
    fn spawn_job_with_schedule(&self, job: Arc<dyn Job>) -> Result<JoinHandle<()>, AppError> {
        let cron = self.get_schedule_for_job(job.name())?;
        let schedule = parse_schedule(&cron)?;
        // Fail fast on expressions that never fire
        duration_until_next(&schedule)?;

        let job_name = job.name().to_string();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut coordinator_rx = self.shutdown_coordinator.clone();

        let handle = tokio::spawn(async move {
            info!("Job '{}' scheduled with cron '{}'", job_name, cron);

            loop {
                let delay = match duration_until_next(&schedule) {
                    Ok(delay) => delay,
                    Err(e) => {
                        error!("Job '{}' has no next execution: {}", job_name, e);
                        break;
                    }
                };

                tokio::select! {
                    _ = sleep(delay) => {
                        info!("Executing job '{}'", job_name);

                        match job.execute().await {
                            Ok(result) => {
                                if result.success {
                                    info!("Job '{}' completed: {}", job_name, result.message);
                                } else {
                                    warn!("Job '{}' failed: {}", job_name, result.message);
                                }
                            }
                            Err(e) => {
                                error!("Job '{}' execution error: {}", job_name, e);
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Job '{}' received internal shutdown signal", job_name);
                        break;
                    }
                    _ = async {
                        if let Some(ref mut coord_rx) = coordinator_rx {
                            coord_rx.changed().await.ok();
                            *coord_rx.borrow()
                        } else {
                            false
                        }
                    }, if coordinator_rx.is_some() => {
                        info!("Job '{}' received global shutdown signal", job_name);
                        break;
                    }
                }
            }

            info!("Job '{}' stopped", job_name);
        });

        Ok(handle)
    }

    /// Get the schedule configuration for a specific job
    fn get_schedule_for_job(&self, job_name: &str) -> Result<String, AppError> {
        match job_name {
            AuthCleanupJob::NAME => Ok(self.config.auth_cleanup.schedule.clone()),
            _ => Err(AppError::Internal(format!("Unknown job: {job_name}"))),
        }
    }
}

/// Parse a 6-field cron expression (sec min hour day month dow)
fn parse_schedule(cron: &str) -> Result<Schedule, AppError> {
    Schedule::from_str(cron)
        .map_err(|e| AppError::Internal(format!("Invalid cron expression '{cron}': {e}")))
}

/// Time until the next UTC execution of `schedule`
fn duration_until_next(schedule: &Schedule) -> Result<Duration, AppError> {
    let next_execution = schedule.upcoming(Utc).next().ok_or_else(|| {
        AppError::Internal("No upcoming execution found for cron expression".to_string())
    })?;

    (next_execution - Utc::now())
        .to_std()
        .map_err(|e| AppError::Internal(format!("Failed to convert duration: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{AuthCleanupConfig, JobResult};
    use async_trait::async_trait;

    fn create_test_scheduler() -> JobScheduler {
        JobScheduler::new(JobsConfig {
            enabled: true,
            auth_cleanup: AuthCleanupConfig {
                schedule: "0 0 3 * * *".to_string(),
            },
        })
    }

    struct NamedJob(&'static str);

    #[async_trait]
    impl Job for NamedJob {
        fn name(&self) -> &str {
            self.0
        }

        async fn execute(&self) -> Result<JobResult, AppError> {
            Ok(JobResult::success_with_count(0))
        }
    }

    #[test]
    fn test_valid_cron_expressions() {
        let test_cases = vec![
            "0 0 * * * *",     // Every hour
            "0 0 3 * * *",     // Daily at 3 AM
            "0 30 14 * * MON", // Every Monday at 2:30 PM
            "0 */15 * * * *",  // Every 15 minutes
        ];

        for cron_expr in test_cases {
            let schedule = parse_schedule(cron_expr).unwrap();
            let duration = duration_until_next(&schedule).unwrap();
            assert!(
                duration <= Duration::from_secs(7 * 24 * 3600),
                "Next run too far away for cron: {cron_expr}"
            );
        }
    }

    #[test]
    fn test_invalid_cron_expressions() {
        for cron_expr in ["", "invalid", "60 * * * * *", "0 0 25 * * *"] {
            assert!(
                parse_schedule(cron_expr).is_err(),
                "Should fail for invalid cron expression: {cron_expr}"
            );
        }
    }

    #[test]
    fn test_get_schedule_for_job() {
        let scheduler = create_test_scheduler();
        assert_eq!(
            scheduler.get_schedule_for_job("auth_cleanup").unwrap(),
            "0 0 3 * * *"
        );
        assert!(scheduler.get_schedule_for_job("unknown_job").is_err());
    }

    #[tokio::test]
    async fn test_start_rejects_unknown_job() {
        let scheduler = create_test_scheduler();
        let result = scheduler.start(vec![Arc::new(NamedJob("unknown_job"))]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let scheduler = create_test_scheduler();
        scheduler
            .start(vec![Arc::new(NamedJob(AuthCleanupJob::NAME))])
            .await
            .unwrap();
        assert_eq!(scheduler.handles.read().await.len(), 1);

        scheduler.stop().await;
        assert!(scheduler.handles.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_scheduler_spawns_nothing() {
        let scheduler = JobScheduler::new(JobsConfig {
            enabled: false,
            ..Default::default()
        });
        scheduler
            .start(vec![Arc::new(NamedJob(AuthCleanupJob::NAME))])
            .await
            .unwrap();
        assert!(scheduler.handles.read().await.is_empty());
    }
}
