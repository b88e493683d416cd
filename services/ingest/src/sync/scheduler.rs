//! Cron-driven background loop for the Contentful connector.
//!
//! Sleeps until the next fire time of `SYNC_CRON`, runs the connector, and
//! repeats. Overlap with on-demand runs is handled by the connector's own
//! run guard: a tick that lands on an active run is logged and skipped.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;

use super::service::SyncError;
use crate::connector::Connector;

pub const DEFAULT_SYNC_CRON: &str = "0 * * * *";

/// Parse a 5-field (minute-first) or 6/7-field (seconds-first) cron expression.
pub fn parse_schedule(expr: &str) -> Result<Schedule, String> {
    let trimmed = expr.trim();
    let normalized = if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    };
    Schedule::from_str(&normalized).map_err(|e| format!("invalid cron expression '{expr}': {e}"))
}

pub struct SyncScheduler {
    schedule: Schedule,
    connector: Arc<dyn Connector>,
}

impl SyncScheduler {
    pub fn new(schedule: Schedule, connector: Arc<dyn Connector>) -> Self {
        Self {
            schedule,
            connector,
        }
    }

    /// Build from `SYNC_CRON` (default hourly on the hour).
    pub fn from_env(connector: Arc<dyn Connector>) -> Result<Self, String> {
        let expr = std::env::var("SYNC_CRON")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYNC_CRON.to_string());
        Ok(Self::new(parse_schedule(&expr)?, connector))
    }

    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Spawn the loop. Runs until the schedule is exhausted or the task is aborted.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(source = self.connector.source_name(), "sync scheduler started");

            loop {
                let now = Utc::now();
                let Some(next) = self.next_fire_after(now) else {
                    tracing::warn!("cron schedule has no upcoming fire time, scheduler stopping");
                    return;
                };
                let wait = (next - now).to_std().unwrap_or_default();
                tracing::debug!(next = %next, wait_ms = wait.as_millis() as u64, "next scheduled sync");
                tokio::time::sleep(wait).await;

                self.tick().await;
            }
        })
    }

    async fn tick(&self) {
        let source = self.connector.source_name();
        match self.connector.sync().await {
            Ok(result) => {
                tracing::info!(
                    source,
                    processed = result.processed,
                    elapsed_ms = result.elapsed_ms,
                    "scheduled sync finished"
                );
            }
            Err(SyncError::AlreadyRunning) => {
                tracing::info!(source, "previous sync still running, skipping scheduled run");
            }
            Err(e) => {
                tracing::error!(source, error = %e, "scheduled sync failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::SyncResult;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingConnector {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        fn source_name(&self) -> &str {
            "test"
        }

        async fn sync(&self) -> Result<SyncResult, SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SyncResult::default())
        }
    }

    #[test]
    fn five_field_expression_gets_seconds_prepended() {
        let schedule = parse_schedule(DEFAULT_SYNC_CRON).expect("valid");
        let after = Utc.with_ymd_and_hms(2025, 9, 1, 10, 15, 30).unwrap();
        let next = schedule.after(&after).next().expect("next");
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 9, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn six_field_expression_is_used_as_is() {
        let schedule = parse_schedule("*/30 * * * * *").expect("valid");
        let after = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 5).unwrap();
        let next = schedule.after(&after).next().expect("next");
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 30).unwrap());
    }

    #[test]
    fn invalid_expression_is_rejected() {
        let err = parse_schedule("every hour").unwrap_err();
        assert!(err.contains("every hour"));
    }

    #[test]
    fn from_env_uses_default_when_unset() {
        let _guard = crate::test_support::ENV_LOCK
            .lock()
            .expect("env lock poisoned");
        std::env::remove_var("SYNC_CRON");

        let scheduler =
            SyncScheduler::from_env(Arc::new(CountingConnector::default())).expect("scheduler");
        let after = Utc.with_ymd_and_hms(2025, 9, 1, 23, 59, 0).unwrap();
        assert_eq!(
            scheduler.next_fire_after(after),
            Some(Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap())
        );

        std::env::set_var("SYNC_CRON", "not a cron");
        assert!(SyncScheduler::from_env(Arc::new(CountingConnector::default())).is_err());
        std::env::remove_var("SYNC_CRON");
    }

    #[tokio::test]
    async fn loop_invokes_connector_on_schedule() {
        let connector = Arc::new(CountingConnector::default());
        let schedule = parse_schedule("* * * * * *").expect("every second");
        let handle = SyncScheduler::new(schedule, connector.clone()).start();

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        handle.abort();

        assert!(connector.calls.load(Ordering::SeqCst) >= 1);
    }
}
