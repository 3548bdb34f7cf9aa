//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries out of the TTL
//! policy. Lazy expiry on read stays authoritative; the sweep only bounds
//! memory held by keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::PolicySet;

/// Spawns a background task that periodically removes expired TTL entries.
///
/// The task loops forever, sleeping for `cleanup_interval_secs` between
/// sweeps and taking the write lock only for the sweep itself.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let state = AppState::from_config(&config)?;
/// let cleanup_handle = spawn_cleanup_task(state.caches.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    caches: Arc<RwLock<PolicySet>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = caches.write().await;
                guard.ttl.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn caches_with_ttl(ttl_seconds: u64) -> Arc<RwLock<PolicySet>> {
        let config = Config {
            ttl_seconds,
            ..Config::default()
        };
        Arc::new(RwLock::new(PolicySet::from_config(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let caches = caches_with_ttl(1);

        caches
            .write()
            .await
            .ttl
            .set("expire_soon".to_string(), "value".to_string());

        let handle = spawn_cleanup_task(caches.clone(), 1);

        // Entry expires after 1s; the sweep at 2s must see it
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Physical count, so a lazy read cannot mask a missed sweep
        assert_eq!(caches.read().await.ttl.len(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let caches = caches_with_ttl(3600);

        caches
            .write()
            .await
            .ttl
            .set("long_lived".to_string(), "value".to_string());

        let handle = spawn_cleanup_task(caches.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut guard = caches.write().await;
            assert_eq!(
                guard.ttl.get(&"long_lived".to_string()),
                Some("value".to_string())
            );
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(caches_with_ttl(60), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
