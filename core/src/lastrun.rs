//! Last-run resolution: cache first, backend on miss, stale value on failure.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::batch::{run_batched, BatchOptions};
use crate::cache::TimedCache;
use crate::errors::FetchError;
use crate::types::{ExecutionRecord, ExecutionStats, ScriptId, ScriptInfo};

/// The remote script-runner backend, as seen by the core.
///
/// Implementations live outside this crate (the HTTP client in
/// `runwatch-plugins`, fakes in tests).
#[async_trait]
pub trait ExecutionsApi: Send + Sync {
    /// Most recent execution of `script_id`, or `None` if it never ran.
    /// Wraps `GET /scripts/{id}/executions/?limit=1`.
    async fn latest_execution(
        &self,
        script_id: ScriptId,
    ) -> Result<Option<ExecutionRecord>, FetchError>;

    /// All scripts known to the backend (`GET /scripts/db/`).
    async fn list_scripts(&self) -> Result<Vec<ScriptInfo>, FetchError>;

    /// Aggregate execution statistics (`GET /executions/stats/`).
    async fn execution_stats(&self) -> Result<ExecutionStats, FetchError>;
}

/// Resolves a script's most recent execution, consulting the timed cache
/// before the backend.
///
/// `None` is a meaningful cached value ("this script never ran"), so the
/// cache stores `Option<ExecutionRecord>` and a hit on a never-run script
/// also skips the network.
pub struct LastRunService {
    api: Arc<dyn ExecutionsApi>,
    cache: Mutex<TimedCache<ScriptId, Option<ExecutionRecord>>>,
    batch: BatchOptions,
}

impl LastRunService {
    pub fn new(
        api: Arc<dyn ExecutionsApi>,
        expiry: tokio::time::Duration,
        batch: BatchOptions,
    ) -> Self {
        Self {
            api,
            cache: Mutex::new(TimedCache::new(expiry)),
            batch,
        }
    }

    /// Resolves the last run for `script_id`.
    ///
    /// Fresh cache hit: returned without a network call. Miss or expired:
    /// fetched from the backend and written through the cache. Fetch failure
    /// with any cache entry (fresh or stale): the cached value is served and
    /// the error swallowed; the entry's timestamp is left alone so the next
    /// pass retries. Fetch failure with no entry at all propagates.
    pub async fn resolve(
        &self,
        script_id: ScriptId,
    ) -> Result<Option<ExecutionRecord>, FetchError> {
        if let Some(data) = self.fresh_hit(script_id) {
            tracing::debug!(target: "runwatch.lastrun", script_id, "cache hit");
            return Ok(data);
        }

        match self.api.latest_execution(script_id).await {
            Ok(record) => {
                let mut cache = self.cache.lock().unwrap();
                cache.put(script_id, record.clone());
                Ok(record)
            }
            Err(err) => {
                let cache = self.cache.lock().unwrap();
                if let Some(entry) = cache.get(&script_id) {
                    tracing::warn!(
                        target: "runwatch.lastrun",
                        script_id,
                        error = %err,
                        "backend fetch failed, serving stale last-run"
                    );
                    return Ok(entry.data.clone());
                }
                Err(err)
            }
        }
    }

    /// Resolves every id in `ids` in paced batches, invoking `on_resolved`
    /// for each script as its batch settles. Per-item failures (cold miss
    /// with a dead backend) degrade to `None` for that row only.
    pub async fn refresh_visible<F>(&self, ids: Vec<ScriptId>, mut on_resolved: F)
    where
        F: FnMut(ScriptId, Option<&ExecutionRecord>),
    {
        run_batched(
            ids,
            &self.batch,
            |id| async move {
                match self.resolve(id).await {
                    Ok(record) => (id, record),
                    Err(err) => {
                        tracing::warn!(
                            target: "runwatch.lastrun",
                            script_id = id,
                            error = %err,
                            "last-run lookup failed with no cached fallback"
                        );
                        (id, None)
                    }
                }
            },
            |results| {
                for (id, record) in &results {
                    on_resolved(*id, record.as_ref());
                }
            },
        )
        .await;
    }

    /// Drops the cache entry for one script.
    pub fn invalidate(&self, script_id: ScriptId) {
        self.cache.lock().unwrap().invalidate(&script_id);
    }

    /// Drops every cache entry.
    pub fn invalidate_all(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    fn fresh_hit(&self, script_id: ScriptId) -> Option<Option<ExecutionRecord>> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(&script_id)?;
        if cache.is_fresh(entry) {
            Some(entry.data.clone())
        } else {
            None
        }
    }
}
