//! Periodic refresh orchestration and mutation-driven cache invalidation.
//!
//! The coordinator owns the background tick, the visible script set, and the
//! wiring between mutating UI actions (execute, delete) and the last-run
//! cache. The UI layer talks to it through [`UiSink`] callbacks and the
//! `notify_*` hooks; it never touches the cache directly.
//!
//! Concurrency: a manual `refresh_all` and a background tick may interleave.
//! There is deliberately no mutual exclusion between them — every cache write
//! carries a fresh server-derived value, so the last writer for a key wins
//! and the table converges.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Duration, Instant, MissedTickBehavior};

use crate::config::RefreshConfig;
use crate::errors::FetchError;
use crate::lastrun::{ExecutionsApi, LastRunService};
use crate::types::{ExecutionRecord, ExecutionStats, ScriptId, ScriptInfo};

/// Which view the surrounding UI currently shows. Only `Scripts` drives the
/// last-run pipeline; the background tick still refreshes stats for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Scripts,
    Executions,
    Schedules,
}

/// Render callbacks exposed by the UI layer.
///
/// Every method must be total: an id that no longer corresponds to a visible
/// row is a no-op, never an error. In-flight work finishing after the UI is
/// gone must land harmlessly.
pub trait UiSink: Send + Sync {
    fn last_run(&self, script_id: ScriptId, record: Option<&ExecutionRecord>);
    fn stats(&self, stats: &ExecutionStats);
    fn script_listed(&self, scripts: &[ScriptInfo]);
    fn script_removed(&self, script_id: ScriptId);
}

struct CoordinatorInner {
    api: Arc<dyn ExecutionsApi>,
    lastrun: LastRunService,
    sink: Arc<dyn UiSink>,
    visible: Mutex<Vec<ScriptId>>,
    view: Mutex<ActiveView>,
    enabled: AtomicBool,
    busy: AtomicBool,
    tick_interval: Duration,
    settle_delay: Duration,
}

pub struct RefreshCoordinator {
    inner: Arc<CoordinatorInner>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshCoordinator {
    pub fn new(api: Arc<dyn ExecutionsApi>, sink: Arc<dyn UiSink>, cfg: &RefreshConfig) -> Self {
        let lastrun = LastRunService::new(api.clone(), cfg.cache_expiry(), cfg.batch_options());
        Self {
            inner: Arc::new(CoordinatorInner {
                api,
                lastrun,
                sink,
                visible: Mutex::new(Vec::new()),
                view: Mutex::new(ActiveView::Scripts),
                enabled: AtomicBool::new(true),
                busy: AtomicBool::new(false),
                tick_interval: cfg.tick_interval(),
                settle_delay: cfg.settle_delay(),
            }),
            tick_task: Mutex::new(None),
        }
    }

    /// Single-row lookup for the UI (one table cell).
    pub async fn resolve_last_run(
        &self,
        script_id: ScriptId,
    ) -> Result<Option<ExecutionRecord>, FetchError> {
        self.inner.lastrun.resolve(script_id).await
    }

    /// Replaces the visible set and resolves every id in paced batches,
    /// streaming rows to the sink as each batch settles.
    pub async fn refresh_visible(&self, ids: Vec<ScriptId>) {
        *self.inner.visible.lock().unwrap() = ids.clone();
        self.inner.refresh_rows(ids).await;
    }

    /// Full refresh: drop the whole cache, re-fetch the script list, then
    /// re-resolve every visible script.
    pub async fn refresh_all(&self) -> Result<(), FetchError> {
        let inner = &self.inner;
        inner.lastrun.invalidate_all();

        let scripts = inner.api.list_scripts().await?;
        let ids: Vec<ScriptId> = scripts.iter().map(|s| s.id).collect();
        *inner.visible.lock().unwrap() = ids.clone();
        inner.sink.script_listed(&scripts);

        inner.refresh_rows(ids).await;
        Ok(())
    }

    /// Fetches aggregate stats and pushes them to the sink. Failures are
    /// logged, never fatal.
    pub async fn refresh_stats(&self) {
        self.inner.refresh_stats().await;
    }

    /// Must be called after the UI executes a script. Drops the stale cache
    /// entry, waits for the backend to persist the new record, then pushes
    /// the refreshed row.
    pub async fn notify_executed(&self, script_id: ScriptId) {
        let inner = &self.inner;
        inner.lastrun.invalidate(script_id);
        sleep(inner.settle_delay).await;

        match inner.lastrun.resolve(script_id).await {
            Ok(record) => inner.sink.last_run(script_id, record.as_ref()),
            Err(err) => {
                // Row keeps its placeholder; the next refresh pass retries.
                tracing::warn!(
                    target: "runwatch.refresh",
                    script_id,
                    error = %err,
                    "post-execute refresh failed"
                );
            }
        }
    }

    /// Must be called after the UI deletes a script. The entry is evicted and
    /// the id leaves the visible set, so later passes never resolve it again.
    pub fn notify_deleted(&self, script_id: ScriptId) {
        let inner = &self.inner;
        inner.lastrun.invalidate(script_id);
        inner.visible.lock().unwrap().retain(|id| *id != script_id);
        inner.sink.script_removed(script_id);
    }

    /// Starts the background tick. No-op while already running.
    pub fn start(&self) {
        let mut task = self.tick_task.lock().unwrap();
        if task.is_some() {
            return;
        }

        let inner = self.inner.clone();
        let period = inner.tick_interval;
        *task = Some(tokio::spawn(async move {
            // First tick one full period out, matching the original UI timer.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                inner.tick().await;
            }
        }));
        tracing::info!(
            target: "runwatch.refresh",
            interval_ms = period.as_millis() as u64,
            "background refresh started"
        );
    }

    /// Stops the background tick. In-flight work is abandoned, which is safe:
    /// cache writes are idempotent and the sink is total.
    pub fn stop(&self) {
        if let Some(task) = self.tick_task.lock().unwrap().take() {
            task.abort();
            tracing::info!(target: "runwatch.refresh", "background refresh stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick_task.lock().unwrap().is_some()
    }

    /// Gates tick work without touching the timer; a disabled coordinator
    /// still polls on schedule and simply does nothing.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// Mirrors the UI's blocking modal / loading overlay; ticks are skipped
    /// (not queued) while busy.
    pub fn set_busy(&self, busy: bool) {
        self.inner.busy.store(busy, Ordering::SeqCst);
    }

    pub fn set_active_view(&self, view: ActiveView) {
        *self.inner.view.lock().unwrap() = view;
    }

    pub fn visible(&self) -> Vec<ScriptId> {
        self.inner.visible.lock().unwrap().clone()
    }
}

impl Drop for RefreshCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl CoordinatorInner {
    async fn refresh_rows(&self, ids: Vec<ScriptId>) {
        self.lastrun
            .refresh_visible(ids, |id, record| self.sink.last_run(id, record))
            .await;
    }

    async fn refresh_stats(&self) {
        match self.api.execution_stats().await {
            Ok(stats) => self.sink.stats(&stats),
            Err(err) => {
                tracing::warn!(
                    target: "runwatch.refresh",
                    error = %err,
                    "stats refresh failed"
                );
            }
        }
    }

    /// One background tick: stats always, last-run rows only on the scripts
    /// view, and never a forced invalidation — cache expiry decides what is
    /// actually re-fetched.
    async fn tick(&self) {
        if !self.enabled.load(Ordering::SeqCst) {
            tracing::trace!(target: "runwatch.refresh", "tick skipped (disabled)");
            return;
        }
        if self.busy.load(Ordering::SeqCst) {
            tracing::trace!(target: "runwatch.refresh", "tick skipped (ui busy)");
            return;
        }

        self.refresh_stats().await;

        let view = *self.view.lock().unwrap();
        if view == ActiveView::Scripts {
            let ids = self.visible.lock().unwrap().clone();
            self.refresh_rows(ids).await;
        }
    }
}
