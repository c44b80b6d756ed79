//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `runwatch_core::api` instead of reaching into internal modules.

pub use crate::batch::{run_batched, BatchOptions};
pub use crate::cache::{CacheEntry, TimedCache};
pub use crate::config::{load_default, AppConfig, RefreshConfig, ServerConfig};
pub use crate::errors::FetchError;
pub use crate::lastrun::{ExecutionsApi, LastRunService};
pub use crate::refresh::{ActiveView, RefreshCoordinator, UiSink};
pub use crate::types::{ExecutionRecord, ExecutionStats, ScriptId, ScriptInfo, ScriptUsage};
