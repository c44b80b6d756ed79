use std::sync::Arc;

use anyhow::Result;

use runwatch_core::config::AppConfig;
use runwatch_core::lastrun::ExecutionsApi;

use crate::backend::HttpExecutionsApi;

pub fn build_executions_api(cfg: &AppConfig) -> Result<Arc<dyn ExecutionsApi>> {
    let api = HttpExecutionsApi::new(
        cfg.server.base_url.clone(),
        cfg.server.api_key.clone(),
        cfg.server.timeout_ms,
    )?;
    Ok(Arc::new(api))
}
