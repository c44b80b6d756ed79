use std::path::Path;

use super::types::AppConfig;

pub fn load_default() -> anyhow::Result<AppConfig> {
    let mut cfg: AppConfig = if Path::new("config.toml").exists() {
        let s = std::fs::read_to_string("config.toml")?;
        toml::from_str::<AppConfig>(&s)?
    } else {
        AppConfig::default()
    };

    if let Ok(v) = std::env::var("RUNWATCH_BASE_URL") {
        if !v.trim().is_empty() {
            cfg.server.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("RUNWATCH_API_KEY") {
        if !v.trim().is_empty() {
            cfg.server.api_key = v;
        }
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_documented_policy() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.refresh.cache_expiry_ms, 60_000);
        assert_eq!(cfg.refresh.batch_size, 10);
        assert_eq!(cfg.refresh.inter_batch_delay_ms, 100);
        assert_eq!(cfg.refresh.tick_interval_ms, 30_000);
        assert_eq!(cfg.server.timeout_ms, 10_000);
    }

    #[test]
    fn env_override_takes_precedence() {
        std::env::set_var("RUNWATCH_BASE_URL", "http://override:1234");
        let cfg = load_default().unwrap();
        std::env::remove_var("RUNWATCH_BASE_URL");
        assert_eq!(cfg.server.base_url, "http://override:1234");
    }

    #[test]
    fn partial_toml_falls_back_per_field() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            base_url = "http://scripts.internal:9000"

            [refresh]
            batch_size = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.base_url, "http://scripts.internal:9000");
        assert_eq!(cfg.server.timeout_ms, 10_000);
        assert_eq!(cfg.refresh.batch_size, 4);
        assert_eq!(cfg.refresh.cache_expiry_ms, 60_000);
    }
}
