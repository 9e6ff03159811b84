// Service configuration: TOML file plus environment overrides
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub realtime: RealtimeSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_insights_timeout_ms")]
    pub insights_timeout_ms: u64,
    #[serde(default = "default_analysis_timeout_ms")]
    pub analysis_timeout_ms: u64,
    #[serde(default = "default_campaign_timeout_ms")]
    pub campaign_timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            insights_timeout_ms: default_insights_timeout_ms(),
            analysis_timeout_ms: default_analysis_timeout_ms(),
            campaign_timeout_ms: default_campaign_timeout_ms(),
        }
    }
}

impl BackendSettings {
    pub fn insights_timeout(&self) -> Duration {
        Duration::from_millis(self.insights_timeout_ms)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }

    pub fn campaign_timeout(&self) -> Duration {
        Duration::from_millis(self.campaign_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_insights_timeout_ms() -> u64 {
    5_000
}

fn default_analysis_timeout_ms() -> u64 {
    10_000
}

fn default_campaign_timeout_ms() -> u64 {
    120_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeSettings {
    /// How often the shared scheduler wakes up.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Refresh interval given to every newly rendered chart.
    #[serde(default = "default_chart_interval_ms")]
    pub default_interval_ms: u64,
    /// Sessions not looked up for this long are closed by the scheduler.
    #[serde(default = "default_session_ttl_ms")]
    pub session_ttl_ms: u64,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            default_interval_ms: default_chart_interval_ms(),
            session_ttl_ms: default_session_ttl_ms(),
        }
    }
}

impl RealtimeSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn default_interval(&self) -> Duration {
        Duration::from_millis(self.default_interval_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_millis(self.session_ttl_ms)
    }
}

fn default_tick_interval_ms() -> u64 {
    5_000
}

fn default_chart_interval_ms() -> u64 {
    3_000
}

fn default_session_ttl_ms() -> u64 {
    1_800_000
}

/// Load `config/tasteshift.*` (optional) with `TASTESHIFT__SECTION__KEY`
/// environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tasteshift").required(false))
        .add_source(
            config::Environment::with_prefix("TASTESHIFT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = Config::builder().build().unwrap().try_deserialize().unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.backend.insights_timeout(), Duration::from_secs(5));
        assert_eq!(config.backend.campaign_timeout(), Duration::from_secs(120));
        assert_eq!(config.realtime.tick_interval(), Duration::from_secs(5));
        assert_eq!(config.realtime.default_interval(), Duration::from_secs(3));
        assert_eq!(config.realtime.session_ttl(), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_partial_toml_overrides_selected_keys() {
        let toml = r#"
            [backend]
            base_url = "http://tasteshift.internal:5000"
            analysis_timeout_ms = 2500

            [realtime]
            tick_interval_ms = 1000
            session_ttl_ms = 600000
        "#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backend.base_url, "http://tasteshift.internal:5000");
        assert_eq!(config.backend.analysis_timeout(), Duration::from_millis(2500));
        assert_eq!(config.backend.insights_timeout_ms, 5_000);
        assert_eq!(config.realtime.tick_interval_ms, 1_000);
        assert_eq!(config.realtime.default_interval_ms, 3_000);
        assert_eq!(config.realtime.session_ttl(), Duration::from_secs(600));
    }
}
