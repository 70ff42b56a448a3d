use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PanelConfig {
    #[serde(default = "default_panel_name")]
    pub panel_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for the daily rolling log file. Required for logging while the
    /// terminal UI owns the screen.
    #[serde(default)]
    pub log_directory: Option<String>,
    #[serde(default = "default_statistics_interval_secs")]
    pub statistics_interval_seconds: u64,
    #[serde(default = "default_uptime_interval_millis")]
    pub uptime_interval_millis: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_panel_name() -> String {
    "recpanel".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_statistics_interval_secs() -> u64 {
    60
}

fn default_uptime_interval_millis() -> u64 {
    1000
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            panel_name: default_panel_name(),
            base_url: default_base_url(),
            log_level: default_log_level(),
            log_directory: None,
            statistics_interval_seconds: default_statistics_interval_secs(),
            uptime_interval_millis: default_uptime_interval_millis(),
            request_timeout_secs: None,
        }
    }
}

impl PanelConfig {
    pub fn default_path() -> &'static str {
        "config/recpanel.toml"
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("failed to read configuration from {}", path_ref.display()))?;
        let mut config: Self = toml::from_str(&raw).with_context(|| {
            format!("failed to parse configuration from {}", path_ref.display())
        })?;
        if config.panel_name.trim().is_empty() {
            config.panel_name = default_panel_name();
        }
        if config.statistics_interval_seconds == 0 {
            anyhow::bail!("statistics_interval_seconds must be greater than zero");
        }
        if config.uptime_interval_millis == 0 {
            anyhow::bail!("uptime_interval_millis must be greater than zero");
        }
        Ok(config)
    }

    /// Loads the default path when it exists, otherwise falls back to built-in defaults.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new(Self::default_path());
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn statistics_interval(&self) -> Duration {
        Duration::from_secs(self.statistics_interval_seconds)
    }

    pub fn uptime_interval(&self) -> Duration {
        Duration::from_millis(self.uptime_interval_millis)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
