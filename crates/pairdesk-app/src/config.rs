//! Application configuration.

use crate::error::{AppError, AppResult};
use pairdesk_api::ApiConfig;
use pairdesk_core::{Clock, SystemClock, TimeWindow, WindowSchedule, EVENING_WINDOW, MORNING_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PAIRDESK_CONFIG";

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "PAIRDESK_API_BASE_URL";

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Platform API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Base URL of the platform API (e.g., "https://api.example.com/api/").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the bearer token. Read on every request.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/".to_string()
}

fn default_token_env() -> String {
    "PAIRDESK_TOKEN".to_string()
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
        }
    }
}

/// Submission gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Gate recomputation interval (ms). Default: 1,000 (1 second).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Fixed UTC offset (minutes) for window times. None = host local time.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Daily submission windows. Default: 09:00-09:30 and 21:00-21:30.
    #[serde(default = "default_windows")]
    pub windows: Vec<TimeWindow>,
}

fn default_tick_interval_ms() -> u64 {
    1_000
}

fn default_windows() -> Vec<TimeWindow> {
    vec![MORNING_WINDOW, EVENING_WINDOW]
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            utc_offset_minutes: None,
            windows: default_windows(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub gate: GateConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Path resolution: explicit path > `PAIRDESK_CONFIG` > `config/default.toml`.
    /// A missing file falls back to defaults. `PAIRDESK_API_BASE_URL` overrides
    /// the configured base URL.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                config.api.base_url = base_url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml_str(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Check the base URL, tick interval and window schedule.
    pub fn validate(&self) -> AppResult<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "api.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.gate.tick_interval_ms == 0 {
            return Err(AppError::Config(
                "gate.tick_interval_ms must be positive".to_string(),
            ));
        }
        self.schedule()?;
        self.clock()?;
        Ok(())
    }

    /// Validated window schedule.
    pub fn schedule(&self) -> AppResult<WindowSchedule> {
        Ok(WindowSchedule::new(self.gate.windows.clone())?)
    }

    /// Clock for the gate: host local time, or the configured UTC offset.
    pub fn clock(&self) -> AppResult<Arc<dyn Clock>> {
        match self.gate.utc_offset_minutes {
            None => Ok(Arc::new(SystemClock::local())),
            Some(minutes) => SystemClock::with_utc_offset_minutes(minutes)
                .map(|clock| Arc::new(clock) as Arc<dyn Clock>)
                .ok_or_else(|| {
                    AppError::Config(format!("gate.utc_offset_minutes {minutes} out of range"))
                }),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.gate.tick_interval_ms)
    }

    /// Client configuration. The token is read from `api.token_env` on every call.
    pub fn api_config(&self) -> ApiConfig {
        let token_env = self.api.token_env.clone();
        ApiConfig::new(
            self.api.base_url.clone(),
            Arc::new(move || std::env::var(&token_env).ok()),
        )
    }
}
