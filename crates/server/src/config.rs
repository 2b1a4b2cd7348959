use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use assistant::{gemini, GeminiConfig};
use portal::OccupancyConfig;
use serde::Deserialize;
use url::Url;

use crate::api::DEFAULT_SESSION_IDLE;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub occupancy_tick_ms: u64,
    pub occupancy_seed: Option<u64>,
    pub session_idle_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8443".into(),
            gemini_api_key: None,
            gemini_model: gemini::DEFAULT_MODEL.into(),
            gemini_base_url: gemini::DEFAULT_BASE_URL.into(),
            occupancy_tick_ms: 2_000,
            occupancy_seed: None,
            session_idle_secs: DEFAULT_SESSION_IDLE.as_secs(),
        }
    }
}

/// Keys accepted in `server.toml`; all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    bind_addr: Option<String>,
    gemini_api_key: Option<String>,
    gemini_model: Option<String>,
    gemini_base_url: Option<String>,
    occupancy_tick_ms: Option<u64>,
    occupancy_seed: Option<u64>,
    session_idle_secs: Option<u64>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.gemini_api_key {
                    settings.gemini_api_key = Some(v);
                }
                if let Some(v) = file_cfg.gemini_model {
                    settings.gemini_model = v;
                }
                if let Some(v) = file_cfg.gemini_base_url {
                    settings.gemini_base_url = v;
                }
                if let Some(v) = file_cfg.occupancy_tick_ms {
                    settings.occupancy_tick_ms = v;
                }
                if let Some(v) = file_cfg.occupancy_seed {
                    settings.occupancy_seed = Some(v);
                }
                if let Some(v) = file_cfg.session_idle_secs {
                    settings.session_idle_secs = v;
                }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring malformed settings file");
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("GEMINI_API_KEY") {
        settings.gemini_api_key = Some(v);
    }
    if let Some(v) = env("APP__GEMINI_API_KEY") {
        settings.gemini_api_key = Some(v);
    }
    if let Some(v) = env("APP__GEMINI_MODEL") {
        settings.gemini_model = v;
    }
    if let Some(v) = env("APP__GEMINI_BASE_URL") {
        settings.gemini_base_url = v;
    }

    if let Some(v) = env("APP__OCCUPANCY_TICK_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.occupancy_tick_ms = parsed;
        }
    }
    if let Some(v) = env("APP__OCCUPANCY_SEED") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.occupancy_seed = Some(parsed);
        }
    }

    if let Some(v) = env("APP__SESSION_IDLE_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.session_idle_secs = parsed;
        }
    }

    settings
}

impl Settings {
    /// `None` when no API key is set; the assistant then only apologizes.
    pub fn gemini_config(&self) -> anyhow::Result<Option<GeminiConfig>> {
        let Some(api_key) = self
            .gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        else {
            return Ok(None);
        };
        let base_url = Url::parse(&self.gemini_base_url)
            .with_context(|| format!("invalid gemini base url '{}'", self.gemini_base_url))?;
        Ok(Some(GeminiConfig {
            api_key: api_key.to_string(),
            model: self.gemini_model.clone(),
            base_url,
        }))
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs.max(1))
    }

    pub fn occupancy_config(&self) -> OccupancyConfig {
        OccupancyConfig {
            tick: Duration::from_millis(self.occupancy_tick_ms.max(1)),
            seed: self.occupancy_seed,
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
