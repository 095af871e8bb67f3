//! App configuration: comment service location, identity, logging, the
//! library the start view lists and an optional screen to open at launch.

use crate::api::Track;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONFIG_PATH_ENV: &str = "PLAYSCREEN_CONFIG";
pub const COMMENT_API_ENV: &str = "PLAYSCREEN_COMMENT_API";
pub const USERNAME_ENV: &str = "PLAYSCREEN_USERNAME";

const MIN_POLL_MS: u64 = 100;
const MAX_POLL_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_comment_api_base_url")]
    pub comment_api_base_url: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_progress_poll_ms")]
    pub progress_poll_ms: u64,
    #[serde(default)]
    pub library: Vec<Track>,
    /// Untyped `{ tracks, track }` navigation payload. When present and
    /// valid, the app starts on the playback screen.
    #[serde(default)]
    pub now_playing: Option<Value>,
}

fn default_comment_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_username() -> String {
    "guest".to_string()
}

fn default_log_filter() -> String {
    "playscreen=info".to_string()
}

fn default_progress_poll_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            comment_api_base_url: default_comment_api_base_url(),
            username: default_username(),
            log_filter: default_log_filter(),
            progress_poll_ms: default_progress_poll_ms(),
            library: Vec::new(),
            now_playing: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.normalize();
        Ok(config)
    }

    /// Reads the file named by `PLAYSCREEN_CONFIG` (native targets only), then
    /// applies env overrides. Falls back to defaults on any failure.
    pub fn load() -> Self {
        let mut config = Self::load_file().unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.normalize();
        config
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_file() -> Option<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok()?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%path, %error, "could not read config file, using defaults");
                return None;
            }
        };
        match Self::from_json(&raw) {
            Ok(config) => Some(config),
            Err(error) => {
                tracing::warn!(%path, %error, "invalid config file, using defaults");
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn load_file() -> Option<Self> {
        None
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(COMMENT_API_ENV).filter(|v| !v.trim().is_empty()) {
            self.comment_api_base_url = url;
        }
        if let Some(username) = lookup(USERNAME_ENV).filter(|v| !v.trim().is_empty()) {
            self.username = username;
        }
    }

    fn normalize(&mut self) {
        self.comment_api_base_url = self
            .comment_api_base_url
            .trim()
            .trim_end_matches('/')
            .to_string();
        self.username = self.username.trim().to_string();
        if self.username.is_empty() {
            self.username = default_username();
        }
        self.progress_poll_ms = self.progress_poll_ms.clamp(MIN_POLL_MS, MAX_POLL_MS);
    }
}
