use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::constants;

/// Tool settings saved as JSON next to other user config
/// Env vars override whatever the file says
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Seconds to wait for each published config before falling back
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_draft_dir")]
    pub draft_dir: PathBuf,

    /// SQLite database used by the hospital migration
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_api_base_url() -> String {
    constants::api::DEFAULT_BASE_URL.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    constants::timeout::DEFAULT_FETCH_SECS
}

fn default_draft_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(constants::config::APP_DIR);
    path.push(constants::config::DRAFTS_DIR);
    path
}

fn default_database_path() -> PathBuf {
    PathBuf::from(constants::migration::DEFAULT_DATABASE_PATH)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            draft_dir: default_draft_dir(),
            database_path: default_database_path(),
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load settings from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::path())?;
        settings.apply_env_overrides();
        settings.validate_and_clamp();
        Ok(settings)
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing. A file that exists but does not parse is an error; it is left
    /// untouched for the user to fix.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<Settings>(&contents).map_err(|e| {
                error!(path = %path.display(), error = %e, "Failed to parse settings file");
                anyhow::anyhow!(e).context(format!("Failed to parse settings from {}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No settings file, using defaults");
                Settings::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read settings from {}", path.display()));
            }
        };

        settings.validate_and_clamp();
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, contents).with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(constants::env::API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Ok(raw) = env::var(constants::env::FETCH_TIMEOUT_SECS) {
            match raw.trim().parse() {
                Ok(secs) => self.fetch_timeout_secs = secs,
                Err(e) => error!(var = constants::env::FETCH_TIMEOUT_SECS, value = %raw, error = ?e, "failed to parse env var"),
            }
        }
        if let Ok(dir) = env::var(constants::env::DRAFT_DIR) {
            self.draft_dir = PathBuf::from(dir);
        }
        if let Ok(db) = env::var(constants::env::DATABASE_URL) {
            self.database_path = PathBuf::from(db.strip_prefix("sqlite://").unwrap_or(&db));
        }
    }

    fn validate_and_clamp(&mut self) {
        use constants::timeout::{MAX_FETCH_SECS, MIN_FETCH_SECS};

        if self.fetch_timeout_secs < MIN_FETCH_SECS {
            warn!(fetch_timeout_secs = self.fetch_timeout_secs, min = MIN_FETCH_SECS, "fetch_timeout_secs below minimum, clamping");
            self.fetch_timeout_secs = MIN_FETCH_SECS;
        } else if self.fetch_timeout_secs > MAX_FETCH_SECS {
            warn!(fetch_timeout_secs = self.fetch_timeout_secs, max = MAX_FETCH_SECS, "fetch_timeout_secs exceeds maximum, clamping");
            self.fetch_timeout_secs = MAX_FETCH_SECS;
        }

        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            warn!(using = constants::api::DEFAULT_BASE_URL, "api_base_url empty, using default");
            self.api_base_url = default_api_base_url();
        } else if trimmed != self.api_base_url {
            self.api_base_url = trimmed.to_string();
        }
    }
}
