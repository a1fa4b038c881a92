use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskboard_client::{DEFAULT_BASE_URL, LOGIN_ROUTE, Url};
use taskboard_core::TOAST_LIMIT;

const CONFIG_DIR: &str = "taskboard";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";

/// Environment variable overriding [`ClientConfig::api_base_url`].
pub const API_URL_ENV: &str = "TASKBOARD_API_URL";

/// Delay before a dismissed toast is dropped from the queue.
pub const DEFAULT_TOAST_REMOVE_DELAY_MS: u64 = 1_000_000;

/// Client configuration loaded from `<config_dir>/taskboard/config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API, e.g. `http://localhost:8080/api`.
    pub api_base_url: String,
    /// Where tokens are persisted; defaults to the platform data directory.
    pub session_file: Option<PathBuf>,
    /// Route the client is sent to when the session expires.
    pub login_route: String,
    /// Notification queue settings.
    pub toast: ToastConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_owned(),
            session_file: None,
            login_route: LOGIN_ROUTE.to_owned(),
            toast: ToastConfig::default(),
        }
    }
}

/// `[toast]` block.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Milliseconds between dismissal and removal.
    pub remove_delay_ms: u64,
    /// Queue capacity; only 1 is supported.
    pub limit: usize,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            remove_delay_ms: DEFAULT_TOAST_REMOVE_DELAY_MS,
            limit: TOAST_LIMIT,
        }
    }
}

impl ToastConfig {
    /// Removal delay as a [`Duration`].
    #[must_use]
    pub const fn remove_delay(&self) -> Duration {
        Duration::from_millis(self.remove_delay_ms)
    }
}

impl ClientConfig {
    /// Default location of the configuration file, if the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from `explicit` or the default location, then apply
    /// the environment override.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                Self::parse_file(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::parse_file(&path)?,
                _ => Self::default(),
            },
        };
        let config = config.with_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a known file; missing files yield defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Replace the base URL when `value` is non-empty.
    #[must_use]
    pub fn with_api_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_owned();
        }
        self
    }

    /// Resolved session file location.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(CONFIG_DIR)
                .join(SESSION_FILE)
        })
    }

    /// Check the values that would otherwise fail later at request time.
    ///
    /// # Errors
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("api_base_url '{}' is not a valid URL", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api_base_url must use http or https, got '{}'", url.scheme());
        }
        if self.toast.limit != TOAST_LIMIT {
            bail!(
                "toast.limit must be {TOAST_LIMIT}, got {}",
                self.toast.limit
            );
        }
        if !self.login_route.starts_with('/') {
            bail!("login_route must start with '/', got '{}'", self.login_route);
        }
        Ok(())
    }
}
