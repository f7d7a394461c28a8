//! Client configuration.
//!
//! Settings come from a TOML file, then environment overrides, then defaults
//! for anything still unset:
//!
//! ```toml
//! base_url = "https://movies.example.com"
//! timeout_secs = 15
//! session_file = "/home/me/.moviefinder-session.json"
//! log_level = "debug"
//! ```
//!
//! | Variable                | Overrides                 |
//! |-------------------------|---------------------------|
//! | `MOVIEFINDER_CONFIG`    | config file location      |
//! | `MOVIEFINDER_BASE_URL`  | `base_url`                |
//! | `MOVIEFINDER_LOG`       | `log_level`               |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    error::{Error, Result},
    net::{self, ClientOptions, ClientOptionsBuilder},
};

pub const CONFIG_PATH_ENV: &str = "MOVIEFINDER_CONFIG";
pub const BASE_URL_ENV: &str = "MOVIEFINDER_BASE_URL";
pub const LOG_LEVEL_ENV: &str = "MOVIEFINDER_LOG";

/// Per-user data directory, e.g. `~/.local/share/moviefinder`.
static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moviefinder")
});

/// Where session and log files live by default.
pub fn data_dir() -> &'static Path {
    &DATA_DIR
}

/// Default config file location, e.g. `~/.config/moviefinder/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("moviefinder").join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Session file path; `None` means `<data dir>/session.json`
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    net::DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    net::DEFAULT_USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            session_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Parses a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Reads and parses the config file at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Loads the effective configuration.
    ///
    /// An explicit `path` (or `MOVIEFINDER_CONFIG`) must exist. Without one,
    /// the default config file is used if present and defaults apply
    /// otherwise. Environment overrides are applied last and the result is
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut config = match path.or(from_env.as_deref()) {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    /// Checks the base URL and timeout.
    pub fn validate(&self) -> Result<()> {
        net::normalize_base_url(&self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// The session file to use.
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| data_dir().join("session.json"))
    }

    /// HTTP settings for [`HttpClient::with_options`](crate::net::HttpClient::with_options).
    pub fn client_options(&self) -> Result<ClientOptions> {
        ClientOptionsBuilder::default()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            base_url = "https://movies.example.com/"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://movies.example.com/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.log_level, "info");

        let options = config.client_options().unwrap();
        assert_eq!(options.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Config::from_toml_str("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = Config {
            base_url: "localhost".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            BASE_URL_ENV => Some("https://override.example.com".to_string()),
            LOG_LEVEL_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://override.example.com");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn session_path_defaults_into_data_dir() {
        let config = Config::default();
        assert!(config.session_path().ends_with("session.json"));

        let config = Config {
            session_file: Some(PathBuf::from("/tmp/custom.json")),
            ..Config::default()
        };
        assert_eq!(config.session_path(), PathBuf::from("/tmp/custom.json"));
    }
}
