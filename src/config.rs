//! Configuration management for geminic.
//!
//! Settings live in TOML at `~/.config/geminic/config.toml`. A project may
//! drop a `geminic.toml` next to its sources to override the style keys
//! (`emoji`, `i18n`) for that checkout only.
//!
//! - [`Config`] holds credentials, model selection, and output style
//! - [`load_config`] reads the global file and merges the local override
//! - [`load_global_config`] reads the global file alone, for editing
//! - [`config_or_default`] lets the `config` form open over a broken file
//! - [`save_config`] / [`save_local_config`] write them back
//!
//! # Example
//!
//! ```no_run
//! use geminic::config::{load_global_config, save_config};
//!
//! let mut config = load_global_config().unwrap();
//! config.emoji = true;
//! save_config(&config).unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Locale used when the config leaves `i18n` blank.
pub const DEFAULT_LOCALE: &str = "en";

/// Provider call timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// File name of the project-local override, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "geminic.toml";

/// Environment variable consulted when the config file has no API key.
pub const API_KEY_ENV: &str = "GEMINIC_API_KEY";

/// Which backend family serves generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAiCompatible,
}

impl ProviderKind {
    /// Maps the `model_provider` config value to a backend.
    ///
    /// Only `gemini` selects Gemini; blank or unknown values fall back to
    /// the OpenAI-compatible backend.
    pub fn from_config_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("gemini") {
            ProviderKind::Gemini
        } else {
            ProviderKind::OpenAiCompatible
        }
    }

    /// Value written back to `model_provider`.
    pub fn as_config_value(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAiCompatible => "openai",
        }
    }
}

/// User configuration for geminic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// API key for the selected provider.
    #[serde(default)]
    pub key: String,

    /// Model identifier (e.g., "gemini-2.0-flash", "gpt-4o-mini").
    #[serde(default)]
    pub model: String,

    /// Ask for a gitmoji alongside the commit type.
    #[serde(default)]
    pub emoji: bool,

    /// Base URL replacing the provider's default endpoint. Empty means default.
    #[serde(default)]
    pub custom_url: String,

    /// Natural language the commit subject is written in.
    #[serde(default = "default_locale")]
    pub i18n: String,

    /// `gemini` or anything else for an OpenAI-compatible endpoint.
    #[serde(default)]
    pub model_provider: String,

    /// Show the model's chain of thought above the generated message.
    #[serde(default)]
    pub cot: bool,

    /// Seconds to wait for the provider before giving up. Zero waits forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable debug logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Project-local overrides read from `./geminic.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<String>,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key: String::new(),
            model: String::new(),
            emoji: false,
            custom_url: String::new(),
            i18n: default_locale(),
            model_provider: String::new(),
            cot: false,
            timeout_secs: default_timeout_secs(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn provider_kind(&self) -> ProviderKind {
        ProviderKind::from_config_value(&self.model_provider)
    }

    /// Returns the custom base URL, if one is configured.
    pub fn custom_base_url(&self) -> Option<&str> {
        let url = self.custom_url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Locale for the generated subject, never blank.
    pub fn locale(&self) -> &str {
        let locale = self.i18n.trim();
        if locale.is_empty() {
            DEFAULT_LOCALE
        } else {
            locale
        }
    }

    /// Fails fast when generation cannot possibly succeed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }
        Ok(())
    }

    /// Applies the keys present in a project-local override.
    pub fn merge_local(&mut self, local: &LocalConfig) {
        if let Some(emoji) = local.emoji {
            self.emoji = emoji;
        }
        if let Some(i18n) = &local.i18n {
            self.i18n = i18n.clone();
        }
    }

    /// Stores a model picked from a provider listing.
    ///
    /// Gemini lists models as `models/<id>`; only `<id>` is kept.
    pub fn set_model(&mut self, model: &str) {
        self.model = model.trim_start_matches("models/").to_string();
    }
}

/// Returns the path to the global configuration file.
///
/// Typically `~/.config/geminic/config.toml` on Linux.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("geminic")
        .join("config.toml")
}

/// Returns the path to the project-local override in the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}

/// Loads the global config, merged with `./geminic.toml` when present.
///
/// Falls back to the `GEMINIC_API_KEY` environment variable when the file
/// does not hold a key.
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = load_config_from(&config_path(), Some(&local_config_path()))?;
    if config.key.trim().is_empty() {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.key = key;
        }
    }
    Ok(config)
}

/// Loads only the global file, as the `config` and `models` forms edit it.
pub fn load_global_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path(), None)
}

/// Result of a global load for the `config` form, which must still open
/// when the file is broken so the user can rewrite it.
///
/// An unreadable or malformed file is logged and replaced by defaults.
pub fn config_or_default(loaded: Result<Config, ConfigError>) -> Config {
    loaded.unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unusable config file, starting from defaults");
        Config::default()
    })
}

/// Loads configuration from explicit paths. A missing global file yields defaults.
pub fn load_config_from(path: &Path, local: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config: Config = match read_toml(path)? {
        Some(config) => config,
        None => {
            debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        }
    };

    if let Some(local_path) = local {
        if let Some(local_config) = read_toml::<LocalConfig>(local_path)? {
            debug!(path = %local_path.display(), "merging local config");
            config.merge_local(&local_config);
        }
    }

    Ok(config)
}

/// Loads only the project-local override, if it exists.
pub fn load_local_config(path: &Path) -> Result<LocalConfig, ConfigError> {
    Ok(read_toml(path)?.unwrap_or_default())
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Saves the global configuration, creating parent directories if needed.
pub fn save_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Saves the project-local override into the working directory.
pub fn save_local_config(local: &LocalConfig) -> Result<PathBuf, ConfigError> {
    let path = local_config_path();
    write_toml(local, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    write_toml(config, path)
}

fn write_toml<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let contents = toml::to_string_pretty(value).map_err(ConfigError::Serialize)?;
    std::fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_falls_back_to_openai() {
        assert_eq!(ProviderKind::from_config_value("gemini"), ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_config_value(" Gemini "), ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_config_value(""), ProviderKind::OpenAiCompatible);
        assert_eq!(ProviderKind::from_config_value("claude"), ProviderKind::OpenAiCompatible);
    }

    #[test]
    fn validate_requires_key_then_model() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingKey)));

        config.key = "secret".into();
        assert!(matches!(config.validate(), Err(ConfigError::MissingModel)));

        config.model = "gemini-2.0-flash".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: Config = toml::from_str("key = \"k\"\nmodel = \"m\"").unwrap();
        assert_eq!(config.i18n, "en");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.emoji);
        assert!(!config.cot);
    }

    #[test]
    fn blank_locale_reads_as_default() {
        let config = Config {
            i18n: "  ".into(),
            ..Config::default()
        };
        assert_eq!(config.locale(), "en");
    }

    #[test]
    fn merge_local_only_touches_present_keys() {
        let mut config = Config {
            emoji: true,
            i18n: "en".into(),
            ..Config::default()
        };
        config.merge_local(&LocalConfig {
            emoji: None,
            i18n: Some("zh-CN".into()),
        });
        assert!(config.emoji);
        assert_eq!(config.i18n, "zh-CN");
    }

    #[test]
    fn set_model_strips_listing_prefix() {
        let mut config = Config::default();
        config.set_model("models/gemini-2.0-flash");
        assert_eq!(config.model, "gemini-2.0-flash");
    }

    #[test]
    fn custom_base_url_ignores_blank() {
        let mut config = Config::default();
        assert_eq!(config.custom_base_url(), None);
        config.custom_url = "http://localhost:8080/v1".into();
        assert_eq!(config.custom_base_url(), Some("http://localhost:8080/v1"));
    }
}
