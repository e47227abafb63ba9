//! Client configuration.
//!
//! Configuration is layered: defaults, then an optional YAML file, then the
//! `GEMINI_API_KEY` and `GEMINI_MODEL` environment variables, then whatever
//! the caller overrides (usually command-line arguments).  [`ConfigLoader`]
//! remembers how to rebuild the result so a change notification can refresh
//! a running client in place.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Endpoint prefix; the model and method are appended per request.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Language answers are requested in when none is configured.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Client-side request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the model id.
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Name of the API key setting, used in call-to-action messages.
pub const API_KEY_SETTING: &str = "api_key";

/// Configuration for the Gemini client.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Secret API key.  Empty means "not configured".
    pub api_key: String,

    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,

    /// Base URL the model path is appended to.
    pub base_url: String,

    /// Language the prompt templates ask the model to answer in.
    pub language: String,

    /// Request timeout, in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Creates a configuration with default values and no API key.
    pub fn new() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the response language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the request timeout.  Sub-second precision is dropped.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// The request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True if an API key has been provided.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Returns a configuration error unless an API key is set.
    pub fn require_api_key(&self) -> Result<&str> {
        if self.has_api_key() {
            Ok(self.api_key.trim())
        } else {
            Err(Error::config(
                format!("Gemini API key is not configured; set it in the configuration or {API_KEY_ENV}"),
                Some(API_KEY_SETTING.to_string()),
            ))
        }
    }

    /// Reads a YAML configuration file.  Missing fields take default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::io(
                format!("failed to read configuration {}", path.display()),
                err,
            )
        })?;
        let mut config: Self = serde_yaml::from_str(&content)?;
        config.fill_blanks();
        Ok(config)
    }

    /// Applies `GEMINI_API_KEY` and `GEMINI_MODEL` when they are set and non-empty.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| env::var(name).ok())
    }

    fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = api_key;
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.model = model;
        }
        self
    }

    // A YAML file that sets `model: ""` should behave like one that omits it.
    fn fill_blanks(&mut self) {
        let defaults = Self::new();
        if self.model.trim().is_empty() {
            self.model = defaults.model;
        }
        if self.base_url.trim().is_empty() {
            self.base_url = defaults.base_url;
        }
        if self.language.trim().is_empty() {
            self.language = defaults.language;
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = defaults.timeout_secs;
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Renders a secret for display: empty stays visibly empty, anything else
/// keeps at most its last four characters.
pub fn mask_secret(secret: &str) -> String {
    let secret = secret.trim();
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// The default configuration file location.
///
/// `$XDG_CONFIG_HOME/geminius/config.yaml`, falling back to
/// `$HOME/.config/geminius/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("geminius").join("config.yaml"))
}

/// Overrides applied on top of file and environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Model override.
    pub model: Option<String>,
    /// Response language override.
    pub language: Option<String>,
}

/// Rebuilds a [`GeminiConfig`] from its sources on demand.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    required: bool,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// A loader that reads the default configuration path if it exists.
    pub fn new() -> Self {
        Self {
            path: default_config_path(),
            required: false,
            overrides: ConfigOverrides::default(),
        }
    }

    /// A loader that reads the given file, which must exist.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            required: true,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Sets the overrides applied last.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The configuration file this loader reads, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The overrides applied last.
    pub fn overrides(&self) -> &ConfigOverrides {
        &self.overrides
    }

    /// Builds the configuration from defaults, file, environment and overrides.
    pub fn load(&self) -> Result<GeminiConfig> {
        let base = match &self.path {
            Some(path) if self.required || path.exists() => GeminiConfig::from_file(path)?,
            _ => GeminiConfig::new(),
        };
        let mut config = base.apply_env();
        if let Some(model) = self.overrides.model.as_ref().filter(|m| !m.trim().is_empty()) {
            config.model = model.clone();
        }
        if let Some(language) = self
            .overrides
            .language
            .as_ref()
            .filter(|l| !l.trim().is_empty())
        {
            config.language = language.clone();
        }
        tracing::debug!(?config, path = ?self.path, "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = GeminiConfig::new();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.language, "English");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.has_api_key());
    }

    #[test]
    fn require_api_key() {
        let err = GeminiConfig::new().require_api_key().unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.setting(), Some(API_KEY_SETTING));

        let config = GeminiConfig::new().with_api_key("   ");
        assert!(config.require_api_key().is_err());

        let config = GeminiConfig::new().with_api_key(" abc ");
        assert_eq!(config.require_api_key().unwrap(), "abc");
    }

    #[test]
    fn debug_masks_api_key() {
        let config = GeminiConfig::new().with_api_key("AIzaSyD-very-secret-1234");
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("****1234"));
    }

    #[test]
    fn mask_short_and_empty() {
        assert_eq!(mask_secret(""), "(not set)");
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn env_overrides_only_when_non_empty() {
        let config = GeminiConfig::new()
            .with_api_key("from-file")
            .apply_vars(|name| match name {
                API_KEY_ENV => Some(String::new()),
                MODEL_ENV => Some("gemini-1.5-pro".to_string()),
                _ => None,
            });
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.model, "gemini-1.5-pro");
    }

    #[test]
    fn from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key: test-key").unwrap();
        writeln!(file, "model: \"\"").unwrap();
        writeln!(file, "language: Deutsch").unwrap();
        let config = GeminiConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.language, "Deutsch");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn from_file_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs: [not, a, number]").unwrap();
        let err = GeminiConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn loader_requires_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_path(dir.path().join("missing.yaml"));
        assert!(matches!(loader.load(), Err(Error::Io { .. })));
    }

    #[test]
    fn loader_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model: gemini-1.5-pro").unwrap();
        let loader = ConfigLoader::with_path(file.path()).with_overrides(ConfigOverrides {
            model: Some("gemini-2.0-flash".to_string()),
            language: Some("Français".to_string()),
        });
        let config = loader.load().unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.language, "Français");
    }
}
