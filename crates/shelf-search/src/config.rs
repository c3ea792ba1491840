//! Configuration for shelf-search
//!
//! Holds the Books API endpoint and the search timing parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default Books API endpoint
pub const DEFAULT_BASE_URL: &str = "https://reactnd-books-api.udacity.com";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfSearchConfig {
    /// Books API connection settings
    pub api: ApiConfig,
    /// Debounce and result settings
    pub search: SearchConfig,
}

/// Books API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Opaque value sent as the `Authorization` header; identifies the user's shelves
    pub token: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: generate_token(),
            timeout_secs: 30,
            user_agent: format!("shelf-search/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Search pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last query edit before a search fires
    pub debounce_ms: u64,
    /// Maximum results requested from the search service
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            result_limit: 20,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ShelfSearchConfig {
    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a config file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            _ => Self::from_toml(&contents)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=10_000).contains(&self.search.debounce_ms) {
            return Err(ConfigError::OutOfRange(
                "debounce_ms must be between 1 and 10000".to_string(),
            ));
        }

        if !(1..=100).contains(&self.search.result_limit) {
            return Err(ConfigError::OutOfRange(
                "result_limit must be between 1 and 100".to_string(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "timeout_secs must be positive".to_string(),
            ));
        }

        if self.api.token.trim().is_empty() {
            return Err(ConfigError::Invalid("api token must not be empty".to_string()));
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL: {}",
                self.api.base_url
            )));
        }

        Ok(())
    }
}

/// Random per-install token; the Books API keys shelves by this value
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ShelfSearchConfig::default();
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.result_limit, 20);
        assert_eq!(config.search.debounce(), Duration::from_millis(500));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(ApiConfig::default().token, ApiConfig::default().token);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ShelfSearchConfig::from_toml(
            r#"
            [search]
            debounce_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.result_limit, 20);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ShelfSearchConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(ShelfSearchConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = ShelfSearchConfig::default();
        config.search.result_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = ShelfSearchConfig::default();
        config.api.base_url = "ftp://books".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:3001\"\ntoken = \"abc\"\n"
        )
        .unwrap();

        let config = ShelfSearchConfig::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.token, "abc");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"search": {{"debounce_ms": 0}}}}"#).unwrap();

        assert!(matches!(
            ShelfSearchConfig::load(file.path()),
            Err(ConfigError::OutOfRange(_))
        ));
    }
}
