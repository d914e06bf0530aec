//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default response language for TMDB requests.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Default toast lifetime in seconds.
const DEFAULT_TOAST_SECS: u64 = 4;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Terminal UI settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// TMDB request configuration.
///
/// The API token is deliberately absent: it comes from `TMDB_API_TOKEN`.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Response language (e.g. "en-US", "ja-JP").
    #[serde(default = "default_language")]
    pub language: String,
    /// Include adult titles in search results.
    #[serde(default)]
    pub include_adult: bool,
    /// Override for the API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            include_adult: false,
            base_url: None,
        }
    }
}

/// Terminal UI configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Seconds a toast notification stays on screen.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
        }
    }
}

impl UiConfig {
    /// Returns the toast lifetime as a `Duration`.
    #[must_use]
    pub const fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

const fn default_toast_secs() -> u64 {
    DEFAULT_TOAST_SECS
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.tmdb.language, "en-US");
        assert!(!config.tmdb.include_adult);
        assert!(config.tmdb.base_url.is_none());
        assert_eq!(config.ui.toast_duration(), Duration::from_secs(4));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let path = Path::new("/tmp/moviesearch_test_nonexistent_config.toml");

        // Act
        let config = AppConfig::load(path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[tmdb]
language = "ja-JP"
include_adult = true
base_url = "http://localhost:8080/3/"

[ui]
toast_secs = 2
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.language, "ja-JP");
        assert!(config.tmdb.include_adult);
        assert_eq!(
            config.tmdb.base_url.as_deref(),
            Some("http://localhost:8080/3/")
        );
        assert_eq!(config.ui.toast_secs, 2);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb]\ninclude_adult = true\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.language, "en-US");
        assert!(config.tmdb.include_adult);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_load_invalid_config_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntoast_secs = \"soon\"\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }
}
