//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/moviesearch/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("moviesearch")
        .join("config.toml"))
}

/// Resolves the directory the TUI writes its log file into.
///
/// This is the directory containing the config file.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved.
pub fn resolve_log_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let config_path = resolve_config_path(dir)?;
    config_path
        .parent()
        .map(Path::to_path_buf)
        .context("config path has no parent directory")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/moviesearch-test");

        // Act
        let path = resolve_config_path(Some(dir.as_path())).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/moviesearch-test/config.toml"));
    }

    #[test]
    fn test_resolve_default() {
        // Arrange & Act
        let path = resolve_config_path(None).unwrap();

        // Assert
        assert!(path.ends_with(".config/moviesearch/config.toml"));
    }

    #[test]
    fn test_log_dir_is_config_parent() {
        // Arrange
        let dir = PathBuf::from("/tmp/moviesearch-test");

        // Act
        let log_dir = resolve_log_dir(Some(dir.as_path())).unwrap();

        // Assert
        assert_eq!(log_dir, dir);
    }
}
