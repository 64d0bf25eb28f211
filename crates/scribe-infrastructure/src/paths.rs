//! Unified path management for scribe files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/scribe/              # Config directory
//! ├── config.toml                # Application configuration
//! └── prompt_history.json        # Prompt rotation history
//!
//! ~/.local/share/scribe/         # Data directory
//! └── writings/                  # Saved writings
//! ```
//!
//! When a base directory is given (tests, `--config-dir`), everything lives
//! under it instead.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "scribe";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for scribe_core::ScribeError {
    fn from(err: PathError) -> Self {
        scribe_core::ScribeError::config(err.to_string())
    }
}

/// Resolves where scribe keeps its files.
#[derive(Debug, Clone, Default)]
pub struct ScribePaths {
    base: Option<PathBuf>,
}

impl ScribePaths {
    /// Creates a path resolver. `base` overrides the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/scribe/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/scribe/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("prompt_history.json"))
    }

    pub fn writings_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("writings"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let base = Path::new("/tmp/scribe-test");
        let paths = ScribePaths::new(Some(base));

        assert_eq!(paths.config_dir().unwrap(), base);
        assert_eq!(paths.config_file().unwrap(), base.join("config.toml"));
        assert_eq!(paths.history_file().unwrap(), base.join("prompt_history.json"));
        assert_eq!(paths.writings_dir().unwrap(), base.join("writings"));
    }

    #[test]
    fn test_platform_dirs_end_with_app_name() {
        let paths = ScribePaths::new(None);
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with(APP_DIR_NAME));
            assert!(paths.history_file().unwrap().starts_with(&config_dir));
        }
    }
}
