//! Configuration service implementation.
//!
//! Loads [`ScribeConfig`] from `config.toml` in the config directory. A
//! missing file is created with defaults on first access; an unreadable one
//! is logged and defaults are used without touching the file.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use scribe_core::config::ScribeConfig;
use scribe_core::error::Result;

use crate::paths::ScribePaths;
use crate::storage::{AtomicFile, FileFormat};

/// Configuration service that loads and caches the application config.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicFile<ScribeConfig>>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ScribeConfig>>>,
}

impl ConfigService {
    /// Creates a service for the default config path.
    pub fn new(paths: &ScribePaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service backed by an explicit file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::new(path, FileFormat::Toml)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> ScribeConfig {
        if let Ok(read_lock) = self.config.read() {
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config();

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Applies `f` to the stored configuration and saves it.
    pub fn update<F>(&self, f: F) -> Result<ScribeConfig>
    where
        F: FnOnce(&mut ScribeConfig),
    {
        let updated = self.file.update(ScribeConfig::default(), f)?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(updated.clone());
        }

        Ok(updated)
    }

    fn load_config(&self) -> ScribeConfig {
        match self.file.load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                let default_config = ScribeConfig::default();
                if let Err(e) = self.file.save(&default_config) {
                    tracing::warn!("[ConfigService] Failed to write default config: {}", e);
                } else {
                    tracing::info!("[ConfigService] Created default config at {:?}", self.file.path());
                }
                default_config
            }
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Failed to load {:?}: {}, using defaults",
                    self.file.path(),
                    e
                );
                ScribeConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::history::DecayPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        let config = service.get_config();

        assert_eq!(config, ScribeConfig::default());
        assert!(path.exists());
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("decay_hours = 24"));
    }

    #[test]
    fn test_reads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[history]\ndecay_hours = 0\ndecay_policy = \"requeue\"\n",
        )
        .unwrap();
        let service = ConfigService::with_path(path);

        let config = service.get_config();

        assert_eq!(config.history.decay_hours, 0);
        assert_eq!(config.history.decay_policy, DecayPolicy::Requeue);
        assert_eq!(config.prompts.extensions, vec!["txt", "md"]);
    }

    #[test]
    fn test_invalid_file_falls_back_without_overwriting() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[history\n").unwrap();
        let service = ConfigService::with_path(path.clone());

        assert_eq!(service.get_config(), ScribeConfig::default());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[history\n");
    }

    #[test]
    fn test_update_keeps_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[history\n").unwrap();
        let service = ConfigService::with_path(path.clone());

        assert!(service.update(|config| config.history.decay_hours = 1).is_err());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[history\n");
    }

    #[test]
    fn test_update_and_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        service
            .update(|config| config.history.decay_policy = DecayPolicy::Requeue)
            .unwrap();

        assert_eq!(service.get_config().history.decay_policy, DecayPolicy::Requeue);
        let reloaded = ConfigService::with_path(path).get_config();
        assert_eq!(reloaded.history.decay_policy, DecayPolicy::Requeue);
    }
}
