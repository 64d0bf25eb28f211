//! Prompt history repository implementation.
//!
//! Stores the whole history as one JSON document.
//!
//! File location: `{config_dir}/prompt_history.json`

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use scribe_core::ScribeError;
use scribe_core::error::Result;
use scribe_core::history::{HistoryRepository, HistoryState};

use crate::dto::HistoryDocumentDTO;
use crate::paths::ScribePaths;
use crate::storage::{AtomicFile, AtomicFileError, FileFormat};

/// File-based history repository.
///
/// Saves are serialized through an async lock so two writes never race on
/// the temporary file or land out of order.
pub struct JsonHistoryRepository {
    file: AtomicFile<HistoryDocumentDTO>,
    write_lock: Mutex<()>,
}

impl JsonHistoryRepository {
    /// Creates a repository at the default history path.
    pub fn new(paths: &ScribePaths) -> Result<Self> {
        Ok(Self::with_path(paths.history_file()?))
    }

    /// Creates a repository backed by an explicit file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path, FileFormat::Json),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    fn load_blocking(file: &AtomicFile<HistoryDocumentDTO>) -> HistoryState {
        let dto = match file.load() {
            Ok(Some(dto)) => dto,
            Ok(None) => {
                tracing::info!(
                    "[HistoryRepository] No prompt history at {:?}, starting fresh",
                    file.path()
                );
                return HistoryState::default();
            }
            Err(AtomicFileError::ParseError { message, .. }) => {
                tracing::warn!(
                    "[HistoryRepository] Prompt history is corrupt ({}), starting fresh",
                    message
                );
                Self::quarantine(file);
                return HistoryState::default();
            }
            Err(e) => {
                tracing::warn!(
                    "[HistoryRepository] Failed to read prompt history: {}, starting fresh",
                    e
                );
                return HistoryState::default();
            }
        };

        match HistoryState::try_from(dto) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    "[HistoryRepository] Prompt history failed validation ({}), starting fresh",
                    e
                );
                Self::quarantine(file);
                HistoryState::default()
            }
        }
    }

    /// Keeps a copy of an unreadable document before it gets overwritten.
    fn quarantine(file: &AtomicFile<HistoryDocumentDTO>) {
        match file.quarantine() {
            Ok(moved) => tracing::warn!("[HistoryRepository] Corrupt history moved to {:?}", moved),
            Err(e) => tracing::warn!("[HistoryRepository] Could not move corrupt history: {}", e),
        }
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> HistoryState {
        let _guard = self.write_lock.lock().await;
        let file = self.file.clone();

        match tokio::task::spawn_blocking(move || Self::load_blocking(&file)).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("[HistoryRepository] History load task failed: {}", e);
                HistoryState::default()
            }
        }
    }

    async fn save(&self, state: &HistoryState) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let file = self.file.clone();
        let dto = HistoryDocumentDTO::from(state);

        tokio::task::spawn_blocking(move || file.save(&dto))
            .await
            .map_err(|e| ScribeError::persistence(format!("History save task failed: {}", e)))?
            .map_err(|e| ScribeError::persistence(format!("Failed to save prompt history: {}", e)))
    }
}
