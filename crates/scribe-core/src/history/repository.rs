//! Prompt history repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::history::model::HistoryState;

/// Durable storage for the whole [`HistoryState`].
///
/// Implementations store the state as a single document. `load` never fails:
/// a missing or unreadable document yields an empty state.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the persisted history, or an empty one if none can be read.
    async fn load(&self) -> HistoryState;

    /// Overwrites the persisted history.
    ///
    /// A subsequent `load` must never observe a partially written document.
    async fn save(&self, state: &HistoryState) -> Result<()>;
}
