//! Prompt rotation use case.
//!
//! Hands out prompts from a category in random order without repeating one
//! until every prompt in the category has been shown, then starts over. The
//! history survives restarts through the injected [`HistoryRepository`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use scribe_core::ScribeError;
use scribe_core::clock::Clock;
use scribe_core::config::HistoryConfig;
use scribe_core::error::Result;
use scribe_core::history::{CategoryStatus, HistoryRepository, HistoryTracker};
use scribe_core::prompt::{PromptSelection, PromptStore};

/// Entry point for "give me a prompt I haven't seen".
///
/// Calls for the same category must not overlap; callers serialize them
/// (e.g. by disabling the "new prompt" button while a request runs). Calls
/// for different categories are independent.
pub struct PromptRotationService {
    store: Arc<dyn PromptStore>,
    repository: Arc<dyn HistoryRepository>,
    clock: Arc<dyn Clock>,
    history_config: HistoryConfig,
    tracker: Mutex<HistoryTracker>,
    /// Orders saves so a newer snapshot is never overwritten by an older one.
    save_lock: Mutex<()>,
    rng: std::sync::Mutex<StdRng>,
    persistence_healthy: AtomicBool,
}

impl PromptRotationService {
    /// Creates a service over an already loaded tracker.
    pub fn new(
        store: Arc<dyn PromptStore>,
        repository: Arc<dyn HistoryRepository>,
        clock: Arc<dyn Clock>,
        history_config: HistoryConfig,
        tracker: HistoryTracker,
    ) -> Self {
        Self {
            store,
            repository,
            clock,
            history_config,
            tracker: Mutex::new(tracker),
            save_lock: Mutex::new(()),
            rng: std::sync::Mutex::new(StdRng::from_entropy()),
            persistence_healthy: AtomicBool::new(true),
        }
    }

    /// Loads the persisted history and re-opens the previously selected folder.
    ///
    /// A folder that can no longer be opened is logged and kept in the
    /// history, so the user can be asked to re-select it.
    pub async fn restore(
        store: Arc<dyn PromptStore>,
        repository: Arc<dyn HistoryRepository>,
        clock: Arc<dyn Clock>,
        history_config: HistoryConfig,
    ) -> Self {
        let state = repository.load().await;

        if let Some(folder) = state.selected_folder.as_deref() {
            match store.select_root(Path::new(folder)).await {
                Ok(()) => tracing::info!("[PromptRotation] Restored prompt folder {}", folder),
                Err(e) => tracing::warn!(
                    "[PromptRotation] Previously selected folder {} is unavailable: {}",
                    folder,
                    e
                ),
            }
        }

        tracing::info!(
            "[PromptRotation] Loaded history for {} categor(ies)",
            state.history.len()
        );
        Self::new(
            store,
            repository,
            clock,
            history_config,
            HistoryTracker::new(state),
        )
    }

    /// Replaces the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = std::sync::Mutex::new(rng);
        self
    }

    /// Lists the categories of the selected folder.
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        match self.store.list_categories().await {
            Ok(categories) => Ok(categories),
            Err(e) => Err(self.explain_store_error(e, None).await),
        }
    }

    /// Returns an unseen prompt from `category`, or `None` if it has no prompts.
    ///
    /// Fails with `NotFound` if the category does not exist. Persistence
    /// failures are logged and do not fail the call.
    pub async fn get_next(&self, category: &str) -> Result<Option<PromptSelection>> {
        let full_item_set = match self.store.list_items(category).await {
            Ok(items) => items,
            Err(e) => return Err(self.explain_store_error(e, Some(category)).await),
        };
        self.prepare_category(category, &full_item_set).await;

        let selection = self.select_readable(category, &full_item_set).await;
        self.persist().await;

        let selection = selection?;
        match &selection {
            Some(picked) => tracing::debug!(
                "[PromptRotation] Picked '{}' from '{}'",
                picked.handle,
                category
            ),
            None => tracing::info!("[PromptRotation] Category '{}' has no prompts", category),
        }
        Ok(selection)
    }

    /// Decays old records and lines the category up with the current listing.
    async fn prepare_category(&self, category: &str, full_item_set: &[String]) {
        let now = self.clock.now_millis();
        let mut tracker = self.tracker.lock().await;

        if let Some(max_age) = self.history_config.decay_max_age_millis() {
            let decayed = tracker.decay_old_records(
                category,
                max_age,
                now,
                self.history_config.decay_policy,
            );
            if decayed > 0 {
                tracing::debug!(
                    "[PromptRotation] Decayed {} record(s) in '{}'",
                    decayed,
                    category
                );
            }
        }

        if !tracker.has_category(category) || full_item_set.is_empty() {
            tracker.initialize_category(category, full_item_set);
        } else {
            let pruned = tracker.prune_missing(category, full_item_set);
            if pruned > 0 {
                tracing::info!(
                    "[PromptRotation] Dropped {} vanished prompt(s) from '{}'",
                    pruned,
                    category
                );
            }
        }
    }

    /// Picks handles until one can be read, skipping prompts deleted since listing.
    async fn select_readable(
        &self,
        category: &str,
        full_item_set: &[String],
    ) -> Result<Option<PromptSelection>> {
        let mut skipped: HashSet<String> = HashSet::new();

        while skipped.len() < full_item_set.len() {
            let Some(handle) = self.take_next(category, full_item_set, &skipped).await else {
                return Ok(None);
            };

            match self.store.read_item(category, &handle).await {
                Ok(content) => return Ok(Some(PromptSelection { handle, content })),
                Err(e) if e.is_not_found() && !e.is_category_not_found() => {
                    tracing::warn!(
                        "[PromptRotation] Prompt '{}' in '{}' disappeared, skipping",
                        handle,
                        category
                    );
                    self.tracker.lock().await.forget(category, &handle);
                    skipped.insert(handle);
                }
                Err(e) => {
                    self.tracker.lock().await.restore(category, &handle);
                    return Err(e);
                }
            }
        }

        Ok(None)
    }

    /// Takes a random remaining handle, starting a new cycle once when exhausted.
    async fn take_next(
        &self,
        category: &str,
        full_item_set: &[String],
        skipped: &HashSet<String>,
    ) -> Option<String> {
        let now = self.clock.now_millis();
        let mut tracker = self.tracker.lock().await;

        if let Some(handle) = self.take_random(&mut tracker, category, now) {
            return Some(handle);
        }
        if full_item_set.is_empty() {
            return None;
        }

        tracing::info!("[PromptRotation] All prompts in '{}' shown, starting over", category);
        let available: Vec<String> = full_item_set
            .iter()
            .filter(|handle| !skipped.contains(*handle))
            .cloned()
            .collect();
        tracker.reset_cycle(category);
        tracker.refresh(category, &available);

        self.take_random(&mut tracker, category, now)
    }

    fn take_random(&self, tracker: &mut HistoryTracker, category: &str, now: i64) -> Option<String> {
        match self.rng.lock() {
            Ok(mut rng) => tracker.take_random_remaining(category, &mut *rng, now),
            Err(poisoned) => {
                let mut rng = poisoned.into_inner();
                tracker.take_random_remaining(category, &mut *rng, now)
            }
        }
    }

    /// A remembered folder that failed to re-open leaves the store without a
    /// root; report that as the folder (or category) being gone.
    async fn explain_store_error(&self, error: ScribeError, category: Option<&str>) -> ScribeError {
        if !matches!(error, ScribeError::NoFolderSelected) {
            return error;
        }
        let Some(folder) = self.selected_folder().await else {
            return error;
        };
        match category {
            Some(category) => ScribeError::category_not_found(category),
            None => ScribeError::folder_not_found(folder),
        }
    }

    /// Points the prompt store at a new folder and remembers it.
    pub async fn select_folder(&self, folder: &Path) -> Result<()> {
        self.store.select_root(folder).await?;
        self.tracker
            .lock()
            .await
            .set_selected_folder(Some(folder.to_string_lossy().into_owned()));
        self.persist().await;
        Ok(())
    }

    /// Returns the remembered prompt folder.
    pub async fn selected_folder(&self) -> Option<String> {
        self.tracker
            .lock()
            .await
            .selected_folder()
            .map(str::to_string)
    }

    /// Returns how far the category is through its current cycle.
    pub async fn category_status(&self, category: &str) -> Option<CategoryStatus> {
        self.tracker.lock().await.status(category)
    }

    /// Forgets the history of one category.
    pub async fn reset_category(&self, category: &str) -> bool {
        let removed = self.tracker.lock().await.clear_category(category);
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Forgets the history of every category.
    pub async fn reset_all(&self) {
        self.tracker.lock().await.clear();
        self.persist().await;
    }

    /// False if the most recent save failed.
    pub fn persistence_healthy(&self) -> bool {
        self.persistence_healthy.load(Ordering::SeqCst)
    }

    /// Writes the current history through to storage.
    async fn persist(&self) {
        let _ordering = self.save_lock.lock().await;
        let snapshot = self.tracker.lock().await.state().clone();

        match self.repository.save(&snapshot).await {
            Ok(()) => self.persistence_healthy.store(true, Ordering::SeqCst),
            Err(e) => {
                tracing::warn!(
                    "[PromptRotation] Failed to persist prompt history, continuing in memory: {}",
                    e
                );
                self.persistence_healthy.store(false, Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
#[path = "prompt_rotation_service_test.rs"]
mod tests;
