//! Per-category rotation bookkeeping.
//!
//! The tracker owns a [`HistoryState`] and implements the cycle algorithm:
//! prompts move from `remaining` to `shown` one uniformly random pick at a
//! time, and a category whose `remaining` is empty starts a new cycle when
//! [`HistoryTracker::reset_cycle`] is called.
//!
//! ```text
//! UNINITIALIZED --initialize_category--> ACTIVE (remaining > 0)
//! ACTIVE --take_random_remaining--> ... --> EXHAUSTED (remaining == 0)
//! EXHAUSTED --reset_cycle--> ACTIVE
//! ```

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::model::{CategoryHistory, CategoryStatus, HistoryState, ViewedRecord};

/// What happens to a prompt whose "shown" record has decayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayPolicy {
    /// The record is dropped; the prompt comes back at the next cycle.
    #[default]
    Forget,
    /// The record is dropped and the prompt is eligible again immediately.
    Requeue,
}

/// In-memory owner of the prompt history.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    state: HistoryState,
}

impl HistoryTracker {
    pub fn new(state: HistoryState) -> Self {
        Self { state }
    }

    /// Returns the tracked state.
    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Returns true if the category has been touched before.
    pub fn has_category(&self, category: &str) -> bool {
        self.state.history.contains_key(category)
    }

    /// Returns shown/remaining counts for a category.
    pub fn status(&self, category: &str) -> Option<CategoryStatus> {
        self.state.history.get(category).map(CategoryStatus::from)
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.state.selected_folder.as_deref()
    }

    pub fn set_selected_folder(&mut self, folder: Option<String>) {
        self.state.selected_folder = folder;
    }

    /// Starts a fresh cycle over `full_item_set`, discarding previous bookkeeping.
    pub fn initialize_category(&mut self, category: &str, full_item_set: &[String]) {
        let mut seen = HashSet::with_capacity(full_item_set.len());
        let remaining = full_item_set
            .iter()
            .filter(|handle| seen.insert(handle.as_str()))
            .cloned()
            .collect();

        self.state
            .history
            .insert(category.to_string(), CategoryHistory::with_remaining(remaining));
    }

    /// Removes a uniformly random handle from `remaining` and records it as shown.
    ///
    /// Returns `None` if the category is unknown or exhausted.
    pub fn take_random_remaining<R: Rng + ?Sized>(
        &mut self,
        category: &str,
        rng: &mut R,
        now_millis: i64,
    ) -> Option<String> {
        let history = self.state.history.get_mut(category)?;
        if history.remaining.is_empty() {
            return None;
        }

        let index = rng.gen_range(0..history.remaining.len());
        let handle = history.remaining.remove(index);
        history
            .shown
            .push(ViewedRecord::new(handle.clone(), now_millis));

        Some(handle)
    }

    /// Moves every shown handle back into `remaining` and clears `shown`.
    pub fn reset_cycle(&mut self, category: &str) {
        if let Some(history) = self.state.history.get_mut(category) {
            let shown = std::mem::take(&mut history.shown);
            for record in shown {
                if !history.is_remaining(&record.handle) {
                    history.remaining.push(record.handle);
                }
            }
        }
    }

    /// Drops shown records older than `max_age_millis`.
    ///
    /// With [`DecayPolicy::Forget`] the handles are not put back into
    /// `remaining`. Returns the number of records dropped.
    pub fn decay_old_records(
        &mut self,
        category: &str,
        max_age_millis: i64,
        now_millis: i64,
        policy: DecayPolicy,
    ) -> usize {
        let Some(history) = self.state.history.get_mut(category) else {
            return 0;
        };

        let (kept, decayed): (Vec<_>, Vec<_>) = std::mem::take(&mut history.shown)
            .into_iter()
            .partition(|record| now_millis.saturating_sub(record.timestamp) < max_age_millis);
        history.shown = kept;

        if policy == DecayPolicy::Requeue {
            for record in &decayed {
                if !history.is_remaining(&record.handle) {
                    history.remaining.push(record.handle.clone());
                }
            }
        }

        decayed.len()
    }

    /// Removes a handle from both sides, e.g. after its file was deleted.
    pub fn forget(&mut self, category: &str, handle: &str) -> bool {
        let Some(history) = self.state.history.get_mut(category) else {
            return false;
        };
        let before = history.shown.len() + history.remaining.len();
        history.shown.retain(|r| r.handle != handle);
        history.remaining.retain(|h| h != handle);
        before != history.shown.len() + history.remaining.len()
    }

    /// Undoes a pick: moves `handle` from `shown` back to `remaining`.
    pub fn restore(&mut self, category: &str, handle: &str) -> bool {
        let Some(history) = self.state.history.get_mut(category) else {
            return false;
        };
        let Some(position) = history.shown.iter().position(|r| r.handle == handle) else {
            return false;
        };
        history.shown.remove(position);
        if !history.is_remaining(handle) {
            history.remaining.push(handle.to_string());
        }
        true
    }

    /// Drops handles that are no longer part of `full_item_set`.
    ///
    /// Returns the number of handles removed.
    pub fn prune_missing(&mut self, category: &str, full_item_set: &[String]) -> usize {
        let Some(history) = self.state.history.get_mut(category) else {
            return 0;
        };
        let current: HashSet<&str> = full_item_set.iter().map(String::as_str).collect();
        let before = history.shown.len() + history.remaining.len();
        history.shown.retain(|r| current.contains(r.handle.as_str()));
        history.remaining.retain(|h| current.contains(h.as_str()));
        before - (history.shown.len() + history.remaining.len())
    }

    /// Appends handles of `full_item_set` that are tracked on neither side.
    ///
    /// Returns the number of handles added.
    pub fn refill(&mut self, category: &str, full_item_set: &[String]) -> usize {
        let Some(history) = self.state.history.get_mut(category) else {
            return 0;
        };
        let mut added = 0;
        for handle in full_item_set {
            if !history.contains(handle) {
                history.remaining.push(handle.clone());
                added += 1;
            }
        }
        added
    }

    /// Brings a category in line with a fresh listing at a cycle boundary.
    pub fn refresh(&mut self, category: &str, full_item_set: &[String]) {
        self.prune_missing(category, full_item_set);
        self.refill(category, full_item_set);
    }

    /// Forgets all bookkeeping for a category.
    pub fn clear_category(&mut self, category: &str) -> bool {
        self.state.history.remove(category).is_some()
    }

    /// Forgets all bookkeeping, keeping the selected folder.
    pub fn clear(&mut self) {
        self.state.history.clear();
    }
}
