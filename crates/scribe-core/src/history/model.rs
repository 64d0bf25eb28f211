//! Prompt history domain models.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Records that a prompt was shown to the user at a specific time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedRecord {
    /// Handle (file name) of the prompt within its category.
    pub handle: String,
    /// When the prompt was shown, in unix milliseconds.
    pub timestamp: i64,
}

impl ViewedRecord {
    pub fn new(handle: impl Into<String>, timestamp: i64) -> Self {
        Self {
            handle: handle.into(),
            timestamp,
        }
    }
}

/// Rotation bookkeeping for a single category.
///
/// `shown` and `remaining` never share a handle. Together they cover the
/// category's prompts as of the last refresh, minus records forgotten by
/// decay during the current cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHistory {
    /// Prompts shown in the current cycle.
    pub shown: Vec<ViewedRecord>,
    /// Prompts not yet shown in the current cycle.
    pub remaining: Vec<String>,
}

impl CategoryHistory {
    /// Creates a fresh cycle over the given handles.
    pub fn with_remaining(remaining: Vec<String>) -> Self {
        Self {
            shown: Vec::new(),
            remaining,
        }
    }

    /// Returns true if the handle was shown in the current cycle.
    pub fn is_shown(&self, handle: &str) -> bool {
        self.shown.iter().any(|r| r.handle == handle)
    }

    /// Returns true if the handle is still waiting in the current cycle.
    pub fn is_remaining(&self, handle: &str) -> bool {
        self.remaining.iter().any(|h| h == handle)
    }

    /// Returns true if the handle is tracked on either side.
    pub fn contains(&self, handle: &str) -> bool {
        self.is_shown(handle) || self.is_remaining(handle)
    }

    /// Checks that no handle is duplicated or present on both sides.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.shown.len() + self.remaining.len());
        self.shown
            .iter()
            .map(|r| r.handle.as_str())
            .chain(self.remaining.iter().map(String::as_str))
            .all(|handle| seen.insert(handle))
    }
}

/// The complete persisted prompt history.
///
/// This is the unit of persistence: it is written as a whole after every
/// mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    /// Per-category rotation bookkeeping, keyed by category name.
    #[serde(default)]
    pub history: BTreeMap<String, CategoryHistory>,
    /// Folder the prompt categories are read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_folder: Option<String>,
}

impl HistoryState {
    /// Creates an empty history with no selected folder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bookkeeping for a category, if it has been touched.
    pub fn category(&self, category: &str) -> Option<&CategoryHistory> {
        self.history.get(category)
    }

    /// Returns true if every category satisfies the partition invariant.
    pub fn is_consistent(&self) -> bool {
        self.history.values().all(CategoryHistory::is_consistent)
    }
}

/// Counts describing where a category stands in its cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatus {
    pub shown: usize,
    pub remaining: usize,
}

impl From<&CategoryHistory> for CategoryStatus {
    fn from(history: &CategoryHistory) -> Self {
        Self {
            shown: history.shown.len(),
            remaining: history.remaining.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_partition() {
        let history = CategoryHistory {
            shown: vec![ViewedRecord::new("p1.txt", 10)],
            remaining: vec!["p2.txt".to_string(), "p3.txt".to_string()],
        };
        assert!(history.is_consistent());
        assert!(history.is_shown("p1.txt"));
        assert!(history.is_remaining("p3.txt"));
        assert!(history.contains("p2.txt"));
        assert!(!history.contains("p4.txt"));
    }

    #[test]
    fn test_handle_on_both_sides_is_inconsistent() {
        let history = CategoryHistory {
            shown: vec![ViewedRecord::new("p1.txt", 10)],
            remaining: vec!["p1.txt".to_string()],
        };
        assert!(!history.is_consistent());
    }

    #[test]
    fn test_duplicate_remaining_is_inconsistent() {
        let history = CategoryHistory::with_remaining(vec!["a".to_string(), "a".to_string()]);
        assert!(!history.is_consistent());
    }

    #[test]
    fn test_status_counts() {
        let history = CategoryHistory {
            shown: vec![ViewedRecord::new("a", 1), ViewedRecord::new("b", 2)],
            remaining: vec!["c".to_string()],
        };
        let status = CategoryStatus::from(&history);
        assert_eq!(status.shown, 2);
        assert_eq!(status.remaining, 1);
    }
}
