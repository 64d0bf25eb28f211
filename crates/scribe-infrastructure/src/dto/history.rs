//! Prompt history DTOs.
//!
//! The on-disk document:
//!
//! ```json
//! {
//!   "selectedFolder": "/home/me/prompts",
//!   "history": {
//!     "fantasy": {
//!       "shown": [{ "handle": "p1.txt", "timestamp": 1700000000000 }],
//!       "remaining": ["p2.txt", "p3.txt"]
//!     }
//!   }
//! }
//! ```
//!
//! Older files stored `shown` as bare file names; those decode with a zero
//! timestamp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scribe_core::history::{CategoryHistory, HistoryState, ViewedRecord};

/// A "shown" entry as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShownEntryDTO {
    Record { handle: String, timestamp: i64 },
    Legacy(String),
}

impl From<ShownEntryDTO> for ViewedRecord {
    fn from(dto: ShownEntryDTO) -> Self {
        match dto {
            ShownEntryDTO::Record { handle, timestamp } => ViewedRecord::new(handle, timestamp),
            ShownEntryDTO::Legacy(handle) => ViewedRecord::new(handle, 0),
        }
    }
}

impl From<&ViewedRecord> for ShownEntryDTO {
    fn from(record: &ViewedRecord) -> Self {
        ShownEntryDTO::Record {
            handle: record.handle.clone(),
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHistoryDTO {
    #[serde(default)]
    pub shown: Vec<ShownEntryDTO>,
    #[serde(default)]
    pub remaining: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDocumentDTO {
    #[serde(default)]
    pub history: BTreeMap<String, CategoryHistoryDTO>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_folder: Option<String>,
}

/// Reasons a well-formed document is still rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryValidationError {
    /// A handle appears twice, or in both `shown` and `remaining`.
    OverlappingHandles { category: String },
    /// An empty category name or handle.
    EmptyName { category: String },
}

impl std::fmt::Display for HistoryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryValidationError::OverlappingHandles { category } => {
                write!(f, "category '{}' tracks a handle more than once", category)
            }
            HistoryValidationError::EmptyName { category } => {
                write!(f, "category '{}' contains an empty name", category)
            }
        }
    }
}

impl std::error::Error for HistoryValidationError {}

impl TryFrom<HistoryDocumentDTO> for HistoryState {
    type Error = HistoryValidationError;

    fn try_from(dto: HistoryDocumentDTO) -> Result<Self, Self::Error> {
        let mut history = BTreeMap::new();

        for (category, entry) in dto.history {
            let category_history = CategoryHistory {
                shown: entry.shown.into_iter().map(ViewedRecord::from).collect(),
                remaining: entry.remaining,
            };

            let has_empty_name = category.is_empty()
                || category_history.shown.iter().any(|r| r.handle.is_empty())
                || category_history.remaining.iter().any(String::is_empty);
            if has_empty_name {
                return Err(HistoryValidationError::EmptyName { category });
            }
            if !category_history.is_consistent() {
                return Err(HistoryValidationError::OverlappingHandles { category });
            }

            history.insert(category, category_history);
        }

        Ok(HistoryState {
            history,
            selected_folder: dto.selected_folder,
        })
    }
}

impl From<&HistoryState> for HistoryDocumentDTO {
    fn from(state: &HistoryState) -> Self {
        let history = state
            .history
            .iter()
            .map(|(category, entry)| {
                (
                    category.clone(),
                    CategoryHistoryDTO {
                        shown: entry.shown.iter().map(ShownEntryDTO::from).collect(),
                        remaining: entry.remaining.clone(),
                    },
                )
            })
            .collect();

        HistoryDocumentDTO {
            history,
            selected_folder: state.selected_folder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_document() {
        let json = r#"{
            "selectedFolder": "/prompts",
            "history": {
                "fantasy": {
                    "shown": [{ "handle": "p1.txt", "timestamp": 17 }],
                    "remaining": ["p2.txt"]
                }
            }
        }"#;
        let dto: HistoryDocumentDTO = serde_json::from_str(json).unwrap();
        let state = HistoryState::try_from(dto).unwrap();

        assert_eq!(state.selected_folder.as_deref(), Some("/prompts"));
        let fantasy = state.category("fantasy").unwrap();
        assert_eq!(fantasy.shown, vec![ViewedRecord::new("p1.txt", 17)]);
        assert_eq!(fantasy.remaining, vec!["p2.txt".to_string()]);
    }

    #[test]
    fn test_decode_legacy_shown_strings() {
        let json = r#"{ "history": { "c": { "shown": ["a.md"], "remaining": ["b.md"] } } }"#;
        let dto: HistoryDocumentDTO = serde_json::from_str(json).unwrap();
        let state = HistoryState::try_from(dto).unwrap();

        assert_eq!(state.category("c").unwrap().shown, vec![ViewedRecord::new("a.md", 0)]);
        assert!(state.selected_folder.is_none());
    }

    #[test]
    fn test_reject_overlapping_handles() {
        let json = r#"{ "history": { "c": { "shown": ["a"], "remaining": ["a"] } } }"#;
        let dto: HistoryDocumentDTO = serde_json::from_str(json).unwrap();

        let err = HistoryState::try_from(dto).unwrap_err();
        assert_eq!(
            err,
            HistoryValidationError::OverlappingHandles {
                category: "c".to_string()
            }
        );
    }

    #[test]
    fn test_reject_empty_handle() {
        let json = r#"{ "history": { "c": { "remaining": [""] } } }"#;
        let dto: HistoryDocumentDTO = serde_json::from_str(json).unwrap();
        assert!(HistoryState::try_from(dto).is_err());
    }

    #[test]
    fn test_wrong_shape_fails_to_decode() {
        let json = r#"{ "history": { "c": { "shown": [42] } } }"#;
        assert!(serde_json::from_str::<HistoryDocumentDTO>(json).is_err());
    }

    #[test]
    fn test_encode_uses_records_and_camel_case() {
        let mut state = HistoryState::new();
        state.selected_folder = Some("/p".to_string());
        state.history.insert(
            "c".to_string(),
            CategoryHistory {
                shown: vec![ViewedRecord::new("a", 5)],
                remaining: vec!["b".to_string()],
            },
        );

        let value = serde_json::to_value(HistoryDocumentDTO::from(&state)).unwrap();

        assert_eq!(value["selectedFolder"], "/p");
        assert_eq!(value["history"]["c"]["shown"][0]["handle"], "a");
        assert_eq!(value["history"]["c"]["shown"][0]["timestamp"], 5);
        assert_eq!(value["history"]["c"]["remaining"][0], "b");
    }
}
