//! Error types for the Scribe application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Scribe application.
///
/// Prompt store errors (`NotFound`, `NoFolderSelected`) are meant to reach the
/// caller. Persistence errors are recovered by the rotation service and only
/// ever logged.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ScribeError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// No prompt folder has been selected yet
    #[error("No prompt folder selected")]
    NoFolderSelected,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable read/write of the prompt history failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Entity type used for missing categories.
pub const CATEGORY_ENTITY: &str = "category";

/// Entity type used for missing prompt files.
pub const PROMPT_ENTITY: &str = "prompt";

/// Entity type used for a prompt folder that cannot be opened.
pub const FOLDER_ENTITY: &str = "folder";

impl ScribeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a NotFound error for a category
    pub fn category_not_found(category: impl Into<String>) -> Self {
        Self::not_found(CATEGORY_ENTITY, category)
    }

    /// Creates a NotFound error for a prompt item
    pub fn prompt_not_found(handle: impl Into<String>) -> Self {
        Self::not_found(PROMPT_ENTITY, handle)
    }

    /// Creates a NotFound error for a prompt folder
    pub fn folder_not_found(folder: impl Into<String>) -> Self {
        Self::not_found(FOLDER_ENTITY, folder)
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a NotFound error for a category
    pub fn is_category_not_found(&self) -> bool {
        matches!(self, Self::NotFound { entity_type, .. } if *entity_type == CATEGORY_ENTITY)
    }

    /// Message suitable for showing to the user.
    ///
    /// A vanished category asks the user to pick the folder again instead of
    /// showing a generic failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity_type, .. } if *entity_type == CATEGORY_ENTITY => {
                "This category is no longer available, please re-select a folder.".to_string()
            }
            Self::NotFound { entity_type, .. } if *entity_type == FOLDER_ENTITY => {
                "The prompt folder is no longer available, please re-select a folder.".to_string()
            }
            Self::NoFolderSelected => "No prompt folder selected, please select a folder.".to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ScribeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ScribeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScribeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ScribeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ScribeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ScribeError>`.
pub type Result<T> = std::result::Result<T, ScribeError>;
