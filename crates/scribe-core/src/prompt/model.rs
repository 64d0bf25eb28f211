//! Prompt domain models.

use serde::{Deserialize, Serialize};

/// A prompt picked by the rotation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSelection {
    /// Handle (file name) of the prompt within its category.
    pub handle: String,
    /// Text of the prompt.
    pub content: String,
}
