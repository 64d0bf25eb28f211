//! Application configuration models.
//!
//! Loaded from `config.toml`; every field has a default so a partial or
//! missing file is valid.

use serde::{Deserialize, Serialize};

use crate::history::DecayPolicy;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScribeConfig {
    #[serde(default)]
    pub prompts: PromptsConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Which files in a category folder count as prompts.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PromptsConfig {
    /// Allowed file extensions, without the dot. Matched case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// File and folder names that are never listed.
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string(), "md".to_string()]
}

fn default_excluded_files() -> Vec<String> {
    vec![
        ".DS_Store".to_string(),
        "Thumbs.db".to_string(),
        ".git".to_string(),
    ]
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excluded_files: default_excluded_files(),
        }
    }
}

impl PromptsConfig {
    /// Returns true if `file_name` has one of the allowed extensions.
    pub fn is_allowed_extension(&self, file_name: &str) -> bool {
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty()
            && self
                .extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_files.iter().any(|excluded| excluded == name)
    }
}

/// How shown-prompt bookkeeping ages.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Age after which a "shown" record is dropped. `0` disables decay.
    #[serde(default = "default_decay_hours")]
    pub decay_hours: u64,
    #[serde(default)]
    pub decay_policy: DecayPolicy,
}

fn default_decay_hours() -> u64 {
    24
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            decay_hours: default_decay_hours(),
            decay_policy: DecayPolicy::default(),
        }
    }
}

impl HistoryConfig {
    /// Maximum age of a shown record, or `None` when decay is disabled.
    pub fn decay_max_age_millis(&self) -> Option<i64> {
        if self.decay_hours == 0 {
            return None;
        }
        let hours = i64::try_from(self.decay_hours).unwrap_or(i64::MAX);
        Some(hours.saturating_mul(MILLIS_PER_HOUR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScribeConfig::default();
        assert_eq!(config.prompts.extensions, vec!["txt", "md"]);
        assert_eq!(config.history.decay_hours, 24);
        assert_eq!(config.history.decay_policy, DecayPolicy::Forget);
        assert_eq!(config.history.decay_max_age_millis(), Some(24 * MILLIS_PER_HOUR));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ScribeConfig = toml::from_str(
            r#"
            [history]
            decay_policy = "requeue"
            "#,
        )
        .unwrap();
        assert_eq!(config.history.decay_policy, DecayPolicy::Requeue);
        assert_eq!(config.history.decay_hours, 24);
        assert_eq!(config.prompts, PromptsConfig::default());
    }

    #[test]
    fn test_zero_hours_disables_decay() {
        let config = HistoryConfig {
            decay_hours: 0,
            decay_policy: DecayPolicy::Forget,
        };
        assert_eq!(config.decay_max_age_millis(), None);
    }

    #[test]
    fn test_extension_matching() {
        let prompts = PromptsConfig::default();
        assert!(prompts.is_allowed_extension("p1.txt"));
        assert!(prompts.is_allowed_extension("Notes.MD"));
        assert!(!prompts.is_allowed_extension("image.png"));
        assert!(!prompts.is_allowed_extension("README"));
        assert!(!prompts.is_allowed_extension(".txt"));
        assert!(prompts.is_excluded(".DS_Store"));
    }
}
