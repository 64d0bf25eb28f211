//! File-system prompt store.
//!
//! A prompt folder holds one subfolder per category; every text file inside
//! a category is a prompt and its file name is the prompt's handle.
//!
//! ```text
//! prompts/
//! ├── fantasy/
//! │   ├── dragon.txt
//! │   └── quest.md
//! └── scifi/
//!     └── mars.txt
//! ```

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use scribe_core::ScribeError;
use scribe_core::config::PromptsConfig;
use scribe_core::error::Result;
use scribe_core::prompt::PromptStore;

/// Prompt store backed by a folder on disk.
pub struct FsPromptStore {
    root: RwLock<Option<PathBuf>>,
    prompts: PromptsConfig,
}

impl FsPromptStore {
    /// Creates a store with no folder selected yet.
    pub fn new(prompts: PromptsConfig) -> Self {
        Self {
            root: RwLock::new(None),
            prompts,
        }
    }

    /// Creates a store rooted at `root` without checking that it exists.
    pub fn with_root(root: PathBuf, prompts: PromptsConfig) -> Self {
        Self {
            root: RwLock::new(Some(root)),
            prompts,
        }
    }

    /// Returns the currently selected folder.
    pub async fn root(&self) -> Option<PathBuf> {
        self.root.read().await.clone()
    }

    async fn require_root(&self) -> Result<PathBuf> {
        self.root
            .read()
            .await
            .clone()
            .ok_or(ScribeError::NoFolderSelected)
    }

    async fn category_dir(&self, category: &str) -> Result<PathBuf> {
        if !is_plain_name(category) || self.prompts.is_excluded(category) {
            return Err(ScribeError::category_not_found(category));
        }

        let dir = self.require_root().await?.join(category);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(ScribeError::category_not_found(category)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScribeError::category_not_found(category))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_prompt_file(&self, name: &str) -> bool {
        !self.prompts.is_excluded(name) && self.prompts.is_allowed_extension(name)
    }
}

/// A single path segment: no separators, no `.`/`..`, not hidden.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.starts_with('.')
        && !name.contains(['/', '\\'])
}

#[async_trait]
impl PromptStore for FsPromptStore {
    async fn select_root(&self, root: &Path) -> Result<()> {
        match fs::metadata(root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ScribeError::folder_not_found(root.to_string_lossy())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScribeError::folder_not_found(root.to_string_lossy()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("[PromptStore] Prompt folder set to {:?}", root);
        *self.root.write().await = Some(root.to_path_buf());
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        let root = self.require_root().await?;
        let mut entries = fs::read_dir(&root).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScribeError::folder_not_found(root.to_string_lossy())
            } else {
                e.into()
            }
        })?;

        let mut categories = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_plain_name(&name) && !self.prompts.is_excluded(&name) {
                categories.push(name);
            }
        }

        categories.sort();
        Ok(categories)
    }

    async fn list_items(&self, category: &str) -> Result<Vec<String>> {
        let dir = self.category_dir(category).await?;
        let mut entries = fs::read_dir(&dir).await?;

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_plain_name(&name) && self.is_prompt_file(&name) {
                items.push(name);
            }
        }

        items.sort();
        tracing::debug!("[PromptStore] {} prompt(s) in '{}'", items.len(), category);
        Ok(items)
    }

    async fn read_item(&self, category: &str, handle: &str) -> Result<String> {
        if !is_plain_name(handle) || !self.is_prompt_file(handle) {
            return Err(ScribeError::prompt_not_found(handle));
        }

        let path = self.category_dir(category).await?.join(handle);
        let bytes = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScribeError::prompt_not_found(handle)
            } else {
                ScribeError::from(e)
            }
        })?;

        // Prompts saved in legacy encodings still read; bad bytes become U+FFFD.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
