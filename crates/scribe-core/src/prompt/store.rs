//! Prompt store trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Source of prompt categories and their items.
///
/// No caching is implied: every listing is a fresh snapshot of the backing
/// store.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Points the store at a new root folder.
    ///
    /// Fails with `NotFound` if the folder does not exist.
    async fn select_root(&self, root: &Path) -> Result<()>;

    /// Lists the categories available under the current root.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// Lists the item handles of a category.
    ///
    /// Fails with `NotFound` if the category does not exist. An existing but
    /// empty category yields an empty list.
    async fn list_items(&self, category: &str) -> Result<Vec<String>>;

    /// Reads the content of an item.
    ///
    /// Fails with `NotFound` if the handle no longer exists.
    async fn read_item(&self, category: &str, handle: &str) -> Result<String>;
}
