//! Prompt domain models and store trait.

mod model;
mod store;

pub use model::PromptSelection;
pub use store::PromptStore;
