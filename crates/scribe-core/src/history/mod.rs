//! Prompt history domain models, tracker and repository trait.
//!
//! The history remembers, per category, which prompts were already shown in
//! the current cycle so that prompts do not repeat until all have been seen.

mod model;
mod repository;
mod tracker;

pub use model::{CategoryHistory, CategoryStatus, HistoryState, ViewedRecord};
pub use repository::HistoryRepository;
pub use tracker::{DecayPolicy, HistoryTracker};
