//! Data transfer objects for persisted documents.

mod history;

pub use history::{CategoryHistoryDTO, HistoryDocumentDTO, HistoryValidationError, ShownEntryDTO};
