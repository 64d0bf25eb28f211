//! Application layer for Scribe.
//!
//! Coordinates the domain tracker with the prompt store, history storage and
//! clock to implement the prompt rotation use case.

pub mod prompt_rotation_service;

pub use prompt_rotation_service::PromptRotationService;
