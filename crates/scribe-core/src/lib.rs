//! Domain layer for Scribe.
//!
//! Holds the prompt history models and the rotation bookkeeping, along with
//! the traits the application layer uses to reach prompt files, durable
//! storage and the clock.

pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod prompt;

// Re-export common error type
pub use error::ScribeError;
