// Public modules
pub mod channels;
pub mod error;
pub mod output;
pub mod plan;
pub mod retry;
pub mod runner;
pub mod settings;
pub mod slack;
pub mod validate;

#[cfg(test)]
pub(crate) mod fakes;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use output::{BulkResult, BulkSummary, ItemOutcome};
