use core_types::CoreError;
use thiserror::Error;

/// Errors raised by the engine.
///
/// Missing data is never an error here: an empty result set produces an empty
/// ranking or comparison. These variants all indicate a caller or configuration bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error("Previous snapshot is for boat class '{found}', expected '{expected}'")]
    SnapshotMismatch { expected: String, found: String },

    #[error("Cannot compare team '{0}' with itself")]
    SameTeam(String),
}
