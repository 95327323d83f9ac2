pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{shell_length_for, AggregationRule, ShellClass, Side, DEFAULT_SHELL_LENGTH_M};
pub use error::CoreError;
pub use structs::{validate_records, IngestReport, RaceResult, RaceResultRecord, RejectedRecord};
