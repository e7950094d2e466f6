//! Data models for reviewer selection.
//!
//! These are built fresh from live repository state on every run and
//! discarded when the run ends.

pub mod file_change;
pub mod participation;
pub mod selection;

// Re-exports for convenient access
pub use file_change::{CommitSummary, FileChange, FileStatus};
pub use participation::{ParticipationCheck, ParticipationRecord, ParticipationScore};
pub use selection::{SelectionMode, SelectionResult};
