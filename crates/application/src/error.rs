//! Application error types

use apiprobe_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// Failures of individual checks never surface here; they are recorded in
/// the run summary. These errors stop a run before it starts.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The selection resolved to no scenario at all.
    #[error("nothing to run: the scenario plan is empty")]
    EmptyPlan,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
