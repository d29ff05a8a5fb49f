//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body could not be encoded as JSON.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A scenario name does not match any known scenario.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A scenario appears more than once in a plan.
    #[error("scenario '{0}' is listed more than once")]
    DuplicateScenario(String),

    /// A scenario is scheduled before one of its prerequisites.
    #[error("scenario '{scenario}' must run after '{prerequisite}'")]
    PrerequisiteOrder {
        /// The dependent scenario.
        scenario: String,
        /// The prerequisite that is missing or scheduled later.
        prerequisite: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
