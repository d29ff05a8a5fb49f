//! Apiprobe Domain - Core test-run types
//!
//! This crate defines the domain model of the apiprobe test runner: the
//! requests and responses it exchanges, the session carried between
//! checks, the scenario plan and the typed response records.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod page;
pub mod payloads;
pub mod plan;
pub mod records;
pub mod request;
pub mod response;
pub mod session;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use page::PageProbe;
pub use plan::{ScenarioId, ScenarioPlan};
pub use records::{ResponseRecord, ValidationError, decode, decode_list};
pub use session::{Credentials, ResourceKind, SessionState, TokenOverride};
pub use testing::{CheckOutcome, CheckSpec, RunSummary, RunTally, ScenarioResult};
