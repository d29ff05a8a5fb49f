//! Apiprobe Application - Scenario procedures and run orchestration
//!
//! This crate sits between the pure domain model and the adapters. It
//! defines the ports the adapters implement, the check invoker, the
//! scenario procedures and the suite that runs a plan to a summary.

pub mod error;
pub mod invoker;
pub mod ports;
pub mod scenarios;
pub mod suite;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use invoker::CheckInvoker;
pub use ports::{Clock, HttpClient, HttpClientError, Reporter};
pub use scenarios::{NO_TOKEN, ScenarioRunner, ScenarioSettings};
pub use suite::{RunSuite, resolve_plan};
