//! Apiprobe Infrastructure - Adapters and configuration
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, and loads the run configuration.

pub mod adapters;
pub mod config;

pub use adapters::{ConsoleReporter, ReqwestHttpClient, SilentReporter, SystemClock};
pub use config::{ConfigError, ConfigOverrides, ProbeConfig};
