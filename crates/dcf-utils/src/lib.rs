//! Shared utilities for the dcf workspace
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and the application-level configuration envelope.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::{LogFormat, init_tracing};
