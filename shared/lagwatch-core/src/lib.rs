//! Lagwatch Core - Shared error and configuration types
//!
//! This crate provides:
//! - The service-level error type and `Result` alias
//! - Aggregation tunables loaded from the environment

pub mod config;
pub mod error;

pub use config::AggregationConfig;
pub use error::{LagwatchError, Result};
