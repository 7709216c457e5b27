// src/utils/mod.rs
//! Common utilities
//!
//! - **Config**: layered configuration loading
//! - **Errors**: error types shared across the crate

pub mod config;
pub mod errors;

pub use config::{FactoryConfig, LoggingConfig};
pub use errors::{InterceptError, ProxyError, Result};
