// src/utils/errors.rs
//! Error types for the interception engine
//!
//! Two families of errors exist:
//!
//! - [`InterceptError`] travels along the call path. It is what a target
//!   method or a hook returns, what `Invocation::proceed` yields, and what a
//!   proxy call finally surfaces when no dispatcher level absorbs it.
//! - [`ProxyError`] belongs to proxy construction: resolving declarations,
//!   instantiating kinds, validating options, loading configuration.

use thiserror::Error;

/// Errors raised while a proxied call is in flight
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterceptError {
    /// The target method (or hook code acting on its behalf) failed
    #[error("call to {method} failed: {message}")]
    Call { method: String, message: String },

    /// A lifecycle hook of a named interceptor failed
    #[error("interceptor {interceptor} failed in {hook}: {message}")]
    Hook {
        interceptor: String,
        hook: String,
        message: String,
    },

    /// The underlying call was already executed for this invocation
    #[error("underlying call for {0} was already executed")]
    AlreadyProceeded(String),

    /// The proxied type exposes no method with this name
    #[error("{type_name} has no method named {method}")]
    UnknownMethod { type_name: String, method: String },

    /// An argument is missing or has the wrong shape
    #[error("invalid argument {index} for {method}: {message}")]
    InvalidArgument {
        method: String,
        index: usize,
        message: String,
    },

    /// A return value could not be converted to the requested type
    #[error("cannot convert result of {method}: {message}")]
    Conversion { method: String, message: String },
}

impl InterceptError {
    pub fn call(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Call {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn hook(
        interceptor: impl Into<String>,
        hook: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Hook {
            interceptor: interceptor.into(),
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// Whether this error originated in a lifecycle hook
    pub fn is_hook_error(&self) -> bool {
        matches!(self, Self::Hook { .. })
    }
}

/// Errors raised while constructing a proxy
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Cannot instantiate interceptor kind {kind}: {reason}")]
    Instantiation { kind: String, reason: String },

    #[error("Invalid proxy options: {0}")]
    InvalidOptions(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Observability setup failed: {0}")]
    Observability(String),
}

impl From<config::ConfigError> for ProxyError {
    fn from(err: config::ConfigError) -> Self {
        ProxyError::Config(err.to_string())
    }
}

/// Result alias for proxy construction
pub type Result<T> = std::result::Result<T, ProxyError>;
