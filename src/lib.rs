// src/lib.rs
//! Intercept Engine Library
//!
//! Attaches cross-cutting behaviour (logging, metrics, validation, fallback)
//! around method calls on a target without modifying the target's code.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **interception**: lifecycle contract, dispatcher, chain, declaration
//!   resolution, proxy engine and factory
//! - **interceptors**: built-in interceptor kinds
//! - **observability**: tracing subscriber, metrics recorder, metric names
//! - **utils**: configuration and error types
//!
//! # Example
//!
//! ```ignore
//! use intercept_engine::interception::{ProxyFactory, Target};
//! use intercept_engine::interceptors::FallbackInterceptor;
//!
//! declare_interceptors!(Calculator => ["logging"]);
//!
//! let factory = ProxyFactory::new();
//! let calculator = factory.create_proxy::<Calculator>(
//!     vec![Arc::new(FallbackInterceptor::new(json!(-1)))],
//!     None,
//! )?;
//! let quotient = calculator.call("divide", vec![json!(10), json!(0)])?; // -1
//! ```

// Public module exports
pub mod interception;
pub mod interceptors;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use interception::{
    Intercepted, Interceptor, InterceptorChain, InterceptorKind, InterceptorRegistry, Invocation,
    MethodInfo, Proxy, ProxyFactory, ProxyOptions, ReturnType, Target,
};
pub use utils::config::FactoryConfig;
pub use utils::errors::{InterceptError, ProxyError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
