// src/interception/mod.rs
//! Method-call interception core
//!
//! This module attaches cross-cutting behaviour around calls on a target
//! without touching the target's code:
//!
//! - **Contract**: the four lifecycle hooks every interceptor may implement
//! - **Dispatcher**: runs one interceptor's hooks and converts failures into
//!   default return values
//! - **Chain**: composes an ordered interceptor set into one interception point
//! - **Registry / Metadata / Resolver**: turn declared interceptor kinds into
//!   instances
//! - **Engine**: wraps a target with a chain (the built-in engine routes by
//!   method name)
//! - **Factory**: resolves, merges and hands everything to the engine
//!
//! # Architecture
//!
//! ```text
//! ProxyFactory::create_proxy::<T>(explicit, options)
//!     │
//!     ├─ DeclarationResolver ─► [declared...]   (type metadata, then config)
//!     ├─ merge               ─► [declared..., explicit...]
//!     ├─ InterceptorChain
//!     └─ ProxyEngine         ─► Proxy<T>
//!
//! proxy.call("divide", args)
//!     └─ chain ─► dispatcher(1) ─► dispatcher(2) ─► … ─► target
//! ```

pub mod chain;
pub mod contract;
pub mod dispatcher;
pub mod engine;
pub mod factory;
pub mod invocation;
pub mod metadata;
pub mod method;
pub mod registry;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use chain::InterceptorChain;
pub use contract::Interceptor;
pub use engine::{DispatchEngine, Proxy, ProxyEngine, ProxyMode, ProxyOptions, Target};
pub use factory::ProxyFactory;
pub use invocation::{decode_argument, Invocation};
pub use metadata::{ConfiguredDeclarations, InterceptorDeclaration, Intercepted, MetadataSource};
pub use method::{MethodInfo, ReturnType};
pub use registry::{InterceptorFactory, InterceptorKind, InterceptorRegistry};
pub use resolver::DeclarationResolver;
