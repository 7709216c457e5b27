// src/interception/registry.rs
//! Interceptor kind registry
//!
//! Maps a kind identifier to a factory that builds a fresh interceptor
//! instance. Declarations name kinds; the registry turns them into instances.
//! Kinds with a zero-argument constructor register through `Default`, other
//! kinds register a closure.

use crate::interception::contract::Interceptor;
use crate::utils::errors::{ProxyError, Result};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Identifier of an interceptor kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterceptorKind(String);

impl InterceptorKind {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Kind identified by the Rust type path of `T`
    pub fn of<T: Interceptor>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterceptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterceptorKind {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InterceptorKind {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Builds one interceptor instance
pub type InterceptorFactory =
    Arc<dyn Fn() -> anyhow::Result<Arc<dyn Interceptor>> + Send + Sync>;

static GLOBAL_REGISTRY: Lazy<Arc<InterceptorRegistry>> =
    Lazy::new(|| Arc::new(InterceptorRegistry::with_builtins()));

/// Kind identifier to factory mapping
pub struct InterceptorRegistry {
    factories: DashMap<InterceptorKind, InterceptorFactory>,
}

impl InterceptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Create a registry holding the built-in kinds
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        crate::interceptors::register_builtins(&registry);
        registry
    }

    /// Process-wide registry, populated with the built-in kinds on first use
    pub fn global() -> Arc<InterceptorRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register `T` under its type path using its zero-argument constructor
    pub fn register<T>(&self) -> InterceptorKind
    where
        T: Interceptor + Default,
    {
        let kind = InterceptorKind::of::<T>();
        self.register_factory(kind.clone(), || Ok(Arc::new(T::default()) as Arc<dyn Interceptor>));
        kind
    }

    /// Register `T` under an additional short name
    pub fn register_alias<T>(&self, alias: impl Into<InterceptorKind>)
    where
        T: Interceptor + Default,
    {
        self.register_factory(alias, || Ok(Arc::new(T::default()) as Arc<dyn Interceptor>));
    }

    /// Register an arbitrary factory, replacing any previous one for `kind`
    pub fn register_factory<F>(&self, kind: impl Into<InterceptorKind>, factory: F)
    where
        F: Fn() -> anyhow::Result<Arc<dyn Interceptor>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!("Registering interceptor kind {}", kind);

        if self.factories.insert(kind.clone(), Arc::new(factory)).is_some() {
            info!("Replaced factory for interceptor kind {}", kind);
        }
    }

    /// Remove a kind; returns whether it was registered
    pub fn unregister(&self, kind: &InterceptorKind) -> bool {
        self.factories.remove(kind).is_some()
    }

    pub fn contains(&self, kind: &InterceptorKind) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<InterceptorKind> {
        let mut kinds: Vec<InterceptorKind> =
            self.factories.iter().map(|entry| entry.key().clone()).collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build a fresh instance of `kind`
    pub fn instantiate(&self, kind: &InterceptorKind) -> Result<Arc<dyn Interceptor>> {
        // Clone the factory out so it runs without holding the shard lock.
        let factory = self
            .factories
            .get(kind)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ProxyError::Instantiation {
                kind: kind.to_string(),
                reason: "no zero-argument constructor registered".to_string(),
            })?;

        factory().map_err(|e| ProxyError::Instantiation {
            kind: kind.to_string(),
            reason: format!("{:#}", e),
        })
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
