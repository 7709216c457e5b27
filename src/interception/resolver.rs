// src/interception/resolver.rs
//! Declaration resolution
//!
//! Reads every declaration for a target type and instantiates each declared
//! kind through the registry. Type-attached declarations come first, followed
//! by each metadata source in the order it was added. Duplicate kinds are kept
//! and yield independent instances.

use crate::interception::contract::Interceptor;
use crate::interception::metadata::{InterceptorDeclaration, Intercepted, MetadataSource};
use crate::interception::registry::InterceptorRegistry;
use crate::utils::errors::Result;
use std::sync::Arc;
use tracing::debug;

/// Turns declarations into interceptor instances
pub struct DeclarationResolver {
    registry: Arc<InterceptorRegistry>,
    sources: Vec<Arc<dyn MetadataSource>>,
}

impl DeclarationResolver {
    pub fn new(registry: Arc<InterceptorRegistry>) -> Self {
        Self {
            registry,
            sources: Vec::new(),
        }
    }

    /// Add an external metadata source, consulted after type-attached declarations
    pub fn with_source(mut self, source: Arc<dyn MetadataSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn registry(&self) -> &Arc<InterceptorRegistry> {
        &self.registry
    }

    /// All declarations for `T`, in resolution order
    pub fn declarations<T: Intercepted>(&self) -> Vec<InterceptorDeclaration> {
        let mut declarations = T::declarations();

        for source in &self.sources {
            declarations.extend(source.declared_kinds(T::TYPE_NAME).into_iter().map(|kind| {
                InterceptorDeclaration {
                    target_type: T::TYPE_NAME.to_string(),
                    kind,
                }
            }));
        }

        declarations
    }

    /// Instantiate every declared kind for `T`.
    ///
    /// Fails on the first kind that cannot be constructed.
    pub fn resolve<T: Intercepted>(&self) -> Result<Vec<Arc<dyn Interceptor>>> {
        let declarations = self.declarations::<T>();
        debug!(
            "Resolving {} declared interceptors for {}",
            declarations.len(),
            T::TYPE_NAME
        );

        declarations
            .iter()
            .map(|declaration| self.registry.instantiate(&declaration.kind))
            .collect()
    }
}

impl Default for DeclarationResolver {
    fn default() -> Self {
        Self::new(InterceptorRegistry::global())
    }
}
