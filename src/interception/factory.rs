// src/interception/factory.rs
//! Proxy construction
//!
//! Resolves declared interceptors for a target type, appends the explicitly
//! supplied ones, composes the chain and hands it to the proxy engine. A type
//! with nothing to attach still gets a proxy, with an empty chain.

use crate::interception::chain::InterceptorChain;
use crate::interception::contract::Interceptor;
use crate::interception::engine::{DispatchEngine, ProxyEngine, ProxyOptions};
use crate::interception::metadata::{ConfiguredDeclarations, Intercepted};
use crate::interception::registry::InterceptorRegistry;
use crate::interception::resolver::DeclarationResolver;
use crate::observability::PROXIES_CREATED_TOTAL;
use crate::utils::config::FactoryConfig;
use crate::utils::errors::Result;
use metrics::counter;
use std::sync::Arc;
use tracing::info;

/// Builds proxies with declared and explicit interceptors
pub struct ProxyFactory<E = DispatchEngine> {
    resolver: DeclarationResolver,
    engine: E,
    default_options: ProxyOptions,
}

impl ProxyFactory<DispatchEngine> {
    /// Factory over the global registry and the dispatch engine
    pub fn new() -> Self {
        Self::with_engine(DeclarationResolver::default(), DispatchEngine)
    }

    /// Factory using configured declarations and default options
    pub fn from_config(config: &FactoryConfig) -> Self {
        Self::from_config_with_registry(config, InterceptorRegistry::global())
    }

    pub fn from_config_with_registry(
        config: &FactoryConfig,
        registry: Arc<InterceptorRegistry>,
    ) -> Self {
        let declarations = ConfiguredDeclarations::new(&config.declarations);
        let resolver = DeclarationResolver::new(registry).with_source(Arc::new(declarations));

        Self::with_engine(resolver, DispatchEngine).with_default_options(config.proxy.clone())
    }
}

impl<E> ProxyFactory<E> {
    pub fn with_engine(resolver: DeclarationResolver, engine: E) -> Self {
        Self {
            resolver,
            engine,
            default_options: ProxyOptions::default(),
        }
    }

    /// Options used when a call passes `None`
    pub fn with_default_options(mut self, options: ProxyOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn resolver(&self) -> &DeclarationResolver {
        &self.resolver
    }

    pub fn default_options(&self) -> &ProxyOptions {
        &self.default_options
    }

    /// Declared interceptors for `T` followed by `explicit`, composed
    pub fn interceptor_set<T: Intercepted>(
        &self,
        explicit: Vec<Arc<dyn Interceptor>>,
    ) -> Result<InterceptorChain> {
        let mut interceptors = self.resolver.resolve::<T>()?;
        interceptors.extend(explicit);
        Ok(InterceptorChain::new(interceptors))
    }

    /// Construct `T` with its zero-argument constructor and proxy it
    pub fn create_proxy<T>(
        &self,
        explicit: Vec<Arc<dyn Interceptor>>,
        options: Option<ProxyOptions>,
    ) -> Result<E::Proxy>
    where
        T: Intercepted + Default,
        E: ProxyEngine<T>,
    {
        self.wrap(T::default(), explicit, options)
    }

    /// Proxy an existing instance of `T`
    pub fn wrap<T>(
        &self,
        target: T,
        explicit: Vec<Arc<dyn Interceptor>>,
        options: Option<ProxyOptions>,
    ) -> Result<E::Proxy>
    where
        T: Intercepted,
        E: ProxyEngine<T>,
    {
        let chain = self.interceptor_set::<T>(explicit)?;
        let options = options.unwrap_or_else(|| self.default_options.clone());

        info!(
            "Creating proxy for {} with interceptors {:?}",
            T::TYPE_NAME,
            chain.names()
        );

        let proxy = self.engine.create_proxy(target, chain, options)?;
        counter!(PROXIES_CREATED_TOTAL, "type" => T::TYPE_NAME).increment(1);
        Ok(proxy)
    }
}

impl Default for ProxyFactory<DispatchEngine> {
    fn default() -> Self {
        Self::new()
    }
}
