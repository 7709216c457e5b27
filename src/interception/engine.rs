// src/interception/engine.rs
//! Proxy engine interface and the built-in dispatch engine
//!
//! A [`ProxyEngine`] wraps a target together with a composed interceptor
//! chain and returns something callers use in place of the target.
//! [`DispatchEngine`] is the engine shipped with this crate: it works on
//! targets that describe their methods through [`Target`] and routes calls by
//! method name.

use crate::interception::chain::InterceptorChain;
use crate::interception::method::MethodInfo;
use crate::utils::errors::{InterceptError, ProxyError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A type whose methods can be proxied
pub trait Target: Send + Sync + 'static {
    /// Name used for declarations, logs and errors
    const TYPE_NAME: &'static str;

    /// Method table of the type
    fn methods() -> Vec<MethodInfo>;

    /// Interfaces the type implements
    fn interfaces() -> Vec<&'static str> {
        Vec::new()
    }

    /// Run `method` on this instance
    fn invoke(&self, method: &MethodInfo, args: &[Value]) -> std::result::Result<Value, InterceptError>;
}

/// How the proxy hooks into the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyMode {
    /// Every method is intercepted
    #[default]
    Subclass,

    /// Only interface methods are intercepted
    Interface,
}

/// Options handed to the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyOptions {
    pub mode: ProxyMode,

    /// Extra interfaces the proxy reports as implemented
    pub additional_interfaces: Vec<String>,

    /// Methods that bypass the interceptor chain
    pub excluded_methods: Vec<String>,
}

impl ProxyOptions {
    pub fn interface_proxy() -> Self {
        Self {
            mode: ProxyMode::Interface,
            ..Default::default()
        }
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.additional_interfaces.push(interface.into());
        self
    }

    pub fn excluding(mut self, method: impl Into<String>) -> Self {
        self.excluded_methods.push(method.into());
        self
    }

    /// Reject duplicate additional interfaces
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for interface in &self.additional_interfaces {
            if !seen.insert(interface.as_str()) {
                return Err(ProxyError::InvalidOptions(format!(
                    "interface {} listed twice",
                    interface
                )));
            }
        }
        Ok(())
    }
}

/// Builds proxies for targets of type `T`
pub trait ProxyEngine<T: Target> {
    type Proxy;

    fn create_proxy(
        &self,
        target: T,
        interceptor: InterceptorChain,
        options: ProxyOptions,
    ) -> Result<Self::Proxy>;
}

/// Name-routed engine for [`Target`] types
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchEngine;

impl<T: Target> ProxyEngine<T> for DispatchEngine {
    type Proxy = Proxy<T>;

    fn create_proxy(
        &self,
        target: T,
        interceptor: InterceptorChain,
        options: ProxyOptions,
    ) -> Result<Proxy<T>> {
        options.validate()?;

        let own_interfaces = T::interfaces();
        if options.mode == ProxyMode::Interface && own_interfaces.is_empty() {
            return Err(ProxyError::InvalidOptions(format!(
                "{} implements no interface to proxy",
                T::TYPE_NAME
            )));
        }

        let methods: HashMap<&'static str, MethodInfo> =
            T::methods().into_iter().map(|m| (m.name, m)).collect();

        for excluded in &options.excluded_methods {
            if !methods.contains_key(excluded.as_str()) {
                warn!("Excluded method {} not found on {}", excluded, T::TYPE_NAME);
            }
        }

        let mut interfaces: Vec<String> = own_interfaces.iter().map(|i| i.to_string()).collect();
        interfaces.extend(options.additional_interfaces.iter().cloned());

        debug!(
            "Built {:?} proxy for {} with {} methods",
            options.mode,
            T::TYPE_NAME,
            methods.len()
        );

        Ok(Proxy {
            target: Arc::new(target),
            methods,
            interfaces,
            chain: interceptor,
            options,
        })
    }
}

/// A target wrapped by its interceptor chain
pub struct Proxy<T> {
    target: Arc<T>,
    methods: HashMap<&'static str, MethodInfo>,
    interfaces: Vec<String>,
    chain: InterceptorChain,
    options: ProxyOptions,
}

impl<T: Target> Proxy<T> {
    /// Call `method` through the interceptor chain
    pub fn call(&self, method: &str, args: Vec<Value>) -> std::result::Result<Value, InterceptError> {
        let info = self
            .methods
            .get(method)
            .ok_or_else(|| InterceptError::UnknownMethod {
                type_name: T::TYPE_NAME.to_string(),
                method: method.to_string(),
            })?;

        let target = &self.target;

        if !self.is_intercepted(info) {
            trace!("Passing {} straight to target", info.qualified_name());
            return target.invoke(info, &args);
        }

        self.chain
            .invoke(info, args, move |args: &[Value]| target.invoke(info, args))
    }

    /// Call `method` and decode the result
    pub fn call_as<R: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> std::result::Result<R, InterceptError> {
        let value = self.call(method, args)?;

        serde_json::from_value(value).map_err(|e| InterceptError::Conversion {
            method: format!("{}::{}", T::TYPE_NAME, method),
            message: e.to_string(),
        })
    }

    /// Whether calls to `method` go through the chain
    pub fn is_intercepted(&self, method: &MethodInfo) -> bool {
        if self.options.excluded_methods.iter().any(|m| m == method.name) {
            return false;
        }

        match self.options.mode {
            ProxyMode::Subclass => true,
            ProxyMode::Interface => method.interface.is_some(),
        }
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Interceptor names, outermost first
    pub fn interceptors(&self) -> Vec<String> {
        self.chain.names()
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    pub fn options(&self) -> &ProxyOptions {
        &self.options
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interception::contract::Interceptor;
    use crate::interception::test_support::{journal, Calculator, Echo, Recorder};
    use serde_json::json;

    fn proxy_with(
        options: ProxyOptions,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Proxy<Calculator>> {
        DispatchEngine.create_proxy(
            Calculator::default(),
            InterceptorChain::new(interceptors),
            options,
        )
    }

    #[test]
    fn test_options_default() {
        let options = ProxyOptions::default();
        assert_eq!(options.mode, ProxyMode::Subclass);
        assert!(options.additional_interfaces.is_empty());
        assert!(options.excluded_methods.is_empty());
    }

    #[test]
    fn test_options_deserialize() {
        let options: ProxyOptions = serde_json::from_value(json!({
            "mode": "interface",
            "excluded_methods": ["describe"]
        }))
        .unwrap();

        assert_eq!(options.mode, ProxyMode::Interface);
        assert_eq!(options.excluded_methods, vec!["describe"]);
    }

    #[test]
    fn test_duplicate_interfaces_rejected() {
        let options = ProxyOptions::default()
            .with_interface("Audited")
            .with_interface("Audited");

        assert!(matches!(
            proxy_with(options, vec![]),
            Err(ProxyError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_interface_mode_requires_interfaces() {
        let result = DispatchEngine.create_proxy(
            Echo,
            InterceptorChain::empty(),
            ProxyOptions::interface_proxy(),
        );
        assert!(matches!(result, Err(ProxyError::InvalidOptions(_))));
    }

    #[test]
    fn test_passthrough_proxy() {
        let proxy = proxy_with(ProxyOptions::default(), vec![]).unwrap();

        assert_eq!(proxy.call("add", vec![json!(2), json!(3)]).unwrap(), json!(5));
        assert_eq!(
            proxy.call("divide", vec![json!(1), json!(0)]),
            Err(InterceptError::call("Calculator::divide", "division by zero"))
        );
        assert!(proxy.interceptors().is_empty());
    }

    #[test]
    fn test_arithmetic_overflow_is_a_call_error() {
        let proxy = proxy_with(ProxyOptions::default(), vec![]).unwrap();

        assert_eq!(
            proxy.call("add", vec![json!(i64::MAX), json!(1)]),
            Err(InterceptError::call("Calculator::add", "overflow"))
        );
        assert_eq!(
            proxy.call("divide", vec![json!(i64::MIN), json!(-1)]),
            Err(InterceptError::call("Calculator::divide", "overflow"))
        );

        let log = journal();
        let intercepted = proxy_with(
            ProxyOptions::default(),
            vec![Arc::new(Recorder::new("A", &log))],
        )
        .unwrap();
        assert_eq!(
            intercepted.call("add", vec![json!(i64::MAX), json!(1)]).unwrap(),
            json!(0)
        );
    }

    #[test]
    fn test_unknown_method() {
        let proxy = proxy_with(ProxyOptions::default(), vec![]).unwrap();

        let err = proxy.call("multiply", vec![]).unwrap_err();
        assert_eq!(
            err,
            InterceptError::UnknownMethod {
                type_name: "Calculator".to_string(),
                method: "multiply".to_string(),
            }
        );
        assert!(!proxy.has_method("multiply"));
    }

    #[test]
    fn test_interface_mode_skips_plain_methods() {
        let log = journal();
        let proxy = proxy_with(
            ProxyOptions::interface_proxy(),
            vec![Arc::new(Recorder::new("A", &log))],
        )
        .unwrap();

        proxy.call("describe", vec![]).unwrap();
        assert!(log.lock().is_empty());

        proxy.call("add", vec![json!(1), json!(1)]).unwrap();
        assert_eq!(log.lock().len(), 3);
    }

    #[test]
    fn test_excluded_methods_bypass_chain() {
        let log = journal();
        let proxy = proxy_with(
            ProxyOptions::default().excluding("divide"),
            vec![Arc::new(Recorder::new("A", &log))],
        )
        .unwrap();

        let err = proxy.call("divide", vec![json!(1), json!(0)]).unwrap_err();
        assert!(matches!(err, InterceptError::Call { .. }));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_implements() {
        let proxy = proxy_with(ProxyOptions::default().with_interface("Audited"), vec![]).unwrap();

        assert!(proxy.implements("Arithmetic"));
        assert!(proxy.implements("Audited"));
        assert!(!proxy.implements("Serializable"));
    }

    #[test]
    fn test_call_as() {
        let log = journal();
        let proxy = proxy_with(
            ProxyOptions::default(),
            vec![Arc::new(Recorder::new("A", &log))],
        )
        .unwrap();

        let sum: i64 = proxy.call_as("add", vec![json!(20), json!(22)]).unwrap();
        assert_eq!(sum, 42);

        let fallback: i64 = proxy.call_as("divide", vec![json!(10), json!(0)]).unwrap();
        assert_eq!(fallback, 0);

        let description: Option<String> = proxy.call_as("describe", vec![]).unwrap();
        assert_eq!(description.as_deref(), Some("calculator"));

        let bad = proxy.call_as::<bool>("add", vec![json!(1), json!(2)]);
        assert!(matches!(bad, Err(InterceptError::Conversion { .. })));
    }

    #[test]
    fn test_invalid_argument_becomes_default() {
        let log = journal();
        let proxy = proxy_with(
            ProxyOptions::default(),
            vec![Arc::new(Recorder::new("A", &log))],
        )
        .unwrap();

        let value = proxy.call("add", vec![json!("two"), json!(2)]).unwrap();
        assert_eq!(value, json!(0));
        assert_eq!(proxy.target().calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_share_interceptors() {
        let log = journal();
        let proxy = Arc::new(
            proxy_with(
                ProxyOptions::default(),
                vec![Arc::new(Recorder::new("A", &log))],
            )
            .unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..16i64 {
            let proxy = Arc::clone(&proxy);
            handles.push(tokio::task::spawn_blocking(move || {
                proxy.call("add", vec![json!(i), json!(1)])
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(value, json!(i as i64 + 1));
        }

        assert_eq!(proxy.target().calls(), 16);
        assert_eq!(log.lock().len(), 16 * 3);
    }
}
