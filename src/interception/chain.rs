// src/interception/chain.rs
//! Interceptor chain composition
//!
//! An [`InterceptorChain`] presents an ordered interceptor set to the proxy
//! engine as a single interception point. Links are addressed by index, so
//! link `n`'s `proceed` dispatches link `n + 1` and the last link's `proceed`
//! reaches the target.
//!
//! ```text
//! on_entry:    1 ─► 2 ─► … ─► N ─► target
//! on_exit:     1 ◄─ 2 ◄─ … ◄─ N ◄──┘
//! ```
//!
//! Each level converts failures independently. Once level `n` completes, level
//! `n - 1` sees a successful call carrying the default (or overridden) return
//! value, unless a hook at level `n` itself failed.

use crate::interception::contract::Interceptor;
use crate::interception::invocation::Invocation;
use crate::interception::method::MethodInfo;
use crate::observability::CALLS_TOTAL;
use crate::utils::errors::InterceptError;
use metrics::counter;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Ordered, shareable set of interceptors
///
/// The chain acts as one composed interceptor: [`InterceptorChain::invoke`] is
/// the single interception point a proxy engine drives for every call.
#[derive(Clone)]
pub struct InterceptorChain {
    interceptors: Arc<[Arc<dyn Interceptor>]>,
}

impl InterceptorChain {
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self {
            interceptors: interceptors.into(),
        }
    }

    /// A chain with no links; calls reach the target untouched
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Interceptor>> {
        self.interceptors.iter()
    }

    /// Interceptor names, outermost first
    pub fn names(&self) -> Vec<String> {
        self.interceptors
            .iter()
            .map(|i| i.name().to_string())
            .collect()
    }

    /// Route one call through every link and return the final value.
    ///
    /// With no links the target's own error is returned unchanged.
    pub fn invoke<'a, F>(
        &'a self,
        method: &'a MethodInfo,
        arguments: Vec<Value>,
        target: F,
    ) -> Result<Value, InterceptError>
    where
        F: FnOnce(&[Value]) -> Result<Value, InterceptError> + 'a,
    {
        counter!(CALLS_TOTAL, "method" => method.qualified_name()).increment(1);

        let mut invocation = Invocation::new(method, arguments, &self.interceptors, Box::new(target));
        invocation.proceed()?;
        Ok(invocation.into_return_value())
    }
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
