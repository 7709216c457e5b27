// src/interceptors/fallback.rs
//! Custom fallback values for failed calls

use crate::interception::{Interceptor, Invocation};
use crate::utils::errors::InterceptError;
use serde_json::Value;
use tracing::debug;

/// Replaces the type default with a fixed value when a call fails
#[derive(Debug, Clone)]
pub struct FallbackInterceptor {
    value: Value,
    methods: Vec<String>,
}

impl FallbackInterceptor {
    /// Applies to every method
    pub fn new(value: Value) -> Self {
        Self {
            value,
            methods: Vec::new(),
        }
    }

    /// Restrict to the named method; may be called repeatedly
    pub fn for_method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    fn applies_to(&self, method: &str) -> bool {
        self.methods.is_empty() || self.methods.iter().any(|m| m == method)
    }
}

impl Interceptor for FallbackInterceptor {
    fn name(&self) -> &str {
        "fallback"
    }

    fn on_exception(
        &self,
        invocation: &mut Invocation<'_>,
        _error: &InterceptError,
    ) -> Result<(), InterceptError> {
        if self.applies_to(invocation.method().name) {
            debug!(
                "Substituting fallback {} for {}",
                self.value,
                invocation.method().qualified_name()
            );
            invocation.set_return_value(self.value.clone());
        }
        Ok(())
    }
}
