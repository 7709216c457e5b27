// src/interception/invocation.rs
//! One in-flight proxied call
//!
//! An [`Invocation`] carries the method identity, the arguments, the return
//! value slot and the one-shot underlying call. It also holds the ordered
//! interceptor slice of its chain plus an index pointing at the next link, so
//! `proceed` walks the chain without nesting closures.

use crate::interception::contract::Interceptor;
use crate::interception::dispatcher;
use crate::interception::method::MethodInfo;
use crate::utils::errors::InterceptError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::trace;
use ulid::Ulid;

/// The real underlying call; consumed on first use
pub type TargetCall<'a> = Box<dyn FnOnce(&[Value]) -> Result<Value, InterceptError> + 'a>;

/// Runtime record of one proxied call
pub struct Invocation<'a> {
    id: Ulid,
    method: &'a MethodInfo,
    arguments: Vec<Value>,
    return_value: Value,
    target: Option<TargetCall<'a>>,
    interceptors: &'a [Arc<dyn Interceptor>],
    position: usize,
}

impl<'a> Invocation<'a> {
    pub fn new(
        method: &'a MethodInfo,
        arguments: Vec<Value>,
        interceptors: &'a [Arc<dyn Interceptor>],
        target: TargetCall<'a>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            method,
            arguments,
            return_value: Value::Null,
            target: Some(target),
            interceptors,
            position: 0,
        }
    }

    /// Unique id of this call
    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn method(&self) -> &'a MethodInfo {
        self.method
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// Decode one argument into a concrete type
    pub fn argument_as<T: DeserializeOwned>(&self, index: usize) -> Result<T, InterceptError> {
        decode_argument(&self.arguments, index, self.method)
    }

    /// Replace an argument before the call proceeds
    pub fn set_argument(&mut self, index: usize, value: Value) -> Result<(), InterceptError> {
        match self.arguments.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(InterceptError::InvalidArgument {
                method: self.method.qualified_name(),
                index,
                message: format!("only {} arguments present", self.arguments.len()),
            }),
        }
    }

    pub fn return_value(&self) -> &Value {
        &self.return_value
    }

    pub fn set_return_value(&mut self, value: Value) {
        self.return_value = value;
    }

    pub(crate) fn into_return_value(self) -> Value {
        self.return_value
    }

    /// Whether the underlying call has been consumed
    pub fn has_proceeded(&self) -> bool {
        self.target.is_none()
    }

    /// Number of chain links entered so far
    pub fn depth(&self) -> usize {
        self.position
    }

    /// Continue the call.
    ///
    /// Dispatches to the next interceptor if one remains, otherwise runs the
    /// underlying call. The underlying call runs at most once; reaching it a
    /// second time fails with [`InterceptError::AlreadyProceeded`].
    pub fn proceed(&mut self) -> Result<(), InterceptError> {
        let interceptors = self.interceptors;

        if let Some(next) = interceptors.get(self.position) {
            let current = self.position;
            self.position += 1;
            let result = dispatcher::intercept(next.as_ref(), self);
            self.position = current;
            return result;
        }

        let target = self
            .target
            .take()
            .ok_or_else(|| InterceptError::AlreadyProceeded(self.method.qualified_name()))?;

        trace!(invocation = %self.id, method = self.method.name, "Invoking target");
        self.return_value = target(&self.arguments)?;
        Ok(())
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("id", &self.id)
            .field("method", &self.method.qualified_name())
            .field("arguments", &self.arguments)
            .field("return_value", &self.return_value)
            .field("proceeded", &self.has_proceeded())
            .field("position", &self.position)
            .finish()
    }
}

/// Decode argument `index` of a call to `method`.
///
/// Shared by [`Invocation::argument_as`] and target implementations.
pub fn decode_argument<T: DeserializeOwned>(
    arguments: &[Value],
    index: usize,
    method: &MethodInfo,
) -> Result<T, InterceptError> {
    let value = arguments.get(index).ok_or_else(|| InterceptError::InvalidArgument {
        method: method.qualified_name(),
        index,
        message: "missing".to_string(),
    })?;

    serde_json::from_value(value.clone()).map_err(|e| InterceptError::InvalidArgument {
        method: method.qualified_name(),
        index,
        message: e.to_string(),
    })
}
