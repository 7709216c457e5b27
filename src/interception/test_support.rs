// src/interception/test_support.rs
//! Shared fixtures for interception tests

use crate::interception::contract::Interceptor;
use crate::interception::engine::Target;
use crate::interception::invocation::{decode_argument, Invocation};
use crate::interception::method::{MethodInfo, ReturnType};
use crate::utils::errors::InterceptError;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Writes `<label>.<hook>` to a shared journal for every hook it sees
pub(crate) struct Recorder {
    label: String,
    journal: Journal,
    failing: Vec<&'static str>,
    fallback: Option<Value>,
    seen_on_exception: Mutex<Option<Value>>,
    seen_error: Mutex<Option<InterceptError>>,
}

impl Recorder {
    pub(crate) fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: Arc::clone(journal),
            failing: Vec::new(),
            fallback: None,
            seen_on_exception: Mutex::new(None),
            seen_error: Mutex::new(None),
        }
    }

    /// Make `hook` return an error after journaling
    pub(crate) fn failing_in(mut self, hook: &'static str) -> Self {
        self.failing.push(hook);
        self
    }

    /// Replace the return value in `on_exception`
    pub(crate) fn overriding(mut self, value: Value) -> Self {
        self.fallback = Some(value);
        self
    }

    /// Return value observed when `on_exception` started
    pub(crate) fn seen_on_exception(&self) -> Option<Value> {
        self.seen_on_exception.lock().clone()
    }

    pub(crate) fn seen_error(&self) -> Option<InterceptError> {
        self.seen_error.lock().clone()
    }

    fn record(&self, hook: &'static str) -> Result<(), InterceptError> {
        self.journal.lock().push(format!("{}.{}", self.label, hook));
        if self.failing.contains(&hook) {
            return Err(InterceptError::hook(self.label.clone(), hook, "boom"));
        }
        Ok(())
    }
}

impl Interceptor for Recorder {
    fn name(&self) -> &str {
        &self.label
    }

    fn on_entry(&self, _invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        self.record("on_entry")
    }

    fn on_success(&self, _invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        self.record("on_success")
    }

    fn on_exception(
        &self,
        invocation: &mut Invocation<'_>,
        error: &InterceptError,
    ) -> Result<(), InterceptError> {
        *self.seen_on_exception.lock() = Some(invocation.return_value().clone());
        *self.seen_error.lock() = Some(error.clone());
        if let Some(fallback) = &self.fallback {
            invocation.set_return_value(fallback.clone());
        }
        self.record("on_exception")
    }

    fn on_exit(&self, _invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        self.record("on_exit")
    }
}

/// Arithmetic target with one interface and one plain method
#[derive(Default)]
pub(crate) struct Calculator {
    calls: AtomicUsize,
}

impl Calculator {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Target for Calculator {
    const TYPE_NAME: &'static str = "Calculator";

    fn methods() -> Vec<MethodInfo> {
        vec![
            MethodInfo::new(Self::TYPE_NAME, "add", ReturnType::Int).with_interface("Arithmetic"),
            MethodInfo::new(Self::TYPE_NAME, "divide", ReturnType::Int)
                .with_interface("Arithmetic"),
            MethodInfo::new(Self::TYPE_NAME, "describe", ReturnType::Text),
        ]
    }

    fn interfaces() -> Vec<&'static str> {
        vec!["Arithmetic"]
    }

    fn invoke(&self, method: &MethodInfo, args: &[Value]) -> Result<Value, InterceptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match method.name {
            "add" => {
                let a: i64 = decode_argument(args, 0, method)?;
                let b: i64 = decode_argument(args, 1, method)?;
                a.checked_add(b)
                    .map(|sum| json!(sum))
                    .ok_or_else(|| InterceptError::call(method.qualified_name(), "overflow"))
            }
            "divide" => {
                let a: i64 = decode_argument(args, 0, method)?;
                let b: i64 = decode_argument(args, 1, method)?;
                if b == 0 {
                    return Err(InterceptError::call(method.qualified_name(), "division by zero"));
                }
                a.checked_div(b)
                    .map(|q| json!(q))
                    .ok_or_else(|| InterceptError::call(method.qualified_name(), "overflow"))
            }
            "describe" => Ok(json!("calculator")),
            other => Err(InterceptError::UnknownMethod {
                type_name: Self::TYPE_NAME.to_string(),
                method: other.to_string(),
            }),
        }
    }
}

crate::declare_interceptors!(Calculator => ["audit"]);

/// Target without interfaces or declarations
#[derive(Default)]
pub(crate) struct Echo;

impl Target for Echo {
    const TYPE_NAME: &'static str = "Echo";

    fn methods() -> Vec<MethodInfo> {
        vec![MethodInfo::new(Self::TYPE_NAME, "echo", ReturnType::optional(ReturnType::Text))]
    }

    fn invoke(&self, method: &MethodInfo, args: &[Value]) -> Result<Value, InterceptError> {
        args.first()
            .cloned()
            .ok_or_else(|| InterceptError::call(method.qualified_name(), "nothing to echo"))
    }
}

crate::declare_interceptors!(Echo => []);
