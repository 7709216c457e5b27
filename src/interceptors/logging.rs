// src/interceptors/logging.rs
//! Structured logging of every lifecycle hook

use crate::interception::{Interceptor, Invocation};
use crate::utils::errors::InterceptError;
use tracing::{debug, info, warn};

/// Emits a tracing event for each hook
#[derive(Debug, Clone)]
pub struct LoggingInterceptor {
    /// Include argument values in entry events
    pub log_arguments: bool,
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self {
            log_arguments: true,
        }
    }
}

impl LoggingInterceptor {
    /// Logs calls without their argument values
    pub fn without_arguments() -> Self {
        Self {
            log_arguments: false,
        }
    }
}

impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_entry(&self, invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        let method = invocation.method().qualified_name();
        if self.log_arguments {
            debug!(invocation = %invocation.id(), args = ?invocation.arguments(), "Entering {}", method);
        } else {
            debug!(invocation = %invocation.id(), "Entering {}", method);
        }
        Ok(())
    }

    fn on_success(&self, invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        info!(
            invocation = %invocation.id(),
            result = %invocation.return_value(),
            "{} succeeded",
            invocation.method().qualified_name()
        );
        Ok(())
    }

    fn on_exception(
        &self,
        invocation: &mut Invocation<'_>,
        error: &InterceptError,
    ) -> Result<(), InterceptError> {
        warn!(
            invocation = %invocation.id(),
            error = %error,
            fallback = %invocation.return_value(),
            "{} failed",
            invocation.method().qualified_name()
        );
        Ok(())
    }

    fn on_exit(&self, invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        debug!(invocation = %invocation.id(), "Leaving {}", invocation.method().qualified_name());
        Ok(())
    }
}
