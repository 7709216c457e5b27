// src/interception/dispatcher.rs
//! Lifecycle dispatch for a single interceptor
//!
//! Runs the hooks of one interceptor around `Invocation::proceed` and turns a
//! failed call into the default value of the declared return type. Errors
//! raised by `on_exception` or `on_exit` are not absorbed: they leave
//! [`intercept`] and become an ordinary call failure for the level above.

use crate::interception::contract::Interceptor;
use crate::interception::invocation::Invocation;
use crate::observability::{CALL_FAILURES_TOTAL, HOOK_FAILURES_TOTAL};
use crate::utils::errors::InterceptError;
use metrics::counter;
use tracing::{debug_span, error, warn};

/// Drive one interceptor's lifecycle around `invocation`
pub fn intercept(
    interceptor: &dyn Interceptor,
    invocation: &mut Invocation<'_>,
) -> Result<(), InterceptError> {
    let _span = debug_span!(
        "intercept",
        interceptor = interceptor.name(),
        invocation = %invocation.id(),
    )
    .entered();

    let handled = match guarded(interceptor, invocation) {
        Ok(()) => Ok(()),
        Err(err) => {
            let method = invocation.method();
            warn!(
                method = %method.qualified_name(),
                error = %err,
                "Call failed, substituting default {}",
                method.return_type
            );
            counter!(CALL_FAILURES_TOTAL, "method" => method.qualified_name()).increment(1);

            invocation.set_return_value(method.return_type.default_value());
            interceptor.on_exception(invocation, &err)
        }
    };

    // on_exit runs even when on_exception failed; its own error wins.
    let exited = interceptor.on_exit(invocation);

    match (handled, exited) {
        (_, Err(err)) | (Err(err), Ok(())) => {
            error!(error = %err, "Interceptor hook failed, propagating");
            counter!(HOOK_FAILURES_TOTAL, "interceptor" => interceptor.name().to_string())
                .increment(1);
            Err(err)
        }
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn guarded(
    interceptor: &dyn Interceptor,
    invocation: &mut Invocation<'_>,
) -> Result<(), InterceptError> {
    interceptor.on_entry(invocation)?;
    interceptor.around(invocation)?;
    interceptor.on_success(invocation)
}
