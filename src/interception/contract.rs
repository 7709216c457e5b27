// src/interception/contract.rs
//! The interceptor contract
//!
//! Every interceptor implements [`Interceptor`]. All hooks are optional and
//! default to no-ops. The dispatcher drives them in a fixed order:
//!
//! ```text
//! on_entry ─► around (proceed) ─► on_success ─┐
//!     │             │                  │      │
//!     └─── error ───┴────── error ─────┘      │
//!                   │                         │
//!     install default return value            │
//!                   │                         │
//!             on_exception                    │
//!                   │                         │
//!                   └──────────► on_exit ◄────┘
//! ```
//!
//! Interceptor instances are shared by every call routed through the same
//! proxy and may be invoked from several threads at once. Any mutable state
//! kept across hooks must be synchronised by the interceptor itself.

use crate::interception::invocation::Invocation;
use crate::utils::errors::InterceptError;

/// Cross-cutting behaviour attached around proxied calls
pub trait Interceptor: Send + Sync + 'static {
    /// Name used in logs and chain listings
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs before the underlying call.
    ///
    /// May inspect or rewrite arguments. Returning an error skips the call and
    /// takes the failure path.
    fn on_entry(&self, _invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        Ok(())
    }

    /// Wraps the underlying call.
    ///
    /// The default proceeds to the next interceptor or the target. Overriding
    /// this lets an interceptor replace the call entirely by setting the return
    /// value without proceeding.
    fn around(&self, invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        invocation.proceed()
    }

    /// Runs after the call completed without error
    fn on_success(&self, _invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        Ok(())
    }

    /// Runs after the call failed.
    ///
    /// The return value already holds the default for the declared return
    /// type; overwrite it to supply a custom fallback. An error returned here
    /// is not caught at this level.
    fn on_exception(
        &self,
        _invocation: &mut Invocation<'_>,
        _error: &InterceptError,
    ) -> Result<(), InterceptError> {
        Ok(())
    }

    /// Runs last on every path, including after a failed `on_exception`.
    /// An error returned here is not caught at this level.
    fn on_exit(&self, _invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        Ok(())
    }
}
