// src/interceptors/mod.rs
//! Built-in interceptor kinds
//!
//! - **Logging**: tracing events for every hook (`"logging"`)
//! - **Timing**: per-call duration histogram and aggregate stats (`"timing"`)
//! - **Fallback**: fixed return value for failed calls (explicit only, it
//!   needs a value and so has no zero-argument constructor)

pub mod fallback;
pub mod logging;
pub mod timing;

pub use fallback::FallbackInterceptor;
pub use logging::LoggingInterceptor;
pub use timing::{TimingInterceptor, TimingStats};

use crate::interception::InterceptorRegistry;

/// Register the zero-argument built-ins under their type path and short alias
pub fn register_builtins(registry: &InterceptorRegistry) {
    registry.register::<LoggingInterceptor>();
    registry.register_alias::<LoggingInterceptor>("logging");
    registry.register::<TimingInterceptor>();
    registry.register_alias::<TimingInterceptor>("timing");
}
