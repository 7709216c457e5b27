// src/interceptors/timing.rs
//! Call duration measurement
//!
//! Start times are keyed by invocation id and chain depth, so one instance can
//! time any number of concurrent calls and may sit at several chain positions.

use crate::interception::{Interceptor, Invocation};
use crate::observability::CALL_DURATION_SECONDS;
use crate::utils::errors::InterceptError;
use dashmap::DashMap;
use metrics::histogram;
use parking_lot::Mutex;
use std::time::Instant;
use tracing::debug;
use ulid::Ulid;

/// Aggregate timing statistics
#[derive(Debug, Clone, Default)]
pub struct TimingStats {
    pub calls: u64,
    pub failures: u64,
    pub total_time_ns: u64,
    pub max_time_ns: u64,
}

impl TimingStats {
    pub fn avg_time_ns(&self) -> u64 {
        if self.calls == 0 {
            0
        } else {
            self.total_time_ns / self.calls
        }
    }
}

/// Records how long each intercepted call takes
#[derive(Debug, Default)]
pub struct TimingInterceptor {
    started: DashMap<(Ulid, usize), Instant>,
    stats: Mutex<TimingStats>,
}

impl TimingInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> TimingStats {
        self.stats.lock().clone()
    }

    /// Calls entered but not yet exited
    pub fn in_flight(&self) -> usize {
        self.started.len()
    }
}

impl Interceptor for TimingInterceptor {
    fn name(&self) -> &str {
        "timing"
    }

    fn on_entry(&self, invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        self.started
            .insert((invocation.id(), invocation.depth()), Instant::now());
        Ok(())
    }

    fn on_exception(
        &self,
        _invocation: &mut Invocation<'_>,
        _error: &InterceptError,
    ) -> Result<(), InterceptError> {
        self.stats.lock().failures += 1;
        Ok(())
    }

    fn on_exit(&self, invocation: &mut Invocation<'_>) -> Result<(), InterceptError> {
        let key = (invocation.id(), invocation.depth());
        let Some((_, start)) = self.started.remove(&key) else {
            return Ok(());
        };

        let elapsed = start.elapsed();
        let method = invocation.method().qualified_name();
        debug!("{} took {:?}", method, elapsed);
        histogram!(CALL_DURATION_SECONDS, "method" => method).record(elapsed.as_secs_f64());

        let elapsed_ns = elapsed.as_nanos() as u64;
        let mut stats = self.stats.lock();
        stats.calls += 1;
        stats.total_time_ns += elapsed_ns;
        stats.max_time_ns = stats.max_time_ns.max(elapsed_ns);
        Ok(())
    }
}
