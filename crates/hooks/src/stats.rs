//! Shared counters updated by the counting hooks.

use std::{
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

/// Call and failure counts observed by one or more counting hooks.
///
/// Cheap to update from any thread; wrap it in an `Arc` and hand clones to
/// the hooks that should report into it.
pub struct CallStats {
    calls: AtomicU64,
    failures: AtomicU64,
    consecutive_failures: AtomicU64,
    last_failure_at: Mutex<Option<Instant>>,
}

impl CallStats {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            consecutive_failures: AtomicU64::new(0),
            last_failure_at: Mutex::new(None),
        }
    }

    /// Record a call without an outcome.
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed call and whether it failed.
    pub fn record_outcome(&self, failed: bool) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failures.fetch_add(1, Ordering::Relaxed);
            self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
            *self
                .last_failure_at
                .lock()
                .unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
        } else {
            self.consecutive_failures.store(0, Ordering::Relaxed);
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Failures since the last successful call.
    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    pub fn last_failure_at(&self) -> Option<Instant> {
        *self
            .last_failure_at
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Fraction of recorded calls that failed, `0.0` before the first call.
    pub fn failure_rate(&self) -> f64 {
        let calls = self.calls();
        if calls == 0 {
            return 0.0;
        }
        self.failures() as f64 / calls as f64
    }
}

impl Default for CallStats {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallStats")
            .field("calls", &self.calls())
            .field("failures", &self.failures())
            .field("consecutive_failures", &self.consecutive_failures())
            .finish()
    }
}
