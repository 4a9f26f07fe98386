//! Metric name and label definitions.
//!
//! All metric names emitted by degorator crates live here so the set of
//! exported series is documented in one place.

/// Setup-time metrics (validation and wiring)
pub mod wiring {
    /// Total number of callables wired successfully
    pub const WIRED_TOTAL: &str = "degorator_wired_total";
    /// Total number of decorators built successfully
    pub const DECORATORS_TOTAL: &str = "degorator_decorators_total";
    /// Setup calls rejected by shape validation
    pub const SETUP_FAILURES_TOTAL: &str = "degorator_setup_failures_total";
}

/// Call-time metrics for wired callables
pub mod invocation {
    /// Total number of wired callable invocations
    pub const INVOCATIONS_TOTAL: &str = "degorator_invocations_total";
    /// Duration of a full before, target, after sequence in seconds
    pub const DURATION_SECONDS: &str = "degorator_invocation_duration_seconds";
    /// Total number of hook invocations made by wired callables
    pub const HOOK_CALLS_TOTAL: &str = "degorator_hook_calls_total";
}

/// Metrics emitted by the stock hooks
pub mod hooks {
    /// Calls observed by counting hooks
    pub const OBSERVED_CALLS_TOTAL: &str = "degorator_hook_observed_calls_total";
    /// Failures observed by counting after hooks
    pub const FAILURES_TOTAL: &str = "degorator_hook_failures_total";
}

/// Common label keys
pub mod labels {
    pub const CONVENTION: &str = "convention";
    pub const HOOK: &str = "hook";
    pub const ERROR_TYPE: &str = "error_type";
    pub const NAME: &str = "name";
    pub const OPERATION: &str = "operation";
}

/// Standard histogram buckets
pub mod buckets {
    use once_cell::sync::Lazy;

    /// Wired invocation duration buckets (in seconds)
    /// Covers 1µs to 10s
    pub static INVOCATION_DURATION: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.000_001, 0.000_01, 0.000_1, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0,
        ]
    });
}
