//! Span fields as metric labels.
//!
//! With the `tracing` feature, [`init_tracing`] records span fields and
//! [`crate::init_metrics`] wraps the recorder so those fields become labels:
//! a wired callable invoked under `info_span!("checkout", operation = "pay")`
//! reports its invocation series with an `operation="pay"` label.

#[cfg(feature = "tracing")]
use {
    metrics_tracing_context::MetricsLayer,
    tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt},
};

/// Install a global subscriber that logs to stdout and feeds span fields to
/// the metrics recorder.
///
/// `RUST_LOG` wins over `default_filter` when set. Call before
/// [`crate::init_metrics`].
#[cfg(feature = "tracing")]
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(MetricsLayer::new())
        .init();
}
