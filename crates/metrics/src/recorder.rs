//! Installing a global recorder for the degorator series.

use {anyhow::Result, tracing::info};

#[cfg(feature = "prometheus")]
use crate::{buckets, invocation};

/// What [`init_metrics`] installs.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorderConfig {
    /// Install a recorder at all. When false the `metrics` macros stay no-ops.
    pub enabled: bool,
    /// Labels attached to every series, e.g. `("service", "checkout")`.
    pub global_labels: Vec<(String, String)>,
    /// Histogram buckets for invocation durations, in seconds. Falls back to
    /// [`crate::buckets::INVOCATION_DURATION`].
    pub duration_buckets: Option<Vec<f64>>,
}

/// Access to the installed recorder, if any.
#[derive(Clone, Default)]
pub struct MetricsHandle {
    #[cfg(feature = "prometheus")]
    prometheus: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl MetricsHandle {
    /// Whether a recorder was installed by [`init_metrics`].
    #[must_use]
    pub fn is_recording(&self) -> bool {
        #[cfg(feature = "prometheus")]
        {
            self.prometheus.is_some()
        }
        #[cfg(not(feature = "prometheus"))]
        {
            false
        }
    }

    /// Current series in Prometheus text format, empty when nothing records.
    #[must_use]
    pub fn render(&self) -> String {
        #[cfg(feature = "prometheus")]
        if let Some(handle) = &self.prometheus {
            return handle.render();
        }
        String::new()
    }
}

/// Install the global recorder described by `config`.
///
/// Call at most once per process. Without the `prometheus` feature nothing
/// is installed and the returned handle renders nothing. With the `tracing`
/// feature the recorder also labels every series with the fields of the
/// spans entered when it is recorded (see [`crate::tracing_integration`]).
///
/// # Errors
///
/// Fails if the buckets are rejected or another recorder is already set.
pub fn init_metrics(config: MetricsRecorderConfig) -> Result<MetricsHandle> {
    if !config.enabled {
        info!("degorator metrics disabled");
        return Ok(MetricsHandle::default());
    }

    #[cfg(feature = "prometheus")]
    {
        let handle = install_prometheus(config)?;
        info!("degorator metrics recorded with prometheus");
        Ok(MetricsHandle {
            prometheus: Some(handle),
        })
    }

    #[cfg(not(feature = "prometheus"))]
    {
        let _ = config;
        info!("degorator metrics requested but built without the prometheus feature");
        Ok(MetricsHandle::default())
    }
}

#[cfg(feature = "prometheus")]
fn install_prometheus(
    config: MetricsRecorderConfig,
) -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let durations = config
        .duration_buckets
        .unwrap_or_else(|| buckets::INVOCATION_DURATION.clone());
    let builder = config.global_labels.into_iter().fold(
        PrometheusBuilder::new().set_buckets_for_metric(
            Matcher::Full(invocation::DURATION_SECONDS.to_string()),
            &durations,
        )?,
        |builder, (key, value)| builder.add_global_label(key, value),
    );

    // No HTTP listener: callers expose `render()` however they like.
    let recorder = builder.build_recorder();
    let handle = recorder.handle();

    #[cfg(feature = "tracing")]
    let recorder = {
        use {metrics_tracing_context::TracingContextLayer, metrics_util::layers::Layer};
        TracingContextLayer::all().layer(recorder)
    };

    metrics::set_global_recorder(recorder)
        .map_err(|_| anyhow::anyhow!("a global metrics recorder is already installed"))?;
    Ok(handle)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_installs_nothing() {
        let handle = init_metrics(MetricsRecorderConfig::default()).unwrap();
        assert!(!handle.is_recording());
        assert!(handle.render().is_empty());
    }
}
