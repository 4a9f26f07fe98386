//! Span fields reach the Prometheus output as labels.
//!
//! Installs the global subscriber and recorder, so it lives in its own test
//! binary with a single test.
#![cfg(all(feature = "prometheus", feature = "tracing"))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use degorator_metrics::{
    MetricsRecorderConfig, counter, init_metrics, invocation, tracing_integration::init_tracing,
};

#[test]
fn span_fields_become_labels() {
    init_tracing("info");
    let handle = init_metrics(MetricsRecorderConfig {
        enabled: true,
        ..Default::default()
    })
    .unwrap();

    let span = tracing::info_span!("checkout", operation = "pay");
    span.in_scope(|| counter!(invocation::INVOCATIONS_TOTAL).increment(1));
    counter!(invocation::INVOCATIONS_TOTAL).increment(1);

    let rendered = handle.render();
    assert!(
        rendered.contains(r#"degorator_invocations_total{operation="pay"} 1"#),
        "{rendered}"
    );
    assert!(
        rendered.contains("degorator_invocations_total 1"),
        "{rendered}"
    );
}
