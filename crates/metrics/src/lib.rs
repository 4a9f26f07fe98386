//! Metric names and recorder setup shared by the degorator crates.
//!
//! The core and hooks crates record through the `metrics` facade when built
//! with their `metrics` feature. Nothing is exported until a recorder is
//! installed with [`init_metrics`]:
//!
//! ```rust,ignore
//! let handle = degorator_metrics::init_metrics(MetricsRecorderConfig {
//!     enabled: true,
//!     ..Default::default()
//! })?;
//! println!("{}", handle.render());
//! ```

mod definitions;
mod recorder;
pub mod tracing_integration;

pub use {
    definitions::*,
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

pub use metrics::{counter, histogram};
