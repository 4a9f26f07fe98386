//! Stock hooks for degorator: call counting, tracing events, composition,
//! and hook sets built from a TOML or JSON file.
//!
//! ```rust,ignore
//! use std::{path::Path, sync::Arc};
//!
//! let config = degorator_hooks::load_config(Path::new("hooks.toml"))?;
//! let set = degorator_hooks::HookSet::from_config(&config, target.shape(), Arc::new(|_| false))?;
//! let wired = set.wire(&target)?;
//! ```

pub mod config;
pub mod error;
pub mod set;
pub mod stats;
pub mod stock;

pub use {
    config::{HookEntry, HookKind, HooksConfig, load_config},
    error::{Error, Result},
    set::HookSet,
    stats::CallStats,
    stock::{
        FailurePredicate, after_shape, before_shape, compose, counting_after, counting_before,
        tracing_after, tracing_before,
    },
};
