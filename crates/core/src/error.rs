use std::fmt;

use thiserror::Error;

/// Which hook of a pair a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Before,
    After,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// Setup-time failures. Nothing in this enum is raised once a callable is wired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("output slot is not a writable callable slot: {reason}")]
    InvalidOutputSlot { reason: String },

    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    #[error("value of type {type_name} is not callable")]
    NotCallable { type_name: String },

    #[error("{hook} hook is not callable (got {type_name})")]
    HookNotCallable { hook: Hook, type_name: String },

    #[error("{hook} hook takes {found} parameters, expected {expected}")]
    HookArityMismatch {
        hook: Hook,
        expected: usize,
        found: usize,
    },

    #[error("{hook} hook parameter {position} is {found}, expected {expected}")]
    HookTypeMismatch {
        hook: Hook,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("decorator type {found} does not map a callable to a callable")]
    NotADecoratorShape { found: String },

    #[error(
        "decorator must take exactly one parameter and return exactly one value \
         (got {params} parameters, {returns} returns)"
    )]
    ArityNotOne { params: usize, returns: usize },

    #[error("decoratee {input} and decorated {output} have different shapes")]
    InnerShapeMismatch { input: String, output: String },
}

impl Error {
    #[must_use]
    pub fn invalid_output_slot(reason: impl Into<String>) -> Self {
        Self::InvalidOutputSlot {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_target(reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            reason: reason.into(),
        }
    }

    /// The hook a hook-level error refers to, if any.
    #[must_use]
    pub fn hook(&self) -> Option<Hook> {
        match self {
            Self::HookNotCallable { hook, .. }
            | Self::HookArityMismatch { hook, .. }
            | Self::HookTypeMismatch { hook, .. } => Some(*hook),
            _ => None,
        }
    }

    /// Short stable label, used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidOutputSlot { .. } => "invalid_output_slot",
            Self::InvalidTarget { .. } => "invalid_target",
            Self::NotCallable { .. } => "not_callable",
            Self::HookNotCallable { .. } => "hook_not_callable",
            Self::HookArityMismatch { .. } => "hook_arity_mismatch",
            Self::HookTypeMismatch { .. } => "hook_type_mismatch",
            Self::NotADecoratorShape { .. } => "not_a_decorator_shape",
            Self::ArityNotOne { .. } => "arity_not_one",
            Self::InnerShapeMismatch { .. } => "inner_shape_mismatch",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
