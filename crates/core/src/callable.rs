//! Invokable and settable callable handles.

use std::{any::Any, fmt, sync::Arc};

use crate::{
    error::{Error, Result},
    shape::{Shape, TypeTag},
    value::{Args, Value},
};

/// Body of a callable: takes the call's arguments, returns its ordered results.
pub type Body = dyn Fn(&Args) -> Vec<Value> + Send + Sync;

/// An invokable handle: a shared body plus the shape it advertises.
#[derive(Clone)]
pub struct Callable {
    shape: Arc<Shape>,
    body: Arc<Body>,
}

impl Callable {
    pub fn new<F>(shape: Shape, body: F) -> Self
    where
        F: Fn(&Args) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(shape), Arc::new(body))
    }

    pub(crate) fn from_parts(shape: Arc<Shape>, body: Arc<Body>) -> Self {
        Self { shape, body }
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn shape_arc(&self) -> Arc<Shape> {
        Arc::clone(&self.shape)
    }

    /// Invoke the body. Arguments are borrowed and never modified.
    pub fn call(&self, args: &Args) -> Vec<Value> {
        (self.body)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.shape)
    }
}

// ── Slot ────────────────────────────────────────────────────────────────────

/// A settable handle: a declared type and, once committed, a callable of that
/// type.
///
/// Setup operations that target a slot either commit a complete callable or
/// leave the slot exactly as it was.
#[derive(Debug, Clone)]
pub struct Slot {
    declared: TypeTag,
    value: Option<Callable>,
}

impl Slot {
    /// An empty slot declared to hold callables of `shape`.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self::with_type(TypeTag::callable(shape))
    }

    /// An empty slot declared to hold plain values of `T`. Such a slot can
    /// never receive a wired callable.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self::with_type(TypeTag::of::<T>())
    }

    #[must_use]
    pub fn with_type(declared: TypeTag) -> Self {
        Self {
            declared,
            value: None,
        }
    }

    #[must_use]
    pub fn declared(&self) -> &TypeTag {
        &self.declared
    }

    #[must_use]
    pub fn get(&self) -> Option<&Callable> {
        self.value.as_ref()
    }

    pub fn take(&mut self) -> Option<Callable> {
        self.value.take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// The declared callable shape, or `InvalidOutputSlot` for a slot of a
    /// plain value type.
    pub(crate) fn declared_shape(&self) -> Result<&Shape> {
        self.declared.as_shape().ok_or_else(|| {
            Error::invalid_output_slot(format!(
                "slot holds {}, not a callable",
                self.declared
            ))
        })
    }

    pub(crate) fn commit(&mut self, callable: Callable) {
        self.value = Some(callable);
    }
}
