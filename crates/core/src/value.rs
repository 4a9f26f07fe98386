//! Type-erased values and argument lists passed through wired callables.

use std::{any::Any, fmt, sync::Arc};

use crate::{callable::Callable, shape::TypeTag};

/// A shared, type-erased value tagged with its type.
///
/// Cloning is cheap. Values holding a [`Callable`] are tagged with the
/// callable's shape so they can be checked structurally.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    tag: TypeTag,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let inner: Arc<dyn Any + Send + Sync> = Arc::new(value);
        let tag = match inner.downcast_ref::<Callable>() {
            Some(callable) => TypeTag::Callable(callable.shape_arc()),
            None => TypeTag::of::<T>(),
        };
        Self { inner, tag }
    }

    #[must_use]
    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    #[must_use]
    pub fn as_callable(&self) -> Option<&Callable> {
        self.downcast_ref::<Callable>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.tag)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Self::new(callable)
    }
}

// ── Args ────────────────────────────────────────────────────────────────────

/// Arguments of one call: the fixed prefix and the variadic rest.
///
/// The rest is always kept as its own sequence so forwarding it never
/// collapses the tail into a single argument. Fixed-convention calls carry an
/// empty rest.
#[derive(Debug, Clone, Default)]
pub struct Args {
    fixed: Vec<Value>,
    rest: Vec<Value>,
}

impl Args {
    #[must_use]
    pub fn new(fixed: Vec<Value>) -> Self {
        Self {
            fixed,
            rest: Vec::new(),
        }
    }

    /// Arguments for a call with only a variadic tail.
    #[must_use]
    pub fn rest_only(rest: Vec<Value>) -> Self {
        Self {
            fixed: Vec::new(),
            rest,
        }
    }

    #[must_use]
    pub fn with_rest(mut self, rest: Vec<Value>) -> Self {
        self.rest = rest;
        self
    }

    /// `results` followed by `args`, with the rest of `args` kept as the rest.
    #[must_use]
    pub fn prefixed(results: &[Value], args: &Args) -> Self {
        let mut fixed = Vec::with_capacity(results.len() + args.fixed.len());
        fixed.extend_from_slice(results);
        fixed.extend_from_slice(&args.fixed);
        Self {
            fixed,
            rest: args.rest.clone(),
        }
    }

    /// A copy without the variadic rest.
    #[must_use]
    pub fn without_rest(&self) -> Self {
        Self::new(self.fixed.clone())
    }

    #[must_use]
    pub fn fixed(&self) -> &[Value] {
        &self.fixed
    }

    #[must_use]
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Fixed argument `index` downcast to `T`.
    #[must_use]
    pub fn arg<T: Any>(&self, index: usize) -> Option<&T> {
        self.fixed.get(index).and_then(Value::downcast_ref)
    }

    /// Rest arguments that downcast to `T`, in order.
    ///
    /// Values of any other type are skipped, so the iterator can be shorter
    /// than [`Self::rest`]. Use `rest().len()` for the argument count.
    pub fn rest_of<T: Any>(&self) -> impl Iterator<Item = &T> {
        self.rest.iter().filter_map(Value::downcast_ref)
    }

    /// Total argument count, fixed and rest together.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixed.len() + self.rest.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
