//! Structural descriptions of callables and their comparison.
//!
//! A [`Shape`] records what a callable accepts and returns, position by
//! position. Shapes never carry names: two callables with the same parameter
//! types, the same [`Convention`] and the same return types are
//! interchangeable as far as wiring is concerned.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use crate::{
    error::{Error, Result},
    value::Value,
};

// ── TypeTag ─────────────────────────────────────────────────────────────────

/// Identity of one parameter or return position.
#[derive(Clone)]
pub enum TypeTag {
    /// A plain value type. Compared by `TypeId` only.
    Value { id: TypeId, name: &'static str },
    /// A callable type, compared by the structure of its shape.
    Callable(Arc<Shape>),
}

impl TypeTag {
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self::Value {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn callable(shape: Shape) -> Self {
        Self::Callable(Arc::new(shape))
    }

    /// The shape behind a callable tag.
    #[must_use]
    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Self::Callable(shape) => Some(shape),
            Self::Value { .. } => None,
        }
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value { id: a, .. }, Self::Value { id: b, .. }) => a == b,
            (Self::Callable(a), Self::Callable(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl Eq for TypeTag {}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { name, .. } => f.write_str(&short_type_name(name)),
            Self::Callable(shape) => write!(f, "{shape}"),
        }
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({self})")
    }
}

/// Strip module paths from a `type_name`, keeping generic structure:
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }
    out
}

// ── Convention ──────────────────────────────────────────────────────────────

/// How a callable receives its trailing arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convention {
    /// Exactly the declared parameters.
    Fixed,
    /// The declared parameters followed by any number of values of one type.
    Variadic(TypeTag),
}

// ── Param ───────────────────────────────────────────────────────────────────

/// One position of a parameter list, with the variadic tail made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Single(TypeTag),
    Rest(TypeTag),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(tag) => write!(f, "{tag}"),
            Self::Rest(tag) => write!(f, "...{tag}"),
        }
    }
}

/// First difference between an expected and a found parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Arity {
        expected: usize,
        found: usize,
    },
    Type {
        position: usize,
        expected: String,
        found: String,
    },
}

/// Compare two parameter lists position by position.
///
/// Counts are checked first, so a list that is merely too short or too long
/// reports [`Mismatch::Arity`] rather than a type difference.
#[must_use]
pub fn first_mismatch(expected: &[Param], found: &[Param]) -> Option<Mismatch> {
    if expected.len() != found.len() {
        return Some(Mismatch::Arity {
            expected: expected.len(),
            found: found.len(),
        });
    }
    expected
        .iter()
        .zip(found)
        .position(|(e, f)| e != f)
        .map(|position| Mismatch::Type {
            position,
            expected: expected[position].to_string(),
            found: found[position].to_string(),
        })
}

// ── Shape ───────────────────────────────────────────────────────────────────

/// Ordered parameter types, call convention and ordered return types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    params: Vec<TypeTag>,
    convention: Convention,
    returns: Vec<TypeTag>,
}

impl Shape {
    /// A fixed shape with no parameters and no returns. Extend it with the
    /// builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            convention: Convention::Fixed,
            returns: Vec::new(),
        }
    }

    #[must_use]
    pub fn param<T: Any>(self) -> Self {
        self.param_tag(TypeTag::of::<T>())
    }

    #[must_use]
    pub fn param_tag(mut self, tag: TypeTag) -> Self {
        self.params.push(tag);
        self
    }

    /// Make the shape variadic over `T`. Replaces any previous tail.
    #[must_use]
    pub fn variadic<T: Any>(self) -> Self {
        self.variadic_tag(TypeTag::of::<T>())
    }

    #[must_use]
    pub fn variadic_tag(mut self, element: TypeTag) -> Self {
        self.convention = Convention::Variadic(element);
        self
    }

    #[must_use]
    pub fn returns<T: Any>(self) -> Self {
        self.return_tag(TypeTag::of::<T>())
    }

    #[must_use]
    pub fn return_tag(mut self, tag: TypeTag) -> Self {
        self.returns.push(tag);
        self
    }

    /// Shape of a decorator over `inner`: `fn(fn inner) -> fn inner`.
    #[must_use]
    pub fn decorator_of(inner: &Shape) -> Self {
        let tag = TypeTag::callable(inner.clone());
        Self::new().param_tag(tag.clone()).return_tag(tag)
    }

    /// Shape of the callable held by `value`.
    pub fn of(value: &Value) -> Result<Self> {
        value
            .type_tag()
            .as_shape()
            .cloned()
            .ok_or_else(|| Error::NotCallable {
                type_name: value.type_tag().to_string(),
            })
    }

    /// Fixed (non-variadic) parameters.
    #[must_use]
    pub fn params(&self) -> &[TypeTag] {
        &self.params
    }

    #[must_use]
    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    #[must_use]
    pub fn return_types(&self) -> &[TypeTag] {
        &self.returns
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        matches!(self.convention, Convention::Variadic(_))
    }

    /// Number of declared parameters, counting a variadic tail as one.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.is_variadic())
    }

    /// The full parameter list, variadic tail included as [`Param::Rest`].
    #[must_use]
    pub fn param_list(&self) -> Vec<Param> {
        let mut list: Vec<Param> = self.params.iter().cloned().map(Param::Single).collect();
        if let Convention::Variadic(element) = &self.convention {
            list.push(Param::Rest(element.clone()));
        }
        list
    }

    /// The return list viewed as a parameter list, for validating after hooks.
    #[must_use]
    pub fn return_list(&self) -> Vec<Param> {
        self.returns.iter().cloned().map(Param::Single).collect()
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        for (i, param) in self.param_list().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        match self.returns.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {single}"),
            many => {
                f.write_str(" -> (")?;
                for (i, ret) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ret}")?;
                }
                f.write_str(")")
            },
        }
    }
}
