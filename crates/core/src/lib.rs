//! Attach before and after hooks to existing callables without touching their
//! bodies.
//!
//! Setup validates the shapes of the target and the hooks, then hands back a
//! new callable of the target's exact shape that runs the before hook, the
//! target and the after hook in that order:
//!
//! ```rust,ignore
//! use degorator::{Args, Callable, Shape, Value, decorate};
//!
//! let shape = Shape::new().param::<String>().returns::<Option<String>>();
//! let target = Callable::new(shape.clone(), |_: &Args| vec![Value::new(None::<String>)]);
//! let log = Callable::new(Shape::new().param::<String>(), |args: &Args| {
//!     tracing::info!(arg = ?args.arg::<String>(0), "called");
//!     Vec::new()
//! });
//! let wired = decorate(&target.into(), Some(&log.into()), None)?;
//! ```
//!
//! A [`Decorator`] captures a validated hook pair once and wires it onto any
//! number of targets of one shape. [`TypedDecorator`] does the same with the
//! shapes checked at compile time.

pub mod callable;
pub mod decorator;
pub mod error;
pub mod shape;
pub mod typed;
pub mod validate;
pub mod value;
pub mod wire;

pub use {
    callable::{Body, Callable, Slot},
    decorator::{Decorator, decorate, make_decorator},
    error::{Error, Hook, Result},
    shape::{Convention, Mismatch, Param, Shape, TypeTag, first_mismatch},
    typed::{DecoratedFn, TypedDecorator},
    validate::{AfterInput, HookPair, validate_decorator_shape, validate_hooks},
    value::{Args, Value},
    wire::wire,
};
