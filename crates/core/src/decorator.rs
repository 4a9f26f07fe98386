//! Setup entry points: one-off decoration and reusable decorators.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use degorator_metrics::{counter, labels, wiring};
use tracing::{debug, warn};

use crate::{
    callable::{Callable, Slot},
    error::{Error, Result},
    shape::{Shape, TypeTag},
    validate::{HookPair, validate_decorator_shape, validate_hooks},
    value::{Args, Value},
    wire::wire,
};

/// Validate `before` and `after` against `target` and wire them around it.
///
/// Fails without side effects if `target` is not callable or a hook does not
/// fit its shape.
pub fn decorate(target: &Value, before: Option<&Value>, after: Option<&Value>) -> Result<Callable> {
    let wired = target_callable(target).and_then(|target| {
        let hooks = validate_hooks(target.shape(), before, after)?;
        Ok(wire(target.clone(), hooks))
    });
    log_rejection("decorate", wired)
}

/// Build a reusable decorator for callables of the inner shape described by
/// `decorator_type` (which must look like `fn(fn X) -> fn X`).
pub fn make_decorator(
    decorator_type: &TypeTag,
    before: Option<&Value>,
    after: Option<&Value>,
) -> Result<Decorator> {
    let decorator = validate_decorator_shape(decorator_type).and_then(|inner| {
        let hooks = validate_hooks(&inner, before, after)?;
        Ok(Decorator {
            inner: Arc::new(inner),
            hooks,
        })
    });
    let decorator = log_rejection("make_decorator", decorator)?;

    debug!(inner = %decorator.inner, "decorator built");
    #[cfg(feature = "metrics")]
    counter!(wiring::DECORATORS_TOTAL).increment(1);

    Ok(decorator)
}

fn target_callable(target: &Value) -> Result<&Callable> {
    target.as_callable().ok_or_else(|| {
        Error::invalid_target(format!("{} is not callable", target.type_tag()))
    })
}

fn log_rejection<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        debug!(operation, error = %e, "setup rejected");
        #[cfg(feature = "metrics")]
        counter!(
            wiring::SETUP_FAILURES_TOTAL,
            labels::OPERATION => operation,
            labels::ERROR_TYPE => e.kind()
        )
        .increment(1);
    }
    result
}

// ── Decorator ───────────────────────────────────────────────────────────────

/// A validated hook pair bound to one inner shape.
///
/// Every application produces a new, independent wired callable. The hooks
/// are shared between applications, so any state they carry is shared too.
#[derive(Debug, Clone)]
pub struct Decorator {
    inner: Arc<Shape>,
    hooks: HookPair,
}

impl Decorator {
    #[must_use]
    pub fn inner_shape(&self) -> &Shape {
        &self.inner
    }

    #[must_use]
    pub fn hooks(&self) -> &HookPair {
        &self.hooks
    }

    /// Wire the captured hooks around `target`.
    ///
    /// Only the target's shape is checked; the hooks were validated against
    /// that shape when the decorator was built.
    pub fn apply(&self, target: &Callable) -> Result<Callable> {
        if target.shape() != &*self.inner {
            return Err(Error::invalid_target(format!(
                "decorator expects {}, got {}",
                self.inner,
                target.shape()
            )));
        }
        Ok(wire(target.clone(), self.hooks.clone()))
    }

    /// The decorator as a callable of shape `fn(fn X) -> fn X`.
    ///
    /// A call with anything other than a callable of the inner shape returns
    /// its argument unchanged.
    ///
    /// # Empty results
    ///
    /// A call with no argument at all has nothing to hand back and returns an
    /// empty result list, one short of the advertised shape. Read the result
    /// with `.first()` rather than indexing it.
    #[must_use]
    pub fn to_callable(&self) -> Callable {
        let decorator = self.clone();
        Callable::new(Shape::decorator_of(&self.inner), move |args: &Args| {
            let Some(input) = args.fixed().first() else {
                warn!("decorator called without a callable");
                return Vec::new();
            };
            let Some(target) = input.as_callable() else {
                warn!(got = %input.type_tag(), "decorator called with a non-callable, returning it undecorated");
                return vec![input.clone()];
            };
            match decorator.apply(target) {
                Ok(wired) => vec![Value::from(wired)],
                Err(e) => {
                    warn!(error = %e, "decorator called with a mis-shaped callable, returning it undecorated");
                    vec![input.clone()]
                },
            }
        })
    }
}

// ── Slot entry points ───────────────────────────────────────────────────────

impl Slot {
    /// Decorate `target` and commit the result into this slot.
    ///
    /// The slot must be declared with the target's callable type. On error the
    /// slot keeps whatever it held before.
    pub fn decorate(
        &mut self,
        target: &Value,
        before: Option<&Value>,
        after: Option<&Value>,
    ) -> Result<()> {
        let checked = self.declared_shape().and_then(|declared| {
            let target = target_callable(target)?;
            if target.shape() != declared {
                return Err(Error::invalid_output_slot(format!(
                    "slot holds {declared}, target is {}",
                    target.shape()
                )));
            }
            Ok(())
        });
        log_rejection("decorate", checked)?;

        let wired = decorate(target, before, after)?;
        self.commit(wired);
        Ok(())
    }

    /// Build a decorator from this slot's declared type and commit it as a
    /// callable. On error the slot keeps whatever it held before.
    pub fn make_decorator(&mut self, before: Option<&Value>, after: Option<&Value>) -> Result<()> {
        log_rejection("make_decorator", self.declared_shape().map(|_| ()))?;
        let decorator = make_decorator(self.declared(), before, after)?;
        self.commit(decorator.to_callable());
        Ok(())
    }
}
