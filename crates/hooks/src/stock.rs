//! Ready-made hooks.
//!
//! Every constructor takes the shape of the *target* and derives the hook's
//! own shape from it, so the result always passes validation for that
//! target: before hooks take the target's parameters, after hooks take its
//! results.

use std::sync::Arc;

use {
    degorator::{Args, Callable, Convention, Shape, Value, first_mismatch},
    tracing::{Level, debug, error, info, trace, warn},
};

#[cfg(feature = "metrics")]
use degorator_metrics::{counter, hooks as hook_metrics, labels};

use crate::{
    error::{Error, Result},
    stats::CallStats,
};

/// Decides from a target's results whether the call failed.
pub type FailurePredicate = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// Shape of a before hook for `target`: its parameters, nothing returned.
#[must_use]
pub fn before_shape(target: &Shape) -> Shape {
    let shape = target
        .params()
        .iter()
        .cloned()
        .fold(Shape::new(), Shape::param_tag);
    match target.convention() {
        Convention::Fixed => shape,
        Convention::Variadic(element) => shape.variadic_tag(element.clone()),
    }
}

/// Shape of a results-only after hook for `target`.
#[must_use]
pub fn after_shape(target: &Shape) -> Shape {
    target
        .return_types()
        .iter()
        .cloned()
        .fold(Shape::new(), Shape::param_tag)
}

// ── Counting ────────────────────────────────────────────────────────────────

/// Before hook that records one call in `stats` per invocation.
///
/// `name` is attached to a `trace!` event per call and, with the `metrics`
/// feature, labels the observed-calls series.
#[must_use]
pub fn counting_before(target: &Shape, name: &str, stats: Arc<CallStats>) -> Callable {
    let name = name.to_string();
    Callable::new(before_shape(target), move |_: &Args| {
        stats.record_call();
        trace!(name = %name, calls = stats.calls(), "call counted");
        #[cfg(feature = "metrics")]
        counter!(hook_metrics::OBSERVED_CALLS_TOTAL, labels::NAME => name.clone()).increment(1);
        Vec::new()
    })
}

/// After hook that records each call in `stats`, flagged as a failure when
/// `is_failure` holds for the target's results. `name` is used as in
/// [`counting_before`].
#[must_use]
pub fn counting_after(
    target: &Shape,
    name: &str,
    stats: Arc<CallStats>,
    is_failure: FailurePredicate,
) -> Callable {
    let name = name.to_string();
    Callable::new(after_shape(target), move |results: &Args| {
        let failed = is_failure(results.fixed());
        stats.record_outcome(failed);
        trace!(name = %name, failed, failures = stats.failures(), "outcome counted");
        #[cfg(feature = "metrics")]
        {
            counter!(hook_metrics::OBSERVED_CALLS_TOTAL, labels::NAME => name.clone()).increment(1);
            if failed {
                counter!(hook_metrics::FAILURES_TOTAL, labels::NAME => name.clone()).increment(1);
            }
        }
        Vec::new()
    })
}

// ── Tracing ─────────────────────────────────────────────────────────────────

/// Before hook that emits an event at `level` with the argument counts.
#[must_use]
pub fn tracing_before(target: &Shape, name: &str, level: Level) -> Callable {
    let name = name.to_string();
    Callable::new(before_shape(target), move |args: &Args| {
        emit(level, &name, "before", args);
        Vec::new()
    })
}

/// After hook that emits an event at `level` with the result count.
#[must_use]
pub fn tracing_after(target: &Shape, name: &str, level: Level) -> Callable {
    let name = name.to_string();
    Callable::new(after_shape(target), move |results: &Args| {
        emit(level, &name, "after", results);
        Vec::new()
    })
}

fn emit(level: Level, name: &str, hook: &'static str, args: &Args) {
    let (fixed, rest) = (args.fixed().len(), args.rest().len());
    match level {
        Level::ERROR => error!(name, hook, fixed, rest, "hook fired"),
        Level::WARN => warn!(name, hook, fixed, rest, "hook fired"),
        Level::INFO => info!(name, hook, fixed, rest, "hook fired"),
        Level::DEBUG => debug!(name, hook, fixed, rest, "hook fired"),
        _ => trace!(name, hook, fixed, rest, "hook fired"),
    }
}

// ── Composition ─────────────────────────────────────────────────────────────

/// Fold `hooks` into one hook of shape `params` that calls them in order.
///
/// Every hook must take exactly the parameters of `params`; results of the
/// individual hooks are discarded.
pub fn compose(params: &Shape, hooks: Vec<Callable>) -> Result<Callable> {
    let expected = params.param_list();
    for (index, hook) in hooks.iter().enumerate() {
        if first_mismatch(&expected, &hook.shape().param_list()).is_some() {
            return Err(Error::ComposeMismatch {
                index,
                expected: join(&expected),
                found: join(&hook.shape().param_list()),
            });
        }
    }

    let shape = before_shape(params);
    Ok(Callable::new(shape, move |args: &Args| {
        for hook in &hooks {
            hook.call(args);
        }
        Vec::new()
    }))
}

fn join(params: &[degorator::Param]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        degorator::{AfterInput, decorate, validate_hooks},
        std::sync::Mutex,
        tracing::field::{Field, Visit},
        tracing_subscriber::{
            Layer,
            layer::{Context, SubscriberExt},
        },
    };

    /// Collects the `name` field of every event.
    #[derive(Clone, Default)]
    struct EventNames(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> Layer<S> for EventNames {
        fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
            let mut field = NameField(None);
            event.record(&mut field);
            if let Some(name) = field.0 {
                self.0.lock().unwrap().push(name);
            }
        }
    }

    struct NameField(Option<String>);

    impl Visit for NameField {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "name" {
                self.0 = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "name" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    fn fixed_target() -> Shape {
        Shape::new().param::<String>().returns::<Option<String>>()
    }

    fn rest_target() -> Shape {
        Shape::new()
            .param::<u8>()
            .variadic::<String>()
            .returns::<bool>()
            .returns::<i32>()
    }

    #[test]
    fn derived_shapes_fit_their_targets() {
        for target in [fixed_target(), rest_target()] {
            let before = Value::from(Callable::new(before_shape(&target), |_: &Args| Vec::new()));
            let after = Value::from(Callable::new(after_shape(&target), |_: &Args| Vec::new()));
            let pair = validate_hooks(&target, Some(&before), Some(&after)).unwrap();
            assert_eq!(pair.after_input(), Some(AfterInput::Results));
        }
        assert!(before_shape(&rest_target()).is_variadic());
        assert_eq!(after_shape(&rest_target()).arity(), 2);
    }

    #[test]
    fn counting_hooks_track_calls_and_failures() {
        let target = Callable::new(fixed_target(), |args: &Args| {
            let failed = args.arg::<String>(0).filter(|s| *s == "error").cloned();
            vec![Value::new(failed)]
        });
        let before_stats = Arc::new(CallStats::new());
        let after_stats = Arc::new(CallStats::new());
        let is_failure: FailurePredicate = Arc::new(|results: &[Value]| {
            matches!(results[0].downcast_ref::<Option<String>>(), Some(Some(_)))
        });

        let wired = decorate(
            &target.clone().into(),
            Some(&counting_before(target.shape(), "calls", Arc::clone(&before_stats)).into()),
            Some(&counting_after(target.shape(), "errors", Arc::clone(&after_stats), is_failure).into()),
        )
        .unwrap();

        for s in ["a", "error", "b"] {
            wired.call(&Args::new(vec![Value::new(s.to_string())]));
        }
        assert_eq!(before_stats.calls(), 3);
        assert_eq!(after_stats.calls(), 3);
        assert_eq!(after_stats.failures(), 1);
        assert_eq!(before_stats.failures(), 0);
    }

    #[test]
    fn counting_hooks_name_their_events() {
        let names = EventNames::default();
        let subscriber = tracing_subscriber::registry().with(names.clone());
        let target = fixed_target();
        let stats = Arc::new(CallStats::new());
        let never: FailurePredicate = Arc::new(|_: &[Value]| false);

        tracing::subscriber::with_default(subscriber, || {
            let args = Args::new(vec![Value::new("x".to_string())]);
            counting_before(&target, "calls", Arc::clone(&stats)).call(&args);
            let results = Args::new(vec![Value::new(None::<String>)]);
            counting_after(&target, "errors", Arc::clone(&stats), never).call(&results);
        });

        assert_eq!(*names.0.lock().unwrap(), vec!["calls", "errors"]);
        assert_eq!(stats.calls(), 2);
    }

    #[test]
    fn tracing_hooks_wire_onto_variadic_targets() {
        let target = Callable::new(rest_target(), |args: &Args| {
            vec![Value::new(args.rest().is_empty()), Value::new(args.rest().len() as i32)]
        });
        let wired = decorate(
            &target.clone().into(),
            Some(&tracing_before(target.shape(), "audit", Level::INFO).into()),
            Some(&tracing_after(target.shape(), "audit", Level::TRACE).into()),
        )
        .unwrap();

        let out = wired.call(
            &Args::new(vec![Value::new(1_u8)]).with_rest(vec![Value::new("x".to_string())]),
        );
        assert_eq!(out[1].downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn compose_calls_hooks_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let hook = |label: &'static str| {
            let order = Arc::clone(&order);
            Callable::new(before_shape(&fixed_target()), move |_: &Args| {
                order.lock().unwrap().push(label);
                Vec::new()
            })
        };

        let composed = compose(&fixed_target(), vec![hook("first"), hook("second")]).unwrap();
        assert_eq!(composed.shape(), &before_shape(&fixed_target()));
        composed.call(&Args::new(vec![Value::new("x".to_string())]));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn compose_rejects_mismatched_hook() {
        let good = Callable::new(before_shape(&fixed_target()), |_: &Args| Vec::new());
        let bad = Callable::new(Shape::new().param::<u8>(), |_: &Args| Vec::new());
        let err = compose(&fixed_target(), vec![good, bad]).unwrap_err();
        assert!(matches!(err, Error::ComposeMismatch { index: 1, .. }), "{err}");
    }

    #[test]
    fn compose_of_nothing_is_a_no_op_hook() {
        let composed = compose(&fixed_target(), Vec::new()).unwrap();
        assert!(composed.call(&Args::new(vec![Value::new("x".to_string())])).is_empty());
    }
}
