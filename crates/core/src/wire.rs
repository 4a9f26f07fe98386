//! Building the wired callable: before hook, target, after hook.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use degorator_metrics::{counter, histogram, invocation as invocation_metrics, labels, wiring};
use tracing::{debug, trace};

use crate::{
    callable::Callable,
    shape::{Convention, Shape},
    validate::{AfterInput, HookPair},
    value::{Args, Value},
};

/// How arguments reach the target, fixed once at wiring time from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Forwarding {
    /// Fixed convention: only the fixed prefix is passed on.
    Plain,
    /// Variadic convention: the fixed prefix and the rest sequence.
    Spread,
}

impl Forwarding {
    fn for_shape(shape: &Shape) -> Self {
        match shape.convention() {
            Convention::Fixed => Self::Plain,
            Convention::Variadic(_) => Self::Spread,
        }
    }

    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn label(self) -> &'static str {
        match self {
            Self::Plain => "fixed",
            Self::Spread => "variadic",
        }
    }
}

/// Wire `hooks` around `target`.
///
/// The result advertises exactly the target's shape. Hooks must already be
/// validated against that shape (see [`crate::validate_hooks`]); wiring itself
/// cannot fail.
pub fn wire(target: Callable, hooks: HookPair) -> Callable {
    let shape = target.shape_arc();
    let forwarding = Forwarding::for_shape(&shape);

    debug!(
        shape = %shape,
        before = hooks.before().is_some(),
        after = hooks.after().is_some(),
        "wiring callable"
    );
    #[cfg(feature = "metrics")]
    counter!(wiring::WIRED_TOTAL, labels::CONVENTION => forwarding.label()).increment(1);

    let body = move |args: &Args| invoke(&target, &hooks, forwarding, args);
    Callable::from_parts(shape, Arc::new(body))
}

fn invoke(target: &Callable, hooks: &HookPair, forwarding: Forwarding, args: &Args) -> Vec<Value> {
    #[cfg(feature = "metrics")]
    let start = std::time::Instant::now();

    let trimmed;
    let args = match forwarding {
        Forwarding::Plain if !args.rest().is_empty() => {
            trace!(dropped = args.rest().len(), "fixed target, ignoring rest arguments");
            trimmed = args.without_rest();
            &trimmed
        },
        _ => args,
    };

    trace!(
        fixed = args.fixed().len(),
        rest = args.rest().len(),
        "invoking wired callable"
    );

    if let Some(before) = hooks.before() {
        before.call(args);
        #[cfg(feature = "metrics")]
        counter!(invocation_metrics::HOOK_CALLS_TOTAL, labels::HOOK => "before").increment(1);
    }

    let results = target.call(args);

    if let (Some(after), Some(input)) = (hooks.after(), hooks.after_input()) {
        let after_args = match input {
            AfterInput::Results => Args::new(results.clone()),
            AfterInput::ResultsAndArgs => Args::prefixed(&results, args),
        };
        after.call(&after_args);
        #[cfg(feature = "metrics")]
        counter!(invocation_metrics::HOOK_CALLS_TOTAL, labels::HOOK => "after").increment(1);
    }

    #[cfg(feature = "metrics")]
    {
        counter!(
            invocation_metrics::INVOCATIONS_TOTAL,
            labels::CONVENTION => forwarding.label()
        )
        .increment(1);
        histogram!(invocation_metrics::DURATION_SECONDS).record(start.elapsed().as_secs_f64());
    }

    results
}
