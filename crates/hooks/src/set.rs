//! Building hook pairs from configuration.

use std::{collections::BTreeMap, sync::Arc};

use {
    degorator::{Callable, HookPair, Shape, Value, validate_hooks, wire},
    tracing::debug,
};

use crate::{
    config::{HookEntry, HookKind, HooksConfig},
    error::{Error, Result},
    stats::CallStats,
    stock::{
        FailurePredicate, after_shape, before_shape, compose, counting_after, counting_before,
        tracing_after, tracing_before,
    },
};

/// A validated hook pair for one target shape, plus the stats of its
/// counting hooks keyed by hook name.
#[derive(Debug, Clone)]
pub struct HookSet {
    target: Shape,
    pair: HookPair,
    stats: BTreeMap<String, Arc<CallStats>>,
}

impl HookSet {
    /// Build the hooks in `config` for callables of shape `target`.
    ///
    /// Count entries with the same name share one [`CallStats`]. After
    /// hooks receive the target's results; `is_failure` decides which of
    /// those count as failures.
    pub fn from_config(
        config: &HooksConfig,
        target: &Shape,
        is_failure: FailurePredicate,
    ) -> Result<Self> {
        let mut stats = BTreeMap::new();

        let before = config
            .before
            .iter()
            .map(|entry| -> Result<Callable> {
                Ok(match entry.kind {
                    HookKind::Count => {
                        counting_before(target, &entry.name, stats_for(&mut stats, entry))
                    },
                    HookKind::Trace => tracing_before(target, &entry.name, entry.level()?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let after = config
            .after
            .iter()
            .map(|entry| -> Result<Callable> {
                Ok(match entry.kind {
                    HookKind::Count => counting_after(
                        target,
                        &entry.name,
                        stats_for(&mut stats, entry),
                        Arc::clone(&is_failure),
                    ),
                    HookKind::Trace => tracing_after(target, &entry.name, entry.level()?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let before = fold(&before_shape(target), before)?;
        let after = fold(&after_shape(target), after)?;
        let pair = validate_hooks(target, before.as_ref(), after.as_ref())?;

        debug!(
            target = %target,
            before = config.before.len(),
            after = config.after.len(),
            "hook set built"
        );

        Ok(Self {
            target: target.clone(),
            pair,
            stats,
        })
    }

    #[must_use]
    pub fn pair(&self) -> &HookPair {
        &self.pair
    }

    /// Stats recorded by the counting hooks named `name`.
    #[must_use]
    pub fn stats(&self, name: &str) -> Option<&Arc<CallStats>> {
        self.stats.get(name)
    }

    /// Wire this set's hooks around `target`, which must have the shape the
    /// set was built for.
    pub fn wire(&self, target: &Callable) -> Result<Callable> {
        if target.shape() != &self.target {
            return Err(Error::Decorate(degorator::Error::invalid_target(format!(
                "hook set expects {}, got {}",
                self.target,
                target.shape()
            ))));
        }
        Ok(wire(target.clone(), self.pair.clone()))
    }
}

fn stats_for(stats: &mut BTreeMap<String, Arc<CallStats>>, entry: &HookEntry) -> Arc<CallStats> {
    Arc::clone(stats.entry(entry.name.clone()).or_default())
}

fn fold(params: &Shape, mut hooks: Vec<Callable>) -> Result<Option<Value>> {
    match hooks.len() {
        0 => Ok(None),
        1 => Ok(hooks.pop().map(Value::from)),
        _ => compose(params, hooks).map(|hook| Some(Value::from(hook))),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        degorator::{AfterInput, Args},
    };

    fn target_shape() -> Shape {
        Shape::new().param::<String>().returns::<Option<String>>()
    }

    fn target() -> Callable {
        Callable::new(target_shape(), |args: &Args| {
            let failed = args.arg::<String>(0).filter(|s| *s == "error").cloned();
            vec![Value::new(failed)]
        })
    }

    fn is_failure() -> FailurePredicate {
        Arc::new(|results: &[Value]| {
            matches!(results[0].downcast_ref::<Option<String>>(), Some(Some(_)))
        })
    }

    fn entry(name: &str, kind: HookKind) -> HookEntry {
        HookEntry {
            name: name.into(),
            kind,
            level: None,
        }
    }

    #[test]
    fn empty_config_builds_empty_pair() {
        let set =
            HookSet::from_config(&HooksConfig::default(), &target_shape(), is_failure()).unwrap();
        assert!(set.pair().is_empty());
        assert!(set.stats("calls").is_none());
    }

    #[test]
    fn configured_hooks_count_calls_and_failures() {
        let config = HooksConfig {
            before: vec![entry("audit", HookKind::Trace), entry("calls", HookKind::Count)],
            after: vec![entry("errors", HookKind::Count)],
        };
        let set = HookSet::from_config(&config, &target_shape(), is_failure()).unwrap();
        assert_eq!(set.pair().after_input(), Some(AfterInput::Results));

        let wired = set.wire(&target()).unwrap();
        for s in ["1", "error", "11"] {
            wired.call(&Args::new(vec![Value::new(s.to_string())]));
        }
        assert_eq!(set.stats("calls").unwrap().calls(), 3);
        let errors = set.stats("errors").unwrap();
        assert_eq!(errors.calls(), 3);
        assert_eq!(errors.failures(), 1);
    }

    #[test]
    fn count_entries_with_one_name_share_stats() {
        let config = HooksConfig {
            before: vec![entry("calls", HookKind::Count)],
            after: vec![entry("calls", HookKind::Count)],
        };
        let set = HookSet::from_config(&config, &target_shape(), is_failure()).unwrap();
        let wired = set.wire(&target()).unwrap();
        wired.call(&Args::new(vec![Value::new("x".to_string())]));
        assert_eq!(set.stats("calls").unwrap().calls(), 2);
    }

    #[test]
    fn invalid_level_fails_build() {
        let mut audit = entry("audit", HookKind::Trace);
        audit.level = Some("chatty".into());
        let config = HooksConfig {
            before: vec![audit],
            after: Vec::new(),
        };
        let err = HookSet::from_config(&config, &target_shape(), is_failure()).unwrap_err();
        assert!(matches!(err, Error::InvalidLevel { .. }), "{err}");
    }

    #[test]
    fn wire_rejects_other_shapes() {
        let set =
            HookSet::from_config(&HooksConfig::default(), &target_shape(), is_failure()).unwrap();
        let other = Callable::new(Shape::new().param::<u8>(), |_: &Args| Vec::new());
        assert!(matches!(set.wire(&other), Err(Error::Decorate(_))));
    }
}
