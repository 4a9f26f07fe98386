//! Statically typed decorators.
//!
//! The same before, target, after sequence as [`crate::wire`], but with the
//! shapes carried by Rust's type system: a hook that does not fit the target
//! is a compile error instead of a setup error. Variadic targets use a slice
//! argument, e.g. `TypedDecorator<[String], Outcome>`.

use std::sync::Arc;

type BeforeFn<A> = Arc<dyn Fn(&A) + Send + Sync>;
type AfterFn<A, R> = Arc<dyn Fn(&R, &A) + Send + Sync>;

/// A wired function produced by [`TypedDecorator::apply`].
pub type DecoratedFn<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

/// Reusable pair of typed hooks for targets of type `Fn(&A) -> R`.
pub struct TypedDecorator<A: ?Sized, R> {
    before: Option<BeforeFn<A>>,
    after: Option<AfterFn<A, R>>,
}

impl<A: ?Sized + 'static, R: 'static> TypedDecorator<A, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    /// Run `hook` with the arguments before every target call.
    #[must_use]
    pub fn before(mut self, hook: impl Fn(&A) + Send + Sync + 'static) -> Self {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Run `hook` with the result and the original arguments after every
    /// target call.
    #[must_use]
    pub fn after(mut self, hook: impl Fn(&R, &A) + Send + Sync + 'static) -> Self {
        self.after = Some(Arc::new(hook));
        self
    }

    /// Like [`Self::after`] for hooks that only look at the result.
    #[must_use]
    pub fn after_result(self, hook: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.after(move |result, _| hook(result))
    }

    /// Wire the hooks around `target`. Each call returns a new function; the
    /// hooks themselves are shared.
    pub fn apply<F>(&self, target: F) -> DecoratedFn<A, R>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        let before = self.before.clone();
        let after = self.after.clone();
        Arc::new(move |args: &A| {
            if let Some(before) = &before {
                before(args);
            }
            let result = target(args);
            if let Some(after) = &after {
                after(&result, args);
            }
            result
        })
    }
}

impl<A: ?Sized + 'static, R: 'static> Default for TypedDecorator<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized, R> Clone for TypedDecorator<A, R> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn typed_hooks_wrap_target() {
        let calls = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let decorator = {
            let calls = Arc::clone(&calls);
            let failures = Arc::clone(&failures);
            TypedDecorator::<str, Result<(), String>>::new()
                .before(move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
                .after(move |result, _| {
                    if result.is_err() {
                        failures.fetch_add(1, Ordering::SeqCst);
                    }
                })
        };
        let wired = decorator.apply(|s: &str| {
            if s == "error" {
                Err(s.to_string())
            } else {
                Ok(())
            }
        });

        assert!(wired("ok").is_ok());
        assert!(wired("error").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn slice_targets_accept_empty_rest() {
        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let decorator = {
            let seen = Arc::clone(&seen);
            TypedDecorator::<[String], usize>::new().before(move |rest| {
                seen.store(rest.len(), Ordering::SeqCst);
            })
        };
        let wired = decorator.apply(|rest: &[String]| rest.len());
        let empty: Vec<String> = Vec::new();
        assert_eq!(wired(empty.as_slice()), 0);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        let two = vec!["a".to_string(), "b".to_string()];
        assert_eq!(wired(two.as_slice()), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn after_result_ignores_args() {
        let last = Arc::new(AtomicUsize::new(0));
        let decorator = {
            let last = Arc::clone(&last);
            TypedDecorator::<u32, usize>::new().after_result(move |r| {
                last.store(*r, Ordering::SeqCst);
            })
        };
        let wired = decorator.apply(|n: &u32| *n as usize * 2);
        assert_eq!(wired(&21), 42);
        assert_eq!(last.load(Ordering::SeqCst), 42);
    }
}
