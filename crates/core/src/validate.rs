//! Setup-time shape validation for hooks and decorator types.

use crate::{
    callable::Callable,
    error::{Error, Hook, Result},
    shape::{Mismatch, Param, Shape, TypeTag, first_mismatch},
    value::Value,
};

/// What an after hook receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterInput {
    /// The target's results, in order.
    Results,
    /// The target's results followed by the original arguments, the variadic
    /// rest carried as the hook's own rest.
    ResultsAndArgs,
}

/// A validated pair of optional hooks. Absent hooks are skipped at call time.
#[derive(Debug, Clone, Default)]
pub struct HookPair {
    before: Option<Callable>,
    after: Option<(Callable, AfterInput)>,
}

impl HookPair {
    #[must_use]
    pub fn before(&self) -> Option<&Callable> {
        self.before.as_ref()
    }

    #[must_use]
    pub fn after(&self) -> Option<&Callable> {
        self.after.as_ref().map(|(hook, _)| hook)
    }

    #[must_use]
    pub fn after_input(&self) -> Option<AfterInput> {
        self.after.as_ref().map(|(_, input)| *input)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// Validate optional hooks against the shape of the callable they will wrap.
///
/// The before hook must take exactly the target's parameters. The after hook
/// must take the target's results, optionally followed by the target's
/// parameters. Return values of both hooks are discarded, so their return
/// types are not checked.
pub fn validate_hooks(
    target: &Shape,
    before: Option<&Value>,
    after: Option<&Value>,
) -> Result<HookPair> {
    let before = match before {
        Some(value) => {
            let hook = hook_callable(Hook::Before, value)?;
            check_params(Hook::Before, &target.param_list(), hook.shape())?;
            Some(hook.clone())
        },
        None => None,
    };

    let after = match after {
        Some(value) => {
            let hook = hook_callable(Hook::After, value)?;
            let input = after_input(target, hook.shape())?;
            Some((hook.clone(), input))
        },
        None => None,
    };

    Ok(HookPair { before, after })
}

/// Validate that `candidate` is the type of a decorator: one callable in, one
/// callable of the identical shape out. Returns that inner shape.
pub fn validate_decorator_shape(candidate: &TypeTag) -> Result<Shape> {
    let Some(shape) = candidate.as_shape() else {
        return Err(Error::NotADecoratorShape {
            found: candidate.to_string(),
        });
    };

    let returns = shape.return_types();
    if shape.arity() != 1 || shape.is_variadic() || returns.len() != 1 {
        return Err(Error::ArityNotOne {
            params: shape.arity(),
            returns: returns.len(),
        });
    }

    let (Some(input), Some(output)) = (shape.params()[0].as_shape(), returns[0].as_shape()) else {
        return Err(Error::NotADecoratorShape {
            found: shape.to_string(),
        });
    };

    if input != output {
        return Err(Error::InnerShapeMismatch {
            input: input.to_string(),
            output: output.to_string(),
        });
    }

    Ok(input.clone())
}

fn hook_callable(hook: Hook, value: &Value) -> Result<&Callable> {
    value.as_callable().ok_or_else(|| Error::HookNotCallable {
        hook,
        type_name: value.type_tag().to_string(),
    })
}

fn check_params(hook: Hook, expected: &[Param], found: &Shape) -> Result<()> {
    match first_mismatch(expected, &found.param_list()) {
        None => Ok(()),
        Some(mismatch) => Err(mismatch_error(hook, mismatch)),
    }
}

/// Pick the after-hook input mode. When neither form matches, the error is
/// reported against the form whose length is closer to the hook's.
fn after_input(target: &Shape, found: &Shape) -> Result<AfterInput> {
    let found = found.param_list();
    let results = target.return_list();
    let results_only = match first_mismatch(&results, &found) {
        None => return Ok(AfterInput::Results),
        Some(mismatch) => mismatch,
    };

    let mut with_args = results.clone();
    with_args.extend(target.param_list());
    match first_mismatch(&with_args, &found) {
        None => Ok(AfterInput::ResultsAndArgs),
        Some(_) if found.len() <= results.len() => Err(mismatch_error(Hook::After, results_only)),
        Some(mismatch) => Err(mismatch_error(Hook::After, mismatch)),
    }
}

fn mismatch_error(hook: Hook, mismatch: Mismatch) -> Error {
    match mismatch {
        Mismatch::Arity { expected, found } => Error::HookArityMismatch {
            hook,
            expected,
            found,
        },
        Mismatch::Type {
            position,
            expected,
            found,
        } => Error::HookTypeMismatch {
            hook,
            position,
            expected,
            found,
        },
    }
}
