//! Stateless wrap/unwrap phase classification (spec.md §4.6): given the
//! enclosing function's phase, an argument's checked phase, and its
//! parameter's expected phase, decide which of the lowerer's rewrites
//! applies. `lower.rs` holds the tree-shaping logic these decisions drive;
//! this module only holds the decision table, so it is cheap to unit test
//! in isolation from `Lowerer`'s recursive descent.

use phasec_types::{FunctionPhase, Phase};

/// What to do with one argument when the enclosing function is `sig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigAction {
    /// `E` is `val`/unspecified and `A` is `var`/`flow`: unwrap via `.get()`,
    /// pushed through projection/field-access chains.
    Unwrap,
    /// `E` is `flow` and `A` is `const`/`val`: wrap the eager value in a
    /// `singleton`.
    WrapSingleton,
    /// No transformation needed (includes `E = var` with `A = var`, which
    /// spec.md requires to already match).
    Plain,
}

#[must_use]
pub fn sig_action(actual: Phase, expected: Option<Phase>) -> SigAction {
    match expected {
        Some(Phase::Val) | None => {
            if matches!(actual, Phase::Var | Phase::Flow) {
                SigAction::Unwrap
            } else {
                SigAction::Plain
            }
        }
        Some(Phase::Flow) => {
            if matches!(actual, Phase::Const | Phase::Val) {
                SigAction::WrapSingleton
            } else {
                SigAction::Plain
            }
        }
        Some(Phase::Var) | Some(Phase::Const) => SigAction::Plain,
    }
}

/// What to do with one argument when the enclosing function is `def`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefAction {
    /// `E` is `val`/unspecified and `A` is `var`/`flow`: lift this argument
    /// out to a fresh identifier fed through the call-level `flow`/`def`
    /// combinator.
    Lift,
    /// `E` is `flow` and `A` is `const`/`val`: wrap the eager value in a
    /// `singleton` in place, no lifting.
    WrapSingleton,
    /// `E` is `var`: rebuild a field-access chain as a `projection` pipeline
    /// so it stays writable.
    RebuildProjection,
    Plain,
}

#[must_use]
pub fn def_action(actual: Phase, expected: Option<Phase>) -> DefAction {
    match expected {
        Some(Phase::Val) | None => {
            if matches!(actual, Phase::Var | Phase::Flow) {
                DefAction::Lift
            } else {
                DefAction::Plain
            }
        }
        Some(Phase::Flow) => {
            if matches!(actual, Phase::Const | Phase::Val) {
                DefAction::WrapSingleton
            } else {
                DefAction::Plain
            }
        }
        Some(Phase::Var) => DefAction::RebuildProjection,
        Some(Phase::Const) => DefAction::Plain,
    }
}

/// Picks the combinator a `def`-function call site lifts its reactive
/// arguments through: `def(...)` when the callee is itself `def`-phased,
/// `flow(...)` otherwise.
#[must_use]
pub fn lift_combinator_is_def(callee_phase: FunctionPhase) -> bool {
    callee_phase == FunctionPhase::Def
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sig_unwraps_reactive_actuals_against_unspecified_or_val_expectation() {
        assert_eq!(sig_action(Phase::Var, None), SigAction::Unwrap);
        assert_eq!(sig_action(Phase::Flow, Some(Phase::Val)), SigAction::Unwrap);
        assert_eq!(sig_action(Phase::Val, None), SigAction::Plain);
    }

    #[test]
    fn sig_wraps_eager_actuals_against_flow_expectation() {
        assert_eq!(sig_action(Phase::Const, Some(Phase::Flow)), SigAction::WrapSingleton);
        assert_eq!(sig_action(Phase::Flow, Some(Phase::Flow)), SigAction::Plain);
    }

    #[test]
    fn def_lifts_reactive_actuals_against_unspecified_or_val_expectation() {
        assert_eq!(def_action(Phase::Flow, None), DefAction::Lift);
        assert_eq!(def_action(Phase::Var, Some(Phase::Val)), DefAction::Lift);
    }

    #[test]
    fn def_rebuilds_projections_for_var_parameters() {
        assert_eq!(def_action(Phase::Var, Some(Phase::Var)), DefAction::RebuildProjection);
    }

    #[test]
    fn def_combinator_choice_follows_callee_phase() {
        assert!(lift_combinator_is_def(FunctionPhase::Def));
        assert!(!lift_combinator_is_def(FunctionPhase::Fun));
        assert!(!lift_combinator_is_def(FunctionPhase::Sig));
    }
}
