//! Phase inference for call arguments and declaration bindings (spec.md
//! §4.4.5) — the "novel part" of the checker. Composite-expression phases
//! (list literals, if/else, ...) are joined directly via `Phase::join`;
//! this module only covers the call-specific argument/parameter-phase
//! matching table and the enclosing-function-phase rules layered on top.

use phasec_common::{Diagnostic, ErrorCode, Position};
use phasec_types::{FunctionPhase, Phase};

/// One (argument-phase, expected-parameter-phase) pair, matched per the
/// table in §4.4.5. Returns the phase this argument *contributes* to the
/// call's combined phase, or a `PhaseArgumentMismatch` diagnostic.
pub fn argument_contribution(
    actual: Phase,
    expected: Option<Phase>,
    position: &Position,
) -> Result<Phase, Diagnostic> {
    match expected {
        Some(Phase::Var) => {
            if actual == Phase::Var {
                Ok(Phase::Flow)
            } else {
                Err(mismatch(actual, Phase::Var, position))
            }
        }
        Some(Phase::Flow) => {
            if matches!(actual, Phase::Var | Phase::Flow) {
                Ok(Phase::Flow)
            } else {
                Err(mismatch(actual, Phase::Flow, position))
            }
        }
        Some(Phase::Val) => {
            if matches!(actual, Phase::Val | Phase::Const) {
                Ok(Phase::Val)
            } else {
                Err(mismatch(actual, Phase::Val, position))
            }
        }
        Some(Phase::Const) => {
            if actual == Phase::Const {
                Ok(Phase::Const)
            } else {
                Err(mismatch(actual, Phase::Const, position))
            }
        }
        None => Ok(if matches!(actual, Phase::Var | Phase::Flow) { Phase::Flow } else { actual }),
    }
}

fn mismatch(actual: Phase, expected: Phase, position: &Position) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::PhaseArgumentMismatch,
        format!("argument of phase `{actual}` cannot be passed where `{expected}` is expected"),
        position.clone(),
    )
}

/// Combines the per-argument contributions by taking their maximum in
/// `const < val < flow` order (§4.4.5); zero arguments joins to `const`,
/// the neutral/bottom element, so a nullary call in a `fun` is itself
/// treated as compile-time known.
#[must_use]
pub fn join_contributions(contributions: impl IntoIterator<Item = Phase>) -> Phase {
    contributions.into_iter().fold(Phase::Const, Phase::join)
}

/// Applies the enclosing function's phase to a call, per §4.4.5's three
/// cases. `callee_phase` is the phase of the function *being called*;
/// `surrounding_phase` is the phase of the function whose body the call
/// expression appears in.
#[must_use]
pub fn call_phase(callee_phase: FunctionPhase, surrounding_phase: FunctionPhase, joined_args: Phase) -> Phase {
    match callee_phase {
        FunctionPhase::Sig => Phase::Val,
        FunctionPhase::Def => Phase::Flow,
        FunctionPhase::Fun => {
            if joined_args == Phase::Const {
                Phase::Const
            } else if surrounding_phase == FunctionPhase::Sig {
                Phase::Val
            } else {
                joined_args
            }
        }
    }
}

/// §4.4.5: assignment-statement phase rules. `target_phase` is the phase
/// the `Assignment` statement declares (`const`/`val`/`var`/`flow x = ...`);
/// `expr_phase` is the checked initializer's phase.
pub fn check_assignment_phase(target_phase: Phase, expr_phase: Phase, position: &Position) -> Result<(), Diagnostic> {
    let ok = match target_phase {
        Phase::Const => expr_phase == Phase::Const,
        Phase::Val | Phase::Var => matches!(expr_phase, Phase::Const | Phase::Val),
        Phase::Flow => true,
    };
    if ok {
        Ok(())
    } else {
        Err(Diagnostic::new(
            ErrorCode::AssignmentPhaseMismatch,
            format!("cannot initialize a `{target_phase}` binding from a `{expr_phase}` expression"),
            position.clone(),
        ))
    }
}

/// §4.4.5: "introducing `var` or `flow` bindings is permitted only inside a
/// `def` function."
pub fn check_binding_requires_def(
    target_phase: Phase,
    enclosing_phase: FunctionPhase,
    position: &Position,
) -> Result<(), Diagnostic> {
    if matches!(target_phase, Phase::Var | Phase::Flow) && enclosing_phase != FunctionPhase::Def {
        Err(Diagnostic::new(
            ErrorCode::ReactiveBindingOutsideDef,
            format!("only a `def` function may introduce a `{target_phase}` binding"),
            position.clone(),
        ))
    } else {
        Ok(())
    }
}

/// §4.4.5: "reassignment (writing into a `var`) is permitted only inside a
/// `sig` function."
pub fn check_reassignment_requires_sig(enclosing_phase: FunctionPhase, position: &Position) -> Result<(), Diagnostic> {
    if enclosing_phase == FunctionPhase::Sig {
        Ok(())
    } else {
        Err(Diagnostic::new(
            ErrorCode::ReassignmentOutsideSig,
            "reassignment is only permitted inside a `sig` function",
            position.clone(),
        ))
    }
}

/// §4.4.5 function parameter well-formedness: "a `fun` function may not
/// declare `var` or `flow` parameters; a `sig` may not declare `flow`
/// parameters; `def` may declare anything."
pub fn check_parameter_phase(
    function_phase: FunctionPhase,
    param_phase: Option<Phase>,
    param_name: &str,
    position: &Position,
) -> Result<(), Diagnostic> {
    let disallowed = match (function_phase, param_phase) {
        (FunctionPhase::Fun, Some(Phase::Var | Phase::Flow)) => true,
        (FunctionPhase::Sig, Some(Phase::Flow)) => true,
        _ => false,
    };
    if disallowed {
        Err(Diagnostic::new(
            ErrorCode::DisallowedParameterPhase,
            format!(
                "a `{function_phase}` function may not declare parameter `{param_name}` at phase `{}`",
                param_phase.expect("disallowed case always has a phase")
            ),
            position.clone(),
        ))
    } else {
        Ok(())
    }
}

/// The relative "reactivity capability" order used to check a function's
/// declared phase against what its body actually requires (§4.4.5's "it
/// must be at most as reactive as the declaration promises"): `fun < sig <
/// def`. This is a capability order, distinct from `Phase`'s reactivity
/// order, and is this workspace's resolution of the open question in
/// SPEC_FULL.md/DESIGN.md over exactly what "computed phase" means for a
/// function declaration (spec.md never spells out the comparison).
#[must_use]
pub fn phase_capability_rank(phase: FunctionPhase) -> u8 {
    match phase {
        FunctionPhase::Fun => 0,
        FunctionPhase::Sig => 1,
        FunctionPhase::Def => 2,
    }
}

pub fn check_declared_phase_at_least(
    declared: FunctionPhase,
    required: FunctionPhase,
    position: &Position,
) -> Result<(), Diagnostic> {
    if phase_capability_rank(declared) >= phase_capability_rank(required) {
        Ok(())
    } else {
        Err(Diagnostic::new(
            ErrorCode::DeclaredPhaseMismatch,
            format!("function declared `{declared}` but its body requires at least `{required}`"),
            position.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::synthetic()
    }

    #[test]
    fn expected_var_requires_actual_var() {
        assert_eq!(argument_contribution(Phase::Var, Some(Phase::Var), &pos()).unwrap(), Phase::Flow);
        assert!(argument_contribution(Phase::Val, Some(Phase::Var), &pos()).is_err());
    }

    #[test]
    fn expected_flow_accepts_var_or_flow() {
        assert_eq!(argument_contribution(Phase::Var, Some(Phase::Flow), &pos()).unwrap(), Phase::Flow);
        assert_eq!(argument_contribution(Phase::Flow, Some(Phase::Flow), &pos()).unwrap(), Phase::Flow);
        assert!(argument_contribution(Phase::Val, Some(Phase::Flow), &pos()).is_err());
    }

    #[test]
    fn expected_val_accepts_val_or_const() {
        assert_eq!(argument_contribution(Phase::Const, Some(Phase::Val), &pos()).unwrap(), Phase::Val);
        assert!(argument_contribution(Phase::Flow, Some(Phase::Val), &pos()).is_err());
    }

    #[test]
    fn unspecified_expected_promotes_reactive_actuals_to_flow() {
        assert_eq!(argument_contribution(Phase::Var, None, &pos()).unwrap(), Phase::Flow);
        assert_eq!(argument_contribution(Phase::Const, None, &pos()).unwrap(), Phase::Const);
    }

    #[test]
    fn call_inside_sig_collapses_fun_callee_to_val_unless_const() {
        assert_eq!(call_phase(FunctionPhase::Fun, FunctionPhase::Sig, Phase::Flow), Phase::Val);
        assert_eq!(call_phase(FunctionPhase::Fun, FunctionPhase::Sig, Phase::Const), Phase::Const);
    }

    #[test]
    fn sig_and_def_callees_force_their_result_phase() {
        assert_eq!(call_phase(FunctionPhase::Sig, FunctionPhase::Fun, Phase::Flow), Phase::Val);
        assert_eq!(call_phase(FunctionPhase::Def, FunctionPhase::Fun, Phase::Const), Phase::Flow);
    }

    #[test]
    fn fun_callee_outside_sig_takes_the_joined_argument_phase() {
        assert_eq!(call_phase(FunctionPhase::Fun, FunctionPhase::Fun, Phase::Val), Phase::Val);
    }

    #[test]
    fn const_target_requires_const_expression() {
        assert!(check_assignment_phase(Phase::Const, Phase::Const, &pos()).is_ok());
        assert!(check_assignment_phase(Phase::Const, Phase::Val, &pos()).is_err());
    }

    #[test]
    fn val_and_var_targets_reject_reactive_initializers() {
        assert!(check_assignment_phase(Phase::Val, Phase::Val, &pos()).is_ok());
        assert!(check_assignment_phase(Phase::Var, Phase::Flow, &pos()).is_err());
    }

    #[test]
    fn reactive_bindings_require_def() {
        assert!(check_binding_requires_def(Phase::Var, FunctionPhase::Def, &pos()).is_ok());
        assert!(check_binding_requires_def(Phase::Var, FunctionPhase::Sig, &pos()).is_err());
        assert!(check_binding_requires_def(Phase::Val, FunctionPhase::Fun, &pos()).is_ok());
    }

    #[test]
    fn reassignment_requires_sig() {
        assert!(check_reassignment_requires_sig(FunctionPhase::Sig, &pos()).is_ok());
        assert!(check_reassignment_requires_sig(FunctionPhase::Def, &pos()).is_err());
    }

    #[test]
    fn fun_parameters_reject_var_and_flow() {
        assert!(check_parameter_phase(FunctionPhase::Fun, Some(Phase::Var), "x", &pos()).is_err());
        assert!(check_parameter_phase(FunctionPhase::Sig, Some(Phase::Var), "x", &pos()).is_ok());
        assert!(check_parameter_phase(FunctionPhase::Sig, Some(Phase::Flow), "x", &pos()).is_err());
        assert!(check_parameter_phase(FunctionPhase::Def, Some(Phase::Flow), "x", &pos()).is_ok());
    }

    #[test]
    fn declared_phase_must_be_at_least_as_capable_as_required() {
        assert!(check_declared_phase_at_least(FunctionPhase::Def, FunctionPhase::Sig, &pos()).is_ok());
        assert!(check_declared_phase_at_least(FunctionPhase::Fun, FunctionPhase::Sig, &pos()).is_err());
    }
}
