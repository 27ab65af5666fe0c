//! Call-site machinery (spec.md §4.4.4, §4.4.6): generic inference over a
//! parameter/argument list, method resolution for `base.method(...)` calls,
//! and the shapes a call's callee can take (a plain function, an overload
//! set of operator branches, or a tuple layout used as its own constructor).

use phasec_ast::{Expr, ExprKind};
use phasec_common::{Diagnostic, ErrorCode, Position, Symbol};
use phasec_types::{generics, DataLayout, FunctionPhase, FunctionType, GenericBindings, Param, Phase, Type, is_assignable};

use crate::checker::Checker;
use crate::phase_rules;
use crate::scope::Scope;

/// The effective signature a call's callee resolves to, after method
/// rewriting and overload/constructor dispatch have already picked one.
pub(crate) struct CallTarget {
    pub type_params: Vec<Symbol>,
    pub params: Vec<Param>,
    pub result: Type,
    pub phase: FunctionPhase,
}

impl<'a> Checker<'a> {
    /// Runs the full generic-inference algorithm (§4.4.4) over one call's
    /// argument list against `target`, checks every argument's phase
    /// (§4.4.5) and final assignability, and returns the checked arguments
    /// (in call order), the substituted result type, and the joined
    /// argument phase so the caller can compute the call's overall phase.
    pub(crate) fn check_call_with_phase(
        &self,
        scope: &mut Scope,
        target: &CallTarget,
        arg_exprs: &[Expr],
        surrounding_phase: FunctionPhase,
        position: &Position,
    ) -> Result<(Vec<phasec_checked::CheckedExpr>, Type, Phase), Diagnostic> {
        if target.params.len() != arg_exprs.len() {
            return Err(Diagnostic::new(
                ErrorCode::TypeMismatch,
                format!("expected {} argument(s), found {}", target.params.len(), arg_exprs.len()),
                position.clone(),
            ));
        }

        let bindings = if target.type_params.is_empty() {
            GenericBindings::new()
        } else {
            let pairs: Vec<(Type, &Expr)> = target.params.iter().map(|p| p.ty.clone()).zip(arg_exprs.iter()).collect();
            self.infer_generics(scope, &target.type_params, &pairs)?
        };

        let mut checked_args = Vec::with_capacity(arg_exprs.len());
        let mut contributions = Vec::with_capacity(arg_exprs.len());
        for (param, arg) in target.params.iter().zip(arg_exprs.iter()) {
            let expected = generics::substitute(&param.ty, &bindings);
            let checked = self.check_expr(scope, arg, Some(&expected))?;
            if !is_assignable(&checked.ty, Some(&expected), self.lookup()) {
                return Err(Diagnostic::new(
                    ErrorCode::TypeMismatch,
                    format!("argument is not assignable to parameter `{}`", param.name),
                    checked.position.clone(),
                ));
            }
            contributions.push(phase_rules::argument_contribution(checked.phase, param.phase, &checked.position)?);
            checked_args.push(checked);
        }

        let joined = phase_rules::join_contributions(contributions);
        let call_phase = phase_rules::call_phase(target.phase, surrounding_phase, joined);
        let result = generics::substitute(&target.result, &bindings);
        Ok((checked_args, result, call_phase))
    }

    /// §4.4.4's provisional-then-final two-pass inference: non-lambda
    /// arguments/fields are checked first (with no expected type) and
    /// unified against their declared types; lambdas are then checked
    /// against the provisional substitution and re-unified. Shape
    /// mismatches during unification are ignored here — they surface later
    /// as ordinary assignability failures once substitution is final.
    /// Shared between call-argument inference and `check_construct`'s
    /// field-keyed inference, which zips its `IndexMap` fields against this
    /// by declaration order before calling in.
    pub(crate) fn infer_generics(
        &self,
        scope: &mut Scope,
        type_params: &[Symbol],
        pairs: &[(Type, &Expr)],
    ) -> Result<GenericBindings, Diagnostic> {
        let mut bindings = GenericBindings::new();

        for (declared_ty, arg) in pairs {
            if matches!(arg.kind, ExprKind::Lambda { .. }) {
                continue;
            }
            let checked = self.check_expr(scope, arg, None)?;
            let _ = generics::unify(declared_ty, &checked.ty, self.lookup(), &mut bindings);
        }
        for sym in type_params {
            bindings.default_to(sym.clone(), Type::Nothing);
        }

        for (declared_ty, arg) in pairs {
            if !matches!(arg.kind, ExprKind::Lambda { .. }) {
                continue;
            }
            let expected = generics::substitute(declared_ty, &bindings);
            let checked = self.check_expr(scope, arg, Some(&expected))?;
            let _ = generics::unify(declared_ty, &checked.ty, self.lookup(), &mut bindings);
        }
        for sym in type_params {
            bindings.default_to(sym.clone(), Type::Nothing);
        }

        Ok(bindings)
    }

    /// Builds the effective call target for a checked callee's type:
    /// a plain `Function`, the selected branch of an `Overload` (operator
    /// dispatch, picked by matching the already-checked argument types
    /// against each branch), or a tuple `DataLayout` used as its own
    /// constructor.
    pub(crate) fn call_target_for(
        &self,
        callee_ty: &Type,
        arg_exprs: &[Expr],
        scope: &mut Scope,
        position: &Position,
    ) -> Result<(CallTarget, Vec<phasec_checked::CheckedExpr>), Diagnostic> {
        match callee_ty {
            Type::Function(ft) => Ok((
                CallTarget { type_params: ft.type_params.clone(), params: ft.params.clone(), result: ft.result.as_ref().clone(), phase: ft.phase },
                Vec::new(),
            )),
            Type::Overload(branches) => self.select_overload_branch(branches, arg_exprs, scope, position),
            Type::DataLayout(layout) => Ok((tuple_constructor_target(layout), Vec::new())),
            _ => Err(Diagnostic::new(ErrorCode::NotCallable, "expression is not callable", position.clone())),
        }
    }

    /// §4.4.6: "Equality (`==`, `!=`) is special-cased: checked against any
    /// pair of overlapping types — the actual dispatch is performed at
    /// runtime." Bypasses branch matching entirely: both arguments are
    /// checked with no expected type, and the call is accepted whenever the
    /// two checked types merge (i.e. one is assignable to the other),
    /// rather than requiring either side to match one of the preamble's
    /// fixed scalar branches. This lets `==` compare two values of any
    /// shared struct/enum/tuple type, not just the four scalar types the
    /// operator's `Overload` entry happens to enumerate.
    pub(crate) fn check_equality_call(
        &self,
        scope: &mut Scope,
        arg_exprs: &[Expr],
        position: &Position,
    ) -> Result<Option<(Vec<phasec_checked::CheckedExpr>, Type, Phase)>, Diagnostic> {
        if arg_exprs.len() != 2 {
            return Ok(None);
        }
        let lhs = self.check_expr(scope, &arg_exprs[0], None)?;
        let rhs = self.check_expr(scope, &arg_exprs[1], None)?;
        if phasec_types::merge(&lhs.ty, &rhs.ty, self.lookup()).is_err() {
            return Err(Diagnostic::new(
                ErrorCode::TypeMismatch,
                "`==`/`!=` require two values of overlapping types",
                position.clone(),
            ));
        }
        let joined = phase_rules::join_contributions([
            phase_rules::argument_contribution(lhs.phase, None, position)?,
            phase_rules::argument_contribution(rhs.phase, None, position)?,
        ]);
        let surrounding_phase = scope.current_function().function_phase;
        let phase = phase_rules::call_phase(FunctionPhase::Fun, surrounding_phase, joined);
        Ok(Some((vec![lhs, rhs], self.preamble_bool(), phase)))
    }

    /// Operator overload dispatch: each argument is checked once (operators
    /// take no lambdas), then the first branch whose parameter types accept
    /// the checked argument types wins. `==`/`!=` go through
    /// `check_equality_call` instead, never reaching this path.
    fn select_overload_branch(
        &self,
        branches: &[FunctionType],
        arg_exprs: &[Expr],
        scope: &mut Scope,
        position: &Position,
    ) -> Result<(CallTarget, Vec<phasec_checked::CheckedExpr>), Diagnostic> {
        let mut checked_args = Vec::with_capacity(arg_exprs.len());
        for arg in arg_exprs {
            checked_args.push(self.check_expr(scope, arg, None)?);
        }
        for branch in branches {
            if branch.params.len() != checked_args.len() {
                continue;
            }
            let matches = branch
                .params
                .iter()
                .zip(checked_args.iter())
                .all(|(p, a)| is_assignable(&a.ty, Some(&p.ty), self.lookup()));
            if matches {
                return Ok((
                    CallTarget { type_params: vec![], params: branch.params.clone(), result: branch.result.as_ref().clone(), phase: branch.phase },
                    checked_args,
                ));
            }
        }
        Err(Diagnostic::new(ErrorCode::TypeMismatch, "no overload accepts these argument types", position.clone()))
    }
}

/// A tuple layout `T(v0, v1, ...)` is callable as its own constructor: a
/// synthetic `fun`-phase signature whose parameters are the tuple's fields
/// in order and whose result is the tuple type itself.
fn tuple_constructor_target(layout: &DataLayout) -> CallTarget {
    match layout {
        DataLayout::Tuple { name, type_params, fields, .. } => CallTarget {
            type_params: type_params.clone(),
            params: fields
                .iter()
                .enumerate()
                .map(|(i, ty)| Param::new(format!("v{i}"), ty.clone()))
                .collect(),
            result: if type_params.is_empty() {
                Type::Nominal(name.clone())
            } else {
                Type::Parameterized { base: name.clone(), args: type_params.iter().cloned().map(Type::TypeParameter).collect() }
            },
            phase: FunctionPhase::Fun,
        },
        other => CallTarget { type_params: other.type_params().to_vec(), params: vec![], result: Type::Nominal(other.name().clone()), phase: FunctionPhase::Fun },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_binder::{DeclarationCollector, Qualifier};
    use phasec_common::{CheckerOptions, Package, Version};

    #[test]
    fn tuple_constructor_target_uses_positional_params() {
        let sym = Symbol::root(phasec_common::Package::new("acme", "app", phasec_common::Version::new(1, 0, 0))).child("Point");
        let layout = DataLayout::Tuple {
            name: sym.clone(),
            type_params: vec![],
            fields: vec![Type::Nominal(sym.child("Int")), Type::Nominal(sym.child("Int"))],
            enum_tag: None,
        };
        let target = tuple_constructor_target(&layout);
        assert_eq!(target.params.len(), 2);
        assert_eq!(target.params[0].name, "v0");
        assert_eq!(target.result, Type::Nominal(sym));
    }

    fn pkg() -> Package {
        Package::new("acme", "app", Version::new(1, 0, 0))
    }

    fn ident(name: &str) -> Expr {
        Expr::new(Position::synthetic(), ExprKind::Identifier(name.to_string()))
    }

    #[test]
    fn equality_accepts_two_values_of_the_same_type_without_an_overload_branch() {
        let module = Symbol::root(pkg());
        let collector = DeclarationCollector::new();
        let tables = collector.freeze();
        let options = CheckerOptions::default();
        let checker = Checker::new(&tables.symbol_table, &tables.method_table, &tables.protocol_impl_table, &options);
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let mut scope = Scope::new(qualifier, module.clone());

        let widget = Type::Nominal(module.child("Widget"));
        scope.set("a", widget.clone(), Phase::Val, Position::synthetic());
        scope.set("b", widget, Phase::Val, Position::synthetic());

        let (args, result, phase) =
            checker.check_equality_call(&mut scope, &[ident("a"), ident("b")], &Position::synthetic()).unwrap().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(result, checker.preamble_bool());
        assert_eq!(phase, Phase::Val);
    }

    #[test]
    fn equality_rejects_two_unrelated_types() {
        let module = Symbol::root(pkg());
        let collector = DeclarationCollector::new();
        let tables = collector.freeze();
        let options = CheckerOptions::default();
        let checker = Checker::new(&tables.symbol_table, &tables.method_table, &tables.protocol_impl_table, &options);
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let mut scope = Scope::new(qualifier, module.clone());

        scope.set("a", Type::Nominal(module.child("Widget")), Phase::Val, Position::synthetic());
        scope.set("b", Type::Nominal(module.child("Gadget")), Phase::Val, Position::synthetic());

        assert!(checker.check_equality_call(&mut scope, &[ident("a"), ident("b")], &Position::synthetic()).is_err());
    }
}
