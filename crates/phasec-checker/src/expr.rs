//! Bidirectional expression checking (spec.md §4.4): `check_expr` descends
//! the parse tree once, producing a `CheckedExpr` whose `ty`/`phase` are
//! always concrete. `expected` narrows inference (lambda parameter types,
//! empty-collection element types) but is never required for soundness —
//! every expression still computes its own actual type bottom-up.

use indexmap::IndexMap;
use phasec_ast::{Expr, ExprKind};
use phasec_checked::{CheckedExpr, CheckedExprKind, CheckedLambdaParam};
use phasec_common::{Diagnostic, ErrorCode};
use phasec_types::{is_assignable, merge, DataLayout, Phase, Type};

use crate::calls::CallTarget;
use crate::checker::{resolve_field_access_method, Checker};
use crate::phase_rules::join_contributions;
use crate::scope::Scope;

impl<'a> Checker<'a> {
    pub(crate) fn check_expr(&self, scope: &mut Scope, expr: &Expr, expected: Option<&Type>) -> Result<CheckedExpr, Diagnostic> {
        let position = expr.position.clone();
        match &expr.kind {
            ExprKind::BoolLiteral(b) => Ok(CheckedExpr::new(position, self.preamble_bool(), Phase::Const, CheckedExprKind::BoolLiteral(*b))),
            ExprKind::IntLiteral(n) => Ok(CheckedExpr::new(position, self.preamble_int(), Phase::Const, CheckedExprKind::IntLiteral(*n))),
            ExprKind::FloatLiteral(n) => Ok(CheckedExpr::new(position, self.preamble_float(), Phase::Const, CheckedExprKind::FloatLiteral(*n))),
            ExprKind::StringLiteral(s) => Ok(CheckedExpr::new(position, self.preamble_string(), Phase::Const, CheckedExprKind::StringLiteral(s.clone()))),
            ExprKind::NoOp => Ok(CheckedExpr::new(position, self.preamble_unit(), Phase::Const, CheckedExprKind::NoOp)),

            ExprKind::Identifier(name) => {
                let binding = scope.get(name).ok_or_else(|| {
                    Diagnostic::new(ErrorCode::UnknownName, format!("cannot find `{name}` in this scope"), position.clone())
                })?;
                Ok(CheckedExpr::new(position, binding.ty, binding.phase, CheckedExprKind::Identifier(name.clone())))
            }

            ExprKind::StaticReference(segments) => self.check_static_reference(scope, segments, &position),

            ExprKind::ListLiteral(elems) => self.check_collection_literal(scope, elems, expected, &position, "List", false),
            ExprKind::SetLiteral(elems) => self.check_collection_literal(scope, elems, expected, &position, "Set", true),
            ExprKind::MapLiteral(entries) => self.check_map_literal(scope, entries, expected, &position),

            ExprKind::Is { expr: inner, ty } => {
                let checked_inner = self.check_expr(scope, inner, None)?;
                let qualified = phasec_binder::qualify_type(scope.qualifier(), &scope.current_function().module, &scope.current_function().type_params_in_scope, ty, &position)?;
                Ok(CheckedExpr::new(position, self.preamble_bool(), checked_inner.phase, CheckedExprKind::Is { expr: Box::new(checked_inner), ty: qualified }))
            }
            ExprKind::Not(inner) => {
                let checked_inner = self.check_expr(scope, inner, Some(&self.preamble_bool()))?;
                Ok(CheckedExpr::new(position, self.preamble_bool(), checked_inner.phase, CheckedExprKind::Not(Box::new(checked_inner))))
            }
            ExprKind::And(lhs, rhs) => self.check_bool_binary(scope, lhs, rhs, &position, true),
            ExprKind::Or(lhs, rhs) => self.check_bool_binary(scope, lhs, rhs, &position, false),

            ExprKind::FieldAccess { base, field } => {
                let checked_base = self.check_expr(scope, base, None)?;
                self.check_field_access(checked_base, field, &position)
            }

            ExprKind::Construct { base, fields } => self.check_construct(scope, base, fields, &position),

            ExprKind::Call { callee, type_args, args } => self.check_call_expr(scope, callee, type_args, args, &position),

            ExprKind::Lambda { params, body } => self.check_lambda(scope, params, body, expected, &position),

            ExprKind::Block(block) => {
                let checked = self.check_block(scope, block, expected)?;
                let ty = checked.statements.last().map_or(Type::Nothing, |s| match s {
                    phasec_checked::Stmt::ExprStmt(e) => e.ty.clone(),
                    _ => Type::Nothing,
                });
                let phase = checked.statements.last().map_or(Phase::Const, |s| match s {
                    phasec_checked::Stmt::ExprStmt(e) => e.phase,
                    _ => Phase::Const,
                });
                Ok(CheckedExpr::new(position, ty, phase, CheckedExprKind::Block(checked)))
            }

            ExprKind::If { condition, then_branch, else_branch } => {
                let checked_condition = self.check_expr(scope, condition, Some(&self.preamble_bool()))?;
                let checked_then = self.check_expr(scope, then_branch, expected)?;
                let (ty, phase, checked_else) = match else_branch {
                    Some(else_expr) => {
                        let checked_else = self.check_expr(scope, else_expr, expected)?;
                        let merged = merge(&checked_then.ty, &checked_else.ty, self.lookup())
                            .map_err(|e| Diagnostic::new(ErrorCode::MergeMismatch, e.to_string(), position.clone()))?;
                        let phase = Phase::join(checked_condition.phase, Phase::join(checked_then.phase, checked_else.phase));
                        (merged, phase, Some(Box::new(checked_else)))
                    }
                    None => {
                        let phase = Phase::join(checked_condition.phase, checked_then.phase);
                        let option_ty =
                            Type::Parameterized { base: self.collection_symbol("Option"), args: vec![checked_then.ty.clone()] };
                        (option_ty, phase, None)
                    }
                };
                Ok(CheckedExpr::new(
                    position,
                    ty,
                    phase,
                    CheckedExprKind::If { condition: Box::new(checked_condition), then_branch: Box::new(checked_then), else_branch: checked_else },
                ))
            }

            ExprKind::Return(value) => {
                let checked_value = match value {
                    Some(v) => Some(Box::new(self.check_expr(scope, v, None)?)),
                    None => None,
                };
                let returned_ty = checked_value.as_ref().map_or(self.preamble_unit(), |v| v.ty.clone());
                let merged = merge(&scope.current_function().result_type, &returned_ty, self.lookup())
                    .map_err(|e| Diagnostic::new(ErrorCode::MergeMismatch, e.to_string(), position.clone()))?;
                scope.current_function_mut().result_type = merged;
                Ok(CheckedExpr::new(position, Type::Nothing, Phase::Const, CheckedExprKind::Return(checked_value)))
            }
        }
    }

    fn check_bool_binary(&self, scope: &mut Scope, lhs: &Expr, rhs: &Expr, position: &phasec_common::Position, is_and: bool) -> Result<CheckedExpr, Diagnostic> {
        let bool_ty = self.preamble_bool();
        let checked_lhs = self.check_expr(scope, lhs, Some(&bool_ty))?;
        let checked_rhs = self.check_expr(scope, rhs, Some(&bool_ty))?;
        let phase = Phase::join(checked_lhs.phase, checked_rhs.phase);
        let kind = if is_and {
            CheckedExprKind::And(Box::new(checked_lhs), Box::new(checked_rhs))
        } else {
            CheckedExprKind::Or(Box::new(checked_lhs), Box::new(checked_rhs))
        };
        Ok(CheckedExpr::new(position.clone(), bool_ty, phase, kind))
    }

    /// `Pkg::Mod::Item`: resolves the head through the qualifier, walks the
    /// remaining segments as children, and looks the result up in the global
    /// symbol table — the same qualifier-then-walk pattern
    /// `qualifier::qualify_type`'s `Dotted` arm uses for type expressions.
    fn check_static_reference(&self, scope: &Scope, segments: &[String], position: &phasec_common::Position) -> Result<CheckedExpr, Diagnostic> {
        let Some((head, rest)) = segments.split_first() else {
            return Err(Diagnostic::new(ErrorCode::UnresolvedType, "empty static reference", position.clone()));
        };
        let mut symbol = scope.qualifier().lookup(head).cloned().ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("cannot find `{head}` in this scope"), position.clone())
        })?;
        for seg in rest {
            symbol = symbol.child(seg.as_str());
        }
        let entry = self.symbol_table.get(&symbol).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("cannot find `{symbol}` in this scope"), position.clone())
        })?;
        let from_module = &scope.current_function().module;
        if !crate::import_verifier::is_visible(entry.access, &entry.declaring_module, from_module) {
            return Err(Diagnostic::new(
                ErrorCode::ImportNotVisible,
                format!("`{symbol}` is not visible from `{from_module}`"),
                position.clone(),
            ));
        }
        Ok(CheckedExpr::new(
            position.clone(),
            entry.ty.clone(),
            Phase::Const,
            CheckedExprKind::StaticReference { symbol, declaring_module: entry.declaring_module.clone() },
        ))
    }

    /// Resolves a field read against a struct's (possibly parameterized)
    /// layout, substituting the layout's own type parameters through its
    /// declared field types.
    fn check_field_access(&self, base: CheckedExpr, field: &str, position: &phasec_common::Position) -> Result<CheckedExpr, Diagnostic> {
        let (layout, substitution) = self.struct_layout_for(&base.ty, position)?;
        let DataLayout::Struct { fields, .. } = &layout else {
            return Err(Diagnostic::new(ErrorCode::UnknownField, format!("`{field}` is not a field: the base type has no named fields"), position.clone()));
        };
        let field_ty = fields.get(field).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownField, format!("no field `{field}` on `{}`", layout.name()), position.clone())
        })?;
        let ty = phasec_types::generics::substitute(field_ty, &substitution);
        let phase = base.phase;
        Ok(CheckedExpr::new(position.clone(), ty, phase, CheckedExprKind::FieldAccess { base: Box::new(base), field: field.to_string() }))
    }

    /// Dereferences a (possibly `Nominal`/`Parameterized`) type down to its
    /// `DataLayout`, returning the substitution from the layout's own type
    /// parameters to the concrete arguments supplied at the use site.
    fn struct_layout_for(&self, ty: &Type, position: &phasec_common::Position) -> Result<(DataLayout, phasec_types::GenericBindings), Diagnostic> {
        let mut bindings = phasec_types::GenericBindings::new();
        let resolved = match ty {
            Type::Nominal(sym) => self.symbol_table.get(sym).map(|e| e.ty.clone()),
            Type::Parameterized { base, args } => {
                let decl = self.symbol_table.get(base).map(|e| e.ty.clone());
                if let Some(Type::DataLayout(layout)) = &decl {
                    for (param, arg) in layout.type_params().iter().zip(args.iter()) {
                        bindings.default_to(param.clone(), arg.clone());
                    }
                }
                decl
            }
            Type::DataLayout(layout) => Some(Type::DataLayout(layout.clone())),
            _ => None,
        };
        match resolved {
            Some(Type::DataLayout(layout)) => Ok((*layout, bindings)),
            _ => Err(Diagnostic::new(ErrorCode::NotConstructable, "expression does not have a struct layout", position.clone())),
        }
    }

    fn check_collection_literal(
        &self,
        scope: &mut Scope,
        elems: &[Expr],
        expected: Option<&Type>,
        position: &phasec_common::Position,
        collection_name: &str,
        is_set: bool,
    ) -> Result<CheckedExpr, Diagnostic> {
        let expected_elem = expected.and_then(|t| match t {
            Type::Parameterized { args, .. } => args.first().cloned(),
            _ => None,
        });
        let mut checked = Vec::with_capacity(elems.len());
        let mut elem_ty = Type::Nothing;
        let mut phase = Phase::Const;
        for e in elems {
            let c = self.check_expr(scope, e, expected_elem.as_ref())?;
            elem_ty = merge(&elem_ty, &c.ty, self.lookup()).map_err(|err| Diagnostic::new(ErrorCode::MergeMismatch, err.to_string(), position.clone()))?;
            phase = Phase::join(phase, c.phase);
            checked.push(c);
        }
        let ty = Type::Parameterized { base: self.collection_symbol(collection_name), args: vec![elem_ty] };
        let kind = if is_set { CheckedExprKind::SetLiteral(checked) } else { CheckedExprKind::ListLiteral(checked) };
        Ok(CheckedExpr::new(position.clone(), ty, phase, kind))
    }

    fn check_map_literal(&self, scope: &mut Scope, entries: &[(Expr, Expr)], expected: Option<&Type>, position: &phasec_common::Position) -> Result<CheckedExpr, Diagnostic> {
        let (expected_k, expected_v) = match expected {
            Some(Type::Parameterized { args, .. }) if args.len() == 2 => (Some(args[0].clone()), Some(args[1].clone())),
            _ => (None, None),
        };
        let mut checked = Vec::with_capacity(entries.len());
        let mut key_ty = Type::Nothing;
        let mut val_ty = Type::Nothing;
        let mut phase = Phase::Const;
        for (k, v) in entries {
            let ck = self.check_expr(scope, k, expected_k.as_ref())?;
            let cv = self.check_expr(scope, v, expected_v.as_ref())?;
            key_ty = merge(&key_ty, &ck.ty, self.lookup()).map_err(|e| Diagnostic::new(ErrorCode::MergeMismatch, e.to_string(), position.clone()))?;
            val_ty = merge(&val_ty, &cv.ty, self.lookup()).map_err(|e| Diagnostic::new(ErrorCode::MergeMismatch, e.to_string(), position.clone()))?;
            phase = Phase::join(phase, Phase::join(ck.phase, cv.phase));
            checked.push((ck, cv));
        }
        let ty = Type::Parameterized { base: self.collection_symbol("Map"), args: vec![key_ty, val_ty] };
        Ok(CheckedExpr::new(position.clone(), ty, phase, CheckedExprKind::MapLiteral(checked)))
    }

    fn check_construct(&self, scope: &mut Scope, base: &phasec_ast::TypeExpr, fields: &IndexMap<String, Expr>, position: &phasec_common::Position) -> Result<CheckedExpr, Diagnostic> {
        let qualified_base = phasec_binder::qualify_type(scope.qualifier(), &scope.current_function().module, &scope.current_function().type_params_in_scope, base, position)?;
        let (base_sym, explicit_args) = match &qualified_base {
            Type::Nominal(sym) => (sym.clone(), None),
            Type::Parameterized { base, args } => (base.clone(), Some(args.clone())),
            _ => return Err(Diagnostic::new(ErrorCode::NotConstructable, "construct base must name a data type", position.clone())),
        };
        let Some(Type::DataLayout(layout)) = self.symbol_table.get(&base_sym).map(|e| e.ty.clone()) else {
            return Err(Diagnostic::new(ErrorCode::NotConstructable, format!("`{base_sym}` is not constructable with field syntax"), position.clone()));
        };
        let DataLayout::Struct { fields: declared_fields, type_params, .. } = layout.as_ref() else {
            return Err(Diagnostic::new(ErrorCode::NotConstructable, format!("`{base_sym}` has no named fields"), position.clone()));
        };
        if declared_fields.len() != fields.len() || !declared_fields.keys().all(|k| fields.contains_key(k)) {
            let excess: Vec<&str> = fields.keys().filter(|k| !declared_fields.contains_key(*k)).map(String::as_str).collect();
            let missing: Vec<&str> = declared_fields.keys().filter(|k| !fields.contains_key(*k)).map(String::as_str).collect();
            return Err(Diagnostic::new(
                ErrorCode::FieldSetMismatch,
                format!(
                    "construct for `{base_sym}` has excess fields [{}] and missing fields [{}]",
                    excess.join(", "),
                    missing.join(", "),
                ),
                position.clone(),
            ));
        }

        let mut bindings = phasec_types::GenericBindings::new();
        if let Some(args) = &explicit_args {
            for (param, arg) in type_params.iter().zip(args.iter()) {
                bindings.default_to(param.clone(), arg.clone());
            }
        } else if !type_params.is_empty() {
            let pairs: Vec<(Type, &Expr)> =
                declared_fields.iter().filter_map(|(name, ty)| fields.get(name).map(|expr| (ty.clone(), expr))).collect();
            bindings = self.infer_generics(scope, type_params, &pairs)?;
        }

        let mut checked_fields = IndexMap::with_capacity(fields.len());
        let mut phase = Phase::Const;
        for (name, declared_ty) in declared_fields {
            let expr = &fields[name];
            let expected_ty = phasec_types::generics::substitute(declared_ty, &bindings);
            let checked = self.check_expr(scope, expr, Some(&expected_ty))?;
            if !is_assignable(&checked.ty, Some(&expected_ty), self.lookup()) {
                return Err(Diagnostic::new(ErrorCode::TypeMismatch, format!("field `{name}` is not assignable to its declared type"), checked.position.clone()));
            }
            phase = Phase::join(phase, checked.phase);
            checked_fields.insert(name.clone(), checked);
        }

        let result_ty = if type_params.is_empty() {
            Type::Nominal(base_sym)
        } else {
            Type::Parameterized { base: base_sym, args: type_params.iter().map(|p| phasec_types::generics::substitute(&Type::TypeParameter(p.clone()), &bindings)).collect() }
        };
        Ok(CheckedExpr::new(position.clone(), result_ty.clone(), phase, CheckedExprKind::Construct { base: result_ty, fields: checked_fields }))
    }

    fn check_call_expr(&self, scope: &mut Scope, callee: &Expr, type_args: &[phasec_ast::TypeExpr], args: &[Expr], position: &phasec_common::Position) -> Result<CheckedExpr, Diagnostic> {
        if let ExprKind::FieldAccess { base, field } = &callee.kind {
            if let Some(result) = self.try_method_call(scope, base, field, type_args, args, position)? {
                return Ok(result);
            }
        }

        if let ExprKind::Identifier(name) = &callee.kind {
            if (name == "==" || name == "!=") && type_args.is_empty() {
                if let Some((checked_args, result, phase)) = self.check_equality_call(scope, args, position)? {
                    let checked_callee = self.check_expr(scope, callee, None)?;
                    return Ok(CheckedExpr::new(position.clone(), result, phase, CheckedExprKind::Call { callee: Box::new(checked_callee), args: checked_args }));
                }
            }
        }

        let checked_callee = self.check_expr(scope, callee, None)?;
        let surrounding_phase = scope.current_function().function_phase;
        let mut target: CallTarget = {
            let (t, _) = self.call_target_for(&checked_callee.ty, args, scope, position)?;
            t
        };
        if !type_args.is_empty() {
            self.apply_explicit_type_args(scope, &mut target, type_args, position)?;
        }
        let (checked_args, result, phase) = self.check_call_with_phase(scope, &target, args, surrounding_phase, position)?;
        Ok(CheckedExpr::new(position.clone(), result, phase, CheckedExprKind::Call { callee: Box::new(checked_callee), args: checked_args }))
    }

    fn apply_explicit_type_args(&self, scope: &mut Scope, target: &mut CallTarget, type_args: &[phasec_ast::TypeExpr], position: &phasec_common::Position) -> Result<(), Diagnostic> {
        if type_args.len() != target.type_params.len() {
            return Err(Diagnostic::new(ErrorCode::WrongTypeArgumentArity, "wrong number of explicit type arguments", position.clone()));
        }
        let mut bindings = phasec_types::GenericBindings::new();
        for (sym, expr) in target.type_params.iter().zip(type_args.iter()) {
            let qualified = phasec_binder::qualify_type(scope.qualifier(), &scope.current_function().module, &scope.current_function().type_params_in_scope, expr, position)?;
            bindings.default_to(sym.clone(), qualified);
        }
        target.params = target.params.iter().map(|p| phasec_types::Param { name: p.name.clone(), ty: phasec_types::generics::substitute(&p.ty, &bindings), phase: p.phase }).collect();
        target.result = phasec_types::generics::substitute(&target.result, &bindings);
        target.type_params.clear();
        Ok(())
    }

    /// §4.4.6's method-resolution rewrite: `base.name(args...)` becomes a
    /// static call to the resolved impl method with `base` prepended to the
    /// argument list, provided the method is visible. Returns `None` to let
    /// the caller fall back to ordinary field-access-as-callable-value.
    fn try_method_call(
        &self,
        scope: &mut Scope,
        base: &Expr,
        field: &str,
        type_args: &[phasec_ast::TypeExpr],
        args: &[Expr],
        position: &phasec_common::Position,
    ) -> Result<Option<CheckedExpr>, Diagnostic> {
        let checked_base = self.check_expr(scope, base, None)?;
        let Ok((layout, _)) = self.struct_layout_for(&checked_base.ty, position) else {
            return Ok(None);
        };
        let base_sym = layout.name().clone();
        let from_module = scope.current_function().module.clone();
        let Some(entry) = resolve_field_access_method(self.method_table, self.protocol_impl_table, scope.protocols_in_scope(), &base_sym, field, &from_module) else {
            return Ok(None);
        };

        let surrounding_phase = scope.current_function().function_phase;
        let mut target = CallTarget { type_params: entry.ty.type_params.clone(), params: entry.ty.params.clone(), result: entry.ty.result.as_ref().clone(), phase: entry.ty.phase };
        if !type_args.is_empty() {
            self.apply_explicit_type_args(scope, &mut target, type_args, position)?;
        }

        // `self` is always the first declared parameter; it is matched
        // against `base` directly rather than going through the generic
        // call machinery's per-argument checking, since `base` is already
        // checked.
        let self_param = target.params.first().cloned();
        if let Some(self_param) = &self_param {
            if !is_assignable(&checked_base.ty, Some(&self_param.ty), self.lookup()) {
                return Err(Diagnostic::new(ErrorCode::TypeMismatch, "receiver type does not match method's `self` parameter", position.clone()));
            }
        }
        let rest_params: Vec<_> = target.params.iter().skip(1).cloned().collect();
        let rest_target = CallTarget { type_params: vec![], params: rest_params, result: target.result.clone(), phase: target.phase };
        let (mut checked_args, result, phase) = self.check_call_with_phase(scope, &rest_target, args, surrounding_phase, position)?;
        checked_args.insert(0, checked_base);

        let declaring_module = entry.declaring_module.clone();
        let callee = CheckedExpr::new(
            position.clone(),
            Type::Function(entry.ty.clone()),
            Phase::Const,
            CheckedExprKind::StaticReference { symbol: entry.symbol.clone(), declaring_module },
        );
        Ok(Some(CheckedExpr::new(position.clone(), result, phase, CheckedExprKind::Call { callee: Box::new(callee), args: checked_args })))
    }

    fn check_lambda(&self, scope: &mut Scope, params: &[phasec_ast::LambdaParam], body: &Expr, expected: Option<&Type>, position: &phasec_common::Position) -> Result<CheckedExpr, Diagnostic> {
        let expected_fn = expected.and_then(|t| match t {
            Type::Function(ft) => Some(ft.clone()),
            _ => None,
        });
        let mut checked_params = Vec::with_capacity(params.len());
        for (i, p) in params.iter().enumerate() {
            let ty = if let Some(ty_expr) = &p.ty {
                phasec_binder::qualify_type(scope.qualifier(), &scope.current_function().module, &scope.current_function().type_params_in_scope, ty_expr, position)?
            } else if let Some(ft) = &expected_fn {
                ft.params.get(i).map(|p| p.ty.clone()).unwrap_or(Type::Nothing)
            } else {
                return Err(Diagnostic::new(ErrorCode::UnresolvedType, format!("cannot infer a type for lambda parameter `{}`", p.name), position.clone()));
            };
            checked_params.push(CheckedLambdaParam { name: p.name.clone(), ty });
        }

        let enclosing_phase = scope.current_function().function_phase;
        let module = scope.current_function().module.clone();
        let symbol = scope.current_function().symbol.child("<lambda>");
        scope.push_function(symbol, module, vec![], Type::Nothing, enclosing_phase);
        for p in &checked_params {
            scope.set(p.name.as_str(), p.ty.clone(), Phase::Val, position.clone());
        }
        let checked_body = self.check_expr(scope, body, expected_fn.as_ref().map(|ft| ft.result.as_ref()))?;
        let popped = scope.pop_function();

        // §4.4.8: the lambda's phase is the join over its closure set — the
        // phases of the outer bindings it captured, as seen from this
        // (now-restored) enclosing scope, so `fun`-enclosing demotion still
        // applies the same way `Scope::get` applied it while checking the body.
        let phase = join_contributions(popped.closure.iter().filter_map(|name| scope.get(name).map(|b| b.phase)));

        let fn_ty = phasec_types::FunctionType {
            phase: enclosing_phase,
            type_params: vec![],
            params: checked_params.iter().map(|p| phasec_types::Param::new(p.name.clone(), p.ty.clone())).collect(),
            result: Box::new(checked_body.ty.clone()),
        };
        Ok(CheckedExpr::new(position.clone(), Type::Function(fn_ty), phase, CheckedExprKind::Lambda { params: checked_params, body: Box::new(checked_body) }))
    }
}
