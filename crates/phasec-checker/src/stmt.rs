//! Block and statement checking (spec.md §4.4.1/§4.4.5): `Assignment`
//! introduces a binding at a declared phase, `Reassignment` writes into an
//! existing `var`, and a nested `FunctionStmt` is checked the same way a
//! top-level function is, just without a prior binder pass to collect its
//! signature into the frozen symbol table.

use phasec_ast::{
    Block as ParsedBlock, Expr, ExprKind, FunctionBody as ParsedFunctionBody,
    FunctionDecl as ParsedFunctionDecl, Stmt as ParsedStmt,
};
use phasec_checked::{Block, FunctionDecl, FunctionBody, Stmt};
use phasec_common::{Access, Diagnostic, ErrorCode, Position};
use phasec_types::{is_assignable, FunctionPhase, FunctionType, Param, Phase, Type};

use crate::checker::Checker;
use crate::phase_rules;
use crate::scope::Scope;

impl<'a> Checker<'a> {
    /// §4.4.9: "all-but-last statements check against no expected type; the
    /// final statement inherits the outer expected type and supplies the
    /// block's type and phase." `expected` is only ever threaded to the
    /// last statement, mirroring the `If`/`Lambda` handling elsewhere in
    /// this checker.
    pub(crate) fn check_block(&self, scope: &mut Scope, block: &ParsedBlock, expected: Option<&Type>) -> Result<Block, Diagnostic> {
        scope.push_block();
        let last_index = block.statements.len().checked_sub(1);
        let mut statements = Vec::with_capacity(block.statements.len());
        for (i, stmt) in block.statements.iter().enumerate() {
            let stmt_expected = if Some(i) == last_index { expected } else { None };
            statements.push(self.check_stmt(scope, stmt, stmt_expected)?);
        }
        scope.pop_block();
        Ok(Block { position: block.position.clone(), statements })
    }

    fn check_stmt(&self, scope: &mut Scope, stmt: &ParsedStmt, expected: Option<&Type>) -> Result<Stmt, Diagnostic> {
        match stmt {
            ParsedStmt::ExprStmt(expr) => Ok(Stmt::ExprStmt(self.check_expr(scope, expr, expected)?)),
            ParsedStmt::Assignment { position, name, phase, ty, expr } => {
                self.check_assignment(scope, position, name, *phase, ty.as_ref(), expr)
            }
            ParsedStmt::Reassignment { position, target, expr } => self.check_reassignment(scope, position, target, expr),
            ParsedStmt::FunctionStmt(f) => Ok(Stmt::FunctionStmt(self.check_function_stmt(scope, f)?)),
        }
    }

    fn check_assignment(
        &self,
        scope: &mut Scope,
        position: &Position,
        name: &str,
        phase: Phase,
        ty: Option<&phasec_ast::TypeExpr>,
        expr: &Expr,
    ) -> Result<Stmt, Diagnostic> {
        let enclosing_phase = scope.current_function().function_phase;
        phase_rules::check_binding_requires_def(phase, enclosing_phase, position)?;

        let declared_ty = match ty {
            Some(ty_expr) => Some(phasec_binder::qualify_type(
                scope.qualifier(),
                &scope.current_function().module,
                &scope.current_function().type_params_in_scope,
                ty_expr,
                position,
            )?),
            None => None,
        };
        let checked_expr = self.check_expr(scope, expr, declared_ty.as_ref())?;
        phase_rules::check_assignment_phase(phase, checked_expr.phase, position)?;

        let binding_ty = match declared_ty {
            Some(declared_ty) => {
                if !phasec_types::is_assignable(&checked_expr.ty, Some(&declared_ty), self.lookup()) {
                    return Err(Diagnostic::new(
                        ErrorCode::TypeMismatch,
                        format!("initializer is not assignable to `{name}`'s declared type"),
                        checked_expr.position.clone(),
                    ));
                }
                declared_ty
            }
            None => checked_expr.ty.clone(),
        };

        if matches!(phase, Phase::Var | Phase::Flow) {
            scope.current_function_mut().saw_reactive_binding = true;
        }
        scope.set(name, binding_ty.clone(), phase, position.clone());

        Ok(Stmt::Assignment { position: position.clone(), name: name.to_string(), phase, ty: binding_ty, expr: checked_expr })
    }

    fn check_reassignment(&self, scope: &mut Scope, position: &Position, target: &Expr, expr: &Expr) -> Result<Stmt, Diagnostic> {
        validate_reassignment_target_shape(target, position)?;
        let enclosing_phase = scope.current_function().function_phase;
        phase_rules::check_reassignment_requires_sig(enclosing_phase, position)?;

        let checked_target = self.check_expr(scope, target, None)?;
        if checked_target.phase != Phase::Var {
            return Err(Diagnostic::new(
                ErrorCode::AssignmentPhaseMismatch,
                "reassignment target must resolve to a `var` binding",
                position.clone(),
            ));
        }
        let checked_expr = self.check_expr(scope, expr, Some(&checked_target.ty))?;
        if !phasec_types::is_assignable(&checked_expr.ty, Some(&checked_target.ty), self.lookup()) {
            return Err(Diagnostic::new(ErrorCode::TypeMismatch, "reassigned expression is not assignable to the target's type", checked_expr.position.clone()));
        }

        scope.current_function_mut().saw_reassignment = true;
        Ok(Stmt::Reassignment { position: position.clone(), target: checked_target, expr: checked_expr })
    }

    /// A local function declaration: checked like `Checker::check_function`,
    /// but its signature is qualified directly from the parse tree rather
    /// than looked up from the frozen symbol table, since the binder never
    /// collects statement-level declarations (§4.2 only walks top-level
    /// declarations and impl methods). A known simplification (see
    /// DESIGN.md): a local function's own type parameters are qualified
    /// structurally for this body only and are never registered as symbol
    /// table entries, so they cannot be referenced from a `StaticReference`.
    fn check_function_stmt(&self, scope: &mut Scope, f: &ParsedFunctionDecl) -> Result<FunctionDecl, Diagnostic> {
        let enclosing = scope.current_function();
        let symbol = enclosing.symbol.child(f.name.as_str());
        let module = enclosing.module.clone();
        let mut type_params_in_scope = enclosing.type_params_in_scope.clone();
        type_params_in_scope.extend(f.type_params.iter().cloned());

        let mut params = Vec::with_capacity(f.params.len());
        for p in &f.params {
            phase_rules::check_parameter_phase(f.function_phase, p.phase, &p.name, &f.position)?;
            let ty = phasec_binder::qualify_type(scope.qualifier(), &symbol, &type_params_in_scope, &p.ty, &f.position)?;
            params.push(Param { name: p.name.clone(), ty, phase: p.phase });
        }
        let result = match &f.result {
            Some(ty_expr) => phasec_binder::qualify_type(scope.qualifier(), &symbol, &type_params_in_scope, ty_expr, &f.position)?,
            None => self.preamble_unit(),
        };
        let type_params: Vec<phasec_common::Symbol> = f.type_params.iter().map(|n| symbol.child(n.as_str())).collect();

        let fn_ty = FunctionType { phase: f.function_phase, type_params: type_params.clone(), params: params.clone(), result: Box::new(result.clone()) };
        // Bound before the body is checked so the function can call itself.
        scope.set(f.name.as_str(), Type::Function(fn_ty), Phase::Const, f.position.clone());

        let body = match &f.body {
            ParsedFunctionBody::Extern(name) => FunctionBody::Extern(name.clone()),
            ParsedFunctionBody::Block(block) => {
                scope.push_function(symbol.clone(), module.clone(), type_params_in_scope, Type::Nothing, f.function_phase);
                for p in &params {
                    scope.set(p.name.as_str(), p.ty.clone(), p.phase.unwrap_or(Phase::Val), f.position.clone());
                }
                let checked_block = self.check_block(scope, block, Some(&result))?;
                let function_scope = scope.pop_function();

                let merged_result = phasec_types::merge(&result, &function_scope.result_type, self.lookup())
                    .map_err(|e| Diagnostic::new(ErrorCode::MergeMismatch, e.to_string(), f.position.clone()))?;
                let trailing_ty = crate::checker::checked_block_type(&checked_block);
                if !is_assignable(&trailing_ty, Some(&merged_result), self.lookup()) {
                    return Err(Diagnostic::new(
                        ErrorCode::TypeMismatch,
                        format!("function `{symbol}` declares result type {:?} but its body's trailing expression has type {:?}", result, trailing_ty),
                        f.position.clone(),
                    ));
                }
                let required_phase = if function_scope.saw_reactive_binding {
                    FunctionPhase::Def
                } else if function_scope.saw_reassignment {
                    FunctionPhase::Sig
                } else {
                    FunctionPhase::Fun
                };
                if self.options.strict_phase_inference {
                    phase_rules::check_declared_phase_at_least(f.function_phase, required_phase, &f.position)?;
                }
                FunctionBody::Block(checked_block)
            }
        };

        Ok(FunctionDecl {
            position: f.position.clone(),
            access: Access::Private,
            symbol,
            function_phase: f.function_phase,
            type_params,
            params,
            result,
            body,
        })
    }
}

fn validate_reassignment_target_shape(expr: &Expr, position: &Position) -> Result<(), Diagnostic> {
    match &expr.kind {
        ExprKind::Identifier(_) => Ok(()),
        ExprKind::FieldAccess { base, .. } => validate_reassignment_target_shape(base, position),
        _ => Err(Diagnostic::new(
            ErrorCode::NotConstructable,
            "internal: reassignment target must be an identifier or field-access chain",
            position.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_ast::ParsedFile;
    use phasec_binder::{DeclarationCollector, DependencyManager, Qualifier};
    use phasec_common::{CheckerOptions, Package, Version};

    fn pkg() -> Package {
        Package::new("acme", "app", Version::new(1, 0, 0))
    }

    #[test]
    fn reassignment_target_must_be_identifier_or_field_chain() {
        let bad = Expr::new(Position::synthetic(), ExprKind::IntLiteral(1));
        assert!(validate_reassignment_target_shape(&bad, &Position::synthetic()).is_err());

        let field_chain = Expr::new(
            Position::synthetic(),
            ExprKind::FieldAccess { base: Box::new(Expr::new(Position::synthetic(), ExprKind::Identifier("x".into()))), field: "y".into() },
        );
        assert!(validate_reassignment_target_shape(&field_chain, &Position::synthetic()).is_ok());
    }

    #[test]
    fn an_empty_file_checks_to_an_empty_declaration_list() {
        let module = phasec_common::Symbol::root(pkg());
        let dependency_manager = DependencyManager::new(pkg());
        let collector = DeclarationCollector::new();
        let tables = collector.freeze();
        let options = CheckerOptions::default();
        let checker = Checker::new(&tables.symbol_table, &tables.method_table, &tables.protocol_impl_table, &options);
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let file = ParsedFile { path: "main.ph".to_string(), imports: vec![], declarations: vec![] };
        let checked = checker.check_file(&file, &module, qualifier, &dependency_manager).unwrap();
        assert!(checked.declarations.is_empty());
    }
}
