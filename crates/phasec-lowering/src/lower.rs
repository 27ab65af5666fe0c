//! Reactive IR lowering (spec.md §4.6): translates a `phasec_checked`
//! tree into `phasec_lowering::ir`, inserting wrap/unwrap operations at
//! every call boundary per the table `wrap.rs` encodes. Single-threaded,
//! one `Lowerer` per file — the counters it carries (temp names, collected
//! imports) are file-local state, never shared across files.

use indexmap::IndexMap;
use phasec_binder::ExternalBindings;
use phasec_checked::{
    Block, CheckedExpr, CheckedExprKind, CheckedFile, Decl, FunctionBody as CheckedFunctionBody,
    Stmt,
};
use phasec_common::{Access, Symbol};
use phasec_types::{FunctionPhase, FunctionType, Phase, Type};

use crate::ir::{IrDecl, IrExpr, IrFile, IrFunction, IrStmt};
use crate::wrap::{self, DefAction, SigAction};

/// One imported name, either a cross-module static reference collected
/// during lowering or an `extern` pass-through re-export.
struct ImportEntry {
    source: String,
    imported_name: String,
    local_name: String,
}

pub struct Lowerer<'a> {
    module: Symbol,
    external_bindings: &'a ExternalBindings,
    imports: IndexMap<Symbol, ImportEntry>,
    temp_counter: u32,
}

impl<'a> Lowerer<'a> {
    #[must_use]
    pub fn new(module: Symbol, external_bindings: &'a ExternalBindings) -> Self {
        Self { module, external_bindings, imports: IndexMap::new(), temp_counter: 0 }
    }

    fn fresh(&mut self, prefix: &str) -> String {
        self.temp_counter += 1;
        format!("{prefix}{}", self.temp_counter)
    }

    /// Registers (if not already present) a cross-module static reference
    /// and returns the local alias lowered code should refer to it by.
    fn import_static(&mut self, symbol: &Symbol, declaring_module: &Symbol) -> String {
        let local_name = symbol.name().unwrap_or("_").to_string();
        if declaring_module == &self.module {
            return local_name;
        }
        self.imports
            .entry(symbol.clone())
            .or_insert_with(|| ImportEntry {
                source: declaring_module.to_string(),
                imported_name: local_name.clone(),
                local_name: local_name.clone(),
            })
            .local_name
            .clone()
    }

    pub fn lower_file(mut self, file: &CheckedFile) -> IrFile {
        let mut declarations = Vec::new();
        for decl in &file.declarations {
            self.lower_top_level(decl, &mut declarations);
        }
        let mut with_imports: Vec<IrDecl> = self
            .imports
            .into_values()
            .map(|entry| IrDecl::Import {
                source: entry.source,
                imported_name: entry.imported_name,
                local_name: entry.local_name,
            })
            .collect();
        with_imports.extend(declarations);
        IrFile { path: file.path.clone(), declarations: with_imports }
    }

    fn lower_top_level(&mut self, decl: &Decl, out: &mut Vec<IrDecl>) {
        match decl {
            Decl::Constant(c) => {
                let name = c.symbol.name().unwrap_or("_").to_string();
                if let Some(imported_name) = &c.external {
                    self.push_extern_import(&c.symbol, imported_name, out);
                    return;
                }
                let expr = c.expr.as_ref().map(|e| self.lower_expr(e, FunctionPhase::Fun)).unwrap_or(IrExpr::NoOp);
                out.push(IrDecl::Const { name: name.clone(), expr });
                self.push_export_if_public(c.access, &name, out);
            }
            Decl::Function(f) => {
                let name = f.symbol.name().unwrap_or("_").to_string();
                match &f.body {
                    CheckedFunctionBody::Extern(imported_name) => {
                        self.push_extern_import(&f.symbol, imported_name, out);
                    }
                    CheckedFunctionBody::Block(block) => {
                        let params = f.params.iter().map(|p| p.name.clone()).collect();
                        let body = self.lower_block(block, f.function_phase);
                        out.push(IrDecl::Function(IrFunction { name: name.clone(), params, body }));
                        self.push_export_if_public(f.access, &name, out);
                    }
                }
            }
            Decl::Impl(i) => {
                for method in &i.methods {
                    let name = method.symbol.path.join("_");
                    match &method.body {
                        CheckedFunctionBody::Extern(imported_name) => {
                            self.push_extern_import(&method.symbol, imported_name, out);
                        }
                        CheckedFunctionBody::Block(block) => {
                            let params = method.params.iter().map(|p| p.name.clone()).collect();
                            let body = self.lower_block(block, method.function_phase);
                            out.push(IrDecl::Function(IrFunction { name, params, body }));
                        }
                    }
                }
            }
            Decl::Data(d) => out.push(IrDecl::Data(d.layout.clone())),
            Decl::Enum(e) => out.push(IrDecl::Enum(e.enum_ty.clone())),
            // Protocols are a compile-time-only interface; spec.md's reactive
            // IR has no node for a bodyless method-signature bag, so nothing
            // is emitted (see DESIGN.md).
            Decl::Protocol(_) => {}
        }
    }

    fn push_extern_import(&mut self, symbol: &Symbol, declared_name: &str, out: &mut Vec<IrDecl>) {
        let binding = self.external_bindings.get(symbol);
        let (source, imported_name) = match binding {
            Some(b) => (b.source_file.clone(), b.imported_name.clone()),
            None => (String::new(), declared_name.to_string()),
        };
        out.push(IrDecl::Import { source, imported_name, local_name: declared_name.to_string() });
    }

    fn push_export_if_public(&self, access: Access, name: &str, out: &mut Vec<IrDecl>) {
        if access == Access::Public {
            out.push(IrDecl::Export { name: name.to_string() });
        }
    }

    fn lower_block(&mut self, block: &Block, caller_phase: FunctionPhase) -> Vec<IrStmt> {
        block.statements.iter().map(|s| self.lower_stmt(s, caller_phase)).collect()
    }

    fn lower_stmt(&mut self, stmt: &Stmt, caller_phase: FunctionPhase) -> IrStmt {
        match stmt {
            Stmt::ExprStmt(e) => {
                if let CheckedExprKind::Return(inner) = &e.kind {
                    IrStmt::Return(inner.as_ref().map(|b| self.lower_expr(b, caller_phase)))
                } else {
                    IrStmt::ExprStmt(self.lower_expr(e, caller_phase))
                }
            }
            Stmt::Assignment { name, phase, expr, .. } => {
                let lowered = self.lower_expr(expr, caller_phase);
                if *phase == Phase::Var {
                    IrStmt::VarDecl { name: name.clone(), expr: IrExpr::Variable(Box::new(lowered)) }
                } else if *phase == Phase::Flow {
                    IrStmt::VarDecl { name: name.clone(), expr: lowered }
                } else {
                    IrStmt::Let { name: name.clone(), expr: lowered }
                }
            }
            Stmt::Reassignment { target, expr } => IrStmt::Assign {
                target: self.lower_projection_chain(target),
                expr: self.lower_expr(expr, caller_phase),
            },
            Stmt::FunctionStmt(f) => {
                let name = f.symbol.name().unwrap_or("_").to_string();
                let params = f.params.iter().map(|p| p.name.clone()).collect();
                let body = match &f.body {
                    CheckedFunctionBody::Block(block) => self.lower_block(block, f.function_phase),
                    CheckedFunctionBody::Extern(_) => Vec::new(),
                };
                IrStmt::LocalFunction(IrFunction { name, params, body })
            }
        }
    }

    /// Rebuilds a `var` reassignment target (or a `def`-call argument
    /// expected at `var` phase) as a `projection` pipeline: a chain of
    /// `FieldAccess`es rooted at an identifier becomes nested
    /// `Projection{root, getter, setter}` nodes, per §4.6's "arguments to
    /// `var` parameters that are field-access chains are rebuilt as
    /// `projection(root, getter, setter)` pipelines so they remain
    /// writable." A bare identifier is already a signal reference and needs
    /// no rebuilding.
    fn lower_projection_chain(&mut self, target: &CheckedExpr) -> IrExpr {
        match &target.kind {
            CheckedExprKind::FieldAccess { base, field } => {
                let root = self.lower_projection_chain(base);
                let getter = IrExpr::Lambda {
                    params: vec!["v".to_string()],
                    body: Box::new(IrExpr::FieldAccess {
                        base: Box::new(IrExpr::Identifier("v".to_string())),
                        field: field.clone(),
                    }),
                };
                // The setter returns an updated copy of the root value with
                // `field` replaced; there is no in-place field mutation in
                // this value model. `__with_field` is the lowering's own
                // naming for that rebuild, not a builtin the checker knows
                // about (see DESIGN.md).
                let setter = IrExpr::Lambda {
                    params: vec!["v".to_string(), "next".to_string()],
                    body: Box::new(IrExpr::Call {
                        callee: Box::new(IrExpr::Identifier("__with_field".to_string())),
                        args: vec![
                            IrExpr::Identifier("v".to_string()),
                            IrExpr::StringLiteral(field.clone()),
                            IrExpr::Identifier("next".to_string()),
                        ],
                    }),
                };
                IrExpr::Projection { root: Box::new(root), getter: Box::new(getter), setter: Box::new(setter) }
            }
            _ => self.lower_expr(target, FunctionPhase::Sig),
        }
    }

    /// Unwraps a `sig`/`def` call argument by pushing `.get()` through any
    /// field-access chain rather than wrapping the whole chain: per
    /// §4.6, `project(x, "f").get()` becomes `x.get().f`.
    fn unwrap_pushthrough(&mut self, expr: &CheckedExpr, caller_phase: FunctionPhase) -> IrExpr {
        match &expr.kind {
            CheckedExprKind::FieldAccess { base, field } => IrExpr::FieldAccess {
                base: Box::new(self.unwrap_pushthrough(base, caller_phase)),
                field: field.clone(),
            },
            _ => IrExpr::FlowGet(Box::new(self.lower_expr(expr, caller_phase))),
        }
    }

    fn lower_expr(&mut self, expr: &CheckedExpr, caller_phase: FunctionPhase) -> IrExpr {
        match &expr.kind {
            CheckedExprKind::BoolLiteral(b) => IrExpr::BoolLiteral(*b),
            CheckedExprKind::IntLiteral(n) => IrExpr::IntLiteral(*n),
            CheckedExprKind::FloatLiteral(n) => IrExpr::FloatLiteral(*n),
            CheckedExprKind::StringLiteral(s) => IrExpr::StringLiteral(s.clone()),
            CheckedExprKind::NoOp => IrExpr::NoOp,
            CheckedExprKind::Identifier(name) => IrExpr::Identifier(name.clone()),
            CheckedExprKind::StaticReference { symbol, declaring_module } => {
                IrExpr::Identifier(self.import_static(symbol, declaring_module))
            }
            CheckedExprKind::ListLiteral(items) => {
                IrExpr::ListLiteral(self.lower_collection_elements(items, caller_phase))
            }
            CheckedExprKind::SetLiteral(items) => {
                IrExpr::SetLiteral(self.lower_collection_elements(items, caller_phase))
            }
            CheckedExprKind::MapLiteral(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(k, v)| (self.lower_collection_element(k, caller_phase), self.lower_collection_element(v, caller_phase)))
                    .collect();
                IrExpr::MapLiteral(pairs)
            }
            CheckedExprKind::Is { expr: inner, ty } => IrExpr::TypeTest {
                expr: Box::new(self.lower_expr(inner, caller_phase)),
                ty: ty.head_symbol().cloned().unwrap_or_else(|| self.module.child("Any")),
            },
            CheckedExprKind::Not(e) => IrExpr::Not(Box::new(self.lower_expr(e, caller_phase))),
            CheckedExprKind::And(a, b) => {
                IrExpr::And(Box::new(self.lower_expr(a, caller_phase)), Box::new(self.lower_expr(b, caller_phase)))
            }
            CheckedExprKind::Or(a, b) => {
                IrExpr::Or(Box::new(self.lower_expr(a, caller_phase)), Box::new(self.lower_expr(b, caller_phase)))
            }
            CheckedExprKind::FieldAccess { base, field } => {
                IrExpr::FieldAccess { base: Box::new(self.lower_expr(base, caller_phase)), field: field.clone() }
            }
            CheckedExprKind::Construct { base, fields } => IrExpr::Construct {
                base: base.head_symbol().cloned().unwrap_or_else(|| self.module.child("_")),
                fields: fields.iter().map(|(name, e)| (name.clone(), self.lower_expr(e, caller_phase))).collect(),
            },
            CheckedExprKind::Call { callee, args } => self.lower_call(callee, args, caller_phase),
            CheckedExprKind::Lambda { params, body } => IrExpr::Lambda {
                params: params.iter().map(|p| p.name.clone()).collect(),
                body: Box::new(self.lower_expr(body, caller_phase)),
            },
            CheckedExprKind::Block(block) => self.lower_expr_block(block, caller_phase),
            CheckedExprKind::If { condition, then_branch, else_branch } => {
                self.lower_if_expr(condition, then_branch, else_branch.as_deref(), caller_phase)
            }
            CheckedExprKind::Return(inner) => IrExpr::Block {
                statements: vec![IrStmt::Return(inner.as_ref().map(|e| self.lower_expr(e, caller_phase)))],
                result: Box::new(IrExpr::NoOp),
            },
        }
    }

    fn lower_collection_elements(&mut self, items: &[CheckedExpr], caller_phase: FunctionPhase) -> Vec<IrExpr> {
        items.iter().map(|e| self.lower_collection_element(e, caller_phase)).collect()
    }

    /// Collection literal elements follow the same wrap/unwrap table as a
    /// call argument against an unspecified (`val`-like) expected phase —
    /// §4.6's "collection literals follow the same rules uniformly for
    /// each element." Elements needing a `def`-phase lift are lifted
    /// individually rather than batched through one shared combinator,
    /// which keeps each element independently re-derivable; see DESIGN.md.
    fn lower_collection_element(&mut self, e: &CheckedExpr, caller_phase: FunctionPhase) -> IrExpr {
        match caller_phase {
            FunctionPhase::Fun => self.lower_expr(e, caller_phase),
            FunctionPhase::Sig => match wrap::sig_action(e.phase, None) {
                SigAction::Unwrap => self.unwrap_pushthrough(e, caller_phase),
                SigAction::WrapSingleton => IrExpr::Singleton(Box::new(self.lower_expr(e, caller_phase))),
                SigAction::Plain => self.lower_expr(e, caller_phase),
            },
            FunctionPhase::Def => match wrap::def_action(e.phase, None) {
                DefAction::Lift => {
                    let id = self.fresh("_");
                    let source = self.lower_expr(e, caller_phase);
                    IrExpr::Flow { sources: vec![source], params: vec![id.clone()], body: Box::new(IrExpr::Identifier(id)) }
                }
                DefAction::WrapSingleton => IrExpr::Singleton(Box::new(self.lower_expr(e, caller_phase))),
                DefAction::RebuildProjection => self.lower_projection_chain(e),
                DefAction::Plain => self.lower_expr(e, caller_phase),
            },
        }
    }

    fn callee_function_type<'t>(callee: &'t CheckedExpr, arg_count: usize) -> Option<&'t FunctionType> {
        match &callee.ty {
            Type::Function(ft) => Some(ft),
            Type::Overload(branches) => branches.iter().find(|b| b.params.len() == arg_count),
            _ => None,
        }
    }

    fn lower_call(&mut self, callee: &CheckedExpr, args: &[CheckedExpr], caller_phase: FunctionPhase) -> IrExpr {
        let fn_ty = Self::callee_function_type(callee, args.len()).cloned();
        let lowered_callee = self.lower_expr(callee, caller_phase);
        let expected_phase_of = |i: usize| fn_ty.as_ref().and_then(|ft| ft.params.get(i)).and_then(|p| p.phase);

        match caller_phase {
            FunctionPhase::Fun => {
                let lowered_args = args.iter().map(|a| self.lower_expr(a, caller_phase)).collect();
                IrExpr::Call { callee: Box::new(lowered_callee), args: lowered_args }
            }
            FunctionPhase::Sig => {
                let lowered_args = args
                    .iter()
                    .enumerate()
                    .map(|(i, a)| match wrap::sig_action(a.phase, expected_phase_of(i)) {
                        SigAction::Unwrap => self.unwrap_pushthrough(a, caller_phase),
                        SigAction::WrapSingleton => IrExpr::Singleton(Box::new(self.lower_expr(a, caller_phase))),
                        SigAction::Plain => self.lower_expr(a, caller_phase),
                    })
                    .collect();
                IrExpr::Call { callee: Box::new(lowered_callee), args: lowered_args }
            }
            FunctionPhase::Def => self.lower_def_call(&lowered_callee, &fn_ty, args, &expected_phase_of, caller_phase),
        }
    }

    fn lower_def_call(
        &mut self,
        lowered_callee: &IrExpr,
        fn_ty: &Option<FunctionType>,
        args: &[CheckedExpr],
        expected_phase_of: &dyn Fn(usize) -> Option<Phase>,
        caller_phase: FunctionPhase,
    ) -> IrExpr {
        let mut sources = Vec::new();
        let mut params = Vec::new();
        let mut built_args = Vec::with_capacity(args.len());

        for (i, arg) in args.iter().enumerate() {
            let action = wrap::def_action(arg.phase, expected_phase_of(i));
            let built = match action {
                DefAction::Lift => {
                    let id = self.fresh("_");
                    sources.push(self.lower_expr(arg, caller_phase));
                    params.push(id.clone());
                    IrExpr::Identifier(id)
                }
                DefAction::WrapSingleton => IrExpr::Singleton(Box::new(self.lower_expr(arg, caller_phase))),
                DefAction::RebuildProjection => self.lower_projection_chain(arg),
                DefAction::Plain => self.lower_expr(arg, caller_phase),
            };
            built_args.push(built);
        }

        let body = IrExpr::Call { callee: Box::new(lowered_callee.clone()), args: built_args };
        if sources.is_empty() {
            return body;
        }
        let callee_phase = fn_ty.as_ref().map(|ft| ft.phase).unwrap_or(FunctionPhase::Fun);
        if wrap::lift_combinator_is_def(callee_phase) {
            IrExpr::Def { sources, params, body: Box::new(body) }
        } else {
            IrExpr::Flow { sources, params, body: Box::new(body) }
        }
    }

    fn lower_expr_block(&mut self, block: &Block, caller_phase: FunctionPhase) -> IrExpr {
        let mut lowered: Vec<IrStmt> = Vec::with_capacity(block.statements.len());
        let mut result = IrExpr::NoOp;
        for (i, stmt) in block.statements.iter().enumerate() {
            let is_last = i == block.statements.len() - 1;
            if is_last {
                if let Stmt::ExprStmt(e) = stmt {
                    result = self.lower_expr(e, caller_phase);
                    continue;
                }
            }
            lowered.push(self.lower_stmt(stmt, caller_phase));
        }
        IrExpr::Block { statements: lowered, result: Box::new(result) }
    }

    fn lower_if_expr(
        &mut self,
        condition: &CheckedExpr,
        then_branch: &CheckedExpr,
        else_branch: Option<&CheckedExpr>,
        caller_phase: FunctionPhase,
    ) -> IrExpr {
        let temp = self.fresh("_if");
        let condition = self.lower_expr(condition, caller_phase);
        let then_value = self.lower_expr(then_branch, caller_phase);
        let then_block = vec![IrStmt::Assign { target: IrExpr::Identifier(temp.clone()), expr: then_value }];
        let else_value = else_branch.map(|e| self.lower_expr(e, caller_phase)).unwrap_or(IrExpr::NoOp);
        let else_block = vec![IrStmt::Assign { target: IrExpr::Identifier(temp.clone()), expr: else_value }];
        IrExpr::Block {
            statements: vec![
                IrStmt::Let { name: temp.clone(), expr: IrExpr::NoOp },
                IrStmt::If { condition, then_block, else_block: Some(else_block) },
            ],
            result: Box::new(IrExpr::Identifier(temp)),
        }
    }
}
