//! The bidirectional type & phase checker (spec.md §4.4): the hardest and
//! largest component of the pipeline. `Checker` holds read-only references
//! to the frozen global tables and drives the whole file → declaration →
//! statement → expression descent; `expr.rs`, `stmt.rs`, and `calls.rs`
//! hold the rest of its `impl` blocks, split by concern rather than one
//! large file.

use phasec_ast::{DataDecl, EnumDecl, FunctionBody as ParsedFunctionBody, FunctionDecl as ParsedFunctionDecl, ImplDecl, ParsedFile, ProtocolDecl, TopLevelDecl};
use phasec_binder::{DependencyManager, MethodTable, Qualifier, ProtocolImplTable, SymbolEntry, SymbolTable};
use phasec_checked::{CheckedFile, CheckedParam, ConstantDecl, DataDecl as CheckedDataDecl, Decl, EnumDecl as CheckedEnumDecl, FunctionBody, FunctionDecl, ImplDecl as CheckedImplDecl, ProtocolDecl as CheckedProtocolDecl};
use phasec_common::{CheckerOptions, Diagnostic, ErrorCode, Symbol};
use phasec_types::{DeclarationLookup, FunctionPhase, Phase, Type, is_assignable};

use crate::phase_rules;
use crate::scope::Scope;

/// Read-only view over the frozen tables the checker and lowerer both
/// consult — never mutated once `check_file` starts.
pub struct Checker<'a> {
    pub symbol_table: &'a SymbolTable,
    pub method_table: &'a MethodTable,
    pub protocol_impl_table: &'a ProtocolImplTable,
    pub options: &'a CheckerOptions,
}

impl<'a> Checker<'a> {
    #[must_use]
    pub fn new(
        symbol_table: &'a SymbolTable,
        method_table: &'a MethodTable,
        protocol_impl_table: &'a ProtocolImplTable,
        options: &'a CheckerOptions,
    ) -> Self {
        Self { symbol_table, method_table, protocol_impl_table, options }
    }

    #[must_use]
    pub fn lookup(&self) -> &dyn DeclarationLookup {
        self.symbol_table
    }

    /// The root symbol of the language preamble's core package (`lang::core`),
    /// under which every scalar and collection type lives (see
    /// `phasec_binder::preamble`).
    pub(crate) fn preamble_root(&self) -> Symbol {
        Symbol::root(phasec_binder::preamble::core_package())
    }

    pub(crate) fn preamble_symbol(&self, name: &str) -> Symbol {
        self.preamble_root().child(name)
    }

    pub(crate) fn preamble_type(&self, name: &str) -> Type {
        Type::Nominal(self.preamble_symbol(name))
    }

    pub(crate) fn preamble_bool(&self) -> Type {
        self.preamble_type("Bool")
    }

    pub(crate) fn preamble_int(&self) -> Type {
        self.preamble_type("Int")
    }

    pub(crate) fn preamble_float(&self) -> Type {
        self.preamble_type("Float")
    }

    pub(crate) fn preamble_string(&self) -> Type {
        self.preamble_type("String")
    }

    pub(crate) fn preamble_unit(&self) -> Type {
        self.preamble_type("Unit")
    }

    /// `List`/`Set`/`Map`'s own symbol, for building a `Parameterized` type
    /// around a collection literal's inferred element type(s).
    pub(crate) fn collection_symbol(&self, name: &str) -> Symbol {
        self.preamble_symbol(name)
    }

    /// Checks one file's every top-level declaration, given the qualifier
    /// the binder built for it (spec.md §4.1/§4.2 already ran; this is
    /// purely read access against the frozen tables from here on).
    pub fn check_file(
        &self,
        file: &ParsedFile,
        module: &Symbol,
        qualifier: Qualifier,
        dependency_manager: &DependencyManager,
    ) -> Result<CheckedFile, Diagnostic> {
        let _span = tracing::info_span!("check", file = %file.path).entered();
        let mut scope = Scope::new(qualifier, module.clone());
        self.seed_protocols_in_scope(&mut scope, file, module, dependency_manager);

        let mut declarations = Vec::with_capacity(file.declarations.len());
        for decl in &file.declarations {
            declarations.push(self.check_top_level(&mut scope, module, decl)?);
        }
        Ok(CheckedFile { path: file.path.clone(), declarations })
    }

    /// Every protocol the file can see, for §4.4.6's method-resolution
    /// fallback: protocols declared locally, plus any a visible import
    /// brings in.
    fn seed_protocols_in_scope(&self, scope: &mut Scope, file: &ParsedFile, module: &Symbol, dependency_manager: &DependencyManager) {
        for decl in &file.declarations {
            if let TopLevelDecl::Protocol(p) = decl {
                scope.add_protocol_in_scope(module.child(p.name.as_str()));
            }
        }
        for import in &file.imports {
            let Some(leaves) = dependency_manager.breakdown_import(import) else { continue };
            for leaf in leaves {
                if matches!(self.symbol_table.get(&leaf), Some(SymbolEntry { ty: Type::Protocol(_), .. })) {
                    scope.add_protocol_in_scope(leaf);
                }
            }
        }
    }

    fn check_top_level(&self, scope: &mut Scope, module: &Symbol, decl: &TopLevelDecl) -> Result<Decl, Diagnostic> {
        match decl {
            TopLevelDecl::Constant(c) => self.check_constant(scope, module, c),
            TopLevelDecl::Function(f) => {
                let symbol = module.child(f.name.as_str());
                Ok(Decl::Function(self.check_function(scope, module, &symbol, f)?))
            }
            TopLevelDecl::Data(d) => self.check_data(module, d),
            TopLevelDecl::Enum(e) => self.check_enum(module, e),
            TopLevelDecl::Impl(i) => self.check_impl(scope, module, i),
            TopLevelDecl::Protocol(p) => self.check_protocol(module, p),
        }
    }

    fn check_constant(&self, scope: &mut Scope, module: &Symbol, c: &phasec_ast::ConstantDecl) -> Result<Decl, Diagnostic> {
        let symbol = module.child(c.name.as_str());
        let entry = self.symbol_table.get(&symbol).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("internal: constant `{symbol}` missing from symbol table"), c.position.clone())
        })?;
        let ty = entry.ty.clone();
        let expr = match &c.expr {
            Some(expr) => {
                let checked = self.check_expr(scope, expr, Some(&ty))?;
                phase_rules::check_assignment_phase(Phase::Const, checked.phase, &c.position)?;
                Some(checked)
            }
            None => None,
        };
        Ok(Decl::Constant(ConstantDecl {
            position: c.position.clone(),
            access: c.access,
            symbol,
            ty,
            expr,
            external: c.external.clone(),
        }))
    }

    fn check_data(&self, module: &Symbol, d: &DataDecl) -> Result<Decl, Diagnostic> {
        let symbol = module.child(d.name.as_str());
        let entry = self.symbol_table.get(&symbol).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("internal: data type `{symbol}` missing from symbol table"), d.position.clone())
        })?;
        let Type::DataLayout(layout) = entry.ty.clone() else {
            return Err(Diagnostic::new(ErrorCode::NotConstructable, format!("`{symbol}` is not a data layout"), d.position.clone()));
        };
        Ok(Decl::Data(CheckedDataDecl { position: d.position.clone(), access: d.access, layout: *layout }))
    }

    fn check_enum(&self, module: &Symbol, e: &EnumDecl) -> Result<Decl, Diagnostic> {
        let symbol = module.child(e.name.as_str());
        let entry = self.symbol_table.get(&symbol).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("internal: enum `{symbol}` missing from symbol table"), e.position.clone())
        })?;
        let Type::Enum(enum_ty) = entry.ty.clone() else {
            return Err(Diagnostic::new(ErrorCode::NotConstructable, format!("`{symbol}` is not an enum"), e.position.clone()));
        };
        Ok(Decl::Enum(CheckedEnumDecl { position: e.position.clone(), access: e.access, enum_ty: *enum_ty }))
    }

    fn check_protocol(&self, module: &Symbol, p: &ProtocolDecl) -> Result<Decl, Diagnostic> {
        let symbol = module.child(p.name.as_str());
        let entry = self.symbol_table.get(&symbol).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("internal: protocol `{symbol}` missing from symbol table"), p.position.clone())
        })?;
        let Type::Protocol(protocol) = entry.ty.clone() else {
            return Err(Diagnostic::new(ErrorCode::NotConstructable, format!("`{symbol}` is not a protocol"), p.position.clone()));
        };
        Ok(Decl::Protocol(CheckedProtocolDecl { position: p.position.clone(), access: p.access, protocol: *protocol }))
    }

    fn check_impl(&self, scope: &mut Scope, module: &Symbol, i: &ImplDecl) -> Result<Decl, Diagnostic> {
        let base_symbol = self.resolve_base_symbol(scope, module, i)?;
        let base_ty = self
            .symbol_table
            .get(&base_symbol)
            .map(|e| e.ty.clone())
            .unwrap_or_else(|| Type::Nominal(base_symbol.clone()));
        let impl_name = i.name.clone().unwrap_or_else(|| format!("{base_symbol}$impl"));
        let impl_symbol = module.child(impl_name.as_str());
        let protocol_symbol = i
            .protocol
            .as_ref()
            .and_then(|_| self.protocol_impl_table.protocols_for(&base_symbol).next())
            .map(|(protocol, _)| protocol.clone());

        scope.push_self(&base_symbol);
        let mut methods = Vec::with_capacity(i.methods.len());
        for method in &i.methods {
            let method_symbol = impl_symbol.child(method.name.as_str());
            methods.push(self.check_function(scope, module, &method_symbol, method)?);
        }
        scope.pop_self();

        Ok(Decl::Impl(CheckedImplDecl {
            position: i.position.clone(),
            symbol: impl_symbol,
            type_params: i.type_params.iter().map(|n| base_symbol.child(n.as_str())).collect(),
            base: base_ty,
            protocol: protocol_symbol,
            methods,
        }))
    }

    fn resolve_base_symbol(&self, scope: &Scope, module: &Symbol, i: &ImplDecl) -> Result<Symbol, Diagnostic> {
        let base_ty = phasec_binder::qualify_type(scope.qualifier(), module, &i.type_params, &i.base, &i.position)?;
        base_ty.head_symbol().cloned().ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnresolvedType, "an impl's base must be a nominal data type", i.position.clone())
        })
    }

    /// Checks one function body (top-level or an impl method), per
    /// §4.4.5/§4.4.9: pushes a fresh function scope, binds parameters
    /// (enforcing parameter-phase well-formedness), checks the body, and
    /// verifies the declared phase is at least as capable as the body
    /// requires.
    pub(crate) fn check_function(
        &self,
        scope: &mut Scope,
        module: &Symbol,
        symbol: &Symbol,
        f: &ParsedFunctionDecl,
    ) -> Result<FunctionDecl, Diagnostic> {
        let entry = self.symbol_table.get(symbol).ok_or_else(|| {
            Diagnostic::new(ErrorCode::UnknownName, format!("internal: function `{symbol}` missing from symbol table"), f.position.clone())
        })?;
        let Type::Function(fn_ty) = entry.ty.clone() else {
            return Err(Diagnostic::new(ErrorCode::NotCallable, format!("`{symbol}` is not a function"), f.position.clone()));
        };

        for (param, declared) in f.params.iter().zip(fn_ty.params.iter()) {
            phase_rules::check_parameter_phase(f.function_phase, declared.phase, &param.name, &f.position)?;
        }

        let type_param_names: Vec<String> = f.type_params.clone();
        let body = match &f.body {
            ParsedFunctionBody::Extern(name) => FunctionBody::Extern(name.clone()),
            ParsedFunctionBody::Block(block) => {
                scope.push_function(symbol.clone(), module.clone(), type_param_names, Type::Nothing, f.function_phase);
                for (param, declared) in f.params.iter().zip(fn_ty.params.iter()) {
                    scope.set(param.name.as_str(), declared.ty.clone(), declared.phase.unwrap_or(Phase::Val), f.position.clone());
                }
                let checked_block = self.check_block(scope, block, Some(fn_ty.result.as_ref()))?;
                let function_scope = scope.pop_function();

                let merged_result = phasec_types::merge(fn_ty.result.as_ref(), &function_scope.result_type, self.lookup())
                    .map_err(|e| Diagnostic::new(ErrorCode::MergeMismatch, e.to_string(), f.position.clone()))?;
                let trailing_ty = checked_block_type(&checked_block);
                if !is_assignable(&trailing_ty, Some(&merged_result), self.lookup()) {
                    return Err(Diagnostic::new(
                        ErrorCode::TypeMismatch,
                        format!("function `{symbol}` declares result type {:?} but its body's trailing expression has type {:?}", fn_ty.result, trailing_ty),
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
            access: f.access,
            symbol: symbol.clone(),
            function_phase: f.function_phase,
            type_params: fn_ty.type_params.clone(),
            params: f
                .params
                .iter()
                .zip(fn_ty.params.iter())
                .map(|(p, declared)| CheckedParam { name: p.name.clone(), ty: declared.ty.clone(), phase: declared.phase })
                .collect(),
            result: fn_ty.result.as_ref().clone(),
            body,
        })
    }
}

pub(crate) fn checked_block_type(block: &phasec_checked::Block) -> Type {
    match block.statements.last() {
        Some(phasec_checked::Stmt::ExprStmt(e)) => e.ty.clone(),
        _ => Type::Nothing,
    }
}

pub(crate) fn resolve_field_access_method(
    method_table: &MethodTable,
    protocol_impl_table: &ProtocolImplTable,
    protocols_in_scope: &rustc_hash::FxHashSet<Symbol>,
    base: &Symbol,
    method_name: &str,
    from_module: &Symbol,
) -> Option<phasec_binder::MethodEntry> {
    let entry = method_table.lookup(base, method_name)?;
    let declared_visible = crate::import_verifier::is_visible(entry.access, &entry.declaring_module, from_module);
    let protocol_visible = protocol_impl_table.protocols_for(base).any(|(protocol, _)| protocols_in_scope.contains(protocol));
    if declared_visible || protocol_visible {
        Some(entry.clone())
    } else {
        None
    }
}
