//! The declaration collector (spec.md §4.2): traverses every file of every
//! package in dependency order, computes each non-import declaration's
//! checked type via the qualifier, and records it in the global symbol
//! table, method table, protocol-impl table, and external bindings.

use indexmap::IndexMap;
use phasec_ast::{DataDecl, EnumDecl, FunctionBody, FunctionDecl, ImplDecl, ParsedFile, ParsedLayout, ProtocolDecl, TopLevelDecl};
use phasec_common::{Access, Diagnostic, ErrorCode, Position, Symbol};
use phasec_types::{DataLayout, EnumType, FunctionPhase, FunctionType, Param, ProtocolType, Type};
use rustc_hash::FxHashSet;

use crate::dependency_manager::DependencyManager;
use crate::external_bindings::{ExternalBinding, ExternalBindings, ExternalBindingsBuilder};
use crate::method_table::{MethodEntry, MethodTable, MethodTableBuilder};
use crate::preamble;
use crate::protocol_impl_table::{ProtocolImplTable, ProtocolImplTableBuilder};
use crate::qualifier::{qualify_type, Qualifier};
use crate::symbol_table::{SymbolEntry, SymbolTable, SymbolTableBuilder};

/// The four frozen global tables spec.md §3.6 and §4.2 describe,
/// produced once per compilation.
pub struct CollectedTables {
    pub symbol_table: SymbolTable,
    pub method_table: MethodTable,
    pub protocol_impl_table: ProtocolImplTable,
    pub external_bindings: ExternalBindings,
}

/// The mutable builder phase: one instance collects every file of every
/// package before anything is frozen.
pub struct DeclarationCollector {
    symbol_table: SymbolTableBuilder,
    method_table: MethodTableBuilder,
    protocol_impl_table: ProtocolImplTableBuilder,
    external_bindings: ExternalBindingsBuilder,
    /// Enforces spec.md §4.2(c): at most one impl per base symbol.
    impl_bases_seen: FxHashSet<Symbol>,
}

impl DeclarationCollector {
    #[must_use]
    pub fn new() -> Self {
        let mut collector = Self {
            symbol_table: SymbolTableBuilder::new(),
            method_table: MethodTableBuilder::new(),
            protocol_impl_table: ProtocolImplTableBuilder::new(),
            external_bindings: ExternalBindingsBuilder::new(),
            impl_bases_seen: FxHashSet::default(),
        };
        collector.seed_preamble();
        collector
    }

    fn seed_preamble(&mut self) {
        let core_module = Symbol::root(preamble::core_package());
        for entry in preamble::type_entries() {
            self.symbol_table.insert(
                entry.symbol.clone(),
                SymbolEntry {
                    access: Access::Public,
                    declaring_module: core_module.clone(),
                    ty: entry.ty,
                },
            );
        }
        for entry in preamble::operator_entries() {
            self.symbol_table.insert(
                entry.symbol.clone(),
                SymbolEntry {
                    access: Access::Public,
                    declaring_module: core_module.clone(),
                    ty: entry.ty,
                },
            );
        }
        let (map_method_sym, map_method_ty) = preamble::list_map_method();
        self.method_table.insert(
            core_module.child("List"),
            "map",
            MethodEntry {
                access: Access::Public,
                symbol: map_method_sym,
                declaring_module: core_module.clone(),
                ty: map_method_ty,
            },
        );
        let option = preamble::option_enum();
        for (variant_name, layout) in &option.variants {
            self.symbol_table.insert(
                option.name.child(variant_name.as_str()),
                SymbolEntry {
                    access: Access::Public,
                    declaring_module: core_module.clone(),
                    ty: Type::DataLayout(Box::new(layout.clone())),
                },
            );
        }
        self.symbol_table.insert(
            option.name.clone(),
            SymbolEntry {
                access: Access::Public,
                declaring_module: core_module,
                ty: Type::Enum(Box::new(option)),
            },
        );
    }

    /// Builds the qualifier for one file (seeded with the preamble, the
    /// file's own top-level declarations, and its imports) and collects
    /// every declaration into the global tables. `module` is the symbol this
    /// file's declarations hang off — `module.child(name)` for each.
    pub fn collect_file(
        &mut self,
        file: &ParsedFile,
        module: &Symbol,
        dependency_manager: &DependencyManager,
    ) -> Result<Qualifier, Diagnostic> {
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        for decl in &file.declarations {
            qualifier.add_declaration(module, decl);
        }
        for import in &file.imports {
            qualifier.add_import(dependency_manager, import);
        }
        for decl in &file.declarations {
            self.collect_declaration(&qualifier, module, &file.path, decl)?;
        }
        Ok(qualifier)
    }

    fn collect_declaration(
        &mut self,
        qualifier: &Qualifier,
        module: &Symbol,
        source_file: &str,
        decl: &TopLevelDecl,
    ) -> Result<(), Diagnostic> {
        match decl {
            TopLevelDecl::Constant(c) => {
                let symbol = module.child(c.name.as_str());
                let ty = match &c.ty {
                    Some(ty_expr) => qualify_type(qualifier, &symbol, &[], ty_expr, &c.position)?,
                    None => {
                        let expr = c.expr.as_ref().ok_or_else(|| {
                            Diagnostic::new(
                                ErrorCode::UnresolvedType,
                                format!("constant `{}` needs either a type annotation or an initializer", c.name),
                                c.position.clone(),
                            )
                        })?;
                        infer_literal_type(expr, &c.position)?
                    }
                };
                self.symbol_table.insert(
                    symbol.clone(),
                    SymbolEntry { access: c.access, declaring_module: module.clone(), ty },
                );
                if let Some(imported_name) = &c.external {
                    self.external_bindings.insert(
                        symbol,
                        ExternalBinding { source_file: source_file.to_string(), imported_name: imported_name.clone() },
                    );
                }
                Ok(())
            }
            TopLevelDecl::Function(f) => {
                let symbol = module.child(f.name.as_str());
                self.collect_function(qualifier, module, source_file, &symbol, f)
            }
            TopLevelDecl::Data(d) => self.collect_data(qualifier, module, d),
            TopLevelDecl::Enum(e) => self.collect_enum(qualifier, module, e),
            TopLevelDecl::Impl(i) => self.collect_impl(qualifier, module, source_file, i),
            TopLevelDecl::Protocol(p) => self.collect_protocol(qualifier, module, p),
        }
    }

    fn collect_function(
        &mut self,
        qualifier: &Qualifier,
        module: &Symbol,
        source_file: &str,
        symbol: &Symbol,
        f: &FunctionDecl,
    ) -> Result<(), Diagnostic> {
        register_generics(&mut self.symbol_table, symbol, module, &f.type_params);
        let params = f
            .params
            .iter()
            .map(|p| {
                Ok(Param {
                    name: p.name.clone(),
                    ty: qualify_type(qualifier, symbol, &f.type_params, &p.ty, &f.position)?,
                    phase: p.phase,
                })
            })
            .collect::<Result<Vec<_>, Diagnostic>>()?;
        let result = match &f.result {
            Some(ty_expr) => qualify_type(qualifier, symbol, &f.type_params, ty_expr, &f.position)?,
            None => Type::Nominal(Symbol::root(preamble::core_package()).child("Unit")),
        };
        let ty = FunctionType {
            phase: f.function_phase,
            type_params: f.type_params.iter().map(|n| symbol.child(n.as_str())).collect(),
            params,
            result: Box::new(result),
        };
        self.symbol_table.insert(
            symbol.clone(),
            SymbolEntry { access: f.access, declaring_module: module.clone(), ty: Type::Function(ty) },
        );
        if let FunctionBody::Extern(imported_name) = &f.body {
            self.external_bindings.insert(
                symbol.clone(),
                ExternalBinding { source_file: source_file.to_string(), imported_name: imported_name.clone() },
            );
        }
        Ok(())
    }

    fn collect_data(&mut self, qualifier: &Qualifier, module: &Symbol, d: &DataDecl) -> Result<(), Diagnostic> {
        let symbol = module.child(d.name.as_str());
        register_generics(&mut self.symbol_table, &symbol, module, &d.type_params);
        let enum_tag = d.enum_tag.as_ref().map(|tag| module.child(tag.as_str()));
        let layout = qualify_layout(qualifier, &symbol, &d.type_params, &d.layout, enum_tag, &d.position)?;
        self.symbol_table.insert(
            symbol,
            SymbolEntry { access: d.access, declaring_module: module.clone(), ty: Type::DataLayout(Box::new(layout)) },
        );
        Ok(())
    }

    fn collect_enum(&mut self, qualifier: &Qualifier, module: &Symbol, e: &EnumDecl) -> Result<(), Diagnostic> {
        let symbol = module.child(e.name.as_str());
        register_generics(&mut self.symbol_table, &symbol, module, &e.type_params);
        let mut variants = IndexMap::new();
        for (variant_name, parsed_layout) in &e.variants {
            let variant_symbol = symbol.child(variant_name.as_str());
            let layout = qualify_layout(
                qualifier,
                &variant_symbol,
                &e.type_params,
                parsed_layout,
                Some(symbol.clone()),
                &e.position,
            )?;
            self.symbol_table.insert(
                variant_symbol,
                SymbolEntry {
                    access: e.access,
                    declaring_module: module.clone(),
                    ty: Type::DataLayout(Box::new(layout.clone())),
                },
            );
            variants.insert(variant_name.clone(), layout);
        }
        let enum_ty = EnumType {
            name: symbol.clone(),
            type_params: e.type_params.iter().map(|n| symbol.child(n.as_str())).collect(),
            variants,
        };
        self.symbol_table.insert(
            symbol,
            SymbolEntry { access: e.access, declaring_module: module.clone(), ty: Type::Enum(Box::new(enum_ty)) },
        );
        Ok(())
    }

    fn collect_impl(
        &mut self,
        qualifier: &Qualifier,
        module: &Symbol,
        source_file: &str,
        i: &ImplDecl,
    ) -> Result<(), Diagnostic> {
        let base_ty = qualify_type(qualifier, module, &i.type_params, &i.base, &i.position)?;
        let base_head = base_ty.head_symbol().cloned().ok_or_else(|| {
            Diagnostic::new(
                ErrorCode::UnresolvedType,
                "an impl's base must be a nominal data type",
                i.position.clone(),
            )
        })?;
        if !self.impl_bases_seen.insert(base_head.clone()) {
            return Err(Diagnostic::new(
                ErrorCode::DuplicateImpl,
                format!("multiple impls declared for `{base_head}`"),
                i.position.clone(),
            ));
        }
        if base_head.is_root() || &base_head.parent() != module {
            return Err(Diagnostic::new(
                ErrorCode::ImplOutsideModule,
                format!("impl for `{base_head}` must live in the same module as its base type"),
                i.position.clone(),
            ));
        }
        let impl_name = i.name.clone().unwrap_or_else(|| format!("{base_head}$impl"));
        let impl_symbol = module.child(impl_name.as_str());
        register_generics(&mut self.symbol_table, &impl_symbol, module, &i.type_params);

        if let Some(protocol_expr) = &i.protocol {
            let protocol_ty = qualify_type(qualifier, &impl_symbol, &i.type_params, protocol_expr, &i.position)?;
            let protocol_symbol = protocol_ty.head_symbol().cloned().ok_or_else(|| {
                Diagnostic::new(
                    ErrorCode::UnresolvedType,
                    "a protocol reference must be a nominal type",
                    i.position.clone(),
                )
            })?;
            self.protocol_impl_table.insert(base_head.clone(), protocol_symbol, impl_symbol.clone());
        }

        for method in &i.methods {
            let method_symbol = impl_symbol.child(method.name.as_str());
            self.collect_function(qualifier, module, source_file, &method_symbol, method)?;
            let is_instance_method = method.params.first().is_some_and(|p| p.name == "self");
            if is_instance_method {
                let Some(SymbolEntry { ty: Type::Function(fn_ty), access, .. }) =
                    self.symbol_table.get(&method_symbol).cloned()
                else {
                    unreachable!("collect_function always inserts a Function-typed entry");
                };
                self.method_table.insert(
                    base_head.clone(),
                    method.name.clone(),
                    MethodEntry {
                        access,
                        symbol: method_symbol,
                        declaring_module: module.clone(),
                        ty: fn_ty,
                    },
                );
            }
        }
        Ok(())
    }

    fn collect_protocol(&mut self, qualifier: &Qualifier, module: &Symbol, p: &ProtocolDecl) -> Result<(), Diagnostic> {
        let symbol = module.child(p.name.as_str());
        register_generics(&mut self.symbol_table, &symbol, module, &p.type_params);
        let mut methods = IndexMap::new();
        for method in &p.methods {
            let params = method
                .params
                .iter()
                .map(|param| {
                    Ok(Param {
                        name: param.name.clone(),
                        ty: qualify_type(qualifier, &symbol, &p.type_params, &param.ty, &method.position)?,
                        phase: param.phase,
                    })
                })
                .collect::<Result<Vec<_>, Diagnostic>>()?;
            let result = match &method.result {
                Some(ty_expr) => qualify_type(qualifier, &symbol, &p.type_params, ty_expr, &method.position)?,
                None => Type::Nominal(Symbol::root(preamble::core_package()).child("Unit")),
            };
            methods.insert(
                method.name.clone(),
                FunctionType {
                    phase: method.function_phase,
                    type_params: method.type_params.iter().map(|n| symbol.child(n.as_str())).collect(),
                    params,
                    result: Box::new(result),
                },
            );
        }
        let protocol_ty = ProtocolType { name: symbol.clone(), type_params: p.type_params.iter().map(|n| symbol.child(n.as_str())).collect(), methods };
        self.symbol_table.insert(
            symbol,
            SymbolEntry { access: p.access, declaring_module: module.clone(), ty: Type::Protocol(Box::new(protocol_ty)) },
        );
        Ok(())
    }

    #[must_use]
    pub fn freeze(self) -> CollectedTables {
        CollectedTables {
            symbol_table: self.symbol_table.freeze(),
            method_table: self.method_table.freeze(),
            protocol_impl_table: self.protocol_impl_table.freeze(),
            external_bindings: self.external_bindings.freeze(),
        }
    }
}

impl Default for DeclarationCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn register_generics(symbol_table: &mut SymbolTableBuilder, owner: &Symbol, module: &Symbol, names: &[String]) {
    for name in names {
        let sym = owner.child(name.as_str());
        symbol_table.insert(
            sym.clone(),
            SymbolEntry { access: Access::Public, declaring_module: module.clone(), ty: Type::TypeParameter(sym) },
        );
    }
}

fn qualify_layout(
    qualifier: &Qualifier,
    name_symbol: &Symbol,
    type_param_names: &[String],
    layout: &ParsedLayout,
    enum_tag: Option<Symbol>,
    position: &Position,
) -> Result<DataLayout, Diagnostic> {
    let type_params: Vec<Symbol> = type_param_names.iter().map(|n| name_symbol.child(n.as_str())).collect();
    match layout {
        ParsedLayout::Struct { fields } => {
            let mut out = IndexMap::new();
            for (field_name, field_ty) in fields {
                out.insert(field_name.clone(), qualify_type(qualifier, name_symbol, type_param_names, field_ty, position)?);
            }
            Ok(DataLayout::Struct { name: name_symbol.clone(), type_params, fields: out, enum_tag })
        }
        ParsedLayout::Tuple { fields } => {
            let out = fields
                .iter()
                .map(|f| qualify_type(qualifier, name_symbol, type_param_names, f, position))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DataLayout::Tuple { name: name_symbol.clone(), type_params, fields: out, enum_tag })
        }
        ParsedLayout::Atom => Ok(DataLayout::Atom { name: name_symbol.clone(), type_params, enum_tag }),
    }
}

/// Constants with no explicit type annotation get their type from
/// constant-folding a literal initializer — the only inference a
/// single-pass, builder-then-freeze collector can do before the checker
/// (which needs the frozen table) has even started.
fn infer_literal_type(expr: &phasec_ast::Expr, position: &Position) -> Result<Type, Diagnostic> {
    use phasec_ast::ExprKind;
    let core = Symbol::root(preamble::core_package());
    match &expr.kind {
        ExprKind::BoolLiteral(_) => Ok(Type::Nominal(core.child("Bool"))),
        ExprKind::IntLiteral(_) => Ok(Type::Nominal(core.child("Int"))),
        ExprKind::FloatLiteral(_) => Ok(Type::Nominal(core.child("Float"))),
        ExprKind::StringLiteral(_) => Ok(Type::Nominal(core.child("String"))),
        _ => Err(Diagnostic::new(
            ErrorCode::UnresolvedType,
            "a constant without a type annotation must initialize from a literal",
            position.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_ast::{ConstantDecl, Expr, ExprKind};
    use phasec_common::{Package, Version};

    fn pkg() -> Package {
        Package::new("acme", "app", Version::new(1, 0, 0))
    }

    fn module() -> Symbol {
        Symbol::root(pkg())
    }

    fn pos() -> Position {
        Position::new("main.ph", 1, 1)
    }

    #[test]
    fn constant_with_explicit_type_is_registered() {
        let mut collector = DeclarationCollector::new();
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let decl = TopLevelDecl::Constant(ConstantDecl {
            position: pos(),
            access: Access::Public,
            name: "x".to_string(),
            ty: Some(phasec_ast::TypeExpr::Identifier("Int".to_string())),
            expr: Some(Expr::new(pos(), ExprKind::IntLiteral(1))),
            external: None,
        });
        collector.collect_declaration(&qualifier, &module(), "main.ph", &decl).unwrap();
        let tables = collector.freeze();
        let entry = tables.symbol_table.get(&module().child("x")).unwrap();
        assert_eq!(entry.ty, Type::Nominal(Symbol::root(preamble::core_package()).child("Int")));
    }

    #[test]
    fn constant_without_type_infers_from_a_literal() {
        let mut collector = DeclarationCollector::new();
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let decl = TopLevelDecl::Constant(ConstantDecl {
            position: pos(),
            access: Access::Public,
            name: "x".to_string(),
            ty: None,
            expr: Some(Expr::new(pos(), ExprKind::BoolLiteral(true))),
            external: None,
        });
        collector.collect_declaration(&qualifier, &module(), "main.ph", &decl).unwrap();
        let tables = collector.freeze();
        let entry = tables.symbol_table.get(&module().child("x")).unwrap();
        assert_eq!(entry.ty, Type::Nominal(Symbol::root(preamble::core_package()).child("Bool")));
    }

    #[test]
    fn duplicate_impl_on_the_same_base_is_rejected() {
        use phasec_ast::ImplDecl;
        let mut collector = DeclarationCollector::new();
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        qualifier.insert("Widget", module().child("Widget"));
        let make_impl = || {
            TopLevelDecl::Impl(ImplDecl {
                position: pos(),
                name: None,
                type_params: vec![],
                base: phasec_ast::TypeExpr::Identifier("Widget".to_string()),
                protocol: None,
                methods: vec![],
            })
        };
        collector.collect_declaration(&qualifier, &module(), "main.ph", &make_impl()).unwrap();
        let err = collector
            .collect_declaration(&qualifier, &module(), "main.ph", &make_impl())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateImpl);
    }

    #[test]
    fn impl_declared_outside_the_base_module_is_rejected() {
        use phasec_ast::ImplDecl;
        let mut collector = DeclarationCollector::new();
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let other_module = module().child("other");
        qualifier.insert("Widget", other_module.child("Widget"));
        let decl = TopLevelDecl::Impl(ImplDecl {
            position: pos(),
            name: None,
            type_params: vec![],
            base: phasec_ast::TypeExpr::Identifier("Widget".to_string()),
            protocol: None,
            methods: vec![],
        });
        let err = collector.collect_declaration(&qualifier, &module(), "main.ph", &decl).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImplOutsideModule);
    }
}
