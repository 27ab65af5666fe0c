//! The symbol qualifier (spec.md §4.1): builds a per-file `local-name ->
//! fully-qualified-symbol` mapping, seeded with the language preamble and
//! augmented by the file's own top-level declarations and imports, then uses
//! that mapping to resolve parse-level type expressions to checked types.

use phasec_ast::{ParamTypeExpr, TopLevelDecl, TypeExpr};
use phasec_common::{Diagnostic, ErrorCode, Position, Symbol};
use phasec_types::{FunctionType, Param, Type};
use rustc_hash::FxHashMap;

use crate::dependency_manager::DependencyManager;
use crate::preamble;

/// `local-name -> fully-qualified-symbol`, one instance per file.
#[derive(Debug, Clone, Default)]
pub struct Qualifier {
    names: FxHashMap<String, Symbol>,
}

impl Qualifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the mapping with the language preamble: scalar types, the
    /// generic collection types, and the built-in operator symbols.
    pub fn seed_preamble(&mut self) {
        for entry in preamble::type_entries() {
            self.names.insert(entry.name.to_string(), entry.symbol);
        }
        for entry in preamble::operator_entries() {
            self.names.insert(entry.name.to_string(), entry.symbol);
        }
    }

    /// Adds one top-level declaration's name, mapped to `module.child(name)`.
    pub fn add_declaration(&mut self, module: &Symbol, decl: &TopLevelDecl) {
        let name = declaration_name(decl);
        self.names.insert(name.to_string(), module.child(name));
    }

    /// Expands one import's tree via the dependency manager and adds every
    /// leaf symbol under its own last segment's name.
    pub fn add_import(&mut self, dependency_manager: &DependencyManager, import: &phasec_ast::ImportDecl) {
        if let Some(leaves) = dependency_manager.breakdown_import(import) {
            for leaf in leaves {
                if let Some(name) = leaf.name() {
                    self.names.insert(name.to_string(), leaf);
                }
            }
        }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.names.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.names.insert(name.into(), symbol);
    }
}

fn declaration_name(decl: &TopLevelDecl) -> &str {
    match decl {
        TopLevelDecl::Constant(d) => &d.name,
        TopLevelDecl::Function(d) => &d.name,
        TopLevelDecl::Data(d) => &d.name,
        TopLevelDecl::Enum(d) => &d.name,
        TopLevelDecl::Impl(d) => d.name.as_deref().unwrap_or("<impl>"),
        TopLevelDecl::Protocol(d) => &d.name,
    }
}

/// Resolves a parse-level type expression to a checked type, against a local
/// mapping plus an enclosing symbol whose generics (`generics_in_scope`) are
/// visible as `TypeParameter`s rather than qualifier lookups.
pub fn qualify_type(
    qualifier: &Qualifier,
    enclosing: &Symbol,
    generics_in_scope: &[String],
    ty: &TypeExpr,
    position: &Position,
) -> Result<Type, Diagnostic> {
    match ty {
        TypeExpr::Identifier(id) => {
            if generics_in_scope.iter().any(|g| g == id) {
                return Ok(Type::TypeParameter(enclosing.child(id)));
            }
            qualifier.lookup(id).cloned().map(Type::Nominal).ok_or_else(|| {
                Diagnostic::new(
                    ErrorCode::UnknownName,
                    format!("cannot find type `{id}` in this scope"),
                    position.clone(),
                )
            })
        }
        TypeExpr::Dotted(segments) => {
            let Some((head, rest)) = segments.split_first() else {
                return Err(Diagnostic::new(
                    ErrorCode::UnresolvedType,
                    "empty dotted type path",
                    position.clone(),
                ));
            };
            let mut sym = qualifier.lookup(head).cloned().ok_or_else(|| {
                Diagnostic::new(
                    ErrorCode::UnknownName,
                    format!("cannot find type `{head}` in this scope"),
                    position.clone(),
                )
            })?;
            for seg in rest {
                sym = sym.child(seg.as_str());
            }
            Ok(Type::Nominal(sym))
        }
        TypeExpr::Parameterized { base, args } => {
            let base_ty = qualify_type(qualifier, enclosing, generics_in_scope, base, position)?;
            let Type::Nominal(base_sym) = base_ty else {
                return Err(Diagnostic::new(
                    ErrorCode::WrongTypeArgumentArity,
                    "only a nominal type can take type arguments",
                    position.clone(),
                ));
            };
            let qualified_args = args
                .iter()
                .map(|a| qualify_type(qualifier, enclosing, generics_in_scope, a, position))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Type::Parameterized { base: base_sym, args: qualified_args })
        }
        TypeExpr::Function { params, result } => {
            let qualified_params = params
                .iter()
                .map(|p| qualify_param(qualifier, enclosing, generics_in_scope, p, position))
                .collect::<Result<Vec<_>, _>>()?;
            let qualified_result = qualify_type(qualifier, enclosing, generics_in_scope, result, position)?;
            Ok(Type::Function(FunctionType {
                phase: phasec_types::FunctionPhase::Fun,
                type_params: vec![],
                params: qualified_params,
                result: Box::new(qualified_result),
            }))
        }
    }
}

fn qualify_param(
    qualifier: &Qualifier,
    enclosing: &Symbol,
    generics_in_scope: &[String],
    param: &ParamTypeExpr,
    position: &Position,
) -> Result<Param, Diagnostic> {
    let ty = qualify_type(qualifier, enclosing, generics_in_scope, &param.ty, position)?;
    Ok(Param {
        name: String::new(),
        ty,
        phase: param.phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_common::{Package, Version};

    fn pkg() -> phasec_common::Package {
        Package::new("acme", "app", Version::new(1, 0, 0))
    }

    #[test]
    fn unseeded_identifier_fails_with_unknown_name() {
        let qualifier = Qualifier::new();
        let enclosing = Symbol::root(pkg());
        let err = qualify_type(&qualifier, &enclosing, &[], &TypeExpr::Identifier("Widget".into()), &Position::synthetic())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownName);
    }

    #[test]
    fn generic_in_scope_becomes_a_type_parameter() {
        let qualifier = Qualifier::new();
        let enclosing = Symbol::root(pkg()).child("identity");
        let ty = qualify_type(
            &qualifier,
            &enclosing,
            &["T".to_string()],
            &TypeExpr::Identifier("T".into()),
            &Position::synthetic(),
        )
        .unwrap();
        assert_eq!(ty, Type::TypeParameter(enclosing.child("T")));
    }

    #[test]
    fn preamble_seeded_scalar_resolves() {
        let mut qualifier = Qualifier::new();
        qualifier.seed_preamble();
        let enclosing = Symbol::root(pkg());
        let ty = qualify_type(&qualifier, &enclosing, &[], &TypeExpr::Identifier("Int".into()), &Position::synthetic())
            .unwrap();
        assert_eq!(ty, Type::Nominal(Symbol::root(preamble::core_package()).child("Int")));
    }

    #[test]
    fn dotted_chain_walks_children_from_the_head() {
        let mut qualifier = Qualifier::new();
        let module = Symbol::root(pkg()).child("shapes");
        qualifier.insert("shapes", module.clone());
        let ty = qualify_type(
            &qualifier,
            &Symbol::root(pkg()),
            &[],
            &TypeExpr::Dotted(vec!["shapes".into(), "Circle".into()]),
            &Position::synthetic(),
        )
        .unwrap();
        assert_eq!(ty, Type::Nominal(module.child("Circle")));
    }

    #[test]
    fn parameterized_base_must_be_nominal() {
        let mut qualifier = Qualifier::new();
        let enclosing = Symbol::root(pkg()).child("identity");
        qualifier.insert("T", enclosing.child("T"));
        let err = qualify_type(
            &qualifier,
            &enclosing,
            &["T".to_string()],
            &TypeExpr::Parameterized {
                base: Box::new(TypeExpr::Identifier("T".into())),
                args: vec![TypeExpr::Identifier("T".into())],
            },
            &Position::synthetic(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::WrongTypeArgumentArity);
    }
}
