//! The import verifier (spec.md §4.3): each import's leaf symbols must
//! exist in the frozen symbol table and be visible under their access
//! modifier from the importing module.

use phasec_ast::ImportDecl;
use phasec_binder::{DependencyManager, SymbolTable};
use phasec_common::{Access, Diagnostic, ErrorCode, Symbol};

/// Verifies every leaf symbol one import expands to. Fails fast on the
/// first symbol that is either missing or not visible, per §6.3.
pub fn verify_import(
    symbol_table: &SymbolTable,
    dependency_manager: &DependencyManager,
    from_module: &Symbol,
    import: &ImportDecl,
) -> Result<(), Diagnostic> {
    let leaves = dependency_manager.breakdown_import(import).ok_or_else(|| {
        Diagnostic::new(
            ErrorCode::ImportTargetNotFound,
            "import's package alias does not resolve to a known dependency",
            import.position.clone(),
        )
    })?;
    for leaf in leaves {
        verify_leaf(symbol_table, from_module, &leaf, &import.position)?;
    }
    Ok(())
}

fn verify_leaf(
    symbol_table: &SymbolTable,
    from_module: &Symbol,
    target: &Symbol,
    position: &phasec_common::Position,
) -> Result<(), Diagnostic> {
    let entry = symbol_table.get(target).ok_or_else(|| {
        Diagnostic::new(
            ErrorCode::ImportTargetNotFound,
            format!("import target `{target}` does not exist"),
            position.clone(),
        )
    })?;
    if is_visible(entry.access, &entry.declaring_module, from_module) {
        Ok(())
    } else {
        Err(Diagnostic::new(
            ErrorCode::ImportNotVisible,
            format!("`{target}` is not visible (access: {entry_access}) from `{from_module}`", entry_access = access_name(entry.access)),
            position.clone(),
        ))
    }
}

fn access_name(access: Access) -> &'static str {
    match access {
        Access::Private => "private",
        Access::Protected => "protected",
        Access::Package => "package",
        Access::Internal => "internal",
        Access::Public => "public",
    }
}

/// The visibility table in spec.md §4.3, evaluated against the target's
/// declaring module and the importing module.
#[must_use]
pub fn is_visible(access: Access, declaring_module: &Symbol, from_module: &Symbol) -> bool {
    match access {
        Access::Private => declaring_module == from_module,
        Access::Protected => {
            declaring_module == from_module
                || (declaring_module.package == from_module.package && declaring_module.is_parent(from_module))
        }
        Access::Package => declaring_module.package == from_module.package,
        Access::Internal => {
            declaring_module.package.organization == from_module.package.organization
                && declaring_module.package.version == from_module.package.version
        }
        Access::Public => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_ast::ImportExpr;
    use phasec_binder::DeclarationCollector;
    use phasec_common::{Package, Position, Version};

    fn pkg(name: &str) -> Package {
        Package::new("acme", name, Version::new(1, 0, 0))
    }

    #[test]
    fn public_targets_are_always_visible() {
        assert!(is_visible(Access::Public, &Symbol::root(pkg("a")), &Symbol::root(pkg("b"))));
    }

    #[test]
    fn private_targets_require_the_exact_same_declaring_module() {
        let declaring = Symbol::root(pkg("a")).child("mod");
        assert!(is_visible(Access::Private, &declaring, &declaring));
        assert!(!is_visible(Access::Private, &declaring, &Symbol::root(pkg("a"))));
    }

    #[test]
    fn protected_targets_are_visible_from_their_own_declaring_module() {
        let declaring = Symbol::root(pkg("a"));
        assert!(is_visible(Access::Protected, &declaring, &declaring));
    }

    #[test]
    fn protected_targets_are_visible_from_a_submodule_of_the_declaring_module_in_the_same_package() {
        let declaring = Symbol::root(pkg("a")).child("mod");
        let nested = declaring.child("nested");
        assert!(is_visible(Access::Protected, &declaring, &nested));
    }

    #[test]
    fn protected_targets_are_not_visible_from_another_module_or_package() {
        let declaring = Symbol::root(pkg("a")).child("mod");
        assert!(!is_visible(Access::Protected, &declaring, &Symbol::root(pkg("a")).child("other")));
        assert!(!is_visible(Access::Protected, &declaring, &Symbol::root(pkg("b")).child("mod").child("nested")));
    }

    #[test]
    fn package_targets_require_the_same_package() {
        let declaring = Symbol::root(pkg("a")).child("mod");
        let other_module = Symbol::root(pkg("a")).child("other");
        assert!(is_visible(Access::Package, &declaring, &other_module));
        assert!(!is_visible(Access::Package, &declaring, &Symbol::root(pkg("b"))));
    }

    #[test]
    fn internal_targets_ignore_the_package_name_field() {
        let declaring = Symbol::root(pkg("a")).child("mod");
        let sibling_package_module = Symbol::root(pkg("b"));
        assert!(is_visible(Access::Internal, &declaring, &sibling_package_module));
    }

    #[test]
    fn a_missing_target_is_reported_as_not_found() {
        let collector = DeclarationCollector::new();
        let tables = collector.freeze();
        let dependency_manager = DependencyManager::new(pkg("app"));
        let import = ImportDecl {
            position: Position::synthetic(),
            package_alias: None,
            tree: ImportExpr::Nominal { name: "Ghost".to_string() },
        };
        let err = verify_import(&tables.symbol_table, &dependency_manager, &Symbol::root(pkg("app")), &import)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportTargetNotFound);
    }

    #[test]
    fn a_private_target_from_another_module_is_not_visible() {
        use phasec_ast::{DataDecl, ParsedFile, ParsedLayout, TopLevelDecl};
        let mut collector = DeclarationCollector::new();
        let module = Symbol::root(pkg("app"));
        let dependency_manager = DependencyManager::new(pkg("app"));
        let file = ParsedFile {
            path: "main.ph".to_string(),
            imports: vec![],
            declarations: vec![TopLevelDecl::Data(DataDecl {
                position: Position::synthetic(),
                access: Access::Private,
                name: "Widget".to_string(),
                type_params: vec![],
                layout: ParsedLayout::Atom,
                enum_tag: None,
            })],
        };
        collector.collect_file(&file, &module, &dependency_manager).unwrap();
        let tables = collector.freeze();
        let import = ImportDecl {
            position: Position::synthetic(),
            package_alias: None,
            tree: ImportExpr::Nominal { name: "Widget".to_string() },
        };
        let from = module.child("other");
        let err = verify_import(&tables.symbol_table, &dependency_manager, &from, &import).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportNotVisible);
    }
}
