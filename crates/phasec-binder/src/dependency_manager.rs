//! External dependency resolution: the qualifier's and collector's view of
//! spec.md §6.1's `DependencyManager` — a mapping `alias -> package-name`
//! with `self` pre-bound to the package currently being compiled.

use indexmap::IndexMap;
use phasec_ast::{ImportDecl, ImportExpr};
use phasec_common::{Package, Symbol};

/// Maps an import alias to the package it names. `self` is always bound to
/// the owning package and may not be rebound — `Package::is_reserved_name`
/// already stops a package from being *named* `self`; this stops the alias
/// table from shadowing the implicit binding.
#[derive(Debug, Clone)]
pub struct DependencyManager {
    self_package: Package,
    aliases: IndexMap<String, Package>,
}

impl DependencyManager {
    #[must_use]
    pub fn new(self_package: Package) -> Self {
        Self {
            self_package,
            aliases: IndexMap::new(),
        }
    }

    /// Binds `alias` to `package`.
    ///
    /// # Panics
    /// Panics if `alias` is `"self"` — that binding is implicit.
    pub fn bind(&mut self, alias: impl Into<String>, package: Package) {
        let alias = alias.into();
        assert_ne!(
            alias,
            Package::RESERVED_SELF_ALIAS,
            "self may not be rebound"
        );
        self.aliases.insert(alias, package);
    }

    #[must_use]
    pub fn self_package(&self) -> &Package {
        &self.self_package
    }

    #[must_use]
    pub fn resolve_alias(&self, alias: Option<&str>) -> Option<&Package> {
        match alias {
            None | Some(Package::RESERVED_SELF_ALIAS) => Some(&self.self_package),
            Some(other) => self.aliases.get(other),
        }
    }

    /// Expands an import's tree into the leaf symbols it brings into scope,
    /// per spec.md §4.1: a `Nominal` leaf under parent `P` yields
    /// `P.child(name)`; a `Nested` node recursively expands each child under
    /// `P.child(base.name)`. Returns `None` when the import's alias does not
    /// resolve to a known package.
    #[must_use]
    pub fn breakdown_import(&self, import: &ImportDecl) -> Option<Vec<Symbol>> {
        let package = self.resolve_alias(import.package_alias.as_deref())?.clone();
        let root = Symbol::root(package);
        let mut leaves = Vec::new();
        expand(&root, &import.tree, &mut leaves);
        Some(leaves)
    }
}

fn expand(parent: &Symbol, tree: &ImportExpr, out: &mut Vec<Symbol>) {
    match tree {
        ImportExpr::Nominal { name } => out.push(parent.child(name.as_str())),
        ImportExpr::Nested { base, children } => {
            let base_sym = parent.child(base.as_str());
            for child in children {
                expand(&base_sym, child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_common::Version;

    fn pkg(name: &str) -> Package {
        Package::new("acme", name, Version::new(1, 0, 0))
    }

    #[test]
    fn self_alias_resolves_without_binding() {
        let dm = DependencyManager::new(pkg("app"));
        assert_eq!(dm.resolve_alias(Some("self")), Some(&pkg("app")));
        assert_eq!(dm.resolve_alias(None), Some(&pkg("app")));
    }

    #[test]
    fn bound_alias_resolves_to_its_package() {
        let mut dm = DependencyManager::new(pkg("app"));
        dm.bind("collections", pkg("collections"));
        assert_eq!(dm.resolve_alias(Some("collections")), Some(&pkg("collections")));
    }

    #[test]
    fn unbound_alias_resolves_to_nothing() {
        let dm = DependencyManager::new(pkg("app"));
        assert_eq!(dm.resolve_alias(Some("nope")), None);
    }

    #[test]
    #[should_panic(expected = "self may not be rebound")]
    fn binding_self_panics() {
        let mut dm = DependencyManager::new(pkg("app"));
        dm.bind("self", pkg("other"));
    }

    #[test]
    fn nominal_import_yields_one_leaf_under_the_package_root() {
        let dm = DependencyManager::new(pkg("app"));
        let import = ImportDecl {
            position: phasec_common::Position::synthetic(),
            package_alias: None,
            tree: ImportExpr::Nominal { name: "Widget".to_string() },
        };
        let leaves = dm.breakdown_import(&import).unwrap();
        assert_eq!(leaves, vec![Symbol::root(pkg("app")).child("Widget")]);
    }

    #[test]
    fn nested_import_expands_each_child_under_its_base() {
        let mut dm = DependencyManager::new(pkg("app"));
        dm.bind("collections", pkg("collections"));
        let import = ImportDecl {
            position: phasec_common::Position::synthetic(),
            package_alias: Some("collections".to_string()),
            tree: ImportExpr::Nested {
                base: "containers".to_string(),
                children: vec![
                    ImportExpr::Nominal { name: "List".to_string() },
                    ImportExpr::Nominal { name: "Set".to_string() },
                ],
            },
        };
        let leaves = dm.breakdown_import(&import).unwrap();
        let base = Symbol::root(pkg("collections")).child("containers");
        assert_eq!(leaves, vec![base.child("List"), base.child("Set")]);
    }

    #[test]
    fn unresolvable_alias_yields_none() {
        let dm = DependencyManager::new(pkg("app"));
        let import = ImportDecl {
            position: phasec_common::Position::synthetic(),
            package_alias: Some("missing".to_string()),
            tree: ImportExpr::Nominal { name: "X".to_string() },
        };
        assert_eq!(dm.breakdown_import(&import), None);
    }
}
