//! The global symbol table (spec.md §3.6): `symbol -> {access, declaring
//! module, type}`. Built once per compilation by a mutable builder, then
//! frozen before checking begins and shared read-only, per §5's
//! builder-then-freeze discipline.

use phasec_common::{Access, Symbol};
use phasec_types::{DeclarationLookup, Type};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub access: Access,
    pub declaring_module: Symbol,
    pub ty: Type,
}

/// The mutable construction phase of the symbol table.
#[derive(Debug, Default)]
pub struct SymbolTableBuilder {
    entries: FxHashMap<Symbol, SymbolEntry>,
}

impl SymbolTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites an entry. The collector is the only writer and
    /// it is expected to detect meaningful duplicates itself (e.g. duplicate
    /// impls); the table does not second-guess it.
    pub fn insert(&mut self, symbol: Symbol, entry: SymbolEntry) {
        self.entries.insert(symbol, entry);
    }

    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&SymbolEntry> {
        self.entries.get(symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Seals the table: no more writes, only lock-free reads from here on.
    #[must_use]
    pub fn freeze(self) -> SymbolTable {
        SymbolTable { entries: self.entries }
    }
}

/// The frozen, read-only symbol table shared across the checker and lowerer.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: FxHashMap<Symbol, SymbolEntry>,
}

impl SymbolTable {
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&SymbolEntry> {
        self.entries.get(symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &SymbolEntry)> {
        self.entries.iter()
    }
}

/// Bridges the symbol table into `phasec_types`'s assignability/merge/
/// generics machinery, which only needs "what type does this symbol's
/// declaration have" to dereference a `Nominal` type.
impl DeclarationLookup for SymbolTable {
    fn resolve(&self, symbol: &Symbol) -> Option<Type> {
        self.get(symbol).map(|entry| entry.ty.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_common::{Package, Version};

    fn sym(name: &str) -> Symbol {
        Symbol::root(Package::new("acme", "app", Version::new(1, 0, 0))).child(name)
    }

    #[test]
    fn frozen_table_resolves_inserted_entries() {
        let mut builder = SymbolTableBuilder::new();
        builder.insert(
            sym("Widget"),
            SymbolEntry {
                access: Access::Public,
                declaring_module: Symbol::root(Package::new("acme", "app", Version::new(1, 0, 0))),
                ty: Type::Nominal(sym("Widget")),
            },
        );
        let table = builder.freeze();
        assert!(table.get(&sym("Widget")).is_some());
        assert_eq!(table.resolve(&sym("Widget")), Some(Type::Nominal(sym("Widget"))));
    }

    #[test]
    fn unknown_symbol_resolves_to_none() {
        let table = SymbolTableBuilder::new().freeze();
        assert_eq!(table.resolve(&sym("Ghost")), None);
    }
}
