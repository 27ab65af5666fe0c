//! The method table (spec.md §3.6): `base-symbol -> (method-name ->
//! {access, symbol, declaring-module, type})`, built from `Impl`
//! declarations. Only methods whose first parameter is literally named
//! `self` are registered here; static methods live only in the symbol table.

use indexmap::IndexMap;
use phasec_common::{Access, Symbol};
use phasec_types::FunctionType;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub access: Access,
    pub symbol: Symbol,
    pub declaring_module: Symbol,
    pub ty: FunctionType,
}

#[derive(Debug, Default)]
pub struct MethodTableBuilder {
    entries: FxHashMap<Symbol, IndexMap<String, MethodEntry>>,
}

impl MethodTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, base: Symbol, method_name: impl Into<String>, entry: MethodEntry) {
        self.entries.entry(base).or_default().insert(method_name.into(), entry);
    }

    #[must_use]
    pub fn freeze(self) -> MethodTable {
        MethodTable { entries: self.entries }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    entries: FxHashMap<Symbol, IndexMap<String, MethodEntry>>,
}

impl MethodTable {
    #[must_use]
    pub fn lookup(&self, base: &Symbol, method_name: &str) -> Option<&MethodEntry> {
        self.entries.get(base).and_then(|methods| methods.get(method_name))
    }

    #[must_use]
    pub fn methods_for(&self, base: &Symbol) -> Option<&IndexMap<String, MethodEntry>> {
        self.entries.get(base)
    }
}
