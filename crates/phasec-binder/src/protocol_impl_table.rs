//! The protocol implementation table (spec.md §3.6): `base-symbol ->
//! (protocol-symbol -> impl-symbol)`. A given `(base, protocol)` pair may
//! appear at most once — enforced jointly with the "at most one impl per
//! base symbol" rule in `phasec-binder`'s declaration collector, since this
//! workspace's impl blocks carry at most one protocol each.

use phasec_common::Symbol;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ProtocolImplTableBuilder {
    entries: FxHashMap<Symbol, FxHashMap<Symbol, Symbol>>,
}

impl ProtocolImplTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, base: Symbol, protocol: Symbol, impl_symbol: Symbol) {
        self.entries.entry(base).or_default().insert(protocol, impl_symbol);
    }

    #[must_use]
    pub fn freeze(self) -> ProtocolImplTable {
        ProtocolImplTable { entries: self.entries }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProtocolImplTable {
    entries: FxHashMap<Symbol, FxHashMap<Symbol, Symbol>>,
}

impl ProtocolImplTable {
    #[must_use]
    pub fn lookup(&self, base: &Symbol, protocol: &Symbol) -> Option<&Symbol> {
        self.entries.get(base).and_then(|protocols| protocols.get(protocol))
    }

    /// Every protocol this base has a registered impl for, used by the
    /// checker's "any in-scope protocol's implementation for that base"
    /// method-resolution fallback (§4.4.6).
    #[must_use]
    pub fn protocols_for(&self, base: &Symbol) -> impl Iterator<Item = (&Symbol, &Symbol)> {
        self.entries.get(base).into_iter().flat_map(|m| m.iter())
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
    fn lookup_finds_the_registered_impl() {
        let mut builder = ProtocolImplTableBuilder::new();
        builder.insert(sym("Widget"), sym("Renderable"), sym("Widget_Renderable_impl"));
        let table = builder.freeze();
        assert_eq!(table.lookup(&sym("Widget"), &sym("Renderable")), Some(&sym("Widget_Renderable_impl")));
        assert_eq!(table.lookup(&sym("Widget"), &sym("Other")), None);
    }
}
