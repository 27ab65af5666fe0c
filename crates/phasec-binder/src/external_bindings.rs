//! External bindings (spec.md §3.6 and §6.1): `symbol -> (source-file,
//! imported-name)` for declarations that link to runtime-provided
//! implementations (`extern` functions, `external` constants).

use phasec_common::Symbol;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalBinding {
    pub source_file: String,
    pub imported_name: String,
}

#[derive(Debug, Default)]
pub struct ExternalBindingsBuilder {
    entries: FxHashMap<Symbol, ExternalBinding>,
}

impl ExternalBindingsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol, binding: ExternalBinding) {
        self.entries.insert(symbol, binding);
    }

    #[must_use]
    pub fn freeze(self) -> ExternalBindings {
        ExternalBindings { entries: self.entries }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalBindings {
    entries: FxHashMap<Symbol, ExternalBinding>,
}

impl ExternalBindings {
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&ExternalBinding> {
        self.entries.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &ExternalBinding)> {
        self.entries.iter()
    }
}
