//! The package archive (spec.md §6.2): each package emits its name,
//! version, symbol table, method table, protocol-impl table, external
//! bindings, and file list. spec.md marks the on-disk byte shape external,
//! but gives enough structure to implement a concrete, round-trippable
//! `serde`/JSON form (see `SPEC_FULL.md`'s "Supplemented features").
//!
//! The tables themselves key off `Symbol`, which is not a JSON object key
//! (`serde_json` only accepts string-like map keys), so the archive holds
//! flat `Vec`s of entries rather than re-exporting the hash maps directly.

use phasec_common::{Access, Package, Symbol};
use phasec_types::{FunctionType, Type};
use serde::{Deserialize, Serialize};

use crate::external_bindings::ExternalBindings;
use crate::method_table::MethodTable;
use crate::protocol_impl_table::ProtocolImplTable;
use crate::symbol_table::SymbolTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedSymbolEntry {
    pub symbol: Symbol,
    pub access: Access,
    pub declaring_module: Symbol,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedMethodEntry {
    pub base: Symbol,
    pub name: String,
    pub access: Access,
    pub symbol: Symbol,
    pub declaring_module: Symbol,
    pub ty: FunctionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedProtocolImpl {
    pub base: Symbol,
    pub protocol: Symbol,
    pub impl_symbol: Symbol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedExternalBinding {
    pub symbol: Symbol,
    pub source_file: String,
    pub imported_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageArchive {
    pub package: Package,
    pub symbols: Vec<ArchivedSymbolEntry>,
    pub methods: Vec<ArchivedMethodEntry>,
    pub protocol_impls: Vec<ArchivedProtocolImpl>,
    pub external_bindings: Vec<ArchivedExternalBinding>,
    pub files: Vec<String>,
}

impl PackageArchive {
    #[must_use]
    pub fn build(
        package: Package,
        symbol_table: &SymbolTable,
        method_table: &MethodTable,
        protocol_impl_table: &ProtocolImplTable,
        external_bindings: &ExternalBindings,
        files: Vec<String>,
    ) -> Self {
        let symbols = symbol_table
            .iter()
            .map(|(symbol, entry)| ArchivedSymbolEntry {
                symbol: symbol.clone(),
                access: entry.access,
                declaring_module: entry.declaring_module.clone(),
                ty: entry.ty.clone(),
            })
            .collect();
        let mut methods = Vec::new();
        for (symbol, _) in symbol_table.iter() {
            if let Some(table) = method_table.methods_for(symbol) {
                for (name, entry) in table {
                    methods.push(ArchivedMethodEntry {
                        base: symbol.clone(),
                        name: name.clone(),
                        access: entry.access,
                        symbol: entry.symbol.clone(),
                        declaring_module: entry.declaring_module.clone(),
                        ty: entry.ty.clone(),
                    });
                }
            }
        }
        let mut protocol_impls = Vec::new();
        for (symbol, _) in symbol_table.iter() {
            for (protocol, impl_symbol) in protocol_impl_table.protocols_for(symbol) {
                protocol_impls.push(ArchivedProtocolImpl {
                    base: symbol.clone(),
                    protocol: protocol.clone(),
                    impl_symbol: impl_symbol.clone(),
                });
            }
        }
        let external_bindings = external_bindings
            .iter()
            .map(|(symbol, binding)| ArchivedExternalBinding {
                symbol: symbol.clone(),
                source_file: binding.source_file.clone(),
                imported_name: binding.imported_name.clone(),
            })
            .collect();
        Self { package, symbols, methods, protocol_impls, external_bindings, files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::DeclarationCollector;
    use phasec_common::Version;

    #[test]
    fn archive_round_trips_through_json() {
        let collector = DeclarationCollector::new();
        let tables = collector.freeze();
        let archive = PackageArchive::build(
            Package::new("acme", "app", Version::new(1, 0, 0)),
            &tables.symbol_table,
            &tables.method_table,
            &tables.protocol_impl_table,
            &tables.external_bindings,
            vec!["main.ph".to_string()],
        );
        let json = serde_json::to_string(&archive).unwrap();
        let round_tripped: PackageArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped, archive);
        assert!(!archive.symbols.is_empty(), "preamble symbols should be archived");
    }
}
