//! The language preamble: the core-library symbols spec.md §6.1 says every
//! file's qualifier is seeded with before its own declarations and imports
//! are layered on top — `Int`, `Bool`, `List`, the built-in operators, and
//! so on.
//!
//! This is the one piece of spec.md §6.1 this workspace has to invent a
//! concrete shape for (see `SPEC_FULL.md`'s "Supplemented features"): the
//! core library package itself is an external collaborator, but the
//! qualifier and checker both need *some* real symbols to seed scopes with
//! to be testable at all.

use indexmap::IndexMap;
use phasec_common::{Package, Symbol, Version};
use phasec_types::{DataLayout, FunctionPhase, FunctionType, Param, Phase, Type};

/// The package every preamble symbol is considered to live in.
#[must_use]
pub fn core_package() -> Package {
    Package::new("lang", "core", Version::new(1, 0, 0))
}

/// One scalar/atom type the preamble seeds: no fields, no type parameters.
const SCALAR_TYPES: &[&str] = &["Int", "Float", "Bool", "String", "Nothing", "Unit"];

/// The built-in operator symbols, each an `Overload` of one branch per
/// numeric type it supports. `==`/`!=` get a single `(T, T) -> Bool` branch
/// per scalar — the checker special-cases equality to accept any pair of
/// overlapping types rather than dispatching through this table (§4.4.6).
const NUMERIC_TYPES: &[&str] = &["Int", "Float"];

/// A preamble entry: the local name it is seeded under, its fully qualified
/// symbol, and its checked type.
pub struct PreambleEntry {
    pub name: &'static str,
    pub symbol: Symbol,
    pub ty: Type,
}

fn root() -> Symbol {
    Symbol::root(core_package())
}

/// The scalar/atom types (`Int`, `Bool`, ...) plus the generic collection
/// types (`List`, `Set`, `Map`, `Option`), seeded into both the qualifier's
/// local name map (as type names) and the global symbol table.
#[must_use]
pub fn type_entries() -> Vec<PreambleEntry> {
    let base = root();
    let mut entries: Vec<PreambleEntry> = SCALAR_TYPES
        .iter()
        .map(|name| {
            let symbol = base.child(*name);
            PreambleEntry {
                name,
                ty: Type::DataLayout(Box::new(DataLayout::Atom {
                    name: symbol.clone(),
                    type_params: vec![],
                    enum_tag: None,
                })),
                symbol,
            }
        })
        .collect();

    for (name, type_param_count) in [("List", 1), ("Set", 1), ("Map", 2), ("Option", 1)] {
        let symbol = base.child(name);
        let type_params: Vec<Symbol> = (0..type_param_count)
            .map(|i| symbol.child(generic_param_name(i)))
            .collect();
        entries.push(PreambleEntry {
            name,
            ty: Type::DataLayout(Box::new(DataLayout::Atom {
                name: symbol.clone(),
                type_params,
                enum_tag: None,
            })),
            symbol,
        });
    }
    entries
}

fn generic_param_name(index: usize) -> &'static str {
    match index {
        0 => "T",
        1 => "V",
        _ => "U",
    }
}

/// The built-in operator symbols, seeded as `const`-phase value bindings at
/// the root of every function scope (§4.4.6: equality is special-cased,
/// arithmetic and comparison dispatch through this `Overload` table).
#[must_use]
pub fn operator_entries() -> Vec<PreambleEntry> {
    let base = root();
    let mut entries = Vec::new();
    for op in ["+", "-", "*", "/", "<", "<=", ">", ">="] {
        let symbol = base.child(op);
        let branches = NUMERIC_TYPES
            .iter()
            .map(|ty_name| {
                let ty = Type::Nominal(base.child(*ty_name));
                let result = if matches!(op, "<" | "<=" | ">" | ">=") {
                    Type::Nominal(base.child("Bool"))
                } else {
                    ty.clone()
                };
                FunctionType {
                    phase: FunctionPhase::Fun,
                    type_params: vec![],
                    params: vec![Param::new("lhs", ty.clone()), Param::new("rhs", ty)],
                    result: Box::new(result),
                }
            })
            .collect();
        entries.push(PreambleEntry {
            name: op,
            ty: Type::Overload(branches),
            symbol,
        });
    }
    for (op, result_ty) in [("&&", "Bool"), ("||", "Bool")] {
        let symbol = base.child(op);
        let bool_ty = Type::Nominal(base.child(result_ty));
        entries.push(PreambleEntry {
            name: op,
            ty: Type::Overload(vec![FunctionType {
                phase: FunctionPhase::Fun,
                type_params: vec![],
                params: vec![
                    Param::new("lhs", bool_ty.clone()),
                    Param::new("rhs", bool_ty.clone()),
                ],
                result: Box::new(bool_ty),
            }]),
            symbol,
        });
    }
    for op in ["==", "!="] {
        let symbol = base.child(op);
        let bool_ty = Type::Nominal(base.child("Bool"));
        let branches = NUMERIC_TYPES
            .iter()
            .chain(["Bool", "String"].iter())
            .map(|ty_name| {
                let ty = Type::Nominal(base.child(*ty_name));
                FunctionType {
                    phase: FunctionPhase::Fun,
                    type_params: vec![],
                    params: vec![Param::new("lhs", ty.clone()), Param::new("rhs", ty)],
                    result: Box::new(bool_ty.clone()),
                }
            })
            .collect();
        entries.push(PreambleEntry {
            name: op,
            ty: Type::Overload(branches),
            symbol,
        });
    }
    entries
}

/// `List<T>.map`, the one built-in instance method this workspace wires all
/// the way through the method table — needed to exercise scenario 3 (§8):
/// generic inference flowing through a lambda argument. Keyed by `List`'s
/// symbol so the checker's method-resolution step (§4.4.6) finds it the same
/// way it finds a user-defined impl method.
#[must_use]
pub fn list_map_method() -> (Symbol, FunctionType) {
    let base = root();
    let list_sym = base.child("List");
    let t = list_sym.child("T");
    let method_sym = list_sym.child("map");
    let u = method_sym.child("U");
    let ty = FunctionType {
        phase: FunctionPhase::Fun,
        type_params: vec![u.clone()],
        params: vec![
            Param::new("self", Type::Parameterized { base: list_sym.clone(), args: vec![Type::TypeParameter(t.clone())] }),
            Param::new(
                "fn",
                Type::Function(FunctionType {
                    phase: FunctionPhase::Fun,
                    type_params: vec![],
                    params: vec![Param::new("x", Type::TypeParameter(t)).with_phase(Phase::Val)],
                    result: Box::new(Type::TypeParameter(u.clone())),
                }),
            ),
        ],
        result: Box::new(Type::Parameterized { base: list_sym, args: vec![Type::TypeParameter(u)] }),
    };
    (method_sym, ty)
}

/// `Option<T>`'s two variants (`Some`/`None`), registered the same way the
/// declaration collector registers a user `Enum`'s variants (§4.2).
#[must_use]
pub fn option_enum() -> phasec_types::EnumType {
    let base = root();
    let option_sym = base.child("Option");
    let t = option_sym.child("T");
    let mut variants = IndexMap::new();
    variants.insert(
        "Some".to_string(),
        DataLayout::Tuple {
            name: option_sym.child("Some"),
            type_params: vec![],
            fields: vec![Type::TypeParameter(t.clone())],
            enum_tag: Some(option_sym.clone()),
        },
    );
    variants.insert(
        "None".to_string(),
        DataLayout::Atom {
            name: option_sym.child("None"),
            type_params: vec![],
            enum_tag: Some(option_sym.clone()),
        },
    );
    phasec_types::EnumType {
        name: option_sym,
        type_params: vec![t],
        variants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_types_carry_no_fields() {
        let entries = type_entries();
        let int_entry = entries.iter().find(|e| e.name == "Int").unwrap();
        assert!(matches!(&int_entry.ty, Type::DataLayout(layout) if layout.type_params().is_empty()));
    }

    #[test]
    fn list_is_parameterized_by_one_type_parameter() {
        let entries = type_entries();
        let list_entry = entries.iter().find(|e| e.name == "List").unwrap();
        assert!(matches!(&list_entry.ty, Type::DataLayout(layout) if layout.type_params().len() == 1));
    }

    #[test]
    fn plus_operator_has_one_branch_per_numeric_type() {
        let entries = operator_entries();
        let plus = entries.iter().find(|e| e.name == "+").unwrap();
        assert!(matches!(&plus.ty, Type::Overload(branches) if branches.len() == NUMERIC_TYPES.len()));
    }

    #[test]
    fn list_map_is_generic_over_its_element_and_result_type() {
        let (_, ty) = list_map_method();
        assert_eq!(ty.type_params.len(), 1);
        assert_eq!(ty.params.len(), 2);
    }
}
