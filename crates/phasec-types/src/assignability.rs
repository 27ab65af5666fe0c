//! Type assignability.
//!
//! `actual` is assignable to `expected` following the rule list in order;
//! the first matching rule decides. Dereferencing a `Nominal` type to its
//! declaration needs a lookup into the global symbol table, which lives in
//! `phasec-binder` — rather than depend on that crate (and invert the
//! dependency direction the workspace wants), this module takes the lookup
//! as a `&dyn DeclarationLookup` trait object supplied by the caller.

use phasec_common::Symbol;

use crate::phase::Phase;
use crate::ty::Type;

/// Resolves a symbol to the type of its declaration. Implemented by
/// `phasec-binder`'s `SymbolTable` in the real pipeline; tests can supply a
/// small in-memory map.
pub trait DeclarationLookup {
    fn resolve(&self, symbol: &Symbol) -> Option<Type>;
}

/// A `DeclarationLookup` that never resolves anything, for callers that
/// only need to compare already-structural types.
pub struct NoDeclarations;

impl DeclarationLookup for NoDeclarations {
    fn resolve(&self, _symbol: &Symbol) -> Option<Type> {
        None
    }
}

const MAX_DEPTH: usize = phasec_common::limits::MAX_GENERIC_DEPTH;

#[must_use]
pub fn is_assignable(actual: &Type, expected: Option<&Type>, lookup: &dyn DeclarationLookup) -> bool {
    is_assignable_at_depth(actual, expected, lookup, 0)
}

fn is_assignable_at_depth(
    actual: &Type,
    expected: Option<&Type>,
    lookup: &dyn DeclarationLookup,
    depth: usize,
) -> bool {
    // expected is absent (unconstrained)
    let Some(expected) = expected else {
        return true;
    };
    if depth > MAX_DEPTH {
        return false;
    }
    // structurally equal
    if actual == expected {
        return true;
    }
    // actual is the bottom type
    if actual.is_nothing() {
        return true;
    }
    // either side is a TypeParameter (bounds not yet enforced)
    if matches!(actual, Type::TypeParameter(_)) || matches!(expected, Type::TypeParameter(_)) {
        return true;
    }

    match (actual, expected) {
        (Type::Function(a), Type::Function(e)) => function_assignable(a, e, lookup, depth),
        (
            Type::Parameterized {
                base: actual_base,
                args: actual_args,
            },
            Type::Parameterized {
                base: expected_base,
                args: expected_args,
            },
        ) => {
            actual_args.len() == expected_args.len()
                && is_assignable_at_depth(
                    &Type::Nominal(actual_base.clone()),
                    Some(&Type::Nominal(expected_base.clone())),
                    lookup,
                    depth + 1,
                )
                && actual_args
                    .iter()
                    .zip(expected_args.iter())
                    .all(|(a, e)| is_assignable_at_depth(a, Some(e), lookup, depth + 1))
        }
        // expected is Enum and actual is a variant layout tagged with it
        (Type::DataLayout(layout), Type::Enum(e)) => layout.enum_tag() == Some(&e.name),
        // actual is Nominal -> dereference to its declaration and retry
        (Type::Nominal(sym), _) => match lookup.resolve(sym) {
            Some(decl) => is_assignable_at_depth(&decl, Some(expected), lookup, depth + 1),
            None => false,
        },
        // expected is Nominal -> symmetric
        (_, Type::Nominal(sym)) => match lookup.resolve(sym) {
            Some(decl) => is_assignable_at_depth(actual, Some(&decl), lookup, depth + 1),
            None => false,
        },
        _ => false,
    }
}

fn function_assignable(
    actual: &crate::ty::FunctionType,
    expected: &crate::ty::FunctionType,
    lookup: &dyn DeclarationLookup,
    depth: usize,
) -> bool {
    if actual.phase != expected.phase || actual.params.len() != expected.params.len() {
        return false;
    }
    let phase_matches = actual
        .params
        .iter()
        .zip(expected.params.iter())
        .all(|(a, e)| a.phase.unwrap_or(Phase::Val) == e.phase.unwrap_or(Phase::Val));
    if !phase_matches {
        return false;
    }
    // each parameter type is assignable in the *same* direction: this
    // implementation treats parameters as invariant rather than true
    // contravariance, documented as an open design choice in DESIGN.md
    let params_ok = actual.params.iter().zip(expected.params.iter()).all(|(a, e)| {
        is_assignable_at_depth(&a.ty, Some(&e.ty), lookup, depth + 1)
    });
    if !params_ok {
        return false;
    }
    // contravariant result: expected's result assignable to actual's result
    is_assignable_at_depth(&expected.result, Some(&actual.result), lookup, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{FunctionType, Param};
    use phasec_common::{Package, Version};

    fn sym(name: &str) -> Symbol {
        Symbol::root(Package::new("acme", "widgets", Version::new(1, 0, 0))).child(name)
    }

    #[test]
    fn unconstrained_expected_is_always_assignable() {
        assert!(is_assignable(&Type::Nominal(sym("Int")), None, &NoDeclarations));
    }

    #[test]
    fn nothing_is_assignable_to_anything() {
        assert!(is_assignable(
            &Type::Nothing,
            Some(&Type::Nominal(sym("Int"))),
            &NoDeclarations
        ));
    }

    #[test]
    fn identical_nominals_are_assignable() {
        let t = Type::Nominal(sym("Int"));
        assert!(is_assignable(&t, Some(&t), &NoDeclarations));
    }

    #[test]
    fn mismatched_nominals_are_not_assignable_without_a_declaration() {
        assert!(!is_assignable(
            &Type::Nominal(sym("Int")),
            Some(&Type::Nominal(sym("String"))),
            &NoDeclarations
        ));
    }

    #[test]
    fn type_parameter_is_assignable_either_direction() {
        assert!(is_assignable(
            &Type::TypeParameter(sym("T")),
            Some(&Type::Nominal(sym("Int"))),
            &NoDeclarations
        ));
        assert!(is_assignable(
            &Type::Nominal(sym("Int")),
            Some(&Type::TypeParameter(sym("T"))),
            &NoDeclarations
        ));
    }

    #[test]
    fn function_types_require_equal_phase_and_param_count() {
        use crate::phase::FunctionPhase;
        let f = |result: Type| {
            Type::Function(FunctionType {
                phase: FunctionPhase::Fun,
                type_params: vec![],
                params: vec![Param::new("x", Type::Nominal(sym("Int")))],
                result: Box::new(result),
            })
        };
        assert!(is_assignable(
            &f(Type::Nominal(sym("Int"))),
            Some(&f(Type::Nominal(sym("Int")))),
            &NoDeclarations
        ));
    }

    #[test]
    fn parameterized_requires_pairwise_assignable_arguments() {
        let list = sym("List");
        let int_list = Type::Parameterized {
            base: list.clone(),
            args: vec![Type::Nominal(sym("Int"))],
        };
        let t_param_list = Type::Parameterized {
            base: list,
            args: vec![Type::TypeParameter(sym("T"))],
        };
        assert!(is_assignable(&int_list, Some(&t_param_list), &NoDeclarations));
    }

    #[test]
    fn nominal_dereferences_through_a_lookup() {
        struct OneAlias(Symbol, Type);
        impl DeclarationLookup for OneAlias {
            fn resolve(&self, symbol: &Symbol) -> Option<Type> {
                if symbol == &self.0 { Some(self.1.clone()) } else { None }
            }
        }
        let alias = sym("MyInt");
        let lookup = OneAlias(alias.clone(), Type::Nominal(sym("Int")));
        assert!(is_assignable(
            &Type::Nominal(alias),
            Some(&Type::Nominal(sym("Int"))),
            &lookup
        ));
    }

    #[test]
    fn enum_variant_is_assignable_to_its_enum() {
        use crate::ty::{DataLayout, EnumType};
        use indexmap::IndexMap;
        let enum_sym = sym("Shape");
        let variant = DataLayout::Atom {
            name: sym("Shape.Circle"),
            type_params: vec![],
            enum_tag: Some(enum_sym.clone()),
        };
        let enum_ty = Type::Enum(Box::new(EnumType {
            name: enum_sym,
            type_params: vec![],
            variants: IndexMap::new(),
        }));
        assert!(is_assignable(
            &Type::DataLayout(Box::new(variant)),
            Some(&enum_ty),
            &NoDeclarations
        ));
    }
}
