//! Generic type-parameter unification, used by the checker when a call site
//! omits explicit type arguments and they must be inferred from the actual
//! argument types (recursing into function, parameterized, and collection
//! shapes to find every occurrence of a type parameter).

use indexmap::IndexMap;
use phasec_common::Symbol;

use crate::assignability::DeclarationLookup;
use crate::merge::merge;
use crate::ty::Type;

const MAX_DEPTH: usize = phasec_common::limits::MAX_GENERIC_DEPTH;

/// The set of type-parameter symbols bound so far, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericBindings(IndexMap<Symbol, Type>);

impl GenericBindings {
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    #[must_use]
    pub fn get(&self, sym: &Symbol) -> Option<&Type> {
        self.0.get(sym)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Type)> {
        self.0.iter()
    }

    /// Binds `sym` only if it has no binding yet — used to default unsolved
    /// type parameters to `Nothing` once inference is done (§4.4.4: "merge
    /// candidates per parameter ... defaulting to `Nothing` where no
    /// evidence exists").
    pub fn default_to(&mut self, sym: Symbol, ty: Type) {
        self.0.entry(sym).or_insert(ty);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnifyError {
    /// Two occurrences of the same type parameter unified to incompatible
    /// argument types (the merge in §4.4.3 terms had no common supertype).
    Conflict(Symbol),
    /// The expected and actual type shapes could not be matched at all.
    ShapeMismatch { expected: Type, actual: Type },
    DepthExceeded,
}

/// Unifies `expected` (which may mention the type parameters being solved
/// for) against `actual` (a fully concrete type), recording or merging
/// bindings as it walks matching shapes. Call once per call-site argument,
/// accumulating into the same `GenericBindings`.
pub fn unify(
    expected: &Type,
    actual: &Type,
    lookup: &dyn DeclarationLookup,
    bindings: &mut GenericBindings,
) -> Result<(), UnifyError> {
    unify_at_depth(expected, actual, lookup, bindings, 0)
}

fn unify_at_depth(
    expected: &Type,
    actual: &Type,
    lookup: &dyn DeclarationLookup,
    bindings: &mut GenericBindings,
    depth: usize,
) -> Result<(), UnifyError> {
    if depth > MAX_DEPTH {
        return Err(UnifyError::DepthExceeded);
    }
    if let Type::TypeParameter(sym) = expected {
        return bind(sym, actual, lookup, bindings);
    }
    if expected == actual {
        return Ok(());
    }
    match (expected, actual) {
        (Type::Function(e), Type::Function(a)) if e.params.len() == a.params.len() => {
            for (ep, ap) in e.params.iter().zip(a.params.iter()) {
                unify_at_depth(&ep.ty, &ap.ty, lookup, bindings, depth + 1)?;
            }
            unify_at_depth(&e.result, &a.result, lookup, bindings, depth + 1)
        }
        (
            Type::Parameterized {
                base: eb,
                args: ea,
            },
            Type::Parameterized {
                base: ab,
                args: aa,
            },
        ) if eb == ab && ea.len() == aa.len() => {
            for (e, a) in ea.iter().zip(aa.iter()) {
                unify_at_depth(e, a, lookup, bindings, depth + 1)?;
            }
            Ok(())
        }
        // the actual argument is a Nominal alias for a generic declaration;
        // dereference it once and retry the structural match
        (Type::Parameterized { .. }, Type::Nominal(sym)) => match lookup.resolve(sym) {
            Some(decl) => unify_at_depth(expected, &decl, lookup, bindings, depth + 1),
            None => Err(UnifyError::ShapeMismatch {
                expected: expected.clone(),
                actual: actual.clone(),
            }),
        },
        _ => Err(UnifyError::ShapeMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        }),
    }
}

fn bind(
    sym: &Symbol,
    actual: &Type,
    lookup: &dyn DeclarationLookup,
    bindings: &mut GenericBindings,
) -> Result<(), UnifyError> {
    match bindings.0.get(sym) {
        None => {
            bindings.0.insert(sym.clone(), actual.clone());
            Ok(())
        }
        Some(existing) => {
            // A type parameter seen at two call-site positions (e.g. two
            // parameters sharing `T`) merges to their common supertype,
            // same as merging two branches of a conditional.
            match merge(existing, actual, lookup) {
                Ok(merged) => {
                    bindings.0.insert(sym.clone(), merged);
                    Ok(())
                }
                Err(_) => Err(UnifyError::Conflict(sym.clone())),
            }
        }
    }
}

/// Replaces every `TypeParameter` occurrence in `ty` with its binding,
/// leaving unbound parameters untouched. Used to produce a call's
/// substituted result type once every argument has been unified.
#[must_use]
pub fn substitute(ty: &Type, bindings: &GenericBindings) -> Type {
    match ty {
        Type::TypeParameter(sym) => bindings.get(sym).cloned().unwrap_or_else(|| ty.clone()),
        Type::Parameterized { base, args } => Type::Parameterized {
            base: base.clone(),
            args: args.iter().map(|a| substitute(a, bindings)).collect(),
        },
        Type::Function(f) => Type::Function(crate::ty::FunctionType {
            phase: f.phase,
            type_params: f.type_params.clone(),
            params: f
                .params
                .iter()
                .map(|p| crate::ty::Param {
                    name: p.name.clone(),
                    ty: substitute(&p.ty, bindings),
                    phase: p.phase,
                })
                .collect(),
            result: Box::new(substitute(&f.result, bindings)),
        }),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignability::NoDeclarations;
    use phasec_common::{Package, Version};

    fn sym(name: &str) -> Symbol {
        Symbol::root(Package::new("acme", "widgets", Version::new(1, 0, 0))).child(name)
    }

    #[test]
    fn a_bare_type_parameter_binds_to_the_actual_type() {
        let mut bindings = GenericBindings::new();
        let t_param = Type::TypeParameter(sym("T"));
        let int = Type::Nominal(sym("Int"));
        unify(&t_param, &int, &NoDeclarations, &mut bindings).unwrap();
        assert_eq!(bindings.get(&sym("T")), Some(&int));
    }

    #[test]
    fn repeated_type_parameter_merges_its_bindings() {
        let mut bindings = GenericBindings::new();
        let t_param = Type::TypeParameter(sym("T"));
        let int = Type::Nominal(sym("Int"));
        unify(&t_param, &int, &NoDeclarations, &mut bindings).unwrap();
        unify(&t_param, &int, &NoDeclarations, &mut bindings).unwrap();
        assert_eq!(bindings.get(&sym("T")), Some(&int));
    }

    #[test]
    fn parameterized_shapes_unify_their_arguments() {
        let list = sym("List");
        let expected = Type::Parameterized {
            base: list.clone(),
            args: vec![Type::TypeParameter(sym("T"))],
        };
        let actual = Type::Parameterized {
            base: list,
            args: vec![Type::Nominal(sym("Int"))],
        };
        let mut bindings = GenericBindings::new();
        unify(&expected, &actual, &NoDeclarations, &mut bindings).unwrap();
        assert_eq!(bindings.get(&sym("T")), Some(&Type::Nominal(sym("Int"))));
    }

    #[test]
    fn substitute_replaces_bound_parameters_only() {
        let mut bindings = GenericBindings::new();
        bindings.0.insert(sym("T"), Type::Nominal(sym("Int")));
        let ty = Type::Parameterized {
            base: sym("List"),
            args: vec![Type::TypeParameter(sym("T")), Type::TypeParameter(sym("U"))],
        };
        let result = substitute(&ty, &bindings);
        assert_eq!(
            result,
            Type::Parameterized {
                base: sym("List"),
                args: vec![Type::Nominal(sym("Int")), Type::TypeParameter(sym("U"))],
            }
        );
    }

    #[test]
    fn incompatible_repeated_bindings_conflict() {
        let mut bindings = GenericBindings::new();
        let t_param = Type::TypeParameter(sym("T"));
        unify(&t_param, &Type::Nominal(sym("Int")), &NoDeclarations, &mut bindings).unwrap();
        let err = unify(&t_param, &Type::Nominal(sym("String")), &NoDeclarations, &mut bindings)
            .unwrap_err();
        assert_eq!(err, UnifyError::Conflict(sym("T")));
    }
}
