//! Least-upper-bound merging of two branch types (e.g. the two arms of an
//! `if` expression, or successive `return` sites in one function body).

use crate::assignability::{is_assignable, DeclarationLookup};
use crate::ty::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeError {
    pub left: Type,
    pub right: Type,
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no common type between {:?} and {:?}", self.left, self.right)
    }
}

impl std::error::Error for MergeError {}

/// Merges two checked types into their least upper bound: identical types
/// merge to themselves, `Nothing` defers entirely to the other side, and
/// otherwise whichever side the other is assignable to wins. Two types with
/// no assignability relation in either direction cannot be merged.
pub fn merge(a: &Type, b: &Type, lookup: &dyn DeclarationLookup) -> Result<Type, MergeError> {
    if a == b {
        return Ok(a.clone());
    }
    if a.is_nothing() {
        return Ok(b.clone());
    }
    if b.is_nothing() {
        return Ok(a.clone());
    }
    if is_assignable(a, Some(b), lookup) {
        return Ok(b.clone());
    }
    if is_assignable(b, Some(a), lookup) {
        return Ok(a.clone());
    }
    Err(MergeError {
        left: a.clone(),
        right: b.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignability::NoDeclarations;
    use phasec_common::{Package, Symbol, Version};

    fn sym(name: &str) -> Symbol {
        Symbol::root(Package::new("acme", "widgets", Version::new(1, 0, 0))).child(name)
    }

    #[test]
    fn identical_types_merge_to_themselves() {
        let t = Type::Nominal(sym("Int"));
        assert_eq!(merge(&t, &t, &NoDeclarations).unwrap(), t);
    }

    #[test]
    fn nothing_merges_to_the_other_side() {
        let t = Type::Nominal(sym("Int"));
        assert_eq!(merge(&Type::Nothing, &t, &NoDeclarations).unwrap(), t);
        assert_eq!(merge(&t, &Type::Nothing, &NoDeclarations).unwrap(), t);
    }

    #[test]
    fn type_parameter_merges_to_the_concrete_side() {
        let concrete = Type::Nominal(sym("Int"));
        let param = Type::TypeParameter(sym("T"));
        // TypeParameter is assignable either direction, so the first operand
        // to appear as `a` in is_assignable wins.
        assert_eq!(merge(&param, &concrete, &NoDeclarations).unwrap(), concrete);
    }

    #[test]
    fn unrelated_types_fail_to_merge() {
        let int = Type::Nominal(sym("Int"));
        let string = Type::Nominal(sym("String"));
        assert!(merge(&int, &string, &NoDeclarations).is_err());
    }
}
