//! Cross-cutting checker configuration.
//!
//! Phase inference, assignability, and the reactive lowering rules are not
//! configurable — they're fixed by the language semantics. `CheckerOptions`
//! exists for the knobs that are genuinely orthogonal to those semantics:
//! recursion guards and how strictly declared-vs-inferred phase mismatches
//! are reported.

#[derive(Debug, Clone)]
pub struct CheckerOptions {
    /// A declared phase is always checked against the computed one, and a
    /// mismatch is always an error in a conforming build; this field exists
    /// only so tests can assert on that error path being reachable without
    /// going through a full program.
    pub strict_phase_inference: bool,
    /// Recursion guard for the recursive generic-unification walk and the
    /// generic substitution done when resolving impls and enum variants.
    /// Exceeding this is an internal-limits condition, not a diagnostic.
    pub max_generic_depth: usize,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            strict_phase_inference: true,
            max_generic_depth: crate::limits::MAX_GENERIC_DEPTH,
        }
    }
}
