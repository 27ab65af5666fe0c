//! Centralized recursion/size limits shared across the pipeline.

/// Recursion depth guard for recursive generic unification and for
/// dereferencing a nominal type to its declaration and retrying.
pub const MAX_GENERIC_DEPTH: usize = 64;

/// Maximum number of segments a qualified symbol path may have before the
/// qualifier gives up rather than looping on a malformed import tree.
pub const MAX_SYMBOL_PATH_LEN: usize = 256;
