//! Import verification and the bidirectional type & phase checker (spec.md
//! §4.3, §4.4): consumes the frozen tables `phasec_binder` produces and a
//! `phasec_ast::ParsedFile`, producing a `phasec_checked::CheckedFile` or
//! the first diagnostic encountered. `Checker`'s `impl` block is split
//! across `checker.rs` (file/declaration descent), `stmt.rs` (blocks and
//! statements), `expr.rs` (bidirectional expression checking), and
//! `calls.rs` (call-site generic inference and dispatch).

mod calls;
mod checker;
mod expr;
mod import_verifier;
mod phase_rules;
mod scope;
mod stmt;

pub use checker::Checker;
pub use import_verifier::{is_visible, verify_import};
pub use phase_rules::{
    argument_contribution, call_phase, check_assignment_phase, check_binding_requires_def,
    check_declared_phase_at_least, check_parameter_phase, check_reassignment_requires_sig,
    join_contributions, phase_capability_rank,
};
pub use scope::{Binding, FunctionScope, Scope};
