//! Shared foundations for the phasec semantic-analysis core.
//!
//! This crate provides the types every other `phasec-*` crate builds on:
//! - Package/version/symbol identifiers (`ident`)
//! - Declaration visibility modifiers (`access`)
//! - Source positions (`position`)
//! - The single positional diagnostic type used across the whole pipeline
//!   (`diagnostics`)
//! - Cross-cutting checker configuration (`options`)
//! - Recursion/size limits shared by the binder, checker, and lowerer
//!   (`limits`)

pub mod access;
pub mod diagnostics;
pub mod ident;
pub mod limits;
pub mod options;
pub mod position;

pub use access::Access;
pub use diagnostics::{Diagnostic, ErrorCode};
pub use ident::{Package, Symbol, Version};
pub use options::CheckerOptions;
pub use position::Position;
