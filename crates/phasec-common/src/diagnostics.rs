//! The single diagnostic type used across the whole pipeline.
//!
//! Every error in this workspace is fatal and positional: there is no
//! accumulation, no recovery, and no locale table (unlike the much larger
//! compilers this crate's conventions are drawn from) — the first
//! `Diagnostic` a stage produces is returned up through `Result<T, Diagnostic>`
//! and the driver stops there.

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// One error category per pipeline stage, grouped by the stage that raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Resolution
    UnknownName,
    UnresolvedType,
    ImportTargetNotFound,
    StaticAccessNonModulePrefix,
    WrongTypeArgumentArity,
    // Type
    TypeMismatch,
    MergeMismatch,
    NotConstructable,
    NotCallable,
    UnknownField,
    UnknownVariant,
    FieldSetMismatch,
    // Phase
    ReactiveBindingOutsideDef,
    ReassignmentOutsideSig,
    DisallowedParameterPhase,
    PhaseArgumentMismatch,
    DeclaredPhaseMismatch,
    AssignmentPhaseMismatch,
    // Access
    ImportNotVisible,
    // Impl
    ImplOutsideModule,
    DuplicateImpl,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownName => "unknown-name",
            Self::UnresolvedType => "unresolved-type",
            Self::ImportTargetNotFound => "import-target-not-found",
            Self::StaticAccessNonModulePrefix => "static-access-non-module-prefix",
            Self::WrongTypeArgumentArity => "wrong-type-argument-arity",
            Self::TypeMismatch => "type-mismatch",
            Self::MergeMismatch => "merge-mismatch",
            Self::NotConstructable => "not-constructable",
            Self::NotCallable => "not-callable",
            Self::UnknownField => "unknown-field",
            Self::UnknownVariant => "unknown-variant",
            Self::FieldSetMismatch => "field-set-mismatch",
            Self::ReactiveBindingOutsideDef => "reactive-binding-outside-def",
            Self::ReassignmentOutsideSig => "reassignment-outside-sig",
            Self::DisallowedParameterPhase => "disallowed-parameter-phase",
            Self::PhaseArgumentMismatch => "phase-argument-mismatch",
            Self::DeclaredPhaseMismatch => "declared-phase-mismatch",
            Self::AssignmentPhaseMismatch => "assignment-phase-mismatch",
            Self::ImportNotVisible => "import-not-visible",
            Self::ImplOutsideModule => "impl-outside-module",
            Self::DuplicateImpl => "duplicate-impl",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fatal, positional compiler error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub position: Position,
    /// Secondary locations worth pointing at (e.g. where a conflicting impl
    /// was declared), in the style of `tsz`'s `related_information`.
    pub related: Vec<(Position, String)>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>, position: Position) -> Self {
        Self {
            code,
            message: message.into(),
            position,
            related: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(mut self, position: Position, message: impl Into<String>) -> Self {
        self.related.push((position, message.into()));
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: error[{}]: {}",
            self.position, self.code, self.message
        )?;
        for (pos, msg) in &self.related {
            write!(f, "\n  {pos}: {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_src_line_column_format() {
        let diag = Diagnostic::new(
            ErrorCode::UnknownName,
            "cannot find `frobnicate`",
            Position::new("a.ph", 4, 9),
        );
        assert_eq!(
            diag.to_string(),
            "a.ph:4:9: error[unknown-name]: cannot find `frobnicate`"
        );
    }

    #[test]
    fn related_information_is_appended() {
        let diag = Diagnostic::new(ErrorCode::DuplicateImpl, "duplicate impl", Position::synthetic())
            .with_related(Position::new("a.ph", 1, 1), "first impl here");
        assert_eq!(diag.related.len(), 1);
        assert!(diag.to_string().contains("first impl here"));
    }
}
