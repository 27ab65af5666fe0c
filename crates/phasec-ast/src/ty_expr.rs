//! Parse-level type expressions: unresolved names, as the parser hands them
//! to the symbol qualifier. Distinct from `phasec_types::Type`, which only
//! ever carries fully qualified symbols.

use phasec_types::Phase;
use serde::{Deserialize, Serialize};

/// A parse-level type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// A single identifier: either a generic in scope or a name to look up
    /// in the local qualifier mapping.
    Identifier(String),
    /// A dotted chain `A::B::C`.
    Dotted(Vec<String>),
    /// `Base<args>`.
    Parameterized { base: Box<TypeExpr>, args: Vec<TypeExpr> },
    /// `fn{params -> result}`.
    Function {
        params: Vec<ParamTypeExpr>,
        result: Box<TypeExpr>,
    },
}

/// One parameter slot in a parse-level function type: its type plus an
/// optional phase keyword (`const`/`val`/`var`/`flow`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamTypeExpr {
    pub phase: Option<Phase>,
    pub ty: TypeExpr,
}

impl ParamTypeExpr {
    #[must_use]
    pub fn new(ty: TypeExpr) -> Self {
        Self { phase: None, ty }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }
}
