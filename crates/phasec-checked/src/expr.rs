//! Checked expressions: every node carries `{position, type, phase}` in
//! addition to its kind. Distinct from `phasec_ast::Expr` — no node here
//! carries an unresolved name.

use indexmap::IndexMap;
use phasec_common::{Position, Symbol};
use phasec_types::{Phase, Type};
use serde::{Deserialize, Serialize};

use crate::stmt::Block;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedExpr {
    pub position: Position,
    pub ty: Type,
    pub phase: Phase,
    pub kind: CheckedExprKind,
}

impl CheckedExpr {
    #[must_use]
    pub fn new(position: Position, ty: Type, phase: Phase, kind: CheckedExprKind) -> Self {
        Self { position, ty, phase, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CheckedExprKind {
    BoolLiteral(bool),
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    NoOp,
    /// A local binding lookup by name; resolved against the scope chain, not
    /// a global symbol.
    Identifier(String),
    /// A fully resolved static-access path: the leaf's symbol, the module
    /// that declares it, and (denormalized for convenience) its type —
    /// already present on the enclosing `CheckedExpr::ty`.
    StaticReference { symbol: Symbol, declaring_module: Symbol },

    ListLiteral(Vec<CheckedExpr>),
    /// Placeholder behavior for set literals: represented the same as a
    /// list literal until the IR layer distinguishes them.
    SetLiteral(Vec<CheckedExpr>),
    MapLiteral(Vec<(CheckedExpr, CheckedExpr)>),
    Is {
        expr: Box<CheckedExpr>,
        ty: Type,
    },
    Not(Box<CheckedExpr>),
    And(Box<CheckedExpr>, Box<CheckedExpr>),
    Or(Box<CheckedExpr>, Box<CheckedExpr>),
    FieldAccess {
        base: Box<CheckedExpr>,
        field: String,
    },
    Construct {
        base: Type,
        fields: IndexMap<String, CheckedExpr>,
    },
    Call {
        callee: Box<CheckedExpr>,
        args: Vec<CheckedExpr>,
    },
    Lambda {
        params: Vec<CheckedLambdaParam>,
        body: Box<CheckedExpr>,
    },
    Block(Block),
    If {
        condition: Box<CheckedExpr>,
        then_branch: Box<CheckedExpr>,
        else_branch: Option<Box<CheckedExpr>>,
    },
    Return(Option<Box<CheckedExpr>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedLambdaParam {
    pub name: String,
    pub ty: Type,
}
