//! Parse-level expressions.

use indexmap::IndexMap;
use phasec_common::Position;
use serde::{Deserialize, Serialize};

use crate::stmt::Block;
use crate::ty_expr::TypeExpr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub position: Position,
    pub kind: ExprKind,
}

impl Expr {
    #[must_use]
    pub fn new(position: Position, kind: ExprKind) -> Self {
        Self { position, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    // Leaves
    BoolLiteral(bool),
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    NoOp,
    Identifier(String),
    /// A dotted static-access path rooted at an identifier, e.g. `Pkg::Mod::Item`.
    StaticReference(Vec<String>),

    // Composite
    ListLiteral(Vec<Expr>),
    SetLiteral(Vec<Expr>),
    MapLiteral(Vec<(Expr, Expr)>),
    Is {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    FieldAccess {
        base: Box<Expr>,
        field: String,
    },
    Construct {
        base: TypeExpr,
        fields: IndexMap<String, Expr>,
    },
    Call {
        callee: Box<Expr>,
        type_args: Vec<TypeExpr>,
        args: Vec<Expr>,
    },
    Lambda {
        params: Vec<LambdaParam>,
        body: Box<Expr>,
    },
    Block(Block),
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Return(Option<Box<Expr>>),
}

/// A lambda parameter. Its type is only required when the call site gives
/// the lambda no expected function type to infer from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaParam {
    pub name: String,
    pub ty: Option<TypeExpr>,
}
