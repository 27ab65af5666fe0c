//! Checked statements and blocks.

use phasec_common::Position;
use phasec_types::{Phase, Type};
use serde::{Deserialize, Serialize};

use crate::decl::FunctionDecl;
use crate::expr::CheckedExpr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub position: Position,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    ExprStmt(CheckedExpr),
    Assignment {
        position: Position,
        name: String,
        phase: Phase,
        ty: Type,
        expr: CheckedExpr,
    },
    /// `target` is always an `Identifier` or a nested `FieldAccess` chain
    /// rooted at one, never any other expression kind.
    Reassignment {
        position: Position,
        target: CheckedExpr,
        expr: CheckedExpr,
    },
    FunctionStmt(FunctionDecl),
}
