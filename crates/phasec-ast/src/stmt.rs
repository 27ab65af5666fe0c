//! Parse-level statements and blocks.

use phasec_common::Position;
use phasec_types::Phase;
use serde::{Deserialize, Serialize};

use crate::decl::FunctionDecl;
use crate::expr::Expr;
use crate::ty_expr::TypeExpr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub position: Position,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    ExprStmt(Expr),
    /// Introduces a name at a declared phase: `const`/`val`/`var`/`flow x = expr`.
    Assignment {
        position: Position,
        name: String,
        phase: Phase,
        ty: Option<TypeExpr>,
        expr: Expr,
    },
    /// Writes to an existing `var`, possibly through a chain of field
    /// accesses. `target` is restricted at parse time to `Identifier` or
    /// nested `FieldAccess` expression kinds; the checker re-validates this.
    Reassignment {
        position: Position,
        target: Expr,
        expr: Expr,
    },
    FunctionStmt(FunctionDecl),
}
