//! Parse-tree node definitions: the shape an external parser hands to the
//! symbol qualifier. Deliberately disjoint from `phasec_checked`'s checked
//! tree — no node here carries a resolved symbol or a computed type.

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod ty_expr;

pub use decl::{
    ConstantDecl, DataDecl, DeclaredParam, EnumDecl, FunctionBody, FunctionDecl, ImplDecl,
    ImportDecl, ImportExpr, ParsedFile, ParsedLayout, ProtocolDecl, ProtocolMethod, TopLevelDecl,
};
pub use phasec_common::Access;
pub use expr::{Expr, ExprKind, LambdaParam};
pub use stmt::{Block, Stmt};
pub use ty_expr::{ParamTypeExpr, TypeExpr};
