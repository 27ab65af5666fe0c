//! The checked tree: what the type & phase checker (spec.md §4.4) produces
//! from a `phasec_ast::ParsedFile` once every name is resolved to a symbol
//! and every expression carries a type and a phase. The transform and
//! lowering passes both consume this tree rather than the parse tree.

pub mod decl;
pub mod expr;
pub mod stmt;

pub use decl::{
    CheckedFile, CheckedParam, ConstantDecl, DataDecl, Decl, EnumDecl, FunctionBody, FunctionDecl,
    ImplDecl, ProtocolDecl,
};
pub use expr::{CheckedExpr, CheckedExprKind, CheckedLambdaParam};
pub use stmt::{Block, Stmt};
