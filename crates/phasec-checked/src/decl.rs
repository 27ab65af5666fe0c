//! Checked declarations: the output of the type & phase checker for one
//! file's top-level content. Unlike the parse tree, imports do not appear
//! here — their effect is already folded into the global symbol table.

use phasec_common::{Access, Position, Symbol};
use phasec_types::{DataLayout, EnumType, FunctionPhase, ProtocolType, Type};
use serde::{Deserialize, Serialize};

use crate::stmt::Block;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedParam {
    pub name: String,
    pub ty: Type,
    pub phase: Option<phasec_types::Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Block),
    Extern(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub position: Position,
    pub access: Access,
    pub symbol: Symbol,
    pub function_phase: FunctionPhase,
    pub type_params: Vec<Symbol>,
    pub params: Vec<CheckedParam>,
    pub result: Type,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDecl {
    pub position: Position,
    pub access: Access,
    pub symbol: Symbol,
    pub ty: Type,
    pub expr: Option<crate::expr::CheckedExpr>,
    pub external: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDecl {
    pub position: Position,
    pub access: Access,
    pub layout: DataLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub position: Position,
    pub access: Access,
    pub enum_ty: EnumType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplDecl {
    pub position: Position,
    pub symbol: Symbol,
    pub type_params: Vec<Symbol>,
    pub base: Type,
    pub protocol: Option<Symbol>,
    pub methods: Vec<FunctionDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDecl {
    pub position: Position,
    pub access: Access,
    pub protocol: ProtocolType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Constant(ConstantDecl),
    Function(FunctionDecl),
    Data(DataDecl),
    Enum(EnumDecl),
    Impl(ImplDecl),
    Protocol(ProtocolDecl),
}

/// One checked source file: every top-level declaration, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedFile {
    pub path: String,
    pub declarations: Vec<Decl>,
}
