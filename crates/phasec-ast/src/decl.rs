//! Parse-level declarations: one file's top-level content before symbol
//! qualification.

use indexmap::IndexMap;
use phasec_common::{Access, Position};
use phasec_types::{FunctionPhase, Phase};
use serde::{Deserialize, Serialize};

use crate::stmt::Block;
use crate::ty_expr::TypeExpr;

/// An import expression tree: a `Nominal` leaf or a `Nested` internal node
/// grouping several children under one base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportExpr {
    Nominal { name: String },
    Nested { base: String, children: Vec<ImportExpr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub position: Position,
    /// The dependency-manager alias this import resolves through, or `None`
    /// when the import reaches into the current package.
    pub package_alias: Option<String>,
    pub tree: ImportExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredParam {
    pub name: String,
    pub phase: Option<Phase>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Block),
    /// Links to a runtime-provided implementation under this name.
    Extern(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub position: Position,
    pub access: Access,
    pub name: String,
    pub function_phase: FunctionPhase,
    pub type_params: Vec<String>,
    pub params: Vec<DeclaredParam>,
    pub result: Option<TypeExpr>,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDecl {
    pub position: Position,
    pub access: Access,
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub expr: Option<crate::expr::Expr>,
    pub external: Option<String>,
}

/// The unparameterized shape of a `Data` declaration's layout, shared with
/// `Enum` variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParsedLayout {
    Struct { fields: IndexMap<String, TypeExpr> },
    Tuple { fields: Vec<TypeExpr> },
    Atom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDecl {
    pub position: Position,
    pub access: Access,
    pub name: String,
    pub type_params: Vec<String>,
    pub layout: ParsedLayout,
    /// Set when this `Data` declaration is actually one variant of an enum
    /// declared elsewhere.
    pub enum_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub position: Position,
    pub access: Access,
    pub name: String,
    pub type_params: Vec<String>,
    pub variants: IndexMap<String, ParsedLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplDecl {
    pub position: Position,
    /// An explicit alias for this impl block, if the source gave it one;
    /// otherwise the collector assigns a synthetic name.
    pub name: Option<String>,
    pub type_params: Vec<String>,
    pub base: TypeExpr,
    pub protocol: Option<TypeExpr>,
    pub methods: Vec<FunctionDecl>,
}

/// A protocol method signature: no body, just the shape an impl must match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMethod {
    pub position: Position,
    pub name: String,
    pub function_phase: FunctionPhase,
    pub type_params: Vec<String>,
    pub params: Vec<DeclaredParam>,
    pub result: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDecl {
    pub position: Position,
    pub access: Access,
    pub name: String,
    pub type_params: Vec<String>,
    pub methods: Vec<ProtocolMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopLevelDecl {
    Constant(ConstantDecl),
    Function(FunctionDecl),
    Data(DataDecl),
    Enum(EnumDecl),
    Impl(ImplDecl),
    Protocol(ProtocolDecl),
}

/// One parsed source file: its imports plus every top-level declaration, in
/// source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub imports: Vec<ImportDecl>,
    pub declarations: Vec<TopLevelDecl>,
}
