//! The reactive IR (spec.md §4.6, §6.2): a target-agnostic tree with three
//! layers — expressions (pure values plus the explicit signal
//! constructors), statements (sequencing and mutation), and declarations
//! (module-level). Distinct from `phasec_checked`'s tree: no node here
//! carries a `Type`/`Phase` — the wrap/unwrap rewrites the lowerer performs
//! have already made every reactive boundary explicit in the tree's shape.

use indexmap::IndexMap;
use phasec_common::Symbol;
use phasec_types::{DataLayout, EnumType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrExpr {
    BoolLiteral(bool),
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    NoOp,
    Identifier(String),

    ListLiteral(Vec<IrExpr>),
    SetLiteral(Vec<IrExpr>),
    MapLiteral(Vec<(IrExpr, IrExpr)>),
    Not(Box<IrExpr>),
    And(Box<IrExpr>, Box<IrExpr>),
    Or(Box<IrExpr>, Box<IrExpr>),
    FieldAccess {
        base: Box<IrExpr>,
        field: String,
    },
    Construct {
        base: Symbol,
        fields: IndexMap<String, IrExpr>,
    },
    Call {
        callee: Box<IrExpr>,
        args: Vec<IrExpr>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<IrExpr>,
    },
    /// An expression that needed temporaries to compute (e.g. an `if` used
    /// as an expression): a sequence of statements followed by a result
    /// expression, per §4.6.
    Block {
        statements: Vec<IrStmt>,
        result: Box<IrExpr>,
    },

    /// A signal permanently holding a constant value — lifts an eager value
    /// into the signal world.
    Singleton(Box<IrExpr>),
    /// A writable signal cell.
    Variable(Box<IrExpr>),
    /// A writable view of another signal via a getter/setter pair.
    Projection {
        root: Box<IrExpr>,
        getter: Box<IrExpr>,
        setter: Box<IrExpr>,
    },
    /// A cached derived computation over source signals.
    Flow {
        sources: Vec<IrExpr>,
        params: Vec<String>,
        body: Box<IrExpr>,
    },
    /// Like `Flow`, but its compute produces another signal the runtime
    /// subscribes through, owning any effects registered inside.
    Def {
        sources: Vec<IrExpr>,
        params: Vec<String>,
        body: Box<IrExpr>,
    },
    /// Unwraps a signal to its current value: `.get()`.
    FlowGet(Box<IrExpr>),
    /// Writes a new value into a signal: `.set(value)`.
    FlowSet {
        target: Box<IrExpr>,
        value: Box<IrExpr>,
    },
    /// `is` type test (the checked `Is` node); the IR drops the full
    /// `Type`, keeping only the nominal symbol the runtime would compare
    /// against.
    TypeTest {
        expr: Box<IrExpr>,
        ty: Symbol,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrStmt {
    ExprStmt(IrExpr),
    /// A non-reactive (`const`/`val`) local binding.
    Let { name: String, expr: IrExpr },
    /// A reactive (`var`) local binding — `expr` is already the `Variable(...)`-
    /// wrapped initializer.
    VarDecl { name: String, expr: IrExpr },
    /// A write to an already-bound signal, usually the tail of a
    /// `Projection`/`FlowSet` pipeline.
    Assign { target: IrExpr, expr: IrExpr },
    If {
        condition: IrExpr,
        then_block: Vec<IrStmt>,
        else_block: Option<Vec<IrStmt>>,
    },
    Return(Option<IrExpr>),
    /// A function declared inside another function's body (the checked
    /// tree's `FunctionStmt`).
    LocalFunction(IrFunction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<IrStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrDecl {
    /// A module-level import: either a cross-module static reference
    /// collected during the pre-walk, or an `extern` pass-through
    /// re-export, per §4.6's "Static references ... are emitted as
    /// module-level imports" and "external declarations are re-exported as
    /// pass-through imports."
    Import {
        source: String,
        imported_name: String,
        local_name: String,
    },
    Export {
        name: String,
    },
    Const {
        name: String,
        expr: IrExpr,
    },
    Function(IrFunction),
    Data(DataLayout),
    Enum(EnumType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrFile {
    pub path: String,
    pub declarations: Vec<IrDecl>,
}
