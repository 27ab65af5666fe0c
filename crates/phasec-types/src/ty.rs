//! Checked type expressions.
//!
//! Invariant: every `Type` built past symbol qualification is fully
//! qualified — no variant carries a bare `String` name, only `Symbol`s.

use indexmap::IndexMap;
use phasec_common::Symbol;
use serde::{Deserialize, Serialize};

use crate::phase::{FunctionPhase, Phase};

/// A function parameter: its type plus an optional expression-phase
/// annotation (absent means "accept at least `val`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub phase: Option<Phase>,
}

impl Param {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            phase: None,
        }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }
}

/// A function type: `(function-phase, type-parameters, parameters, result)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    pub phase: FunctionPhase,
    pub type_params: Vec<Symbol>,
    pub params: Vec<Param>,
    pub result: Box<Type>,
}

/// One of the three data layouts a `Data` declaration can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataLayout {
    Struct {
        name: Symbol,
        type_params: Vec<Symbol>,
        fields: IndexMap<String, Type>,
        /// Names the enum whose variant this layout is, if any.
        enum_tag: Option<Symbol>,
    },
    Tuple {
        name: Symbol,
        type_params: Vec<Symbol>,
        fields: Vec<Type>,
        enum_tag: Option<Symbol>,
    },
    Atom {
        name: Symbol,
        type_params: Vec<Symbol>,
        enum_tag: Option<Symbol>,
    },
}

impl DataLayout {
    #[must_use]
    pub fn name(&self) -> &Symbol {
        match self {
            DataLayout::Struct { name, .. }
            | DataLayout::Tuple { name, .. }
            | DataLayout::Atom { name, .. } => name,
        }
    }

    #[must_use]
    pub fn type_params(&self) -> &[Symbol] {
        match self {
            DataLayout::Struct { type_params, .. }
            | DataLayout::Tuple { type_params, .. }
            | DataLayout::Atom { type_params, .. } => type_params,
        }
    }

    #[must_use]
    pub fn enum_tag(&self) -> Option<&Symbol> {
        match self {
            DataLayout::Struct { enum_tag, .. }
            | DataLayout::Tuple { enum_tag, .. }
            | DataLayout::Atom { enum_tag, .. } => enum_tag.as_ref(),
        }
    }
}

/// `{name, type-params, variants as ordered map of name -> DataLayout}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: Symbol,
    pub type_params: Vec<Symbol>,
    pub variants: IndexMap<String, DataLayout>,
}

/// A trait-like named type with methods (signatures only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolType {
    pub name: Symbol,
    pub type_params: Vec<Symbol>,
    pub methods: IndexMap<String, FunctionType>,
}

/// A checked type expression: a tagged sum over the nine shapes a checked
/// program can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    /// A bare symbol reference to a declared data type.
    Nominal(Symbol),
    /// A Nominal base plus an ordered list of type arguments.
    Parameterized { base: Symbol, args: Vec<Type> },
    /// A symbol naming a generic parameter in scope.
    TypeParameter(Symbol),
    Function(FunctionType),
    /// Ordered list of Function branches; used only for built-in operators.
    /// Overloads carry no generics.
    Overload(Vec<FunctionType>),
    /// A package or sub-module, used for static access.
    Module(Symbol),
    DataLayout(Box<DataLayout>),
    Enum(Box<EnumType>),
    Protocol(Box<ProtocolType>),
    /// The bottom type: assignable to anything, produced e.g. by `return`
    /// expressions and used as the seed value when merging branch types.
    Nothing,
}

impl Type {
    #[must_use]
    pub fn nominal(sym: Symbol) -> Self {
        Type::Nominal(sym)
    }

    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Type::Nothing)
    }

    /// The symbol a Nominal/Parameterized/Module/DataLayout/Enum/Protocol
    /// type names, for diagnostics and the `enclosing.child(...)` pattern
    /// used when registering generics. `None` for structural-only shapes
    /// (`Function`, `Overload`, `TypeParameter`, `Nothing`).
    #[must_use]
    pub fn head_symbol(&self) -> Option<&Symbol> {
        match self {
            Type::Nominal(sym) | Type::Parameterized { base: sym, .. } | Type::Module(sym) => {
                Some(sym)
            }
            Type::DataLayout(layout) => Some(layout.name()),
            Type::Enum(e) => Some(&e.name),
            Type::Protocol(p) => Some(&p.name),
            Type::TypeParameter(_) | Type::Function(_) | Type::Overload(_) | Type::Nothing => None,
        }
    }
}
