pub mod assignability;
pub mod generics;
pub mod merge;
pub mod phase;
pub mod ty;

pub use assignability::{is_assignable, DeclarationLookup, NoDeclarations};
pub use generics::{unify, GenericBindings};
pub use merge::{merge, MergeError};
pub use phase::{FunctionPhase, Phase};
pub use ty::{DataLayout, EnumType, FunctionType, Param, ProtocolType, Type};
