//! Core type graph components.
//!
//! - [`Ty`] and [`QualType`]: handles to interned nodes, unqualified and
//!   qualified
//! - [`TyKind`]: every node shape (builtins, pointers, arrays, functions,
//!   sugar, dependent shapes, generic object types)
//! - [`TyFlags`]: dependence bits cached on each node
//! - declaration and expression handles in [`ids`]
//!
//! See the [`walk`] submodule for folding and visiting utilities.

mod flags;
pub mod ids;
mod kind;
mod ty;
pub mod walk;

pub use flags::{ExprDeps, TyFlags};
pub use ids::{
    EnumId, ExprRef, InterfaceId, ProtocolId, RecordId, TemplateId, TypeParamId, TypedefId,
};
pub use kind::{
    AttrKind, AutoKeyword, BuiltinKind, CheckedArrayKind, CheckedPointerKind, Children,
    ElaboratedKeyword, ExceptionSpec, FnProto, NullabilityKind, TyKind, UnaryTransformKind,
    VectorKind,
};
pub use ty::{QualType, Ty, TyS};
