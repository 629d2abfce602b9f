//! Type representation for a C-family compiler front end.
//!
//! Types are interned nodes owned by a [`TyCtxt`]. A [`Ty`] is a handle to
//! one node and compares by identity; a [`QualType`] pairs it with local
//! [`Qualifiers`]. Every node knows its canonical form, so two types are
//! the same type exactly when their canonical handles are equal.
//!
//! On top of the node graph the crate answers the questions a semantic
//! analyzer asks of a type: desugaring, structural predicates, layout,
//! linkage, and substitution of Objective-C generic arguments.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use quail_types::{ty, DeclTable, LangOptions, TargetInfo, TyCtxt};
//!
//! let arena = Bump::new();
//! let decls = DeclTable::new(&arena);
//! let tcx = TyCtxt::new(&arena, &decls, LangOptions::c11(), TargetInfo::x86_64());
//!
//! let size_t = tcx.mk_typedef(decls.add_typedef("size_t", tcx.ulong()));
//! let p = ty!(tcx, Ptr[Const[size_t]]);
//!
//! assert_eq!(p.canonical(), ty!(tcx, Ptr[Const[ULong]]));
//! assert_eq!(p.display(tcx).to_string(), "const size_t *");
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
extern crate alloc;

#[macro_use]
mod macros;

pub mod context;
pub mod core;
pub mod decl;
pub mod desugar;
pub mod display;
pub mod error;
pub mod layout;
pub mod linkage;
pub mod objc;
pub mod options;
pub mod predicates;
pub mod qualifiers;
pub mod transform;

#[cfg(test)]
pub mod test_utils;

pub use crate::context::TyCtxt;
pub use crate::core::{
    AttrKind, AutoKeyword, BuiltinKind, CheckedArrayKind, CheckedPointerKind, ElaboratedKeyword, EnumId,
    ExceptionSpec, ExprDeps, ExprRef, FnProto, InterfaceId, NullabilityKind, ProtocolId, QualType, RecordId,
    TemplateId, Ty, TyFlags, TyKind, TypeParamId, TypedefId, UnaryTransformKind, VectorKind,
};
pub use crate::decl::{
    BaseSpec, CxxRecordFlags, DeclStore, DeclTable, EnumDecl, ExprStore, FieldDecl, InterfaceDecl, NoExprs,
    RecordDecl, RecordFlags, TagKind, TemplateKind, Variance,
};
pub use crate::display::TyDisplay;
pub use crate::error::{QualifierError, SubstError};
pub use crate::layout::{RecordLayout, TypeInfo};
pub use crate::linkage::{CachedProperties, Linkage, LinkageInfo, Visibility};
pub use crate::objc::{ObjCObjectPointerTy, ObjCObjectTy, ObjCSubstitutionContext};
pub use crate::options::{LangOptions, TargetInfo};
pub use crate::predicates::{CanThrow, DestructionKind, NoexceptResult, ScalarTypeKind};
pub use crate::qualifiers::{AddressSpace, Cvr, GcAttr, Lifetime, QualifierCollector, Qualifiers};
pub use crate::transform::simple_transform;
