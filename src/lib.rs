//! Quail - type representation for C-family front ends
//!
//! # Overview
//!
//! Quail models the types of C, C++, Objective-C and the bounds-checked C
//! dialect the way a compiler front end needs them:
//!
//! - Qualified types with cv, address-space, GC and ownership qualifiers
//! - A hash-consed type graph where every node knows its canonical form
//! - Structural predicates (integral, scalar, POD, trivially copyable, ...)
//! - Linkage and visibility of types
//! - Substitution of Objective-C generic arguments into member types
//!
//! # Quick Start
//!
//! ```
//! use quail::{LangOptions, TargetInfo, ty};
//!
//! quail::with_context(LangOptions::c11(), TargetInfo::x86_64(), |tcx, decls| {
//!     // typedef unsigned long size_t;
//!     let size_t = tcx.mk_typedef(decls.add_typedef("size_t", tcx.ulong()));
//!
//!     // size_t (*)(const char *)
//!     let strlen = ty!(tcx, Ptr[(Ptr[Const[Char]]) => size_t]);
//!     assert_eq!(strlen.display(tcx).to_string(), "size_t (*)(const char *)");
//!
//!     // Sugar never changes what a type is.
//!     assert_eq!(strlen.canonical(), ty!(tcx, Ptr[(Ptr[Const[Char]]) => ULong]).canonical());
//!     assert!(size_t.ty.is_integer_type(tcx));
//! });
//! ```
//!
//! # Contexts
//!
//! Every type lives in the arena of a [`TyCtxt`]. [`with_context`] sets up
//! an arena, a [`DeclTable`] and a context for the duration of a closure.
//! Hosts with their own declaration storage build a [`TyCtxt`] directly
//! over any [`DeclStore`].

pub use quail_types::*;

use bumpalo::Bump;

/// Runs `f` with a fresh context over an in-memory declaration table.
///
/// Types and declarations created inside `f` are freed when it returns.
pub fn with_context<R>(
    lang: LangOptions,
    target: TargetInfo,
    f: impl for<'tcx> FnOnce(TyCtxt<'tcx>, &'tcx DeclTable<'tcx>) -> R,
) -> R {
    let arena = Bump::new();
    let decls = DeclTable::new(&arena);
    let tcx = TyCtxt::new(&arena, &decls, lang, target);
    f(tcx, &decls)
}
