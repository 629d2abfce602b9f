//! The type context: arena, interner and configuration.
//!
//! [`TyCtxt`] is a small `Copy` handle. Everything it points to lives in the
//! arena for `'tcx`, so types, type lists and layouts handed out by the
//! context stay valid for as long as the arena does.
//!
//! Nodes are hash-consed: interning a kind that already exists returns the
//! existing node, which makes `Ty` equality a pointer comparison.

mod canonical;
mod mk;

use core::cell::RefCell;
use core::{fmt, hash};

use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap, HashSet};
use tracing::trace;

use crate::core::{BuiltinKind, RecordId, Ty, TyKind, TyS};
use crate::decl::{DeclStore, ExprStore, NoExprs};
use crate::layout::RecordLayout;
use crate::options::{LangOptions, TargetInfo};

type Interner<'tcx> = HashSet<&'tcx TyS<'tcx>, DefaultHashBuilder, &'tcx Bump>;
type LayoutCache<'tcx> = HashMap<RecordId, &'tcx RecordLayout<'tcx>, DefaultHashBuilder, &'tcx Bump>;

const BUILTINS: [BuiltinKind; 33] = [
    BuiltinKind::Void,
    BuiltinKind::Bool,
    BuiltinKind::CharU,
    BuiltinKind::UChar,
    BuiltinKind::WCharU,
    BuiltinKind::Char16,
    BuiltinKind::Char32,
    BuiltinKind::UShort,
    BuiltinKind::UInt,
    BuiltinKind::ULong,
    BuiltinKind::ULongLong,
    BuiltinKind::UInt128,
    BuiltinKind::CharS,
    BuiltinKind::SChar,
    BuiltinKind::WCharS,
    BuiltinKind::Short,
    BuiltinKind::Int,
    BuiltinKind::Long,
    BuiltinKind::LongLong,
    BuiltinKind::Int128,
    BuiltinKind::Half,
    BuiltinKind::Float,
    BuiltinKind::Double,
    BuiltinKind::LongDouble,
    BuiltinKind::Float128,
    BuiltinKind::NullPtr,
    BuiltinKind::ObjCId,
    BuiltinKind::ObjCClass,
    BuiltinKind::ObjCSel,
    BuiltinKind::Dependent,
    BuiltinKind::Overload,
    BuiltinKind::BoundMember,
    BuiltinKind::UnknownAny,
];

/// Handle to the type context.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use quail_types::{DeclTable, LangOptions, TargetInfo, TyCtxt};
///
/// let arena = Bump::new();
/// let decls = DeclTable::new(&arena);
/// let tcx = TyCtxt::new(&arena, &decls, LangOptions::c11(), TargetInfo::x86_64());
///
/// let p1 = tcx.mk_pointer(tcx.int().with_const());
/// let p2 = tcx.mk_pointer(tcx.int().with_const());
/// assert_eq!(p1, p2);
/// ```
#[derive(Clone, Copy)]
pub struct TyCtxt<'tcx> {
    arena: &'tcx Bump,
    interner: &'tcx RefCell<Interner<'tcx>>,
    layouts: &'tcx RefCell<LayoutCache<'tcx>>,
    decls: &'tcx dyn DeclStore<'tcx>,
    exprs: &'tcx dyn ExprStore,
    lang: &'tcx LangOptions,
    target: &'tcx TargetInfo,
    builtins: &'tcx [Ty<'tcx>],
}

impl<'tcx> fmt::Debug for TyCtxt<'tcx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TyCtxt")
            .field("arena", &(self.arena as *const Bump))
            .field("lang", self.lang)
            .finish_non_exhaustive()
    }
}

// Two handles are equal if they share an interner.
impl<'tcx> PartialEq for TyCtxt<'tcx> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.interner, other.interner)
    }
}

impl<'tcx> Eq for TyCtxt<'tcx> {}

impl<'tcx> hash::Hash for TyCtxt<'tcx> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.interner, state)
    }
}

impl<'tcx> TyCtxt<'tcx> {
    pub fn new(
        arena: &'tcx Bump,
        decls: &'tcx dyn DeclStore<'tcx>,
        lang: LangOptions,
        target: TargetInfo,
    ) -> Self {
        let interner = arena.alloc(RefCell::new(HashSet::with_capacity_in(256, arena)));
        let layouts = arena.alloc(RefCell::new(HashMap::with_capacity_in(16, arena)));
        let mut tcx = Self {
            arena,
            interner,
            layouts,
            decls,
            exprs: &NoExprs,
            lang: arena.alloc(lang),
            target: arena.alloc(target),
            builtins: &[],
        };
        let builtins =
            arena.alloc_slice_fill_iter(BUILTINS.iter().map(|&kind| tcx.intern(TyKind::Builtin(kind))));
        tcx.builtins = builtins;
        tcx
    }

    /// Uses `exprs` to evaluate `noexcept` conditions.
    pub fn with_exprs(self, exprs: &'tcx dyn ExprStore) -> Self {
        Self { exprs, ..self }
    }

    pub fn arena(self) -> &'tcx Bump {
        self.arena
    }

    pub fn decls(self) -> &'tcx dyn DeclStore<'tcx> {
        self.decls
    }

    pub fn exprs(self) -> &'tcx dyn ExprStore {
        self.exprs
    }

    pub fn lang(self) -> &'tcx LangOptions {
        self.lang
    }

    pub fn target(self) -> &'tcx TargetInfo {
        self.target
    }

    pub(crate) fn layouts(self) -> &'tcx RefCell<LayoutCache<'tcx>> {
        self.layouts
    }

    /// Returns the unique node for `kind`, creating it on first use.
    pub fn intern(self, kind: TyKind<'tcx>) -> Ty<'tcx> {
        if let Some(&node) = self.interner.borrow().get(&kind) {
            return Ty::from_interned(node);
        }

        // Computing the canonical form may intern other nodes, so the
        // interner must not be borrowed here.
        let flags = kind.compute_flags(self.decls);
        let canonical = self.canonical_of(&kind);

        let mut set = self.interner.borrow_mut();
        if let Some(&node) = set.get(&kind) {
            return Ty::from_interned(node);
        }
        let node: &'tcx TyS<'tcx> = self.arena.alloc(TyS::new(kind, flags, canonical));
        set.insert(node);
        trace!(?kind, ?flags, canonical = canonical.is_none(), "interned type node");
        Ty::from_interned(node)
    }

    /// Number of distinct nodes interned so far.
    pub fn interned_count(self) -> usize {
        self.interner.borrow().len()
    }

    pub(crate) fn builtin_ty(self, kind: BuiltinKind) -> Ty<'tcx> {
        self.builtins[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QualType;
    use crate::test_utils::with_tcx;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_are_preinterned() {
        with_tcx(|tcx, _| {
            for kind in BUILTINS {
                assert_eq!(tcx.builtin_ty(kind).kind(), &TyKind::Builtin(kind));
            }
        });
    }

    #[test]
    fn test_intern_deduplicates() {
        with_tcx(|tcx, _| {
            let before = tcx.interned_count();
            let a = tcx.intern(TyKind::Complex(tcx.double()));
            let b = tcx.intern(TyKind::Complex(tcx.double()));
            assert_eq!(a, b);
            assert_eq!(tcx.interned_count(), before + 1);
        });
    }

    #[test]
    fn test_qualifiers_do_not_intern() {
        with_tcx(|tcx, _| {
            let before = tcx.interned_count();
            let c = tcx.int().with_const().with_volatile();
            assert_eq!(c.ty, tcx.int().ty);
            assert_eq!(tcx.interned_count(), before);
            assert_ne!(c, QualType::unqualified(tcx.int().ty));
        });
    }
}
