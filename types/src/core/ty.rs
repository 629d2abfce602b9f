use core::{fmt, hash};

use hashbrown::Equivalent;
use once_cell::unsync::OnceCell;

use super::flags::TyFlags;
use super::kind::TyKind;
use crate::linkage::CachedProperties;
use crate::qualifiers::{Cvr, Qualifiers};

/// An interned type node.
///
/// Nodes are created only by [`TyCtxt`](crate::context::TyCtxt), which
/// deduplicates them by kind, so two nodes with the same kind are the same
/// allocation. Flags and the canonical link are computed once at creation;
/// the two cells are filled lazily by the linkage and superclass queries.
pub struct TyS<'tcx> {
    kind: TyKind<'tcx>,
    flags: TyFlags,
    /// `None` when the node is its own canonical form.
    canonical: Option<QualType<'tcx>>,
    pub(crate) linkage: OnceCell<CachedProperties>,
    pub(crate) superclass: OnceCell<Option<QualType<'tcx>>>,
}

impl<'tcx> TyS<'tcx> {
    pub(crate) fn new(kind: TyKind<'tcx>, flags: TyFlags, canonical: Option<QualType<'tcx>>) -> Self {
        Self {
            kind,
            flags,
            canonical,
            linkage: OnceCell::new(),
            superclass: OnceCell::new(),
        }
    }
}

impl<'tcx> PartialEq for TyS<'tcx> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl<'tcx> Eq for TyS<'tcx> {}

impl<'tcx> hash::Hash for TyS<'tcx> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        // Flags and the canonical link are computed from the kind, so we
        // don't need to hash them.
        self.kind.hash(state);
    }
}

impl<'tcx> Equivalent<&'tcx TyS<'tcx>> for TyKind<'tcx> {
    fn equivalent(&self, key: &&'tcx TyS<'tcx>) -> bool {
        *self == key.kind
    }
}

/// A handle to an interned type node.
///
/// Equality and hashing are by address, which is sound because nodes are
/// deduplicated when interned.
#[derive(Clone, Copy)]
pub struct Ty<'tcx>(&'tcx TyS<'tcx>);

impl<'tcx> Ty<'tcx> {
    pub(crate) fn from_interned(node: &'tcx TyS<'tcx>) -> Self {
        Self(node)
    }

    pub(crate) fn node(self) -> &'tcx TyS<'tcx> {
        self.0
    }

    pub fn kind(self) -> &'tcx TyKind<'tcx> {
        &self.0.kind
    }

    pub fn flags(self) -> TyFlags {
        self.0.flags
    }

    pub fn is_dependent(self) -> bool {
        self.flags().contains(TyFlags::DEPENDENT)
    }

    pub fn is_instantiation_dependent(self) -> bool {
        self.flags().contains(TyFlags::INSTANTIATION_DEPENDENT)
    }

    pub fn is_variably_modified(self) -> bool {
        self.flags().contains(TyFlags::VARIABLY_MODIFIED)
    }

    pub fn contains_unexpanded_pack(self) -> bool {
        self.flags().contains(TyFlags::UNEXPANDED_PACK)
    }

    /// Whether this node is its own canonical form.
    pub fn is_canonical(self) -> bool {
        self.0.canonical.is_none()
    }

    /// The canonical form of this node. Qualifiers hoisted out of the node
    /// (for example from an array element) are carried on the result.
    pub fn canonical_type(self) -> QualType<'tcx> {
        self.0.canonical.unwrap_or(QualType::unqualified(self))
    }

    /// The canonical node, dropping any qualifiers the canonical form carries.
    pub fn canonical_ty(self) -> Ty<'tcx> {
        self.canonical_type().ty
    }
}

impl<'tcx> PartialEq for Ty<'tcx> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl<'tcx> Eq for Ty<'tcx> {}

impl<'tcx> hash::Hash for Ty<'tcx> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.0, state)
    }
}

impl<'tcx> fmt::Debug for Ty<'tcx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

/// A type node paired with the qualifiers applied at this use.
///
/// Qualified types are plain values: adding or removing qualifiers never
/// touches the interner.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualType<'tcx> {
    pub ty: Ty<'tcx>,
    pub quals: Qualifiers,
}

static_assertions::assert_eq_size!(QualType<'static>, [usize; 2]);

impl<'tcx> QualType<'tcx> {
    pub fn new(ty: Ty<'tcx>, quals: Qualifiers) -> Self {
        Self { ty, quals }
    }

    pub fn unqualified(ty: Ty<'tcx>) -> Self {
        Self { ty, quals: Qualifiers::EMPTY }
    }

    pub fn kind(self) -> &'tcx TyKind<'tcx> {
        self.ty.kind()
    }

    pub fn split(self) -> (Ty<'tcx>, Qualifiers) {
        (self.ty, self.quals)
    }

    /// Drops the qualifiers stored at this level. Qualifiers that sugar
    /// below may carry are kept; see `split_unqualified` for the full strip.
    pub fn local_unqualified(self) -> Self {
        Self::unqualified(self.ty)
    }

    pub fn has_local_qualifiers(self) -> bool {
        !self.quals.is_empty()
    }

    /// Adds qualifiers, which must be consistent with the existing ones.
    pub fn with_quals(self, quals: Qualifiers) -> Self {
        let mut merged = self.quals;
        merged.add_consistent(quals);
        Self { quals: merged, ..self }
    }

    pub fn with_cvr(self, cvr: Cvr) -> Self {
        Self { quals: self.quals.with_cvr(cvr), ..self }
    }

    pub fn with_const(self) -> Self {
        self.with_cvr(Cvr::CONST)
    }

    pub fn with_volatile(self) -> Self {
        self.with_cvr(Cvr::VOLATILE)
    }

    pub fn without_local_quals(self, quals: Qualifiers) -> Self {
        Self { quals: self.quals.remove(quals), ..self }
    }

    pub fn is_local_const(self) -> bool {
        self.quals.has_const()
    }

    /// Canonical form of this use: the node's canonical type with the local
    /// qualifiers merged in.
    pub fn canonical(self) -> Self {
        self.ty.canonical_type().with_quals(self.quals)
    }

    pub fn is_canonical(self) -> bool {
        self.ty.is_canonical()
    }

    /// Qualifiers of the canonical form, including ones hidden in sugar.
    pub fn canonical_quals(self) -> Qualifiers {
        self.canonical().quals
    }

    pub fn is_const(self) -> bool {
        self.canonical_quals().has_const()
    }

    pub fn is_volatile(self) -> bool {
        self.canonical_quals().has_volatile()
    }

    pub fn is_dependent(self) -> bool {
        self.ty.is_dependent()
    }

    pub fn is_instantiation_dependent(self) -> bool {
        self.ty.is_instantiation_dependent()
    }

    pub fn is_variably_modified(self) -> bool {
        self.ty.is_variably_modified()
    }

    /// Same node and same local qualifiers.
    pub fn is_identical(self, other: QualType<'tcx>) -> bool {
        self == other
    }
}

impl<'tcx> From<Ty<'tcx>> for QualType<'tcx> {
    fn from(ty: Ty<'tcx>) -> Self {
        QualType::unqualified(ty)
    }
}

impl<'tcx> fmt::Debug for QualType<'tcx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quals.is_empty() {
            fmt::Debug::fmt(&self.ty, f)
        } else {
            write!(f, "{} {:?}", self.quals, self.ty)
        }
    }
}
