//! Nullability attributes (`_Nonnull`, `_Nullable`, `_Null_unspecified`).
//!
//! Nullability is sugar: it lives on `Attributed` nodes and vanishes from
//! the canonical type. Lookups therefore walk the sugar chain one step at a
//! time.

use crate::context::TyCtxt;
use crate::core::{BuiltinKind, NullabilityKind, QualType, Ty, TyKind};

impl<'tcx> Ty<'tcx> {
    /// The nearest nullability attribute in the sugar chain.
    pub fn nullability(self) -> Option<NullabilityKind> {
        let mut cur = self;
        loop {
            if let TyKind::Attributed { attr, .. } = *cur.kind() {
                if let Some(nullability) = attr.nullability() {
                    return Some(nullability);
                }
            }
            cur = cur.locally_desugar()?.ty;
        }
    }

    /// Whether a nullability attribute may be written on this type.
    ///
    /// Pointer-like types can; arithmetic, record and array types cannot.
    /// Types that might still instantiate to a pointer answer
    /// `result_if_unknown`.
    pub fn can_have_nullability(self, tcx: TyCtxt<'tcx>, result_if_unknown: bool) -> bool {
        match *self.canonical_ty().kind() {
            TyKind::Pointer { .. }
            | TyKind::BlockPointer(_)
            | TyKind::MemberPointer { .. }
            | TyKind::ObjCObjectPointer(_) => true,

            TyKind::TypeOfExpr { .. }
            | TyKind::TypeOf(_)
            | TyKind::Decltype { .. }
            | TyKind::UnaryTransform { .. }
            | TyKind::TemplateTypeParm { .. }
            | TyKind::SubstTemplateTypeParmPack { .. }
            | TyKind::DependentName { .. }
            | TyKind::Auto { .. } => result_if_unknown,

            // A class template specialization can never be a pointer.
            TyKind::TemplateSpecialization { template, .. } => {
                !tcx.decls().template(template).is_class_template() && result_if_unknown
            }

            TyKind::Builtin(kind) => match kind {
                BuiltinKind::Dependent
                | BuiltinKind::Overload
                | BuiltinKind::BoundMember
                | BuiltinKind::UnknownAny => result_if_unknown,
                _ => false,
            },

            _ => false,
        }
    }
}

impl<'tcx> QualType<'tcx> {
    pub fn nullability(self) -> Option<NullabilityKind> {
        self.ty.nullability()
    }

    /// Removes a nullability attribute written directly on this type,
    /// returning it with the type it modified. Local qualifiers are kept.
    pub fn strip_outer_nullability(self) -> Option<(NullabilityKind, QualType<'tcx>)> {
        let TyKind::Attributed { attr, modified, .. } = *self.kind() else {
            return None;
        };
        let nullability = attr.nullability()?;
        Some((nullability, modified.with_quals(self.quals)))
    }
}
