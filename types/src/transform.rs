//! Structural rewriting.
//!
//! [`simple_transform`] rebuilds a type bottom-up under a caller-supplied
//! per-node function. The function sees every node reached, qualifiers
//! included. When it returns something different the result is taken as is
//! and that subtree is not entered; otherwise the node's children are
//! rewritten and the node is rebuilt only if one of them changed.
//!
//! Unchanged subtrees come back as the very same handles, so a rewrite that
//! finds nothing to do allocates nothing.
//!
//! Some shapes are opaque to rewriting and are never entered: named types
//! (typedefs, records, enums, interfaces, elaborated names), shapes whose
//! meaning depends on an expression, template specializations, and every
//! dependent shape.

use crate::context::TyCtxt;
use crate::core::walk::{Fold, FoldStep, drive_fold};
use crate::core::{Children, QualType, TyKind};

/// Rewrites `qt` with `f`, see the module documentation.
///
/// An `Err` from `f` at any node aborts the whole rewrite.
pub fn simple_transform<'tcx, E, F>(tcx: TyCtxt<'tcx>, qt: QualType<'tcx>, f: &mut F) -> Result<QualType<'tcx>, E>
where
    F: FnMut(QualType<'tcx>) -> Result<QualType<'tcx>, E>,
{
    drive_fold(qt, &mut Rewriter { tcx, f })
}

struct Rewriter<'a, 'tcx, F> {
    tcx: TyCtxt<'tcx>,
    f: &'a mut F,
}

impl<'tcx, E, F> Fold<'tcx> for Rewriter<'_, 'tcx, F>
where
    F: FnMut(QualType<'tcx>) -> Result<QualType<'tcx>, E>,
{
    type Output = QualType<'tcx>;
    type Error = E;

    fn visit(&mut self, qt: QualType<'tcx>) -> Result<FoldStep<'tcx, QualType<'tcx>>, E> {
        let transformed = (self.f)(qt)?;
        if transformed != qt {
            return Ok(FoldStep::Done(transformed));
        }
        if is_opaque(qt.kind()) {
            Ok(FoldStep::Done(qt))
        } else {
            Ok(FoldStep::Recurse)
        }
    }

    fn children(&self, qt: QualType<'tcx>) -> Children<'tcx> {
        match *qt.kind() {
            // The class of a member pointer and the decayed pointer are
            // derived, not rewritten.
            TyKind::MemberPointer { pointee, .. } => Children::from_slice(&[pointee]),
            TyKind::Decayed { original, .. } => Children::from_slice(&[original]),
            ref kind => kind.children(),
        }
    }

    fn combine(
        &mut self,
        qt: QualType<'tcx>,
        children: impl ExactSizeIterator<Item = QualType<'tcx>> + DoubleEndedIterator,
    ) -> Result<QualType<'tcx>, E> {
        let rewritten: Children<'tcx> = children.collect();
        if rewritten == self.children(qt) {
            return Ok(qt);
        }
        let tcx = self.tcx;
        let rebuilt = match *qt.kind() {
            TyKind::MemberPointer { class, .. } => {
                QualType::unqualified(tcx.intern(TyKind::MemberPointer { pointee: rewritten[0], class }))
            }
            TyKind::Decayed { .. } => tcx.mk_decayed(rewritten[0]),
            TyKind::Adjusted { .. } => tcx.mk_adjusted(rewritten[0], rewritten[1]),
            TyKind::ObjCObject { protocols, kind_of, .. } => {
                tcx.mk_objc_object(rewritten[0], &rewritten[1..], protocols, kind_of)
            }
            ref kind => QualType::unqualified(tcx.intern(kind.with_children(tcx, &rewritten))),
        };
        Ok(rebuilt.with_quals(qt.quals))
    }
}

fn is_opaque(kind: &TyKind<'_>) -> bool {
    matches!(
        kind,
        TyKind::Builtin(_)
            | TyKind::Typedef { .. }
            | TyKind::ObjCTypeParam { .. }
            | TyKind::TypeOfExpr { .. }
            | TyKind::TypeOf(_)
            | TyKind::Decltype { .. }
            | TyKind::UnaryTransform { .. }
            | TyKind::Record(_)
            | TyKind::Enum(_)
            | TyKind::Elaborated { .. }
            | TyKind::TemplateSpecialization { .. }
            | TyKind::PackExpansion { .. }
            | TyKind::ObjCInterface(_)
            | TyKind::Pipe { .. }
            | TyKind::TypeVariable { .. }
            | TyKind::DependentSizedArray { .. }
            | TyKind::DependentSizedExtVector { .. }
            | TyKind::DependentAddressSpace { .. }
            | TyKind::TemplateTypeParm { .. }
            | TyKind::SubstTemplateTypeParmPack { .. }
            | TyKind::DependentName { .. }
            | TyKind::DeducedTemplateSpecialization { .. }
    )
}
