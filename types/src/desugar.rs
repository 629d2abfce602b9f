//! Removing sugar.
//!
//! Sugar nodes remember how a type was written (typedef names, parentheses,
//! attributes, `typeof`, substituted template parameters). Each sugar node
//! stands for exactly one other type; desugaring follows those links.
//!
//! Qualifiers may sit on any layer. Every operation here keeps the union of
//! the qualifiers it passes through, so desugaring never changes what a type
//! means, only how much of its spelling is kept.

use crate::core::{CheckedArrayKind, QualType, Ty, TyKind};
use crate::qualifiers::{QualifierCollector, Qualifiers};

impl<'tcx> TyKind<'tcx> {
    /// The type a sugar shape stands for, when it is stored in the node.
    ///
    /// Shapes that are sugar only when non-dependent report `None` in their
    /// dependent form.
    pub(crate) fn sugared_inner(&self) -> Option<QualType<'tcx>> {
        match *self {
            TyKind::Paren(inner) | TyKind::TypeOf(inner) => Some(inner),
            TyKind::Typedef { underlying, .. } => Some(underlying),
            TyKind::Adjusted { adjusted, .. } => Some(adjusted),
            TyKind::Decayed { decayed, .. } => Some(decayed),
            TyKind::Elaborated { named, .. } => Some(named),
            TyKind::Attributed { equivalent, .. } => Some(equivalent),
            TyKind::SubstTemplateTypeParm { replacement, .. } => Some(replacement),
            TyKind::TypeOfExpr { expr, underlying } if !expr.is_type_dependent() => Some(underlying),
            TyKind::Decltype { expr, underlying } if !expr.is_instantiation_dependent() => {
                Some(underlying)
            }
            TyKind::UnaryTransform { base, underlying, .. } if !base.is_dependent() => Some(underlying),
            TyKind::TemplateSpecialization { underlying: Some(underlying), .. } => Some(underlying),
            TyKind::Auto { deduced: Some(deduced), .. }
            | TyKind::DeducedTemplateSpecialization { deduced: Some(deduced), .. } => Some(deduced),
            _ => None,
        }
    }
}

impl<'tcx> Ty<'tcx> {
    /// One desugaring step of this node alone, or `None` if it is not sugar.
    ///
    /// Class template specializations, deduced placeholders and generic
    /// parameter uses step straight to their canonical form.
    pub fn locally_desugar(self) -> Option<QualType<'tcx>> {
        match *self.kind() {
            TyKind::ObjCTypeParam { .. }
            | TyKind::TemplateSpecialization { underlying: Some(_), alias: false, .. }
            | TyKind::Auto { deduced: Some(_), .. }
            | TyKind::DeducedTemplateSpecialization { deduced: Some(_), .. } => {
                Some(self.canonical_type())
            }
            ref kind => kind.sugared_inner(),
        }
    }

    pub fn is_sugared(self) -> bool {
        self.locally_desugar().is_some()
    }

    /// One step of desugaring, ignoring qualifiers on this node.
    pub fn single_step_desugared(self) -> QualType<'tcx> {
        self.locally_desugar().unwrap_or(QualType::unqualified(self))
    }

    /// Strips all sugar, dropping every qualifier met on the way.
    pub fn unqualified_desugared(self) -> Ty<'tcx> {
        let mut cur = self;
        while let Some(next) = cur.locally_desugar() {
            cur = next.ty;
        }
        cur
    }

    /// The kind of the first non-sugar node below this one.
    pub fn desugared_kind(self) -> &'tcx TyKind<'tcx> {
        self.unqualified_desugared().kind()
    }

    /// The nearest node matching `pred`, looking through sugar only.
    pub fn find_sugar(self, pred: impl Fn(&TyKind<'tcx>) -> bool) -> Option<Ty<'tcx>> {
        let mut cur = self;
        loop {
            if pred(cur.kind()) {
                return Some(cur);
            }
            cur = cur.locally_desugar()?.ty;
        }
    }

    pub fn as_typedef(self) -> Option<Ty<'tcx>> {
        self.find_sugar(|k| matches!(k, TyKind::Typedef { .. }))
    }

    pub fn as_attributed(self) -> Option<Ty<'tcx>> {
        self.find_sugar(|k| matches!(k, TyKind::Attributed { .. }))
    }

    pub fn as_template_specialization(self) -> Option<Ty<'tcx>> {
        self.find_sugar(|k| matches!(k, TyKind::TemplateSpecialization { .. }))
    }

    /// The element type of an array, through any number of array layers.
    pub fn base_element_type_unsafe(self) -> Ty<'tcx> {
        let mut cur = self;
        while cur.canonical_ty().kind().is_array() {
            match cur.desugared_kind().array_element() {
                Some(element) => cur = element.ty,
                None => break,
            }
        }
        cur
    }

    /// The element node of an array type, keeping the element's sugar.
    pub fn array_element_type_no_type_qual(self) -> Option<Ty<'tcx>> {
        if let Some(element) = self.kind().array_element() {
            return Some(element.ty);
        }
        if !self.canonical_ty().kind().is_array() {
            return None;
        }
        self.desugared_kind().array_element().map(|element| element.ty)
    }

    /// What a pointer-like type points to: pointers, block pointers, object
    /// pointers, references and member pointers.
    pub fn pointee_type(self) -> Option<QualType<'tcx>> {
        match *self.desugared_kind() {
            TyKind::Pointer { pointee, .. }
            | TyKind::BlockPointer(pointee)
            | TyKind::ObjCObjectPointer(pointee)
            | TyKind::LValueReference(pointee)
            | TyKind::RValueReference(pointee)
            | TyKind::MemberPointer { pointee, .. } => Some(pointee),
            _ => None,
        }
    }
}

impl<'tcx> QualType<'tcx> {
    /// One step of desugaring; the qualifiers at this level are kept.
    pub fn single_step_desugared(self) -> QualType<'tcx> {
        match self.ty.locally_desugar() {
            Some(next) => next.with_quals(self.quals),
            None => self,
        }
    }

    /// Strips all sugar, collecting every qualifier on the way.
    pub fn split_desugared(self) -> (Ty<'tcx>, Qualifiers) {
        let mut quals = QualifierCollector::new(self.quals);
        let mut cur = self.ty;
        while let Some(next) = cur.locally_desugar() {
            cur = quals.strip(next);
        }
        (cur, quals.qualifiers())
    }

    pub fn desugared(self) -> QualType<'tcx> {
        let (ty, quals) = self.split_desugared();
        QualType::new(ty, quals)
    }

    /// Like [`QualType::split_desugared`], but keeps as much sugar as
    /// possible: the node returned is the one just below the deepest layer
    /// that carried qualifiers.
    pub fn split_unqualified(self) -> (Ty<'tcx>, Qualifiers) {
        let mut quals = QualifierCollector::new(self.quals);
        let mut last_with_quals = self.ty;
        let mut cur = self.ty;
        while let Some(next) = cur.locally_desugar() {
            cur = next.ty;
            if next.has_local_qualifiers() {
                last_with_quals = quals.strip(next);
            }
        }
        (last_with_quals, quals.qualifiers())
    }

    /// The type with every qualifier removed, including ones inside sugar.
    pub fn unqualified_type(self) -> QualType<'tcx> {
        if !self.ty.canonical_type().has_local_qualifiers() {
            return QualType::unqualified(self.ty);
        }
        QualType::unqualified(self.split_unqualified().0)
    }

    /// Removes any number of parentheses, keeping their qualifiers.
    pub fn ignore_parens(self) -> QualType<'tcx> {
        let mut cur = self;
        while let TyKind::Paren(inner) = *cur.kind() {
            cur = inner.with_quals(cur.quals);
        }
        cur
    }

    /// If this is an array, its element with the array's qualifiers pushed
    /// down onto it, and the array's checked flavor.
    pub fn array_element_with_quals(self) -> Option<(QualType<'tcx>, CheckedArrayKind)> {
        if !self.ty.canonical_ty().kind().is_array() {
            return None;
        }
        let (ty, quals) = self.split_desugared();
        let checked = match *ty.kind() {
            TyKind::ConstantArray { checked, .. } | TyKind::IncompleteArray { checked, .. } => checked,
            _ => CheckedArrayKind::Unchecked,
        };
        let element = ty.kind().array_element()?;
        Some((element.with_quals(quals), checked))
    }

    /// The innermost element of nested arrays, with the qualifiers of every
    /// array layer applied.
    pub fn base_element_type(self) -> QualType<'tcx> {
        let mut quals = QualifierCollector::default();
        let mut cur = self;
        loop {
            let (ty, split_quals) = cur.split_desugared();
            let Some(element) = ty.kind().array_element() else {
                break;
            };
            quals.add(split_quals);
            cur = element;
        }
        quals.apply(cur)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{AttrKind, QualType, TyKind};
    use crate::qualifiers::Qualifiers;
    use crate::test_utils::with_tcx;
    use crate::ty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_step_peels_one_layer() {
        with_tcx(|tcx, decls| {
            let td = decls.add_typedef("T", tcx.int().with_const());
            let paren = tcx.mk_paren(tcx.mk_typedef(td));

            let step1 = paren.single_step_desugared();
            assert_eq!(step1, tcx.mk_typedef(td));
            let step2 = step1.single_step_desugared();
            assert_eq!(step2, tcx.int().with_const());
            assert_eq!(step2.single_step_desugared(), step2);
        });
    }

    #[test]
    fn test_desugar_collects_qualifiers() {
        with_tcx(|tcx, decls| {
            let inner = decls.add_typedef("CI", tcx.int().with_const());
            let outer = decls.add_typedef("VCI", tcx.mk_typedef(inner).with_volatile());
            let (ty, quals) = tcx.mk_typedef(outer).split_desugared();
            assert_eq!(ty, tcx.int().ty);
            assert_eq!(quals, Qualifiers::EMPTY.with_const().with_volatile());
        });
    }

    #[test]
    fn test_desugar_is_idempotent() {
        with_tcx(|tcx, decls| {
            let td = decls.add_typedef("P", ty!(tcx, Ptr[Int]));
            let samples = [
                tcx.mk_typedef(td).with_const(),
                tcx.mk_paren(tcx.mk_paren(tcx.double())),
                tcx.mk_attributed_same(AttrKind::TypeNonNull, ty!(tcx, Ptr[Char])),
                ty!(tcx, Array[Int; 2]),
            ];
            for qt in samples {
                let once = qt.desugared();
                assert_eq!(once.desugared(), once, "{qt:?}");
                assert!(!once.ty.is_sugared());
            }
        });
    }

    #[test]
    fn test_split_unqualified_keeps_sugar_above_qualifiers() {
        with_tcx(|tcx, decls| {
            let plain = decls.add_typedef("I", tcx.int());
            let named = tcx.mk_typedef(plain);
            let const_named = decls.add_typedef("CI", named.with_const());
            let (ty, quals) = tcx.mk_typedef(const_named).split_unqualified();
            assert_eq!(ty, named.ty);
            assert_eq!(quals, Qualifiers::EMPTY.with_const());

            assert_eq!(tcx.mk_typedef(const_named).unqualified_type(), named);
        });
    }

    #[test]
    fn test_ignore_parens_keeps_qualifiers() {
        with_tcx(|tcx, _| {
            let t = tcx.mk_paren(tcx.mk_paren(tcx.int()).with_const()).with_volatile();
            assert_eq!(t.ignore_parens(), tcx.int().with_const().with_volatile());
        });
    }

    #[test]
    fn test_sugar_search_stops_at_structure() {
        with_tcx(|tcx, decls| {
            let td = decls.add_typedef("T", tcx.int());
            let attributed = tcx.mk_attributed_same(AttrKind::NoReturn, tcx.mk_typedef(td));
            assert_eq!(attributed.ty.as_typedef(), Some(tcx.mk_typedef(td).ty));
            assert_eq!(attributed.ty.as_attributed(), Some(attributed.ty));

            let ptr = tcx.mk_pointer(tcx.mk_typedef(td));
            assert_eq!(ptr.ty.as_typedef(), None);
        });
    }

    #[test]
    fn test_base_element_type_applies_every_layer() {
        with_tcx(|tcx, decls| {
            let row = decls.add_typedef("Row", ty!(tcx, Array[Volatile[Short]; 4]));
            let grid = tcx.mk_constant_array(tcx.mk_typedef(row), 3).with_const();
            let base = grid.base_element_type();
            assert_eq!(base, tcx.short().with_const().with_volatile());
            assert_eq!(grid.ty.base_element_type_unsafe(), tcx.short().ty);
        });
    }

    #[test]
    fn test_array_element_no_type_qual_keeps_sugar() {
        with_tcx(|tcx, decls| {
            let elem = decls.add_typedef("E", tcx.long());
            let arr = decls.add_typedef("A", tcx.mk_incomplete_array(tcx.mk_typedef(elem).with_const()));
            let a = tcx.mk_typedef(arr);
            assert_eq!(a.ty.array_element_type_no_type_qual(), Some(tcx.mk_typedef(elem).ty));
            assert_eq!(tcx.int().ty.array_element_type_no_type_qual(), None);
        });
    }

    #[test]
    fn test_pointee_through_typedef() {
        with_tcx(|tcx, decls| {
            let td = decls.add_typedef("IP", ty!(tcx, Ptr[Const[Int]]));
            assert_eq!(tcx.mk_typedef(td).ty.pointee_type(), Some(tcx.int().with_const()));
            assert_eq!(tcx.int().ty.pointee_type(), None);
            let r = tcx.mk_lvalue_reference(tcx.float());
            assert_eq!(r.ty.pointee_type(), Some(tcx.float()));
        });
    }

    #[test]
    fn test_dependent_shapes_are_not_sugar() {
        with_tcx(|tcx, _| {
            let dependent_expr = crate::core::ExprRef::new(7).with_deps(crate::core::ExprDeps::dependent());
            let t = tcx.mk_typeof_expr(dependent_expr, tcx.dependent_ty());
            assert!(!t.ty.is_sugared());
            assert!(t.is_canonical());
            assert!(t.is_dependent());

            let known = tcx.mk_typeof_expr(crate::core::ExprRef::new(8), tcx.int());
            assert!(known.ty.is_sugared());
            assert_eq!(known.canonical(), tcx.int());
            assert_eq!(QualType::unqualified(known.ty).single_step_desugared(), tcx.int());
            assert!(matches!(known.kind(), TyKind::TypeOfExpr { .. }));
        });
    }
}
