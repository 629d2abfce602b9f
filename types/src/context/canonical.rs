//! Canonical forms, computed once when a node is interned.
//!
//! - Sugar is canonicalized to the canonical form of what it stands for.
//! - Structural shapes are canonical when all their children are; otherwise
//!   the canonical node is the same shape over canonical children.
//! - Array shapes never carry qualifiers on the element: the element's
//!   qualifiers are hoisted onto the canonical array use, so `const int[3]`
//!   and a typedef of `int[3]` used as `const` meet at one node.
//! - Function parameters are canonicalized the way they are passed: arrays
//!   and functions decay to pointers and top-level qualifiers are dropped.
//!   The result type drops its ownership lifetime.
//! - Protocol lists on object types are sorted and deduplicated.

use smallvec::SmallVec;

use super::TyCtxt;
use crate::core::{
    CheckedArrayKind, CheckedPointerKind, ExceptionSpec, FnProto, QualType, TyKind,
};
use crate::qualifiers::Qualifiers;

impl<'tcx> TyCtxt<'tcx> {
    /// `None` when `kind` is its own canonical form.
    pub(super) fn canonical_of(self, kind: &TyKind<'tcx>) -> Option<QualType<'tcx>> {
        if let Some(inner) = kind.sugared_inner() {
            return Some(inner.canonical());
        }

        match *kind {
            TyKind::ObjCTypeParam { decl, protocols } => {
                let bound = self.decls().type_param(decl).bound;
                Some(self.apply_objc_protocol_qualifiers(bound, protocols).canonical())
            }

            TyKind::ConstantArray { element, .. }
            | TyKind::IncompleteArray { element, .. }
            | TyKind::VariableArray { element, .. }
            | TyKind::DependentSizedArray { element, .. } => {
                let element = element.canonical();
                let rebuilt = kind.with_children(self, &[element.local_unqualified()]);
                if rebuilt == *kind {
                    debug_assert!(element.quals.is_empty());
                    return None;
                }
                Some(QualType::new(self.intern(rebuilt), element.quals))
            }

            TyKind::FunctionProto(proto) => {
                let result = proto.result.canonical();
                let result = QualType::new(result.ty, result.quals.without_lifetime());
                let params: SmallVec<[QualType<'tcx>; 8]> =
                    proto.params.iter().map(|&p| self.canonical_param_type(p)).collect();
                let exception = match proto.exception {
                    ExceptionSpec::Dynamic(list) => {
                        ExceptionSpec::Dynamic(self.mk_ty_list(list.iter().map(|e| e.canonical())))
                    }
                    other => other,
                };
                let rebuilt = FnProto {
                    result,
                    params: self.mk_ty_list(params.iter().copied()),
                    exception,
                    ..proto
                };
                if rebuilt == proto {
                    return None;
                }
                Some(QualType::unqualified(self.intern(TyKind::FunctionProto(rebuilt))))
            }

            TyKind::ObjCObject { base, type_args, protocols, kind_of } => {
                let base = base.canonical();
                let mut sorted: SmallVec<[_; 4]> = protocols.iter().copied().collect();
                sorted.sort_unstable();
                sorted.dedup();
                if type_args.is_empty()
                    && sorted.is_empty()
                    && !kind_of
                    && matches!(base.kind(), TyKind::ObjCInterface(_))
                {
                    return Some(base);
                }
                let rebuilt = TyKind::ObjCObject {
                    base,
                    type_args: self.mk_ty_list(type_args.iter().map(|a| a.canonical())),
                    protocols: self.mk_protocol_list(sorted.iter().copied()),
                    kind_of,
                };
                if rebuilt == *kind {
                    return None;
                }
                Some(QualType::unqualified(self.intern(rebuilt)))
            }

            _ => {
                let children = kind.children();
                let canonical: SmallVec<[QualType<'tcx>; 4]> =
                    children.iter().map(|c| c.canonical()).collect();
                if canonical == children {
                    return None;
                }
                Some(QualType::unqualified(self.intern(kind.with_children(self, &canonical))))
            }
        }
    }

    /// The canonical type of a parameter as seen by callers.
    pub fn canonical_param_type(self, param: QualType<'tcx>) -> QualType<'tcx> {
        let param = param.canonical();
        match *param.kind() {
            TyKind::ConstantArray { element, checked, .. }
            | TyKind::IncompleteArray { element, checked } => {
                let element = QualType::new(element.ty, element.quals.union(param.quals));
                self.mk_checked_pointer(element, decayed_pointer_kind(checked))
            }
            TyKind::VariableArray { element, .. } | TyKind::DependentSizedArray { element, .. } => {
                self.mk_pointer(QualType::new(element.ty, element.quals.union(param.quals)))
            }
            TyKind::FunctionNoProto { .. } | TyKind::FunctionProto(_) => self.mk_pointer(param),
            _ => QualType::new(param.ty, Qualifiers::EMPTY),
        }
    }
}

/// The pointer flavor an array of the given flavor decays to.
pub(crate) fn decayed_pointer_kind(checked: CheckedArrayKind) -> CheckedPointerKind {
    match checked {
        CheckedArrayKind::Unchecked => CheckedPointerKind::Unchecked,
        CheckedArrayKind::Checked => CheckedPointerKind::ArrayPtr,
        CheckedArrayKind::NtChecked => CheckedPointerKind::NtArrayPtr,
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{QualType, TyKind};
    use crate::test_utils::with_tcx;
    use crate::ty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structural_types_over_canonical_children_are_canonical() {
        with_tcx(|tcx, _| {
            let p = ty!(tcx, Ptr[Const[Int]]);
            assert!(p.is_canonical());
            assert_eq!(p.canonical(), p);
        });
    }

    #[test]
    fn test_pointer_to_typedef_canonicalizes_to_pointer_to_target() {
        with_tcx(|tcx, decls| {
            let td = decls.add_typedef("myint", tcx.int());
            let myint = tcx.mk_typedef(td);
            let through_typedef = tcx.mk_pointer(myint.with_const());
            let direct = ty!(tcx, Ptr[Const[Int]]);
            assert!(!through_typedef.is_canonical());
            assert_eq!(through_typedef.canonical(), direct);
        });
    }

    #[test]
    fn test_array_element_qualifiers_are_hoisted() {
        with_tcx(|tcx, decls| {
            let arr = ty!(tcx, Array[Const[Int]; 3]);
            let canon = arr.canonical();
            assert_eq!(canon.quals, crate::Qualifiers::EMPTY.with_const());
            assert_eq!(canon.kind(), &TyKind::ConstantArray {
                element: tcx.int(),
                size: 3,
                checked: Default::default(),
            });

            let td = decls.add_typedef("int3", ty!(tcx, Array[Int; 3]));
            let const_td = tcx.mk_typedef(td).with_const();
            assert_eq!(const_td.canonical(), canon);
        });
    }

    #[test]
    fn test_nested_array_hoists_through_levels() {
        with_tcx(|tcx, _| {
            let arr = ty!(tcx, Array[Array[Volatile[Char]; 3]; 2]);
            let canon = arr.canonical();
            assert!(canon.quals.has_volatile());
            let TyKind::ConstantArray { element, .. } = canon.kind() else {
                panic!("expected array, got {canon:?}");
            };
            assert!(element.quals.is_empty());
            assert!(element.is_canonical());
        });
    }

    #[test]
    fn test_function_params_decay_and_drop_qualifiers() {
        with_tcx(|tcx, _| {
            let f = ty!(tcx, (Const[Int], Array[Const[Char]; 8]) => Void);
            let g = ty!(tcx, (Int, Ptr[Const[Char]]) => Void);
            assert_eq!(f.canonical(), g);
            assert_ne!(f.ty, g.ty);
        });
    }

    #[test]
    fn test_sugar_is_never_canonical() {
        with_tcx(|tcx, _| {
            let paren = tcx.mk_paren(tcx.int());
            assert!(!paren.is_canonical());
            assert_eq!(paren.canonical(), tcx.int());
            assert_eq!(QualType::unqualified(paren.ty).canonical().ty, tcx.int().ty);
        });
    }
}
