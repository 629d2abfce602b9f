//! Reference-counting ownership of Objective-C objects and blocks.

use crate::core::{Ty, TyKind};
use crate::qualifiers::Lifetime;

impl<'tcx> Ty<'tcx> {
    /// Object pointers and block pointers: the types retain and release
    /// apply to.
    pub fn is_objc_retainable_type(self) -> bool {
        self.is_objc_object_pointer_type() || self.is_block_pointer_type()
    }

    /// A retainable type, or an array of them: anything that may carry a
    /// lifetime qualifier.
    pub fn is_objc_lifetime_type(self) -> bool {
        self.base_element_type_unsafe().is_objc_retainable_type()
    }

    /// A lifetime type, or a pointer, reference or member pointer to one
    /// at any depth.
    pub fn is_objc_indirect_lifetime_type(self) -> bool {
        if self.is_objc_lifetime_type() {
            return true;
        }
        match *self.desugared_kind() {
            TyKind::Pointer { pointee, .. }
            | TyKind::LValueReference(pointee)
            | TyKind::RValueReference(pointee)
            | TyKind::MemberPointer { pointee, .. } => pointee.ty.is_objc_indirect_lifetime_type(),
            _ => false,
        }
    }

    /// Class objects are never retained implicitly: `Class`, or arrays of
    /// it.
    pub fn is_objc_arc_implicitly_unretained_type(self) -> bool {
        let mut canonical = self.canonical_ty();
        while let Some(element) = canonical.kind().array_element() {
            canonical = element.ty.canonical_ty();
        }
        canonical.as_objc_object_pointer().is_some_and(|ptr| {
            let object = ptr.object_type();
            object.is_unqualified_class() || object.is_qualified_class()
        })
    }

    /// The lifetime a retainable type gets when none is written.
    pub fn objc_arc_implicit_lifetime(self) -> Lifetime {
        if self.is_objc_arc_implicitly_unretained_type() { Lifetime::ExplicitNone } else { Lifetime::Strong }
    }
}

#[cfg(test)]
mod tests {
    use crate::options::LangOptions;
    use crate::qualifiers::Lifetime;
    use crate::test_utils::with_lang;
    use crate::ty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_retainable_and_lifetime_types() {
        with_lang(LangOptions::c11().with_objc_arc(), |tcx, _| {
            let id = tcx.objc_id();
            assert!(id.ty.is_objc_retainable_type());
            assert!(ty!(tcx, BlockPtr[() => Void]).ty.is_objc_retainable_type());
            assert!(!ty!(tcx, Ptr[Int]).ty.is_objc_retainable_type());

            assert!(ty!(tcx, Array[id; 4]).ty.is_objc_lifetime_type());
            assert!(!ty!(tcx, Array[id; 4]).ty.is_objc_retainable_type());

            assert!(ty!(tcx, Ptr[Ptr[id]]).ty.is_objc_indirect_lifetime_type());
            assert!(ty!(tcx, Ref[id]).ty.is_objc_indirect_lifetime_type());
            assert!(!ty!(tcx, Ptr[Ptr[Int]]).ty.is_objc_indirect_lifetime_type());
        });
    }

    #[test]
    fn test_class_objects_are_unretained() {
        with_lang(LangOptions::c11().with_objc_arc(), |tcx, _| {
            let class = tcx.objc_class();
            assert!(class.ty.is_objc_arc_implicitly_unretained_type());
            assert!(ty!(tcx, Array[class; 2]).ty.is_objc_arc_implicitly_unretained_type());
            assert_eq!(class.ty.objc_arc_implicit_lifetime(), Lifetime::ExplicitNone);
            assert!(!tcx.objc_id().ty.is_objc_arc_implicitly_unretained_type());
            assert_eq!(tcx.objc_id().ty.objc_arc_implicit_lifetime(), Lifetime::Strong);
        });
    }
}
