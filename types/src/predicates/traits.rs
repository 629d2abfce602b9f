//! Class-like type traits: POD, trivial, standard layout, literal.
//!
//! Arrays answer for their innermost element. Records answer from the
//! flags their declaration carries; a C record (no `CXX` flag) behaves
//! like a plain struct and passes every trait.

use crate::context::TyCtxt;
use crate::core::{QualType, Ty, TyKind};
use crate::decl::{CxxRecordFlags, RecordDecl};
use crate::qualifiers::{AddressSpace, Lifetime};

/// What has to happen when an object of a type goes out of scope.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DestructionKind {
    None,
    CxxDestructor,
    ObjCStrongLifetime,
    ObjCWeakLifetime,
}

/// Answers a trait for a record: the C++ flags if it is a class, `true` for
/// a C struct or union.
fn record_trait(decl: &RecordDecl<'_>, required: CxxRecordFlags) -> bool {
    !decl.is_cxx() || decl.cxx.contains(required)
}

impl<'tcx> QualType<'tcx> {
    /// Whether the canonical qualifiers carry `__strong`, `__weak` or
    /// `__autoreleasing`.
    pub fn has_non_trivial_objc_lifetime(self) -> bool {
        self.canonical_quals().has_non_trivial_lifetime()
    }

    pub fn objc_lifetime(self) -> Lifetime {
        self.canonical_quals().lifetime()
    }

    /// POD in the C++98 sense: scalars, and aggregates of PODs without
    /// user-declared special members.
    pub fn is_cxx98_pod(self, tcx: TyCtxt<'tcx>) -> bool {
        if self.ty.is_incomplete_array_type() {
            return self.base_element_type().is_cxx98_pod(tcx);
        }
        if self.ty.is_incomplete_type(tcx) || self.has_non_trivial_objc_lifetime() {
            return false;
        }
        match *self.ty.canonical_ty().kind() {
            TyKind::ConstantArray { .. } | TyKind::VariableArray { .. } => {
                self.base_element_type().is_cxx98_pod(tcx)
            }
            TyKind::ObjCObjectPointer(_)
            | TyKind::BlockPointer(_)
            | TyKind::Builtin(_)
            | TyKind::Complex(_)
            | TyKind::Pointer { .. }
            | TyKind::MemberPointer { .. }
            | TyKind::Vector { .. }
            | TyKind::ExtVector { .. }
            | TyKind::Enum(_) => true,
            TyKind::Record(id) => record_trait(tcx.decls().record(id), CxxRecordFlags::POD),
            _ => false,
        }
    }

    /// POD in the C++11 sense: trivial and standard-layout.
    pub fn is_cxx11_pod(self, tcx: TyCtxt<'tcx>) -> bool {
        if self.ty.is_dependent() || self.has_non_trivial_objc_lifetime() {
            return false;
        }
        let base = self.base_element_type().ty;
        if base.is_incomplete_type(tcx) {
            return false;
        }
        if base.is_scalar_type(tcx) || base.is_vector_type() {
            return true;
        }
        match base.as_record() {
            Some(id) => record_trait(tcx.decls().record(id), CxxRecordFlags::TRIVIAL | CxxRecordFlags::STANDARD_LAYOUT),
            None => false,
        }
    }

    /// POD for the dialect being compiled.
    pub fn is_pod(self, tcx: TyCtxt<'tcx>) -> bool {
        if tcx.lang().c_plus_plus_11 { self.is_cxx11_pod(tcx) } else { self.is_cxx98_pod(tcx) }
    }

    /// Trivially default-constructible and trivially copyable.
    pub fn is_trivial_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if self.ty.is_array_type() {
            return self.base_element_type().is_trivial_type(tcx);
        }
        if self.ty.is_incomplete_type(tcx) || self.has_non_trivial_objc_lifetime() {
            return false;
        }
        let canonical = self.ty.canonical_ty();
        if canonical.is_dependent() {
            return false;
        }
        if canonical.is_scalar_type(tcx) || canonical.is_vector_type() {
            return true;
        }
        match canonical.as_record() {
            Some(id) => {
                let decl = tcx.decls().record(id);
                !decl.is_cxx()
                    || (decl.cxx.contains(CxxRecordFlags::HAS_DEFAULT_CTOR | CxxRecordFlags::TRIVIALLY_COPYABLE)
                        && !decl.cxx.contains(CxxRecordFlags::HAS_NON_TRIVIAL_DEFAULT_CTOR))
            }
            None => false,
        }
    }

    /// Copyable with `memcpy`.
    pub fn is_trivially_copyable_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if self.ty.is_array_type() {
            return self.base_element_type().is_trivially_copyable_type(tcx);
        }
        if self.has_non_trivial_objc_lifetime() {
            return false;
        }
        let canonical = self.ty.canonical_ty();
        if canonical.is_dependent() || canonical.is_incomplete_type(tcx) {
            return false;
        }
        if canonical.is_scalar_type(tcx) || canonical.is_vector_type() {
            return true;
        }
        match canonical.as_record() {
            Some(id) => record_trait(tcx.decls().record(id), CxxRecordFlags::TRIVIALLY_COPYABLE),
            None => false,
        }
    }

    pub fn destruction_kind(self, tcx: TyCtxt<'tcx>) -> DestructionKind {
        match self.objc_lifetime() {
            Lifetime::Strong => return DestructionKind::ObjCStrongLifetime,
            Lifetime::Weak => return DestructionKind::ObjCWeakLifetime,
            Lifetime::None | Lifetime::ExplicitNone | Lifetime::Autoreleasing => {}
        }
        let Some(id) = self.ty.base_element_type_unsafe().as_record() else {
            return DestructionKind::None;
        };
        let decl = tcx.decls().record(id);
        if decl.is_complete() && decl.has_cxx_flag(CxxRecordFlags::HAS_NON_TRIVIAL_DTOR) {
            DestructionKind::CxxDestructor
        } else {
            DestructionKind::None
        }
    }

    pub fn is_destructed_type(self, tcx: TyCtxt<'tcx>) -> bool {
        self.destruction_kind(tcx) != DestructionKind::None
    }

    /// Whether objects of this type can never be modified: const, an array
    /// of constants, or in the OpenCL constant address space.
    pub fn is_constant(self) -> bool {
        if self.is_const() {
            return true;
        }
        if let Some((element, _)) = self.array_element_with_quals() {
            return element.is_constant();
        }
        self.canonical_quals().address_space() == AddressSpace::OpenClConstant
    }
}

impl<'tcx> Ty<'tcx> {
    pub fn is_standard_layout_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if self.is_dependent() {
            return false;
        }
        let base = self.base_element_type_unsafe();
        if base.is_incomplete_type(tcx) {
            return false;
        }
        if base.is_scalar_type(tcx) || base.is_vector_type() {
            return true;
        }
        match base.as_record() {
            Some(id) => record_trait(tcx.decls().record(id), CxxRecordFlags::STANDARD_LAYOUT),
            None => false,
        }
    }

    /// Whether values of this type may appear in constant expressions.
    pub fn is_literal_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if self.is_dependent() {
            return false;
        }
        if tcx.lang().c_plus_plus_14 && self.is_void_type() {
            return true;
        }
        if self.is_variable_array_type() {
            return false;
        }
        let base = self.base_element_type_unsafe();
        if base.is_incomplete_type(tcx) {
            return false;
        }
        if base.is_scalar_type(tcx) || base.is_vector_type() || base.is_any_complex_type() || base.is_reference_type() {
            return true;
        }
        match *base.canonical_ty().kind() {
            TyKind::Record(id) => record_trait(tcx.decls().record(id), CxxRecordFlags::LITERAL),
            TyKind::Atomic(value) => value.ty.is_literal_type(tcx),
            // An `auto` that is still canonical has not been deduced yet.
            TyKind::Auto { .. } => true,
            _ => false,
        }
    }

    /// Whether a record has a const member, directly or in a nested record.
    pub fn has_const_fields(self, tcx: TyCtxt<'tcx>) -> bool {
        let Some(id) = self.as_record() else {
            return false;
        };
        tcx.decls().record(id).fields.iter().any(|field| {
            field.ty.is_local_const() || field.ty.canonical().ty.has_const_fields(tcx)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{FieldDecl, RecordFlags, TagKind};
    use crate::options::LangOptions;
    use crate::qualifiers::Qualifiers;
    use crate::test_utils::{with_lang, with_tcx};
    use crate::ty;

    fn strong(qt: QualType<'_>) -> QualType<'_> {
        qt.with_quals(Qualifiers::EMPTY.with_lifetime(Lifetime::Strong))
    }

    #[test]
    fn test_scalars_pass_every_trait() {
        with_tcx(|tcx, _| {
            for qt in [tcx.int(), ty!(tcx, Ptr[Void]), ty!(tcx, Vector[Float; 4])] {
                assert!(qt.is_pod(tcx), "{qt:?}");
                assert!(qt.is_trivial_type(tcx), "{qt:?}");
                assert!(qt.is_trivially_copyable_type(tcx), "{qt:?}");
                assert!(qt.ty.is_standard_layout_type(tcx), "{qt:?}");
                assert!(qt.ty.is_literal_type(tcx), "{qt:?}");
            }
        });
    }

    #[test]
    fn test_cxx_records_follow_flags() {
        with_tcx(|tcx, decls| {
            let pod = decls.declare_class(TagKind::Struct, "Pod");
            decls.define_record(pod, [FieldDecl::new("x", tcx.int())]);
            decls.update_record(pod, |d| d.cxx = CxxRecordFlags::plain_old_data());
            let pod = tcx.mk_record(pod);

            let string = decls.declare_class(TagKind::Class, "String");
            decls.define_record(string, [FieldDecl::new("data", ty!(tcx, Ptr[Char]))]);
            decls.update_record(string, |d| {
                d.cxx = CxxRecordFlags::HAS_DEFAULT_CTOR
                    | CxxRecordFlags::HAS_NON_TRIVIAL_DEFAULT_CTOR
                    | CxxRecordFlags::HAS_NON_TRIVIAL_DTOR
                    | CxxRecordFlags::STANDARD_LAYOUT
            });
            let string = tcx.mk_record(string);

            assert!(pod.is_pod(tcx));
            assert!(pod.is_trivial_type(tcx));
            assert!(ty!(tcx, Array[pod; 3]).is_trivially_copyable_type(tcx));

            assert!(!string.is_pod(tcx));
            assert!(!string.is_trivial_type(tcx));
            assert!(!string.is_trivially_copyable_type(tcx));
            assert!(string.ty.is_standard_layout_type(tcx));
            assert!(!string.ty.is_literal_type(tcx));
            assert_eq!(string.destruction_kind(tcx), DestructionKind::CxxDestructor);
            assert_eq!(ty!(tcx, Array[string; 2]).destruction_kind(tcx), DestructionKind::CxxDestructor);
            assert_eq!(pod.destruction_kind(tcx), DestructionKind::None);
        });
    }

    #[test]
    fn test_c_structs_are_pod() {
        with_lang(LangOptions::c11(), |tcx, decls| {
            let s = decls.declare_struct("S");
            decls.define_record(s, [FieldDecl::new("a", tcx.char_ty()), FieldDecl::new("b", tcx.int())]);
            let s = tcx.mk_record(s);
            assert!(s.is_pod(tcx));
            assert!(s.is_trivial_type(tcx));
            assert!(s.ty.is_standard_layout_type(tcx));

            let fwd = tcx.mk_record(decls.declare_struct("Fwd"));
            assert!(!fwd.is_pod(tcx));
            assert!(!fwd.is_trivial_type(tcx));
            assert!(!fwd.ty.is_literal_type(tcx));
        });
    }

    #[test]
    fn test_dependent_types_are_not_trivial() {
        with_tcx(|tcx, _| {
            let t = tcx.mk_template_type_parm(0, 0, false);
            assert!(!t.is_trivial_type(tcx));
            assert!(!t.is_trivially_copyable_type(tcx));
            assert!(!t.is_cxx11_pod(tcx));
            assert!(!t.ty.is_literal_type(tcx));
            assert!(!ty!(tcx, Array[t; 2]).is_trivial_type(tcx));
        });
    }

    #[test]
    fn test_arrays_answer_for_their_element() {
        with_tcx(|tcx, decls| {
            let s = decls.declare_class(TagKind::Struct, "S");
            decls.define_record(s, []);
            decls.update_record(s, |d| d.cxx = CxxRecordFlags::TRIVIALLY_COPYABLE);
            let s = tcx.mk_record(s);
            for qt in [s, ty!(tcx, Array[s; 2]), ty!(tcx, Array[Array[s; 2]; 3])] {
                assert!(qt.is_trivially_copyable_type(tcx), "{qt:?}");
                assert!(!qt.is_trivial_type(tcx), "{qt:?}");
            }
            assert!(ty!(tcx, Array[Int]).is_trivial_type(tcx));
            assert!(ty!(tcx, Array[Int]).is_cxx98_pod(tcx));
        });
    }

    #[test]
    fn test_objc_lifetime_blocks_triviality() {
        with_lang(LangOptions::c11().with_objc_arc(), |tcx, _| {
            let id = strong(tcx.objc_id());
            assert!(id.has_non_trivial_objc_lifetime());
            assert!(!id.is_pod(tcx));
            assert!(!id.is_trivial_type(tcx));
            assert_eq!(id.destruction_kind(tcx), DestructionKind::ObjCStrongLifetime);
            let weak = tcx.objc_id().with_quals(Qualifiers::EMPTY.with_lifetime(Lifetime::Weak));
            assert_eq!(weak.destruction_kind(tcx), DestructionKind::ObjCWeakLifetime);
            assert!(!tcx.objc_id().is_destructed_type(tcx));
        });
    }

    #[test]
    fn test_literal_types() {
        with_tcx(|tcx, decls| {
            assert!(tcx.void().ty.is_literal_type(tcx));
            assert!(ty!(tcx, Ref[Int]).ty.is_literal_type(tcx));
            assert!(ty!(tcx, Atomic[Int]).ty.is_literal_type(tcx));
            assert!(tcx.mk_undeduced_auto(crate::core::AutoKeyword::Auto, false).ty.is_literal_type(tcx));
            assert!(!tcx.mk_variable_array(tcx.int(), None).ty.is_literal_type(tcx));
            assert!(!ty!(tcx, (Int) => Int).ty.is_literal_type(tcx));

            let lit = decls.declare_class(TagKind::Struct, "Lit");
            decls.define_record(lit, []);
            decls.update_record(lit, |d| d.cxx = CxxRecordFlags::LITERAL);
            assert!(ty!(tcx, Array[{ tcx.mk_record(lit) }; 2]).ty.is_literal_type(tcx));
        });
        with_lang(LangOptions::cxx11(), |tcx, _| {
            assert!(!tcx.void().ty.is_literal_type(tcx));
        });
    }

    #[test]
    fn test_const_fields_and_constant() {
        with_lang(LangOptions::c11(), |tcx, decls| {
            let inner = decls.declare_struct("Inner");
            decls.define_record(inner, [FieldDecl::new("k", tcx.int().with_const())]);
            let outer = decls.declare_struct("Outer");
            decls.define_record(outer, [FieldDecl::new("inner", tcx.mk_record(inner))]);
            let plain = decls.add_record(crate::decl::RecordDecl::new(TagKind::Struct, Some("P")).with_flags(RecordFlags::COMPLETE));

            assert!(tcx.mk_record(inner).ty.has_const_fields(tcx));
            assert!(tcx.mk_record(outer).ty.has_const_fields(tcx));
            assert!(!tcx.mk_record(plain).ty.has_const_fields(tcx));

            assert!(ty!(tcx, Array[Const[Int]; 4]).is_constant());
            assert!(ty!(tcx, Const[Int]).is_constant());
            assert!(!ty!(tcx, Ptr[Const[Int]]).is_constant());
        });
    }
}
