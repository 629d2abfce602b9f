//! Type categories: integer, floating, arithmetic, scalar, complete.
//!
//! Builtin kinds are ordered so that most of these are range checks on
//! [`BuiltinKind`]. Enumerations count as integers only once complete, and
//! scoped enumerations only for the `_or_enumeration` variants.

use crate::context::TyCtxt;
use crate::core::{BuiltinKind, EnumId, QualType, RecordId, Ty, TyKind};
use crate::decl::{EnumDecl, TagKind};

/// How a scalar converts: the categories of C's usual conversions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScalarTypeKind {
    CPointer,
    BlockPointer,
    ObjCObjectPointer,
    MemberPointer,
    Bool,
    Integral,
    Floating,
    IntegralComplex,
    FloatingComplex,
}

impl<'tcx> Ty<'tcx> {
    fn canonical_kind(self) -> &'tcx TyKind<'tcx> {
        self.canonical_ty().kind()
    }

    fn canonical_builtin(self) -> Option<BuiltinKind> {
        match *self.canonical_kind() {
            TyKind::Builtin(kind) => Some(kind),
            _ => None,
        }
    }

    fn canonical_enum(self, tcx: TyCtxt<'tcx>) -> Option<&'tcx EnumDecl<'tcx>> {
        match *self.canonical_kind() {
            TyKind::Enum(id) => Some(tcx.decls().enum_decl(id)),
            _ => None,
        }
    }

    pub fn is_builtin(self, kind: BuiltinKind) -> bool {
        self.canonical_builtin() == Some(kind)
    }

    pub fn is_void_type(self) -> bool {
        self.is_builtin(BuiltinKind::Void)
    }

    pub fn is_char_type(self) -> bool {
        matches!(
            self.canonical_builtin(),
            Some(BuiltinKind::CharU | BuiltinKind::UChar | BuiltinKind::CharS | BuiltinKind::SChar)
        )
    }

    pub fn is_wide_char_type(self) -> bool {
        matches!(self.canonical_builtin(), Some(BuiltinKind::WCharU | BuiltinKind::WCharS))
    }

    pub fn is_char16_type(self) -> bool {
        self.is_builtin(BuiltinKind::Char16)
    }

    pub fn is_char32_type(self) -> bool {
        self.is_builtin(BuiltinKind::Char32)
    }

    pub fn is_any_character_type(self) -> bool {
        self.is_char_type() || self.is_wide_char_type() || self.is_char16_type() || self.is_char32_type()
    }

    /// Builtin integers and complete unscoped enumerations.
    pub fn is_integer_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_integer();
        }
        self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && !e.scoped)
    }

    /// Integral in the sense of the current language: complete enumerations
    /// count in C but not in C++.
    pub fn is_integral_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_integer();
        }
        !tcx.lang().c_plus_plus && self.canonical_enum(tcx).is_some_and(|e| e.is_complete())
    }

    pub fn is_integral_or_enumeration_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_integer();
        }
        self.canonical_enum(tcx).is_some_and(|e| e.is_complete())
    }

    pub fn is_integral_or_unscoped_enumeration_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_integer();
        }
        self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && !e.scoped)
    }

    pub fn is_signed_integer_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_signed_integer();
        }
        self.canonical_enum(tcx)
            .is_some_and(|e| e.is_complete() && !e.scoped && e.underlying.ty.is_signed_integer_type(tcx))
    }

    pub fn is_signed_integer_or_enumeration_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_signed_integer();
        }
        self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && e.underlying.ty.is_signed_integer_type(tcx))
    }

    pub fn is_unsigned_integer_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_unsigned_integer();
        }
        self.canonical_enum(tcx)
            .is_some_and(|e| e.is_complete() && !e.scoped && e.underlying.ty.is_unsigned_integer_type(tcx))
    }

    pub fn is_unsigned_integer_or_enumeration_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_unsigned_integer();
        }
        self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && e.underlying.ty.is_unsigned_integer_type(tcx))
    }

    fn vector_element(self) -> Option<QualType<'tcx>> {
        match *self.canonical_kind() {
            TyKind::Vector { element, .. } | TyKind::ExtVector { element, .. } => Some(element),
            _ => None,
        }
    }

    // === Representation (vectors look at their element) ===

    pub fn has_integer_representation(self, tcx: TyCtxt<'tcx>) -> bool {
        match self.vector_element() {
            Some(element) => element.ty.is_integer_type(tcx),
            None => self.is_integer_type(tcx),
        }
    }

    pub fn has_signed_integer_representation(self, tcx: TyCtxt<'tcx>) -> bool {
        match self.vector_element() {
            Some(element) => element.ty.is_signed_integer_or_enumeration_type(tcx),
            None => self.is_signed_integer_or_enumeration_type(tcx),
        }
    }

    pub fn has_unsigned_integer_representation(self, tcx: TyCtxt<'tcx>) -> bool {
        match self.vector_element() {
            Some(element) => element.ty.is_unsigned_integer_or_enumeration_type(tcx),
            None => self.is_unsigned_integer_or_enumeration_type(tcx),
        }
    }

    pub fn has_floating_representation(self) -> bool {
        match self.vector_element() {
            Some(element) => element.ty.is_floating_type(),
            None => self.is_floating_type(),
        }
    }

    // === Floating and arithmetic ===

    /// Real floating types and complex types over them.
    pub fn is_floating_type(self) -> bool {
        match *self.canonical_kind() {
            TyKind::Builtin(kind) => kind.is_floating_point(),
            TyKind::Complex(element) => element.ty.is_floating_type(),
            _ => false,
        }
    }

    pub fn is_real_floating_type(self) -> bool {
        self.canonical_builtin().is_some_and(BuiltinKind::is_floating_point)
    }

    pub fn is_real_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return kind.is_integer() || kind.is_floating_point();
        }
        self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && !e.scoped)
    }

    pub fn is_arithmetic_type(self, tcx: TyCtxt<'tcx>) -> bool {
        match *self.canonical_kind() {
            TyKind::Builtin(kind) => kind.is_integer() || kind.is_floating_point(),
            TyKind::Complex(_) => true,
            _ => self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && !e.scoped),
        }
    }

    /// `_Complex` over a floating type.
    pub fn is_complex_type(self) -> bool {
        matches!(*self.canonical_kind(), TyKind::Complex(element) if element.ty.is_floating_type())
    }

    pub fn is_any_complex_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::Complex(_))
    }

    /// `_Complex` over an integer type, a GNU extension.
    pub fn is_complex_integer_type(self, tcx: TyCtxt<'tcx>) -> bool {
        matches!(*self.canonical_kind(), TyKind::Complex(element) if element.ty.is_integer_type(tcx))
    }

    pub fn is_promotable_integer_type(self, tcx: TyCtxt<'tcx>) -> bool {
        if let Some(kind) = self.canonical_builtin() {
            return matches!(
                kind,
                BuiltinKind::Bool
                    | BuiltinKind::CharS
                    | BuiltinKind::CharU
                    | BuiltinKind::SChar
                    | BuiltinKind::UChar
                    | BuiltinKind::Short
                    | BuiltinKind::UShort
                    | BuiltinKind::WCharS
                    | BuiltinKind::WCharU
                    | BuiltinKind::Char16
                    | BuiltinKind::Char32
            );
        }
        !self.is_dependent() && self.canonical_enum(tcx).is_some_and(|e| e.is_complete() && !e.scoped)
    }

    // === Scalars ===

    pub fn is_scalar_type(self, tcx: TyCtxt<'tcx>) -> bool {
        match *self.canonical_kind() {
            TyKind::Builtin(kind) => kind > BuiltinKind::Void && kind <= BuiltinKind::NullPtr,
            TyKind::Enum(id) => tcx.decls().enum_decl(id).is_complete(),
            TyKind::Pointer { .. }
            | TyKind::BlockPointer(_)
            | TyKind::MemberPointer { .. }
            | TyKind::Complex(_)
            | TyKind::ObjCObjectPointer(_) => true,
            _ => false,
        }
    }

    /// The conversion category of a scalar type; `None` for non-scalars.
    pub fn scalar_type_kind(self, tcx: TyCtxt<'tcx>) -> Option<ScalarTypeKind> {
        if !self.is_scalar_type(tcx) {
            return None;
        }
        let kind = match *self.canonical_kind() {
            TyKind::Builtin(BuiltinKind::Bool) => ScalarTypeKind::Bool,
            TyKind::Builtin(BuiltinKind::NullPtr) => ScalarTypeKind::CPointer,
            TyKind::Builtin(kind) if kind.is_integer() => ScalarTypeKind::Integral,
            TyKind::Builtin(_) => ScalarTypeKind::Floating,
            TyKind::Pointer { .. } => ScalarTypeKind::CPointer,
            TyKind::BlockPointer(_) => ScalarTypeKind::BlockPointer,
            TyKind::ObjCObjectPointer(_) => ScalarTypeKind::ObjCObjectPointer,
            TyKind::MemberPointer { .. } => ScalarTypeKind::MemberPointer,
            TyKind::Enum(_) => ScalarTypeKind::Integral,
            TyKind::Complex(element) if element.ty.is_real_floating_type() => ScalarTypeKind::FloatingComplex,
            _ => ScalarTypeKind::IntegralComplex,
        };
        Some(kind)
    }

    // === Completeness ===

    /// Whether the type describes objects but lacks the information needed
    /// to know their size.
    pub fn is_incomplete_type(self, tcx: TyCtxt<'tcx>) -> bool {
        let decls = tcx.decls();
        match *self.canonical_kind() {
            TyKind::Builtin(kind) => kind == BuiltinKind::Void,
            // Type variables stand in for unknown types, like `void`.
            TyKind::TypeVariable { .. } => true,
            TyKind::Enum(id) => !decls.enum_decl(id).is_complete(),
            TyKind::Record(id) => !decls.record(id).is_complete(),
            TyKind::ConstantArray { element, .. } => element.ty.is_incomplete_type(tcx),
            TyKind::IncompleteArray { .. } => true,
            TyKind::ObjCObject { base, .. } => base.ty.is_incomplete_type(tcx),
            TyKind::ObjCInterface(id) => !decls.interface(id).has_definition,
            _ => false,
        }
    }

    /// Whether a complete, non-dependent type has a size known at compile
    /// time.
    pub fn is_constant_size_type(self, tcx: TyCtxt<'tcx>) -> bool {
        debug_assert!(!self.is_incomplete_type(tcx), "constant size of an incomplete type");
        debug_assert!(!self.is_dependent(), "constant size of a dependent type");
        !matches!(self.canonical_kind(), TyKind::VariableArray { .. })
    }

    /// Arrays, C structs and unions, and C++ aggregate classes.
    pub fn is_aggregate_type(self, tcx: TyCtxt<'tcx>) -> bool {
        match *self.canonical_kind() {
            TyKind::Record(id) => {
                let decl = tcx.decls().record(id);
                !decl.is_cxx() || decl.has_cxx_flag(crate::decl::CxxRecordFlags::AGGREGATE)
            }
            ref kind => kind.is_array(),
        }
    }

    /// An object type: neither a function, a reference nor `void`.
    pub fn is_object_type(self) -> bool {
        !matches!(
            self.canonical_kind(),
            TyKind::FunctionNoProto { .. }
                | TyKind::FunctionProto(_)
                | TyKind::LValueReference(_)
                | TyKind::RValueReference(_)
                | TyKind::Builtin(BuiltinKind::Void)
        )
    }

    // === Shapes ===

    pub fn is_pointer_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::Pointer { .. })
    }

    pub fn is_block_pointer_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::BlockPointer(_))
    }

    pub fn is_any_pointer_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::Pointer { .. } | TyKind::ObjCObjectPointer(_))
    }

    pub fn is_void_pointer_type(self) -> bool {
        matches!(*self.canonical_kind(), TyKind::Pointer { pointee, .. } if pointee.ty.is_void_type())
    }

    pub fn is_reference_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::LValueReference(_) | TyKind::RValueReference(_))
    }

    pub fn is_member_pointer_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::MemberPointer { .. })
    }

    pub fn is_function_type(self) -> bool {
        self.canonical_kind().is_function()
    }

    pub fn is_array_type(self) -> bool {
        self.canonical_kind().is_array()
    }

    pub fn is_variable_array_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::VariableArray { .. })
    }

    pub fn is_incomplete_array_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::IncompleteArray { .. })
    }

    pub fn is_vector_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::Vector { .. } | TyKind::ExtVector { .. })
    }

    pub fn is_atomic_type(self) -> bool {
        matches!(self.canonical_kind(), TyKind::Atomic(_))
    }

    /// The record declaration, if this is a struct, class or union type.
    pub fn as_record(self) -> Option<RecordId> {
        match *self.canonical_kind() {
            TyKind::Record(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_enum(self) -> Option<EnumId> {
        match *self.canonical_kind() {
            TyKind::Enum(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_record_type(self) -> bool {
        self.as_record().is_some()
    }

    pub fn is_enumeral_type(self) -> bool {
        self.as_enum().is_some()
    }

    fn record_tag(self, tcx: TyCtxt<'tcx>) -> Option<TagKind> {
        self.as_record().map(|id| tcx.decls().record(id).tag)
    }

    pub fn is_structure_type(self, tcx: TyCtxt<'tcx>) -> bool {
        self.record_tag(tcx) == Some(TagKind::Struct)
    }

    pub fn is_class_type(self, tcx: TyCtxt<'tcx>) -> bool {
        self.record_tag(tcx) == Some(TagKind::Class)
    }

    pub fn is_union_type(self, tcx: TyCtxt<'tcx>) -> bool {
        self.record_tag(tcx) == Some(TagKind::Union)
    }

    pub fn is_structure_or_class_type(self, tcx: TyCtxt<'tcx>) -> bool {
        matches!(self.record_tag(tcx), Some(TagKind::Struct | TagKind::Class | TagKind::Interface))
    }
}
