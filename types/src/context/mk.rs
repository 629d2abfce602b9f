//! Constructors for every node shape.
//!
//! Every constructor returns an unqualified [`QualType`]; qualifiers are
//! added on the handle with [`QualType::with_quals`] and friends.

use super::TyCtxt;
use super::canonical::decayed_pointer_kind;
use crate::core::{
    AttrKind, AutoKeyword, BuiltinKind, CheckedArrayKind, CheckedPointerKind, ElaboratedKeyword,
    EnumId, ExprRef, FnProto, InterfaceId, ProtocolId, QualType, RecordId, TemplateId, Ty, TyKind,
    TypeParamId, TypedefId, UnaryTransformKind, VectorKind,
};

macro_rules! builtin_ctors {
    ($($(#[$meta:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(self) -> QualType<'tcx> {
                self.mk_builtin(BuiltinKind::$kind)
            }
        )*
    };
}

impl<'tcx> TyCtxt<'tcx> {
    // === Lists ===

    pub fn mk_ty_list(
        self,
        iter: impl IntoIterator<Item = QualType<'tcx>, IntoIter: ExactSizeIterator>,
    ) -> &'tcx [QualType<'tcx>] {
        self.arena().alloc_slice_fill_iter(iter)
    }

    pub fn mk_protocol_list(
        self,
        iter: impl IntoIterator<Item = ProtocolId, IntoIter: ExactSizeIterator>,
    ) -> &'tcx [ProtocolId] {
        self.arena().alloc_slice_fill_iter(iter)
    }

    fn mk(self, kind: TyKind<'tcx>) -> QualType<'tcx> {
        QualType::unqualified(self.intern(kind))
    }

    // === Builtins ===

    pub fn mk_builtin(self, kind: BuiltinKind) -> QualType<'tcx> {
        QualType::unqualified(self.builtin_ty(kind))
    }

    builtin_ctors! {
        void => Void;
        bool_ty => Bool;
        schar => SChar;
        uchar => UChar;
        char16 => Char16;
        char32 => Char32;
        short => Short;
        ushort => UShort;
        int => Int;
        uint => UInt;
        long => Long;
        ulong => ULong;
        long_long => LongLong;
        ulong_long => ULongLong;
        int128 => Int128;
        uint128 => UInt128;
        half => Half;
        float => Float;
        double => Double;
        long_double => LongDouble;
        float128 => Float128;
        nullptr_ty => NullPtr;
        objc_sel => ObjCSel;
        /// The placeholder type of a type-dependent expression.
        dependent_ty => Dependent;
    }

    /// Plain `char`, signed or unsigned as the target says.
    pub fn char_ty(self) -> QualType<'tcx> {
        if self.target().char_signed {
            self.mk_builtin(BuiltinKind::CharS)
        } else {
            self.mk_builtin(BuiltinKind::CharU)
        }
    }

    pub fn wchar(self) -> QualType<'tcx> {
        if self.target().wchar_signed {
            self.mk_builtin(BuiltinKind::WCharS)
        } else {
            self.mk_builtin(BuiltinKind::WCharU)
        }
    }

    // === Pointers and references ===

    pub fn mk_complex(self, element: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::Complex(element))
    }

    pub fn mk_pointer(self, pointee: QualType<'tcx>) -> QualType<'tcx> {
        self.mk_checked_pointer(pointee, CheckedPointerKind::Unchecked)
    }

    pub fn mk_checked_pointer(
        self,
        pointee: QualType<'tcx>,
        checked: CheckedPointerKind,
    ) -> QualType<'tcx> {
        self.mk(TyKind::Pointer { pointee, checked })
    }

    pub fn mk_block_pointer(self, pointee: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::BlockPointer(pointee))
    }

    pub fn mk_lvalue_reference(self, pointee: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::LValueReference(pointee))
    }

    pub fn mk_rvalue_reference(self, pointee: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::RValueReference(pointee))
    }

    pub fn mk_member_pointer(self, pointee: QualType<'tcx>, class: Ty<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::MemberPointer { pointee, class })
    }

    // === Arrays and vectors ===

    pub fn mk_constant_array(self, element: QualType<'tcx>, size: u64) -> QualType<'tcx> {
        self.mk_checked_array(element, size, CheckedArrayKind::Unchecked)
    }

    pub fn mk_checked_array(
        self,
        element: QualType<'tcx>,
        size: u64,
        checked: CheckedArrayKind,
    ) -> QualType<'tcx> {
        self.mk(TyKind::ConstantArray { element, size, checked })
    }

    pub fn mk_incomplete_array(self, element: QualType<'tcx>) -> QualType<'tcx> {
        self.mk_checked_incomplete_array(element, CheckedArrayKind::Unchecked)
    }

    pub fn mk_checked_incomplete_array(
        self,
        element: QualType<'tcx>,
        checked: CheckedArrayKind,
    ) -> QualType<'tcx> {
        self.mk(TyKind::IncompleteArray { element, checked })
    }

    pub fn mk_variable_array(self, element: QualType<'tcx>, size: Option<ExprRef>) -> QualType<'tcx> {
        self.mk(TyKind::VariableArray { element, size })
    }

    pub fn mk_dependent_sized_array(
        self,
        element: QualType<'tcx>,
        size: Option<ExprRef>,
    ) -> QualType<'tcx> {
        self.mk(TyKind::DependentSizedArray { element, size })
    }

    pub fn mk_dependent_sized_ext_vector(self, element: QualType<'tcx>, size: ExprRef) -> QualType<'tcx> {
        self.mk(TyKind::DependentSizedExtVector { element, size })
    }

    pub fn mk_dependent_address_space(
        self,
        pointee: QualType<'tcx>,
        address_space: ExprRef,
    ) -> QualType<'tcx> {
        self.mk(TyKind::DependentAddressSpace { pointee, address_space })
    }

    pub fn mk_vector(self, element: QualType<'tcx>, count: u32, kind: VectorKind) -> QualType<'tcx> {
        self.mk(TyKind::Vector { element, count, kind })
    }

    pub fn mk_ext_vector(self, element: QualType<'tcx>, count: u32) -> QualType<'tcx> {
        self.mk(TyKind::ExtVector { element, count })
    }

    // === Functions ===

    pub fn mk_fn_no_proto(self, result: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::FunctionNoProto { result })
    }

    pub fn mk_fn(self, proto: FnProto<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::FunctionProto(proto))
    }

    /// A prototyped, non-variadic function without exception specification.
    pub fn mk_function(
        self,
        result: QualType<'tcx>,
        params: impl IntoIterator<Item = QualType<'tcx>, IntoIter: ExactSizeIterator>,
    ) -> QualType<'tcx> {
        self.mk_fn(FnProto::new(result, self.mk_ty_list(params)))
    }

    // === Sugar ===

    pub fn mk_paren(self, inner: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::Paren(inner))
    }

    pub fn mk_typedef(self, decl: TypedefId) -> QualType<'tcx> {
        let underlying = self.decls().typedef(decl).underlying;
        self.mk(TyKind::Typedef { decl, underlying })
    }

    pub fn mk_adjusted(self, original: QualType<'tcx>, adjusted: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::Adjusted { original, adjusted })
    }

    /// Records the decay of an array or function parameter type. Other types
    /// do not decay and are returned unchanged.
    pub fn mk_decayed(self, original: QualType<'tcx>) -> QualType<'tcx> {
        let decayed = if let Some((element, checked)) = original.array_element_with_quals() {
            self.mk_checked_pointer(element, decayed_pointer_kind(checked))
        } else if original.ty.canonical_ty().kind().is_function() {
            self.mk_pointer(original)
        } else {
            return original;
        };
        self.mk(TyKind::Decayed { original, decayed })
    }

    pub fn mk_typeof_expr(self, expr: ExprRef, underlying: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::TypeOfExpr { expr, underlying })
    }

    pub fn mk_typeof(self, underlying: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::TypeOf(underlying))
    }

    pub fn mk_decltype(self, expr: ExprRef, underlying: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::Decltype { expr, underlying })
    }

    /// `__underlying_type(base)`. For a dependent base the result is
    /// unknown and the base itself is recorded in its place.
    pub fn mk_underlying_type(self, base: QualType<'tcx>) -> QualType<'tcx> {
        let underlying = match base.ty.canonical_ty().kind() {
            TyKind::Enum(id) if !base.is_dependent() => self.decls().enum_decl(*id).underlying,
            _ => base,
        };
        self.mk(TyKind::UnaryTransform {
            base,
            underlying,
            kind: UnaryTransformKind::EnumUnderlyingType,
        })
    }

    pub fn mk_elaborated(self, keyword: ElaboratedKeyword, named: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::Elaborated { keyword, named })
    }

    pub fn mk_attributed(
        self,
        attr: AttrKind,
        modified: QualType<'tcx>,
        equivalent: QualType<'tcx>,
    ) -> QualType<'tcx> {
        self.mk(TyKind::Attributed { attr, modified, equivalent })
    }

    /// Shorthand for an attribute that does not change the type.
    pub fn mk_attributed_same(self, attr: AttrKind, ty: QualType<'tcx>) -> QualType<'tcx> {
        self.mk_attributed(attr, ty, ty)
    }

    // === Tags ===

    pub fn mk_record(self, id: RecordId) -> QualType<'tcx> {
        self.mk(TyKind::Record(id))
    }

    pub fn mk_enum(self, id: EnumId) -> QualType<'tcx> {
        self.mk(TyKind::Enum(id))
    }

    // === Templates ===

    pub fn mk_template_type_parm(self, depth: u32, index: u32, pack: bool) -> QualType<'tcx> {
        self.mk(TyKind::TemplateTypeParm { depth, index, pack })
    }

    pub fn mk_subst_template_type_parm(
        self,
        replaced: Ty<'tcx>,
        replacement: QualType<'tcx>,
    ) -> QualType<'tcx> {
        self.mk(TyKind::SubstTemplateTypeParm { replaced, replacement })
    }

    pub fn mk_subst_template_type_parm_pack(
        self,
        replaced: Ty<'tcx>,
        args: impl IntoIterator<Item = QualType<'tcx>, IntoIter: ExactSizeIterator>,
    ) -> QualType<'tcx> {
        let args = self.mk_ty_list(args);
        self.mk(TyKind::SubstTemplateTypeParmPack { replaced, args })
    }

    /// A specialization of a class template. `underlying` is the
    /// specialized record once known; `None` keeps it dependent.
    pub fn mk_template_specialization(
        self,
        template: TemplateId,
        args: impl IntoIterator<Item = QualType<'tcx>, IntoIter: ExactSizeIterator>,
        underlying: Option<QualType<'tcx>>,
    ) -> QualType<'tcx> {
        let args = self.mk_ty_list(args);
        self.mk(TyKind::TemplateSpecialization { template, args, underlying, alias: false })
    }

    pub fn mk_alias_template_specialization(
        self,
        template: TemplateId,
        args: impl IntoIterator<Item = QualType<'tcx>, IntoIter: ExactSizeIterator>,
        aliased: QualType<'tcx>,
    ) -> QualType<'tcx> {
        let args = self.mk_ty_list(args);
        self.mk(TyKind::TemplateSpecialization {
            template,
            args,
            underlying: Some(aliased),
            alias: true,
        })
    }

    pub fn mk_dependent_name(self, qualifier: QualType<'tcx>, name: &str) -> QualType<'tcx> {
        let name = self.arena().alloc_str(name);
        self.mk(TyKind::DependentName { qualifier, name })
    }

    pub fn mk_pack_expansion(self, pattern: QualType<'tcx>, num_expansions: Option<u32>) -> QualType<'tcx> {
        self.mk(TyKind::PackExpansion { pattern, num_expansions })
    }

    /// `auto` that has not been deduced yet.
    pub fn mk_undeduced_auto(self, keyword: AutoKeyword, dependent: bool) -> QualType<'tcx> {
        self.mk(TyKind::Auto { deduced: None, keyword, dependent })
    }

    pub fn mk_deduced_auto(self, deduced: QualType<'tcx>, keyword: AutoKeyword) -> QualType<'tcx> {
        self.mk(TyKind::Auto {
            deduced: Some(deduced),
            keyword,
            dependent: deduced.is_dependent(),
        })
    }

    pub fn mk_deduced_template_specialization(
        self,
        template: TemplateId,
        deduced: Option<QualType<'tcx>>,
    ) -> QualType<'tcx> {
        self.mk(TyKind::DeducedTemplateSpecialization { template, deduced })
    }

    // === Objective-C ===

    pub fn mk_objc_interface(self, id: InterfaceId) -> QualType<'tcx> {
        self.mk(TyKind::ObjCInterface(id))
    }

    /// An object type. A bare class interface with nothing applied is
    /// returned as the interface type itself.
    pub fn mk_objc_object(
        self,
        base: QualType<'tcx>,
        type_args: &[QualType<'tcx>],
        protocols: &[ProtocolId],
        kind_of: bool,
    ) -> QualType<'tcx> {
        if type_args.is_empty()
            && protocols.is_empty()
            && !kind_of
            && matches!(base.kind(), TyKind::ObjCInterface(_))
        {
            return base;
        }
        let type_args = self.mk_ty_list(type_args.iter().copied());
        let protocols = self.mk_protocol_list(protocols.iter().copied());
        self.mk(TyKind::ObjCObject { base, type_args, protocols, kind_of })
    }

    pub fn mk_objc_object_pointer(self, pointee: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::ObjCObjectPointer(pointee))
    }

    pub fn mk_objc_type_param(self, decl: TypeParamId, protocols: &[ProtocolId]) -> QualType<'tcx> {
        let protocols = self.mk_protocol_list(protocols.iter().copied());
        self.mk(TyKind::ObjCTypeParam { decl, protocols })
    }

    /// `id`: a pointer to the unqualified `id` object type.
    pub fn objc_id(self) -> QualType<'tcx> {
        let object = self.mk_objc_object(self.mk_builtin(BuiltinKind::ObjCId), &[], &[], false);
        self.mk_objc_object_pointer(object)
    }

    /// `Class`: a pointer to the unqualified `Class` object type.
    pub fn objc_class(self) -> QualType<'tcx> {
        let object = self.mk_objc_object(self.mk_builtin(BuiltinKind::ObjCClass), &[], &[], false);
        self.mk_objc_object_pointer(object)
    }

    /// `Name *` for a class interface.
    pub fn mk_objc_interface_pointer(self, id: InterfaceId) -> QualType<'tcx> {
        self.mk_objc_object_pointer(self.mk_objc_interface(id))
    }

    // === Misc ===

    pub fn mk_atomic(self, value: QualType<'tcx>) -> QualType<'tcx> {
        self.mk(TyKind::Atomic(value))
    }

    pub fn mk_pipe(self, element: QualType<'tcx>, read_only: bool) -> QualType<'tcx> {
        self.mk(TyKind::Pipe { element, read_only })
    }

    pub fn mk_type_variable(self, depth: u32, index: u32) -> QualType<'tcx> {
        self.mk(TyKind::TypeVariable { depth, index })
    }
}
