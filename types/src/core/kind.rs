use core::fmt;

use smallvec::SmallVec;

use super::flags::TyFlags;
use super::ids::{
    EnumId, ExprRef, InterfaceId, ProtocolId, RecordId, TemplateId, TypeParamId, TypedefId,
};
use super::ty::{QualType, Ty};
use crate::context::TyCtxt;
use crate::decl::DeclStore;
use crate::qualifiers::Cvr;

/// Children of a node, in definition order.
pub type Children<'tcx> = SmallVec<[QualType<'tcx>; 4]>;

/// Every shape a type node can take.
///
/// Variants fall into three groups:
///
/// - structural shapes (builtins, pointers, arrays, functions, records, ...)
///   that are canonical whenever their children are canonical;
/// - sugar (typedefs, parentheses, attributes, `typeof`, ...) that records
///   how a type was spelled and always has a distinct canonical form;
/// - dependent shapes that stand for a type not yet known, and which are
///   their own canonical form.
///
/// A few shapes are sugar only in their non-dependent form (`typeof(expr)`,
/// `decltype`, unary transforms, template specializations, deduced types).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TyKind<'tcx> {
    Builtin(BuiltinKind),
    Complex(QualType<'tcx>),

    Pointer { pointee: QualType<'tcx>, checked: CheckedPointerKind },
    BlockPointer(QualType<'tcx>),
    LValueReference(QualType<'tcx>),
    RValueReference(QualType<'tcx>),
    MemberPointer { pointee: QualType<'tcx>, class: Ty<'tcx> },

    ConstantArray { element: QualType<'tcx>, size: u64, checked: CheckedArrayKind },
    IncompleteArray { element: QualType<'tcx>, checked: CheckedArrayKind },
    /// `int a[n]`; `size` is `None` for `int a[*]`.
    VariableArray { element: QualType<'tcx>, size: Option<ExprRef> },
    DependentSizedArray { element: QualType<'tcx>, size: Option<ExprRef> },
    DependentSizedExtVector { element: QualType<'tcx>, size: ExprRef },
    DependentAddressSpace { pointee: QualType<'tcx>, address_space: ExprRef },
    Vector { element: QualType<'tcx>, count: u32, kind: VectorKind },
    ExtVector { element: QualType<'tcx>, count: u32 },

    FunctionNoProto { result: QualType<'tcx> },
    FunctionProto(FnProto<'tcx>),

    Paren(QualType<'tcx>),
    Typedef { decl: TypedefId, underlying: QualType<'tcx> },
    Adjusted { original: QualType<'tcx>, adjusted: QualType<'tcx> },
    /// A parameter of array or function type adjusted to a pointer.
    Decayed { original: QualType<'tcx>, decayed: QualType<'tcx> },
    TypeOfExpr { expr: ExprRef, underlying: QualType<'tcx> },
    TypeOf(QualType<'tcx>),
    Decltype { expr: ExprRef, underlying: QualType<'tcx> },
    UnaryTransform { base: QualType<'tcx>, underlying: QualType<'tcx>, kind: UnaryTransformKind },

    Record(RecordId),
    Enum(EnumId),
    Elaborated { keyword: ElaboratedKeyword, named: QualType<'tcx> },
    Attributed { attr: AttrKind, modified: QualType<'tcx>, equivalent: QualType<'tcx> },

    TemplateTypeParm { depth: u32, index: u32, pack: bool },
    SubstTemplateTypeParm { replaced: Ty<'tcx>, replacement: QualType<'tcx> },
    SubstTemplateTypeParmPack { replaced: Ty<'tcx>, args: &'tcx [QualType<'tcx>] },
    /// `underlying` is the specialized type when known; `alias` marks alias
    /// templates, which are always sugar for their aliased type.
    TemplateSpecialization {
        template: TemplateId,
        args: &'tcx [QualType<'tcx>],
        underlying: Option<QualType<'tcx>>,
        alias: bool,
    },
    DependentName { qualifier: QualType<'tcx>, name: &'tcx str },
    PackExpansion { pattern: QualType<'tcx>, num_expansions: Option<u32> },
    /// `auto`, `decltype(auto)` or `__auto_type`, possibly deduced.
    Auto { deduced: Option<QualType<'tcx>>, keyword: AutoKeyword, dependent: bool },
    DeducedTemplateSpecialization { template: TemplateId, deduced: Option<QualType<'tcx>> },

    /// A use of a generic class parameter, optionally with protocols.
    ObjCTypeParam { decl: TypeParamId, protocols: &'tcx [ProtocolId] },
    /// An object type: a base (`id`, `Class` or a class interface) with
    /// optional type arguments, protocol qualifiers and `__kindof`.
    ObjCObject {
        base: QualType<'tcx>,
        type_args: &'tcx [QualType<'tcx>],
        protocols: &'tcx [ProtocolId],
        kind_of: bool,
    },
    ObjCInterface(InterfaceId),
    ObjCObjectPointer(QualType<'tcx>),

    Atomic(QualType<'tcx>),
    Pipe { element: QualType<'tcx>, read_only: bool },
    /// A type variable bound by a generic function.
    TypeVariable { depth: u32, index: u32 },
}

/// Builtin types, in an order where ranges are meaningful: the unsigned
/// integers, then the signed integers, then the floating types.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BuiltinKind {
    Void,

    Bool,
    /// `char` on targets where it is unsigned.
    CharU,
    UChar,
    WCharU,
    Char16,
    Char32,
    UShort,
    UInt,
    ULong,
    ULongLong,
    UInt128,

    /// `char` on targets where it is signed.
    CharS,
    SChar,
    WCharS,
    Short,
    Int,
    Long,
    LongLong,
    Int128,

    Half,
    Float,
    Double,
    LongDouble,
    Float128,

    NullPtr,

    ObjCId,
    ObjCClass,
    ObjCSel,

    /// Placeholders used while an expression's type is unknown.
    Dependent,
    Overload,
    BoundMember,
    UnknownAny,
}

impl BuiltinKind {
    pub fn is_integer(self) -> bool {
        self >= BuiltinKind::Bool && self <= BuiltinKind::Int128
    }

    pub fn is_signed_integer(self) -> bool {
        self >= BuiltinKind::CharS && self <= BuiltinKind::Int128
    }

    pub fn is_unsigned_integer(self) -> bool {
        self >= BuiltinKind::Bool && self <= BuiltinKind::UInt128
    }

    pub fn is_floating_point(self) -> bool {
        self >= BuiltinKind::Half && self <= BuiltinKind::Float128
    }

    pub fn is_placeholder(self) -> bool {
        self >= BuiltinKind::Dependent
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Void => "void",
            BuiltinKind::Bool => "_Bool",
            BuiltinKind::CharU | BuiltinKind::CharS => "char",
            BuiltinKind::UChar => "unsigned char",
            BuiltinKind::WCharU | BuiltinKind::WCharS => "wchar_t",
            BuiltinKind::Char16 => "char16_t",
            BuiltinKind::Char32 => "char32_t",
            BuiltinKind::UShort => "unsigned short",
            BuiltinKind::UInt => "unsigned int",
            BuiltinKind::ULong => "unsigned long",
            BuiltinKind::ULongLong => "unsigned long long",
            BuiltinKind::UInt128 => "unsigned __int128",
            BuiltinKind::SChar => "signed char",
            BuiltinKind::Short => "short",
            BuiltinKind::Int => "int",
            BuiltinKind::Long => "long",
            BuiltinKind::LongLong => "long long",
            BuiltinKind::Int128 => "__int128",
            BuiltinKind::Half => "half",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::LongDouble => "long double",
            BuiltinKind::Float128 => "__float128",
            BuiltinKind::NullPtr => "nullptr_t",
            BuiltinKind::ObjCId => "id",
            BuiltinKind::ObjCClass => "Class",
            BuiltinKind::ObjCSel => "SEL",
            BuiltinKind::Dependent => "<dependent type>",
            BuiltinKind::Overload => "<overloaded function type>",
            BuiltinKind::BoundMember => "<bound member function type>",
            BuiltinKind::UnknownAny => "<unknown type>",
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer flavors from the bounds-checked dialect.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum CheckedPointerKind {
    #[default]
    Unchecked,
    /// `_Ptr<T>`: points to a single element.
    Ptr,
    /// `_Array_ptr<T>`: points into an array with declared bounds.
    ArrayPtr,
    /// `_Nt_array_ptr<T>`: like `ArrayPtr`, null-terminated.
    NtArrayPtr,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum CheckedArrayKind {
    #[default]
    Unchecked,
    Checked,
    NtChecked,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum VectorKind {
    #[default]
    Generic,
    AltiVecVector,
    AltiVecPixel,
    AltiVecBool,
    NeonVector,
    NeonPolyVector,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ElaboratedKeyword {
    None,
    Struct,
    Class,
    Union,
    Enum,
    Interface,
    Typename,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnaryTransformKind {
    EnumUnderlyingType,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AutoKeyword {
    Auto,
    DecltypeAuto,
    GnuAutoType,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NullabilityKind {
    NonNull,
    Nullable,
    Unspecified,
}

/// Type attributes that survive as `Attributed` sugar.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AttrKind {
    TypeNonNull,
    TypeNullable,
    TypeNullUnspecified,
    ObjCKindOf,
    ObjCOwnership,
    ObjCGc,
    ObjCInertUnsafeUnretained,
    AddressSpace,
    NoReturn,
    CDecl,
    StdCall,
    FastCall,
    VectorCall,
    Regparm,
    MsAbi,
    SysVAbi,
    SwiftCall,
    PreserveMost,
    PreserveAll,
}

impl AttrKind {
    pub fn nullability(self) -> Option<NullabilityKind> {
        match self {
            AttrKind::TypeNonNull => Some(NullabilityKind::NonNull),
            AttrKind::TypeNullable => Some(NullabilityKind::Nullable),
            AttrKind::TypeNullUnspecified => Some(NullabilityKind::Unspecified),
            _ => None,
        }
    }

    pub fn is_calling_conv(self) -> bool {
        matches!(
            self,
            AttrKind::CDecl
                | AttrKind::StdCall
                | AttrKind::FastCall
                | AttrKind::VectorCall
                | AttrKind::Regparm
                | AttrKind::MsAbi
                | AttrKind::SysVAbi
                | AttrKind::SwiftCall
                | AttrKind::PreserveMost
                | AttrKind::PreserveAll
        )
    }

    /// Attributes that are really qualifiers in attribute syntax.
    pub fn is_qualifier(self) -> bool {
        matches!(self, AttrKind::ObjCOwnership | AttrKind::ObjCGc | AttrKind::AddressSpace)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ExceptionSpec<'tcx> {
    /// No specification.
    #[default]
    None,
    /// `throw()`
    DynamicNone,
    /// `throw(T1, T2, ...)`
    Dynamic(&'tcx [QualType<'tcx>]),
    /// `noexcept`
    BasicNoexcept,
    /// `noexcept(expr)`
    ComputedNoexcept(ExprRef),
}

impl<'tcx> ExceptionSpec<'tcx> {
    pub fn exceptions(&self) -> &'tcx [QualType<'tcx>] {
        match *self {
            ExceptionSpec::Dynamic(list) => list,
            _ => &[],
        }
    }

    pub fn noexcept_expr(&self) -> Option<ExprRef> {
        match *self {
            ExceptionSpec::ComputedNoexcept(expr) => Some(expr),
            _ => None,
        }
    }
}

/// A prototyped function type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FnProto<'tcx> {
    pub result: QualType<'tcx>,
    pub params: &'tcx [QualType<'tcx>],
    pub variadic: bool,
    /// Qualifiers of the implicit object parameter of a member function.
    pub method_quals: Cvr,
    pub exception: ExceptionSpec<'tcx>,
}

impl<'tcx> FnProto<'tcx> {
    pub fn new(result: QualType<'tcx>, params: &'tcx [QualType<'tcx>]) -> Self {
        Self {
            result,
            params,
            variadic: false,
            method_quals: Cvr::empty(),
            exception: ExceptionSpec::None,
        }
    }

    pub fn variadic(self) -> Self {
        Self { variadic: true, ..self }
    }

    pub fn with_exception(self, exception: ExceptionSpec<'tcx>) -> Self {
        Self { exception, ..self }
    }
}

impl<'tcx> TyKind<'tcx> {
    pub fn compute_flags(&self, decls: &dyn DeclStore<'tcx>) -> TyFlags {
        let of = |qt: &QualType<'tcx>| qt.ty.flags();
        let all = |list: &[QualType<'tcx>]| list.iter().fold(TyFlags::empty(), |acc, qt| acc | of(qt));
        let pack_of = |expr: &ExprRef| {
            if expr.contains_unexpanded_pack() {
                TyFlags::UNEXPANDED_PACK
            } else {
                TyFlags::empty()
            }
        };

        let flags = match self {
            TyKind::Builtin(BuiltinKind::Dependent) => TyFlags::dependent(),
            TyKind::Builtin(_) | TyKind::ObjCInterface(_) | TyKind::TypeVariable { .. } => {
                TyFlags::empty()
            }
            TyKind::Record(id) => {
                if decls.record(*id).is_dependent() {
                    TyFlags::dependent()
                } else {
                    TyFlags::empty()
                }
            }
            TyKind::Enum(id) => {
                if decls.enum_decl(*id).dependent {
                    TyFlags::dependent()
                } else {
                    TyFlags::empty()
                }
            }

            TyKind::Complex(inner)
            | TyKind::Pointer { pointee: inner, .. }
            | TyKind::BlockPointer(inner)
            | TyKind::LValueReference(inner)
            | TyKind::RValueReference(inner)
            | TyKind::ConstantArray { element: inner, .. }
            | TyKind::IncompleteArray { element: inner, .. }
            | TyKind::Vector { element: inner, .. }
            | TyKind::ExtVector { element: inner, .. }
            | TyKind::Paren(inner)
            | TyKind::TypeOf(inner)
            | TyKind::Elaborated { named: inner, .. }
            | TyKind::ObjCObjectPointer(inner)
            | TyKind::Atomic(inner)
            | TyKind::Pipe { element: inner, .. }
            | TyKind::SubstTemplateTypeParm { replacement: inner, .. }
            | TyKind::UnaryTransform { base: inner, .. }
            | TyKind::Attributed { equivalent: inner, .. }
            | TyKind::Adjusted { original: inner, .. }
            | TyKind::Decayed { original: inner, .. } => of(inner),

            TyKind::Typedef { underlying, .. } => of(underlying) - TyFlags::UNEXPANDED_PACK,
            TyKind::MemberPointer { pointee, class } => of(pointee) | class.flags(),

            TyKind::VariableArray { element, size } => {
                let mut flags = of(element) | TyFlags::VARIABLY_MODIFIED;
                if let Some(size) = size {
                    if size.is_instantiation_dependent() {
                        flags |= TyFlags::INSTANTIATION_DEPENDENT;
                    }
                    flags |= pack_of(size);
                }
                flags
            }
            TyKind::DependentSizedArray { element, size } => {
                of(element) | TyFlags::dependent() | size.as_ref().map_or(TyFlags::empty(), pack_of)
            }
            TyKind::DependentSizedExtVector { element, size } => {
                of(element) | TyFlags::dependent() | pack_of(size)
            }
            TyKind::DependentAddressSpace { pointee, address_space } => {
                of(pointee) | TyFlags::dependent() | pack_of(address_space)
            }

            TyKind::FunctionNoProto { result } => of(result),
            TyKind::FunctionProto(proto) => {
                let mut flags = of(&proto.result);
                for param in proto.params {
                    flags |= of(param) - TyFlags::VARIABLY_MODIFIED;
                }
                for exception in proto.exception.exceptions() {
                    if exception.ty.is_instantiation_dependent() {
                        flags |= TyFlags::INSTANTIATION_DEPENDENT;
                    }
                    flags |= of(exception) & TyFlags::UNEXPANDED_PACK;
                }
                if let Some(expr) = proto.exception.noexcept_expr() {
                    if expr.is_value_dependent() || expr.is_instantiation_dependent() {
                        flags |= TyFlags::INSTANTIATION_DEPENDENT;
                    }
                    flags |= pack_of(&expr);
                }
                flags
            }

            TyKind::TypeOfExpr { expr, underlying } => {
                let mut flags = of(underlying) & TyFlags::VARIABLY_MODIFIED;
                if expr.is_type_dependent() {
                    flags |= TyFlags::dependent();
                }
                if expr.is_instantiation_dependent() {
                    flags |= TyFlags::INSTANTIATION_DEPENDENT;
                }
                flags | pack_of(expr)
            }
            TyKind::Decltype { expr, underlying } => {
                let mut flags = of(underlying) & TyFlags::VARIABLY_MODIFIED;
                if expr.is_instantiation_dependent() {
                    flags |= TyFlags::dependent();
                }
                flags | pack_of(expr)
            }

            TyKind::TemplateTypeParm { pack, .. } => {
                let mut flags = TyFlags::dependent();
                if *pack {
                    flags |= TyFlags::UNEXPANDED_PACK;
                }
                flags
            }
            TyKind::SubstTemplateTypeParmPack { .. } => TyFlags::dependent() | TyFlags::UNEXPANDED_PACK,
            TyKind::DependentName { qualifier, .. } => {
                TyFlags::dependent() | (of(qualifier) & TyFlags::UNEXPANDED_PACK)
            }
            TyKind::TemplateSpecialization { args, underlying, alias, .. } => {
                let mut flags = match underlying {
                    None => TyFlags::dependent(),
                    Some(u) => {
                        let mut f = of(u) & TyFlags::dependent();
                        if *alias {
                            f |= of(u) & TyFlags::VARIABLY_MODIFIED;
                        }
                        f
                    }
                };
                let args = all(args);
                if args.contains(TyFlags::INSTANTIATION_DEPENDENT) {
                    flags |= TyFlags::INSTANTIATION_DEPENDENT;
                }
                flags | (args & TyFlags::UNEXPANDED_PACK)
            }
            TyKind::PackExpansion { pattern, .. } => {
                let pattern = of(pattern);
                (pattern & (TyFlags::DEPENDENT | TyFlags::VARIABLY_MODIFIED))
                    | TyFlags::INSTANTIATION_DEPENDENT
            }
            TyKind::Auto { deduced, dependent, .. } => {
                if *dependent {
                    TyFlags::dependent()
                } else {
                    deduced.as_ref().map_or(TyFlags::empty(), |d| of(d) & TyFlags::dependent())
                }
            }
            TyKind::DeducedTemplateSpecialization { deduced, .. } => {
                deduced.as_ref().map_or(TyFlags::empty(), |d| of(d) & TyFlags::dependent())
            }

            TyKind::ObjCTypeParam { .. } => TyFlags::empty(),
            TyKind::ObjCObject { base, type_args, .. } => {
                let mut flags = of(base);
                for arg in type_args.iter() {
                    let arg = of(arg);
                    if arg.contains(TyFlags::DEPENDENT) {
                        flags |= TyFlags::dependent();
                    } else if arg.contains(TyFlags::INSTANTIATION_DEPENDENT) {
                        flags |= TyFlags::INSTANTIATION_DEPENDENT;
                    }
                    flags |= arg & TyFlags::UNEXPANDED_PACK;
                }
                flags
            }
        };

        if flags.contains(TyFlags::DEPENDENT) {
            flags | TyFlags::INSTANTIATION_DEPENDENT
        } else {
            flags
        }
    }

    /// Child types in definition order.
    ///
    /// - pointers, references, arrays, vectors, sugar wrappers: `[inner]`
    /// - `MemberPointer`: `[pointee, class]`
    /// - `FunctionProto`: `[result, params..., exceptions...]`
    /// - `Adjusted`/`Decayed`: `[original, adjusted]`
    /// - `Attributed`: `[modified, equivalent]`
    /// - `TemplateSpecialization`: `[args..., underlying?]`
    /// - `ObjCObject`: `[base, type_args...]`
    pub fn children(&self) -> Children<'tcx> {
        let mut out = Children::new();
        match *self {
            TyKind::Builtin(_)
            | TyKind::Record(_)
            | TyKind::Enum(_)
            | TyKind::TemplateTypeParm { .. }
            | TyKind::ObjCTypeParam { .. }
            | TyKind::ObjCInterface(_)
            | TyKind::TypeVariable { .. } => {}

            TyKind::Complex(inner)
            | TyKind::Pointer { pointee: inner, .. }
            | TyKind::BlockPointer(inner)
            | TyKind::LValueReference(inner)
            | TyKind::RValueReference(inner)
            | TyKind::ConstantArray { element: inner, .. }
            | TyKind::IncompleteArray { element: inner, .. }
            | TyKind::VariableArray { element: inner, .. }
            | TyKind::DependentSizedArray { element: inner, .. }
            | TyKind::DependentSizedExtVector { element: inner, .. }
            | TyKind::DependentAddressSpace { pointee: inner, .. }
            | TyKind::Vector { element: inner, .. }
            | TyKind::ExtVector { element: inner, .. }
            | TyKind::FunctionNoProto { result: inner }
            | TyKind::Paren(inner)
            | TyKind::Typedef { underlying: inner, .. }
            | TyKind::TypeOfExpr { underlying: inner, .. }
            | TyKind::TypeOf(inner)
            | TyKind::Decltype { underlying: inner, .. }
            | TyKind::Elaborated { named: inner, .. }
            | TyKind::SubstTemplateTypeParm { replacement: inner, .. }
            | TyKind::DependentName { qualifier: inner, .. }
            | TyKind::PackExpansion { pattern: inner, .. }
            | TyKind::ObjCObjectPointer(inner)
            | TyKind::Atomic(inner)
            | TyKind::Pipe { element: inner, .. } => out.push(inner),

            TyKind::MemberPointer { pointee, class } => {
                out.push(pointee);
                out.push(QualType::unqualified(class));
            }
            TyKind::FunctionProto(proto) => {
                out.push(proto.result);
                out.extend(proto.params.iter().copied());
                out.extend(proto.exception.exceptions().iter().copied());
            }
            TyKind::Adjusted { original, adjusted } => {
                out.push(original);
                out.push(adjusted);
            }
            TyKind::Decayed { original, decayed } => {
                out.push(original);
                out.push(decayed);
            }
            TyKind::UnaryTransform { base, underlying, .. } => {
                out.push(base);
                out.push(underlying);
            }
            TyKind::Attributed { modified, equivalent, .. } => {
                out.push(modified);
                out.push(equivalent);
            }
            TyKind::SubstTemplateTypeParmPack { args, .. } => out.extend(args.iter().copied()),
            TyKind::TemplateSpecialization { args, underlying, .. } => {
                out.extend(args.iter().copied());
                out.extend(underlying);
            }
            TyKind::Auto { deduced, .. } | TyKind::DeducedTemplateSpecialization { deduced, .. } => {
                out.extend(deduced)
            }
            TyKind::ObjCObject { base, type_args, .. } => {
                out.push(base);
                out.extend(type_args.iter().copied());
            }
        }
        out
    }

    /// Rebuilds this shape with new children, given in the order produced
    /// by [`TyKind::children`].
    pub fn with_children(&self, tcx: TyCtxt<'tcx>, children: &[QualType<'tcx>]) -> TyKind<'tcx> {
        debug_assert_eq!(children.len(), self.children().len(), "child count mismatch for {self:?}");
        let first = || children[0];
        match *self {
            TyKind::Builtin(_)
            | TyKind::Record(_)
            | TyKind::Enum(_)
            | TyKind::TemplateTypeParm { .. }
            | TyKind::ObjCTypeParam { .. }
            | TyKind::ObjCInterface(_)
            | TyKind::TypeVariable { .. } => *self,

            TyKind::Complex(_) => TyKind::Complex(first()),
            TyKind::Pointer { checked, .. } => TyKind::Pointer { pointee: first(), checked },
            TyKind::BlockPointer(_) => TyKind::BlockPointer(first()),
            TyKind::LValueReference(_) => TyKind::LValueReference(first()),
            TyKind::RValueReference(_) => TyKind::RValueReference(first()),
            TyKind::MemberPointer { .. } => {
                TyKind::MemberPointer { pointee: children[0], class: children[1].ty }
            }
            TyKind::ConstantArray { size, checked, .. } => {
                TyKind::ConstantArray { element: first(), size, checked }
            }
            TyKind::IncompleteArray { checked, .. } => TyKind::IncompleteArray { element: first(), checked },
            TyKind::VariableArray { size, .. } => TyKind::VariableArray { element: first(), size },
            TyKind::DependentSizedArray { size, .. } => {
                TyKind::DependentSizedArray { element: first(), size }
            }
            TyKind::DependentSizedExtVector { size, .. } => {
                TyKind::DependentSizedExtVector { element: first(), size }
            }
            TyKind::DependentAddressSpace { address_space, .. } => {
                TyKind::DependentAddressSpace { pointee: first(), address_space }
            }
            TyKind::Vector { count, kind, .. } => TyKind::Vector { element: first(), count, kind },
            TyKind::ExtVector { count, .. } => TyKind::ExtVector { element: first(), count },
            TyKind::FunctionNoProto { .. } => TyKind::FunctionNoProto { result: first() },
            TyKind::FunctionProto(proto) => {
                let params_end = 1 + proto.params.len();
                let exception = match proto.exception {
                    ExceptionSpec::Dynamic(_) => {
                        ExceptionSpec::Dynamic(tcx.mk_ty_list(children[params_end..].iter().copied()))
                    }
                    other => other,
                };
                TyKind::FunctionProto(FnProto {
                    result: children[0],
                    params: tcx.mk_ty_list(children[1..params_end].iter().copied()),
                    exception,
                    ..proto
                })
            }
            TyKind::Paren(_) => TyKind::Paren(first()),
            TyKind::Typedef { decl, .. } => TyKind::Typedef { decl, underlying: first() },
            TyKind::Adjusted { .. } => TyKind::Adjusted { original: children[0], adjusted: children[1] },
            TyKind::Decayed { .. } => TyKind::Decayed { original: children[0], decayed: children[1] },
            TyKind::TypeOfExpr { expr, .. } => TyKind::TypeOfExpr { expr, underlying: first() },
            TyKind::TypeOf(_) => TyKind::TypeOf(first()),
            TyKind::Decltype { expr, .. } => TyKind::Decltype { expr, underlying: first() },
            TyKind::UnaryTransform { kind, .. } => {
                TyKind::UnaryTransform { base: children[0], underlying: children[1], kind }
            }
            TyKind::Elaborated { keyword, .. } => TyKind::Elaborated { keyword, named: first() },
            TyKind::Attributed { attr, .. } => {
                TyKind::Attributed { attr, modified: children[0], equivalent: children[1] }
            }
            TyKind::SubstTemplateTypeParm { replaced, .. } => {
                TyKind::SubstTemplateTypeParm { replaced, replacement: first() }
            }
            TyKind::SubstTemplateTypeParmPack { replaced, .. } => TyKind::SubstTemplateTypeParmPack {
                replaced,
                args: tcx.mk_ty_list(children.iter().copied()),
            },
            TyKind::TemplateSpecialization { template, args, underlying, alias } => {
                let (args_part, rest) = children.split_at(args.len());
                TyKind::TemplateSpecialization {
                    template,
                    args: tcx.mk_ty_list(args_part.iter().copied()),
                    underlying: underlying.and(rest.first().copied()),
                    alias,
                }
            }
            TyKind::DependentName { name, .. } => TyKind::DependentName { qualifier: first(), name },
            TyKind::PackExpansion { num_expansions, .. } => {
                TyKind::PackExpansion { pattern: first(), num_expansions }
            }
            TyKind::Auto { keyword, dependent, .. } => {
                TyKind::Auto { deduced: children.first().copied(), keyword, dependent }
            }
            TyKind::DeducedTemplateSpecialization { template, .. } => {
                TyKind::DeducedTemplateSpecialization { template, deduced: children.first().copied() }
            }
            TyKind::ObjCObject { protocols, kind_of, .. } => TyKind::ObjCObject {
                base: children[0],
                type_args: tcx.mk_ty_list(children[1..].iter().copied()),
                protocols,
                kind_of,
            },
            TyKind::ObjCObjectPointer(_) => TyKind::ObjCObjectPointer(first()),
            TyKind::Atomic(_) => TyKind::Atomic(first()),
            TyKind::Pipe { read_only, .. } => TyKind::Pipe { element: first(), read_only },
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            TyKind::ConstantArray { .. }
                | TyKind::IncompleteArray { .. }
                | TyKind::VariableArray { .. }
                | TyKind::DependentSizedArray { .. }
        )
    }

    /// The element of any array shape.
    pub fn array_element(&self) -> Option<QualType<'tcx>> {
        match *self {
            TyKind::ConstantArray { element, .. }
            | TyKind::IncompleteArray { element, .. }
            | TyKind::VariableArray { element, .. }
            | TyKind::DependentSizedArray { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, TyKind::FunctionNoProto { .. } | TyKind::FunctionProto(_))
    }

    /// Result type of either function shape.
    pub fn fn_result(&self) -> Option<QualType<'tcx>> {
        match self {
            TyKind::FunctionNoProto { result } => Some(*result),
            TyKind::FunctionProto(proto) => Some(proto.result),
            _ => None,
        }
    }
}
