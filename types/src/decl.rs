//! Declarations that types refer to.
//!
//! Type nodes hold only ids; everything else about a record, enum, class
//! interface or template lives behind the [`DeclStore`] seam. A front end
//! implements the trait over its own AST. [`DeclTable`] is a small
//! in-memory implementation used by tools and tests.

use alloc::vec::Vec;
use core::cell::RefCell;

use bitflags::bitflags;
use bumpalo::Bump;

use crate::core::{
    EnumId, ExprRef, InterfaceId, ProtocolId, QualType, RecordId, TemplateId, TypeParamId, TypedefId,
};
use crate::linkage::{Linkage, Visibility};

/// Read access to declarations, keyed by the ids stored in type nodes.
///
/// Ids handed to a store must have been issued by it.
pub trait DeclStore<'tcx> {
    fn record(&self, id: RecordId) -> &'tcx RecordDecl<'tcx>;
    fn enum_decl(&self, id: EnumId) -> &'tcx EnumDecl<'tcx>;
    fn typedef(&self, id: TypedefId) -> &'tcx TypedefDecl<'tcx>;
    fn interface(&self, id: InterfaceId) -> &'tcx InterfaceDecl<'tcx>;
    fn type_param(&self, id: TypeParamId) -> &'tcx TypeParamDecl<'tcx>;
    fn protocol(&self, id: ProtocolId) -> &'tcx ProtocolDecl<'tcx>;
    fn template(&self, id: TemplateId) -> &'tcx TemplateDecl<'tcx>;
}

/// Constant evaluation of expressions embedded in types.
pub trait ExprStore {
    /// Evaluates a non-dependent expression as a boolean, if it is constant.
    fn evaluate_as_bool(&self, expr: ExprRef) -> Option<bool>;
}

/// An expression store that knows no constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExprs;

impl ExprStore for NoExprs {
    fn evaluate_as_bool(&self, _expr: ExprRef) -> Option<bool> {
        None
    }
}

// === Records ===

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TagKind {
    Struct,
    Class,
    Union,
    Interface,
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct RecordFlags: u16 {
        /// The definition has been seen.
        const COMPLETE = 1;
        /// Declared in C++, so the class-level flags below are meaningful.
        const CXX = 1 << 1;
        /// A member of a class template pattern.
        const DEPENDENT = 1 << 2;
        /// The closure type of a lambda.
        const LAMBDA = 1 << 3;
        const PACKED = 1 << 4;
        /// Declared inside a function body.
        const IN_FUNCTION = 1 << 5;
        /// An anonymous record named for linkage purposes by a typedef.
        const TYPEDEF_NAME_FOR_LINKAGE = 1 << 6;
    }
}

bitflags! {
    /// Class-level properties a C++ front end computes from the definition.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct CxxRecordFlags: u16 {
        const HAS_DEFAULT_CTOR = 1;
        const HAS_NON_TRIVIAL_DEFAULT_CTOR = 1 << 1;
        const TRIVIALLY_COPYABLE = 1 << 2;
        const HAS_NON_TRIVIAL_DTOR = 1 << 3;
        const STANDARD_LAYOUT = 1 << 4;
        const TRIVIAL = 1 << 5;
        const LITERAL = 1 << 6;
        const AGGREGATE = 1 << 7;
        const POD = 1 << 8;
        /// No non-static data members, virtual functions or virtual bases,
        /// and only empty bases.
        const EMPTY = 1 << 9;
        /// Has a virtual function table pointer.
        const DYNAMIC = 1 << 10;
    }
}

impl CxxRecordFlags {
    /// Flags of a class that behaves exactly like a C struct.
    pub const fn plain_old_data() -> Self {
        CxxRecordFlags::HAS_DEFAULT_CTOR
            .union(CxxRecordFlags::TRIVIALLY_COPYABLE)
            .union(CxxRecordFlags::STANDARD_LAYOUT)
            .union(CxxRecordFlags::TRIVIAL)
            .union(CxxRecordFlags::LITERAL)
            .union(CxxRecordFlags::AGGREGATE)
            .union(CxxRecordFlags::POD)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDecl<'tcx> {
    pub name: &'tcx str,
    pub ty: QualType<'tcx>,
    /// A bounds declaration is attached to the field.
    pub has_bounds_expr: bool,
}

impl<'tcx> FieldDecl<'tcx> {
    pub fn new(name: &'tcx str, ty: QualType<'tcx>) -> Self {
        Self { name, ty, has_bounds_expr: false }
    }

    pub fn with_bounds(self) -> Self {
        Self { has_bounds_expr: true, ..self }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BaseSpec<'tcx> {
    pub ty: QualType<'tcx>,
    pub is_virtual: bool,
}

impl<'tcx> BaseSpec<'tcx> {
    pub fn new(ty: QualType<'tcx>) -> Self {
        Self { ty, is_virtual: false }
    }

    pub fn virtual_base(ty: QualType<'tcx>) -> Self {
        Self { ty, is_virtual: true }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RecordDecl<'tcx> {
    pub name: Option<&'tcx str>,
    pub tag: TagKind,
    pub flags: RecordFlags,
    pub cxx: CxxRecordFlags,
    pub fields: &'tcx [FieldDecl<'tcx>],
    pub bases: &'tcx [BaseSpec<'tcx>],
    pub linkage: Linkage,
    pub visibility: Visibility,
}

impl<'tcx> RecordDecl<'tcx> {
    pub fn new(tag: TagKind, name: Option<&'tcx str>) -> Self {
        Self {
            name,
            tag,
            flags: RecordFlags::empty(),
            cxx: CxxRecordFlags::empty(),
            fields: &[],
            bases: &[],
            linkage: Linkage::External,
            visibility: Visibility::Default,
        }
    }

    pub fn with_flags(self, flags: RecordFlags) -> Self {
        Self { flags: self.flags | flags, ..self }
    }

    pub fn with_cxx(self, cxx: CxxRecordFlags) -> Self {
        Self { flags: self.flags | RecordFlags::CXX, cxx: self.cxx | cxx, ..self }
    }

    pub fn with_linkage(self, linkage: Linkage, visibility: Visibility) -> Self {
        Self { linkage, visibility, ..self }
    }

    pub fn is_complete(&self) -> bool {
        self.flags.contains(RecordFlags::COMPLETE)
    }

    pub fn is_cxx(&self) -> bool {
        self.flags.contains(RecordFlags::CXX)
    }

    pub fn is_dependent(&self) -> bool {
        self.flags.contains(RecordFlags::DEPENDENT)
    }

    pub fn is_lambda(&self) -> bool {
        self.flags.contains(RecordFlags::LAMBDA)
    }

    pub fn is_packed(&self) -> bool {
        self.flags.contains(RecordFlags::PACKED)
    }

    pub fn is_union(&self) -> bool {
        self.tag == TagKind::Union
    }

    pub fn has_cxx_flag(&self, flag: CxxRecordFlags) -> bool {
        self.is_cxx() && self.cxx.contains(flag)
    }

    pub fn is_empty_class(&self) -> bool {
        self.has_cxx_flag(CxxRecordFlags::EMPTY)
    }

    pub fn has_name_for_linkage(&self) -> bool {
        self.name.is_some() || self.flags.contains(RecordFlags::TYPEDEF_NAME_FOR_LINKAGE)
    }

    pub fn is_in_function(&self) -> bool {
        self.flags.contains(RecordFlags::IN_FUNCTION)
    }
}

// === Enums and typedefs ===

#[derive(Clone, Copy, Debug)]
pub struct EnumDecl<'tcx> {
    pub name: Option<&'tcx str>,
    pub complete: bool,
    /// Declared with an explicit underlying type.
    pub fixed: bool,
    pub scoped: bool,
    pub dependent: bool,
    pub in_function: bool,
    pub underlying: QualType<'tcx>,
    pub linkage: Linkage,
    pub visibility: Visibility,
}

impl<'tcx> EnumDecl<'tcx> {
    /// A complete, unscoped enum with the given underlying type.
    pub fn new(name: Option<&'tcx str>, underlying: QualType<'tcx>) -> Self {
        Self {
            name,
            complete: true,
            fixed: false,
            scoped: false,
            dependent: false,
            in_function: false,
            underlying,
            linkage: Linkage::External,
            visibility: Visibility::Default,
        }
    }

    pub fn scoped(self) -> Self {
        Self { scoped: true, fixed: true, ..self }
    }

    pub fn incomplete(self) -> Self {
        Self { complete: false, ..self }
    }

    /// Defined, or declared with a fixed underlying type.
    pub fn is_complete(&self) -> bool {
        self.complete || self.fixed
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TypedefDecl<'tcx> {
    pub name: &'tcx str,
    pub underlying: QualType<'tcx>,
}

// === Objective-C ===

#[derive(Clone, Copy, Debug)]
pub struct InterfaceDecl<'tcx> {
    pub name: &'tcx str,
    pub has_definition: bool,
    /// The superclass as written, possibly specialized (`NSArray<T>`).
    pub superclass: Option<QualType<'tcx>>,
    /// `None` for a class that is not parameterized.
    pub type_params: Option<&'tcx [TypeParamId]>,
    pub linkage: Linkage,
    pub visibility: Visibility,
}

impl<'tcx> InterfaceDecl<'tcx> {
    pub fn new(name: &'tcx str) -> Self {
        Self {
            name,
            has_definition: true,
            superclass: None,
            type_params: None,
            linkage: Linkage::External,
            visibility: Visibility::Default,
        }
    }

    pub fn type_params(&self) -> &'tcx [TypeParamId] {
        self.type_params.unwrap_or(&[])
    }

    pub fn is_parameterized(&self) -> bool {
        self.type_params.is_some()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

#[derive(Clone, Copy, Debug)]
pub struct TypeParamDecl<'tcx> {
    pub name: &'tcx str,
    /// Position in the owning class's parameter list.
    pub index: u32,
    /// Upper bound; an object pointer type, `id` when unbounded.
    pub bound: QualType<'tcx>,
    pub variance: Variance,
}

#[derive(Clone, Copy, Debug)]
pub struct ProtocolDecl<'tcx> {
    pub name: &'tcx str,
}

// === Templates ===

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TemplateKind {
    Class,
    Alias,
    Function,
    Variable,
}

#[derive(Clone, Copy, Debug)]
pub struct TemplateDecl<'tcx> {
    pub name: &'tcx str,
    pub kind: TemplateKind,
}

impl<'tcx> TemplateDecl<'tcx> {
    pub fn is_class_template(&self) -> bool {
        self.kind == TemplateKind::Class
    }
}

// === In-memory store ===

/// A growable [`DeclStore`] whose declarations live in an arena.
///
/// Declarations are immutable once handed out; `update_*` replaces the
/// stored reference, so types interned earlier keep seeing the flags they
/// were created with. Dependence in particular must be set up front.
pub struct DeclTable<'tcx> {
    arena: &'tcx Bump,
    records: RefCell<Vec<&'tcx RecordDecl<'tcx>>>,
    enums: RefCell<Vec<&'tcx EnumDecl<'tcx>>>,
    typedefs: RefCell<Vec<&'tcx TypedefDecl<'tcx>>>,
    interfaces: RefCell<Vec<&'tcx InterfaceDecl<'tcx>>>,
    type_params: RefCell<Vec<&'tcx TypeParamDecl<'tcx>>>,
    protocols: RefCell<Vec<&'tcx ProtocolDecl<'tcx>>>,
    templates: RefCell<Vec<&'tcx TemplateDecl<'tcx>>>,
}

fn push<'tcx, T>(arena: &'tcx Bump, table: &RefCell<Vec<&'tcx T>>, decl: T) -> u32 {
    let mut table = table.borrow_mut();
    let id = u32::try_from(table.len()).expect("declaration table overflow");
    table.push(arena.alloc(decl));
    id
}

fn replace<'tcx, T: Copy>(
    arena: &'tcx Bump,
    table: &RefCell<Vec<&'tcx T>>,
    index: usize,
    f: impl FnOnce(&mut T),
) {
    let mut table = table.borrow_mut();
    let mut decl = *table[index];
    f(&mut decl);
    table[index] = arena.alloc(decl);
}

impl<'tcx> DeclTable<'tcx> {
    pub fn new(arena: &'tcx Bump) -> Self {
        Self {
            arena,
            records: RefCell::new(Vec::new()),
            enums: RefCell::new(Vec::new()),
            typedefs: RefCell::new(Vec::new()),
            interfaces: RefCell::new(Vec::new()),
            type_params: RefCell::new(Vec::new()),
            protocols: RefCell::new(Vec::new()),
            templates: RefCell::new(Vec::new()),
        }
    }

    pub fn alloc_str(&self, s: &str) -> &'tcx str {
        self.arena.alloc_str(s)
    }

    pub fn add_record(&self, decl: RecordDecl<'tcx>) -> RecordId {
        RecordId(push(self.arena, &self.records, decl))
    }

    pub fn update_record(&self, id: RecordId, f: impl FnOnce(&mut RecordDecl<'tcx>)) {
        replace(self.arena, &self.records, id.index(), f)
    }

    /// Declares a C struct without defining it.
    pub fn declare_struct(&self, name: &'tcx str) -> RecordId {
        self.add_record(RecordDecl::new(TagKind::Struct, Some(name)))
    }

    /// Declares a C++ class without defining it.
    pub fn declare_class(&self, tag: TagKind, name: &'tcx str) -> RecordId {
        self.add_record(RecordDecl::new(tag, Some(name)).with_flags(RecordFlags::CXX))
    }

    /// Completes a record with its fields.
    pub fn define_record(&self, id: RecordId, fields: impl IntoIterator<Item = FieldDecl<'tcx>>) {
        let fields: Vec<FieldDecl<'tcx>> = fields.into_iter().collect();
        let fields = self.arena.alloc_slice_copy(&fields);
        self.update_record(id, |decl| {
            decl.fields = fields;
            decl.flags |= RecordFlags::COMPLETE;
        });
    }

    pub fn set_bases(&self, id: RecordId, bases: &[BaseSpec<'tcx>]) {
        let bases = self.arena.alloc_slice_copy(bases);
        self.update_record(id, |decl| decl.bases = bases);
    }

    pub fn add_enum(&self, decl: EnumDecl<'tcx>) -> EnumId {
        EnumId(push(self.arena, &self.enums, decl))
    }

    pub fn add_typedef(&self, name: &'tcx str, underlying: QualType<'tcx>) -> TypedefId {
        TypedefId(push(self.arena, &self.typedefs, TypedefDecl { name, underlying }))
    }

    pub fn add_interface(&self, decl: InterfaceDecl<'tcx>) -> InterfaceId {
        InterfaceId(push(self.arena, &self.interfaces, decl))
    }

    pub fn update_interface(&self, id: InterfaceId, f: impl FnOnce(&mut InterfaceDecl<'tcx>)) {
        replace(self.arena, &self.interfaces, id.index(), f)
    }

    /// Adds type parameters to a class, in order, returning their ids.
    pub fn set_type_params(
        &self,
        owner: InterfaceId,
        params: impl IntoIterator<Item = (&'tcx str, QualType<'tcx>)>,
    ) -> &'tcx [TypeParamId] {
        let mut ids = Vec::new();
        for (index, (name, bound)) in params.into_iter().enumerate() {
            let index = u32::try_from(index).expect("too many type parameters");
            let decl = TypeParamDecl { name, index, bound, variance: Variance::Invariant };
            ids.push(TypeParamId(push(self.arena, &self.type_params, decl)));
        }
        let ids = self.arena.alloc_slice_copy(&ids);
        self.update_interface(owner, |decl| decl.type_params = Some(ids));
        ids
    }

    pub fn add_protocol(&self, name: &'tcx str) -> ProtocolId {
        ProtocolId(push(self.arena, &self.protocols, ProtocolDecl { name }))
    }

    pub fn add_template(&self, name: &'tcx str, kind: TemplateKind) -> TemplateId {
        TemplateId(push(self.arena, &self.templates, TemplateDecl { name, kind }))
    }
}

impl<'tcx> DeclStore<'tcx> for DeclTable<'tcx> {
    fn record(&self, id: RecordId) -> &'tcx RecordDecl<'tcx> {
        self.records.borrow()[id.index()]
    }

    fn enum_decl(&self, id: EnumId) -> &'tcx EnumDecl<'tcx> {
        self.enums.borrow()[id.index()]
    }

    fn typedef(&self, id: TypedefId) -> &'tcx TypedefDecl<'tcx> {
        self.typedefs.borrow()[id.index()]
    }

    fn interface(&self, id: InterfaceId) -> &'tcx InterfaceDecl<'tcx> {
        self.interfaces.borrow()[id.index()]
    }

    fn type_param(&self, id: TypeParamId) -> &'tcx TypeParamDecl<'tcx> {
        self.type_params.borrow()[id.index()]
    }

    fn protocol(&self, id: ProtocolId) -> &'tcx ProtocolDecl<'tcx> {
        self.protocols.borrow()[id.index()]
    }

    fn template(&self, id: TemplateId) -> &'tcx TemplateDecl<'tcx> {
        self.templates.borrow()[id.index()]
    }
}
