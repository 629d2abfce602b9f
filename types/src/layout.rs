//! Sizes, alignments and record layout.
//!
//! All quantities are in bits. Layout follows the usual LP64/ILP32 C rules
//! with the Itanium C++ additions that matter for padding analysis:
//!
//! - a dynamic class without a dynamic primary base starts with a vtable
//!   pointer;
//! - empty bases take no storage;
//! - virtual bases are placed after all non-virtual data;
//! - a complete C++ object is never zero-sized.
//!
//! Layouts are computed on first request and cached per record.

use alloc::vec::Vec;

use smallvec::SmallVec;
use tracing::debug;

use crate::context::TyCtxt;
use crate::core::{BuiltinKind, QualType, RecordId, TyKind};
use crate::decl::{CxxRecordFlags, RecordDecl};

/// Size and alignment of a type, in bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeInfo {
    pub size: u64,
    pub align: u64,
}

impl TypeInfo {
    fn new(size: u64, align: u64) -> Self {
        Self { size, align }
    }
}

/// Placement of a record's subobjects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RecordLayout<'tcx> {
    pub size: u64,
    pub align: u64,
    /// Size without virtual bases; what the record occupies as a base.
    pub non_virtual_size: u64,
    /// Offset of each field, in declaration order.
    pub field_offsets: &'tcx [u64],
    /// Offset of each direct base, in declaration order.
    pub base_offsets: &'tcx [u64],
    pub has_vptr: bool,
}

fn align_to(offset: u64, align: u64) -> u64 {
    offset.div_ceil(align) * align
}

impl<'tcx> TyCtxt<'tcx> {
    pub fn type_size(self, qt: QualType<'tcx>) -> u64 {
        self.type_info(qt).size
    }

    pub fn type_align(self, qt: QualType<'tcx>) -> u64 {
        self.type_info(qt).align
    }

    /// Size and alignment of a complete type of constant size.
    ///
    /// Arrays without a constant bound have size 0 and the alignment of
    /// their element, so a flexible array member adds no storage.
    ///
    /// # Panics
    ///
    /// For incomplete records, dependent and function types, and for
    /// placeholder builtins.
    pub fn type_info(self, qt: QualType<'tcx>) -> TypeInfo {
        let target = self.target();
        let ptr = u64::from(target.pointer_width);
        let canonical = qt.canonical();
        match *canonical.kind() {
            TyKind::Builtin(kind) => self.builtin_info(kind),

            TyKind::Pointer { .. }
            | TyKind::BlockPointer(_)
            | TyKind::ObjCObjectPointer(_)
            | TyKind::LValueReference(_)
            | TyKind::RValueReference(_) => TypeInfo::new(ptr, ptr),

            TyKind::MemberPointer { pointee, .. } => {
                // A member function pointer is a function pointer and an
                // adjustment.
                if pointee.canonical().kind().is_function() {
                    TypeInfo::new(2 * ptr, ptr)
                } else {
                    TypeInfo::new(ptr, ptr)
                }
            }

            TyKind::ConstantArray { element, size, .. } => {
                let element = self.type_info(element);
                TypeInfo::new(element.size * size, element.align)
            }

            TyKind::IncompleteArray { element, .. } | TyKind::VariableArray { element, .. } => {
                TypeInfo::new(0, self.type_info(element).align)
            }

            TyKind::Complex(element) => {
                let element = self.type_info(element);
                TypeInfo::new(2 * element.size, element.align)
            }

            TyKind::Vector { element, count, .. } | TyKind::ExtVector { element, count } => {
                let element = self.type_info(element);
                let size = element.size * u64::from(count);
                let align = size.next_power_of_two();
                TypeInfo::new(align_to(size, align), align)
            }

            TyKind::Record(id) => {
                let layout = self.record_layout(id);
                TypeInfo::new(layout.size, layout.align)
            }

            TyKind::Enum(id) => self.type_info(self.decls().enum_decl(id).underlying),

            TyKind::Atomic(value) => {
                let value = self.type_info(value);
                if value.size != 0 && value.size <= u64::from(target.max_atomic_inline_width) {
                    let size = value.size.next_power_of_two();
                    TypeInfo::new(size, size)
                } else {
                    value
                }
            }

            TyKind::Pipe { .. } => TypeInfo::new(ptr, ptr),

            _ => panic!("size of a type without constant size: {qt:?}"),
        }
    }

    fn builtin_info(self, kind: BuiltinKind) -> TypeInfo {
        let target = self.target();
        let natural = |width: u16| TypeInfo::new(u64::from(width), u64::from(width));
        match kind {
            // GNU extension: `void` has size 0 and byte alignment.
            BuiltinKind::Void => TypeInfo::new(0, 8),
            BuiltinKind::Bool => natural(target.bool_width),
            BuiltinKind::CharU | BuiltinKind::CharS | BuiltinKind::UChar | BuiltinKind::SChar => natural(8),
            BuiltinKind::WCharU | BuiltinKind::WCharS => natural(target.wchar_width),
            BuiltinKind::Char16 => natural(16),
            BuiltinKind::Char32 => natural(32),
            BuiltinKind::Short | BuiltinKind::UShort => natural(target.short_width),
            BuiltinKind::Int | BuiltinKind::UInt => natural(target.int_width),
            BuiltinKind::Long | BuiltinKind::ULong => natural(target.long_width),
            BuiltinKind::LongLong | BuiltinKind::ULongLong => natural(target.long_long_width),
            BuiltinKind::Int128 | BuiltinKind::UInt128 => TypeInfo::new(128, u64::from(target.int128_align)),
            BuiltinKind::Half => natural(target.half_width),
            BuiltinKind::Float => natural(target.float_width),
            BuiltinKind::Double => natural(target.double_width),
            BuiltinKind::LongDouble => {
                TypeInfo::new(u64::from(target.long_double_width), u64::from(target.long_double_align))
            }
            BuiltinKind::Float128 => TypeInfo::new(128, u64::from(target.float128_align)),
            BuiltinKind::NullPtr | BuiltinKind::ObjCId | BuiltinKind::ObjCClass | BuiltinKind::ObjCSel => {
                natural(target.pointer_width)
            }
            BuiltinKind::Dependent
            | BuiltinKind::Overload
            | BuiltinKind::BoundMember
            | BuiltinKind::UnknownAny => panic!("size of placeholder type {kind:?}"),
        }
    }

    /// Layout of a complete record, computed once.
    ///
    /// # Panics
    ///
    /// If the record is not complete.
    pub fn record_layout(self, id: RecordId) -> &'tcx RecordLayout<'tcx> {
        if let Some(&layout) = self.layouts().borrow().get(&id) {
            return layout;
        }
        // Field types may need their own layouts; no borrow is held here.
        let layout = self.arena().alloc(self.compute_layout(id));
        self.layouts().borrow_mut().insert(id, layout);
        debug!(record = ?id, size = layout.size, align = layout.align, "computed record layout");
        layout
    }

    fn compute_layout(self, id: RecordId) -> RecordLayout<'tcx> {
        let decl = self.decls().record(id);
        assert!(decl.is_complete(), "layout of incomplete record {id:?}");

        let packed = decl.is_packed();
        let ptr = u64::from(self.target().pointer_width);
        let mut offset = 0;
        let mut align = 8;
        let mut base_offsets: SmallVec<[u64; 4]> = SmallVec::from_elem(0, decl.bases.len());

        let has_vptr = decl.has_cxx_flag(CxxRecordFlags::DYNAMIC)
            && !decl
                .bases
                .iter()
                .filter(|b| !b.is_virtual)
                .filter_map(|b| base_record(b.ty))
                .any(|base| self.decls().record(base).has_cxx_flag(CxxRecordFlags::DYNAMIC));
        if has_vptr {
            offset = ptr;
            align = ptr;
        }

        for (i, base) in decl.bases.iter().enumerate() {
            if base.is_virtual {
                continue;
            }
            let Some(base_id) = base_record(base.ty) else { continue };
            if self.decls().record(base_id).is_empty_class() {
                continue;
            }
            let layout = self.record_layout(base_id);
            let base_align = if packed { 8 } else { layout.align };
            offset = align_to(offset, base_align);
            base_offsets[i] = offset;
            offset += layout.non_virtual_size;
            align = align.max(base_align);
        }

        let mut field_offsets = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            let info = self.type_info(field.ty);
            let field_align = if packed { 8 } else { info.align };
            align = align.max(field_align);
            if decl.is_union() {
                field_offsets.push(0);
                offset = offset.max(info.size);
            } else {
                offset = align_to(offset, field_align);
                field_offsets.push(offset);
                offset += info.size;
            }
        }
        let non_virtual_size = offset;

        for virtual_base in self.virtual_bases(decl) {
            let layout = self.record_layout(virtual_base);
            let base_align = if packed { 8 } else { layout.align };
            offset = align_to(offset, base_align);
            if let Some(i) = decl.bases.iter().position(|b| b.is_virtual && base_record(b.ty) == Some(virtual_base)) {
                base_offsets[i] = offset;
            }
            offset += layout.non_virtual_size;
            align = align.max(base_align);
        }

        let mut size = align_to(offset, align);
        if size == 0 && decl.is_cxx() {
            size = 8;
        }

        RecordLayout {
            size,
            align,
            non_virtual_size,
            field_offsets: self.arena().alloc_slice_copy(&field_offsets),
            base_offsets: self.arena().alloc_slice_copy(&base_offsets),
            has_vptr,
        }
    }

    /// Direct and indirect virtual bases, each once, in discovery order.
    fn virtual_bases(self, decl: &RecordDecl<'tcx>) -> SmallVec<[RecordId; 4]> {
        let mut out: SmallVec<[RecordId; 4]> = SmallVec::new();
        let mut stack: Vec<&RecordDecl<'tcx>> = alloc::vec![decl];
        while let Some(current) = stack.pop() {
            for base in current.bases {
                let Some(id) = base_record(base.ty) else { continue };
                if base.is_virtual && !out.contains(&id) {
                    out.push(id);
                }
                stack.push(self.decls().record(id));
            }
        }
        out
    }
}

fn base_record(qt: QualType<'_>) -> Option<RecordId> {
    match *qt.canonical().kind() {
        TyKind::Record(id) => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{BaseSpec, FieldDecl, RecordDecl, RecordFlags, TagKind};
    use crate::options::{LangOptions, TargetInfo};
    use crate::test_utils::{with_lang, with_tcx};
    use crate::ty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_sizes() {
        with_tcx(|tcx, _| {
            assert_eq!(tcx.type_size(tcx.char_ty()), 8);
            assert_eq!(tcx.type_info(tcx.int()), TypeInfo::new(32, 32));
            assert_eq!(tcx.type_size(tcx.long()), 64);
            assert_eq!(tcx.type_info(tcx.long_double()), TypeInfo::new(128, 128));
            assert_eq!(tcx.type_size(ty!(tcx, Ptr[Void])), 64);
            assert_eq!(tcx.type_size(ty!(tcx, Array[Int; 3])), 96);
            assert_eq!(tcx.type_info(ty!(tcx, Complex[Float])), TypeInfo::new(64, 32));
            assert_eq!(tcx.type_info(ty!(tcx, ExtVector[Float; 3])), TypeInfo::new(128, 128));
        });
    }

    #[test]
    fn test_ilp32_target() {
        let arena = bumpalo::Bump::new();
        let decls = crate::decl::DeclTable::new(&arena);
        let tcx = TyCtxt::new(&arena, &decls, LangOptions::c11(), TargetInfo::i386());
        assert_eq!(tcx.type_size(tcx.long()), 32);
        assert_eq!(tcx.type_info(tcx.long_double()), TypeInfo::new(96, 32));
        assert_eq!(tcx.type_size(tcx.mk_pointer(tcx.int())), 32);
    }

    #[test]
    fn test_struct_padding_and_packing() {
        with_lang(LangOptions::c11(), |tcx, decls| {
            let padded = decls.declare_struct("S");
            decls.define_record(padded, [FieldDecl::new("c", tcx.char_ty()), FieldDecl::new("i", tcx.int())]);
            let layout = tcx.record_layout(padded);
            assert_eq!(layout.field_offsets, &[0, 32]);
            assert_eq!((layout.size, layout.align), (64, 32));

            let packed = decls.add_record(RecordDecl::new(TagKind::Struct, Some("P")).with_flags(RecordFlags::PACKED));
            decls.define_record(packed, [FieldDecl::new("c", tcx.char_ty()), FieldDecl::new("i", tcx.int())]);
            let layout = tcx.record_layout(packed);
            assert_eq!(layout.field_offsets, &[0, 8]);
            assert_eq!((layout.size, layout.align), (40, 8));
        });
    }

    #[test]
    fn test_flexible_array_member() {
        with_lang(LangOptions::c11(), |tcx, decls| {
            // struct Flex { short n; double data[]; };
            let flex = decls.declare_struct("Flex");
            decls.define_record(
                flex,
                [FieldDecl::new("n", tcx.short()), FieldDecl::new("data", tcx.mk_incomplete_array(tcx.double()))],
            );
            let layout = tcx.record_layout(flex);
            assert_eq!(layout.field_offsets, &[0, 64]);
            assert_eq!((layout.size, layout.align), (64, 64));
            assert_eq!(tcx.type_info(ty!(tcx, Array[Int])), TypeInfo::new(0, 32));
        });
    }

    #[test]
    fn test_union_fields_overlap() {
        with_lang(LangOptions::c11(), |tcx, decls| {
            let u = decls.add_record(RecordDecl::new(TagKind::Union, Some("U")));
            decls.define_record(u, [FieldDecl::new("c", tcx.char_ty()), FieldDecl::new("d", tcx.double())]);
            let layout = tcx.record_layout(u);
            assert_eq!(layout.field_offsets, &[0, 0]);
            assert_eq!(layout.size, 64);
        });
    }

    #[test]
    fn test_empty_class_and_empty_base() {
        with_tcx(|tcx, decls| {
            let empty = decls.add_record(RecordDecl::new(TagKind::Class, Some("E")).with_cxx(CxxRecordFlags::EMPTY));
            decls.define_record(empty, []);
            assert_eq!(tcx.type_size(tcx.mk_record(empty)), 8);

            let derived = decls.declare_class(TagKind::Struct, "D");
            decls.set_bases(derived, &[BaseSpec::new(tcx.mk_record(empty))]);
            decls.define_record(derived, [FieldDecl::new("i", tcx.int())]);
            let layout = tcx.record_layout(derived);
            assert_eq!(layout.base_offsets, &[0]);
            assert_eq!(layout.field_offsets, &[0]);
            assert_eq!(layout.size, 32);
        });
    }

    #[test]
    fn test_dynamic_class_and_virtual_base() {
        with_tcx(|tcx, decls| {
            let base = decls.declare_class(TagKind::Struct, "B");
            decls.define_record(base, [FieldDecl::new("b", tcx.int())]);

            let dynamic = decls.add_record(
                RecordDecl::new(TagKind::Class, Some("V")).with_cxx(CxxRecordFlags::DYNAMIC),
            );
            decls.set_bases(dynamic, &[BaseSpec::virtual_base(tcx.mk_record(base))]);
            decls.define_record(dynamic, [FieldDecl::new("x", tcx.char_ty())]);

            let layout = tcx.record_layout(dynamic);
            assert!(layout.has_vptr);
            assert_eq!(layout.field_offsets, &[64]);
            assert_eq!(layout.non_virtual_size, 72);
            assert_eq!(layout.base_offsets, &[96]);
            assert_eq!(layout.size, 128);
        });
    }

    #[test]
    fn test_layout_is_cached() {
        with_tcx(|tcx, decls| {
            let s = decls.declare_struct("S");
            decls.define_record(s, [FieldDecl::new("x", tcx.short())]);
            assert!(core::ptr::eq(tcx.record_layout(s), tcx.record_layout(s)));
        });
    }

    #[test]
    fn test_atomic_rounds_up() {
        with_lang(LangOptions::c11(), |tcx, decls| {
            let s = decls.declare_struct("Three");
            decls.define_record(s, (0..3).map(|_| FieldDecl::new("c", tcx.char_ty())));
            assert_eq!(tcx.type_size(tcx.mk_record(s)), 24);
            assert_eq!(tcx.type_info(tcx.mk_atomic(tcx.mk_record(s))), TypeInfo::new(32, 32));
        });
    }
}
