//! Unique object representations: whether equal values always have equal
//! bytes, so that objects can be compared or hashed as raw memory.
//!
//! The answer rests on layout. Any padding between fields or at the tail
//! makes a record non-unique, as do virtual bases.

use smallvec::SmallVec;

use crate::context::TyCtxt;
use crate::core::{QualType, RecordId};
use crate::decl::RecordDecl;

impl<'tcx> QualType<'tcx> {
    pub fn has_unique_object_representations(self, tcx: TyCtxt<'tcx>) -> bool {
        let ty = self.ty;
        if ty.is_array_type() {
            return self.base_element_type().has_unique_object_representations(tcx);
        }
        if !self.is_trivially_copyable_type(tcx) {
            return false;
        }
        if ty.is_function_type() {
            return false;
        }
        if ty.is_integral_or_enumeration_type(tcx) {
            return true;
        }
        if ty.is_pointer_type() || ty.is_member_pointer_type() {
            return true;
        }
        let Some(id) = ty.as_record() else {
            return false;
        };
        let decl = tcx.decls().record(id);
        if decl.is_lambda() {
            return false;
        }
        if decl.is_union() {
            union_is_unique(tcx, self, decl)
        } else {
            struct_is_unique(tcx, self, id, decl)
        }
    }
}

/// Every member must be unique and fill the whole union.
fn union_is_unique<'tcx>(tcx: TyCtxt<'tcx>, union_ty: QualType<'tcx>, decl: &RecordDecl<'tcx>) -> bool {
    let size = tcx.type_size(union_ty);
    decl.fields
        .iter()
        .all(|field| field.ty.has_unique_object_representations(tcx) && tcx.type_size(field.ty) == size)
}

fn is_struct_empty(decl: &RecordDecl<'_>) -> bool {
    decl.fields.is_empty() && (!decl.is_cxx() || decl.is_empty_class())
}

fn struct_is_unique<'tcx>(tcx: TyCtxt<'tcx>, struct_ty: QualType<'tcx>, id: RecordId, decl: &RecordDecl<'tcx>) -> bool {
    if is_struct_empty(decl) {
        return false;
    }

    let layout = tcx.record_layout(id);

    // Non-empty bases as (offset, size), in address order.
    let mut bases: SmallVec<[(u64, u64); 4]> = SmallVec::new();
    for (base, &base_offset) in decl.bases.iter().zip(layout.base_offsets) {
        if base.is_virtual {
            return false;
        }
        let Some(base_id) = base.ty.ty.as_record() else {
            continue;
        };
        let base_decl = tcx.decls().record(base_id);
        // Empty bases take no storage.
        if is_struct_empty(base_decl) {
            continue;
        }
        if !struct_is_unique(tcx, base.ty, base_id, base_decl) {
            return false;
        }
        bases.push((base_offset, tcx.record_layout(base_id).non_virtual_size));
    }
    bases.sort_unstable_by_key(|&(base_offset, _)| base_offset);

    let mut offset = 0;
    for (base_offset, size) in bases {
        if base_offset != offset {
            return false;
        }
        offset += size;
    }

    for (field, &field_offset) in decl.fields.iter().zip(layout.field_offsets) {
        if !field.ty.has_unique_object_representations(tcx) || field_offset != offset {
            return false;
        }
        offset += tcx.type_size(field.ty);
    }
    // Anything left over is tail padding.
    offset == tcx.type_size(struct_ty)
}
