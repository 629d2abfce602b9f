//! Bounds-checked pointer and array queries.
//!
//! A checked pointer (`_Ptr`, `_Array_ptr`, `_Nt_array_ptr`) or checked
//! array carries its flavor in the node. These queries look through the
//! declarator structure (pointees, elements, function signatures) for one.

use crate::context::TyCtxt;
use crate::core::{CheckedArrayKind, CheckedPointerKind, Ty, TyKind};

/// Whether the canonical node is itself checked or unchecked, or `None`
/// if the node carries no checked flavor.
fn local_checkedness(kind: &TyKind<'_>) -> Option<bool> {
    match *kind {
        TyKind::Pointer { checked, .. } => Some(checked != CheckedPointerKind::Unchecked),
        TyKind::ConstantArray { checked, .. } | TyKind::IncompleteArray { checked, .. } => {
            Some(checked != CheckedArrayKind::Unchecked)
        }
        // Variable and dependent-size arrays are never checked.
        TyKind::VariableArray { .. } | TyKind::DependentSizedArray { .. } => Some(false),
        _ => None,
    }
}

impl<'tcx> Ty<'tcx> {
    /// Any checked pointer flavor.
    pub fn is_checked_pointer_type(self) -> bool {
        matches!(*self.canonical_ty().kind(), TyKind::Pointer { checked, .. } if checked != CheckedPointerKind::Unchecked)
    }

    pub fn is_unchecked_pointer_type(self) -> bool {
        matches!(*self.canonical_ty().kind(), TyKind::Pointer { checked: CheckedPointerKind::Unchecked, .. })
    }

    pub fn checked_pointer_kind(self) -> Option<CheckedPointerKind> {
        match *self.canonical_ty().kind() {
            TyKind::Pointer { checked, .. } => Some(checked),
            _ => None,
        }
    }

    pub fn is_checked_array_type(self) -> bool {
        local_checkedness(self.canonical_ty().kind()) == Some(true) && self.is_array_type()
    }

    /// Whether the type is checked or mentions a checked type through its
    /// pointee, element, result or parameters.
    pub fn is_or_contains_checked_type(self) -> bool {
        let ty = self.canonical_ty();
        match *ty.kind() {
            ref kind @ (TyKind::Pointer { .. }
            | TyKind::ConstantArray { .. }
            | TyKind::IncompleteArray { .. }
            | TyKind::VariableArray { .. }
            | TyKind::DependentSizedArray { .. }) => {
                local_checkedness(kind) == Some(true) || inner(kind).is_or_contains_checked_type()
            }
            TyKind::FunctionProto(proto) => {
                proto.result.ty.is_or_contains_checked_type()
                    || proto.params.iter().any(|p| p.ty.is_or_contains_checked_type())
            }
            _ => false,
        }
    }

    /// The mirror of [`Ty::is_or_contains_checked_type`]: an unchecked
    /// pointer or array anywhere in the declarator.
    pub fn is_or_contains_unchecked_type(self) -> bool {
        let ty = self.canonical_ty();
        match *ty.kind() {
            ref kind @ (TyKind::Pointer { .. }
            | TyKind::ConstantArray { .. }
            | TyKind::IncompleteArray { .. }
            | TyKind::VariableArray { .. }
            | TyKind::DependentSizedArray { .. }) => {
                local_checkedness(kind) == Some(false) || inner(kind).is_or_contains_unchecked_type()
            }
            TyKind::FunctionProto(proto) => {
                proto.result.ty.is_or_contains_unchecked_type()
                    || proto.params.iter().any(|p| p.ty.is_or_contains_unchecked_type())
            }
            _ => false,
        }
    }

    /// Like [`Ty::is_or_contains_checked_type`], but also looks into
    /// records. A record field counts if it is a record containing a
    /// checked value, or if it contains a checked type and declares bounds.
    pub fn contains_checked_value(self, tcx: TyCtxt<'tcx>) -> bool {
        let ty = self.canonical_ty();
        match *ty.kind() {
            ref kind @ (TyKind::Pointer { .. }
            | TyKind::ConstantArray { .. }
            | TyKind::IncompleteArray { .. }
            | TyKind::VariableArray { .. }
            | TyKind::DependentSizedArray { .. }) => {
                local_checkedness(kind) == Some(true) || inner(kind).contains_checked_value(tcx)
            }
            TyKind::FunctionProto(proto) => {
                proto.result.ty.contains_checked_value(tcx)
                    || proto.params.iter().any(|p| p.ty.contains_checked_value(tcx))
            }
            TyKind::Record(id) => tcx.decls().record(id).fields.iter().any(|field| {
                if field.ty.ty.is_record_type() {
                    field.ty.ty.contains_checked_value(tcx)
                } else {
                    field.has_bounds_expr && field.ty.ty.contains_checked_value(tcx)
                }
            }),
            _ => false,
        }
    }

    /// Whether a variadic prototype appears anywhere in the declarator.
    pub fn has_variadic_type(self) -> bool {
        let ty = self.canonical_ty();
        match *ty.kind() {
            TyKind::Pointer { pointee: next, .. } => next.ty.has_variadic_type(),
            ref kind if kind.is_array() => inner(kind).has_variadic_type(),
            TyKind::FunctionProto(proto) => {
                proto.variadic
                    || proto.result.ty.has_variadic_type()
                    || proto.params.iter().any(|p| p.ty.has_variadic_type())
            }
            _ => false,
        }
    }

    /// Whether a variable-length array with a size expression appears
    /// through pointers, references and array elements.
    pub fn has_sized_vla_type(self) -> bool {
        if !self.is_variably_modified() {
            return false;
        }
        match *self.desugared_kind() {
            TyKind::Pointer { pointee, .. }
            | TyKind::LValueReference(pointee)
            | TyKind::RValueReference(pointee) => pointee.ty.has_sized_vla_type(),
            TyKind::VariableArray { size: Some(_), .. } => true,
            ref kind => kind.array_element().is_some_and(|element| element.ty.has_sized_vla_type()),
        }
    }
}

/// Pointee or element of a pointer or array shape.
fn inner<'tcx>(kind: &TyKind<'tcx>) -> Ty<'tcx> {
    match *kind {
        TyKind::Pointer { pointee, .. } => pointee.ty,
        ref kind => match kind.array_element() {
            Some(element) => element.ty,
            None => unreachable!("not a pointer or array: {kind:?}"),
        },
    }
}
