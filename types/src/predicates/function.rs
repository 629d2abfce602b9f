//! Function prototypes: exception specifications, parameter packs and
//! deduced return types.

use crate::context::TyCtxt;
use crate::core::{ExceptionSpec, FnProto, Ty, TyKind};

/// The value of a `noexcept` specification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NoexceptResult {
    /// Not a `noexcept` specification.
    NoNoexcept,
    /// The operand is not a constant expression.
    BadNoexcept,
    /// The operand depends on a template parameter.
    Dependent,
    /// `noexcept(false)`.
    Throw,
    /// `noexcept` or `noexcept(true)`.
    Nothrow,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CanThrow {
    Cannot,
    Can,
    Dependent,
}

fn is_pack_expansion(ty: Ty<'_>) -> bool {
    matches!(ty.desugared_kind(), TyKind::PackExpansion { .. })
}

impl<'tcx> FnProto<'tcx> {
    /// Whether the exception specification depends on a template
    /// parameter. A pack expansion is dependent even with a concrete
    /// pattern, since the pack may expand to nothing.
    pub fn has_dependent_exception_spec(&self) -> bool {
        if let Some(expr) = self.exception.noexcept_expr() {
            return expr.is_value_dependent();
        }
        self.exception.exceptions().iter().any(|e| e.ty.is_dependent() || is_pack_expansion(e.ty))
    }

    pub fn has_instantiation_dependent_exception_spec(&self) -> bool {
        if let Some(expr) = self.exception.noexcept_expr() {
            return expr.is_instantiation_dependent();
        }
        self.exception.exceptions().iter().any(|e| e.ty.is_instantiation_dependent())
    }

    pub fn noexcept_spec(&self, tcx: TyCtxt<'tcx>) -> NoexceptResult {
        let expr = match self.exception {
            ExceptionSpec::BasicNoexcept => return NoexceptResult::Nothrow,
            ExceptionSpec::ComputedNoexcept(expr) => expr,
            _ => return NoexceptResult::NoNoexcept,
        };
        if expr.is_value_dependent() {
            return NoexceptResult::Dependent;
        }
        match tcx.exprs().evaluate_as_bool(expr) {
            Some(true) => NoexceptResult::Nothrow,
            Some(false) => NoexceptResult::Throw,
            None => NoexceptResult::BadNoexcept,
        }
    }

    pub fn can_throw(&self, tcx: TyCtxt<'tcx>) -> CanThrow {
        match self.exception {
            ExceptionSpec::DynamicNone | ExceptionSpec::BasicNoexcept => CanThrow::Cannot,
            // Throwing unless every listed type is a pack that may be empty.
            ExceptionSpec::Dynamic(list) => {
                if list.iter().all(|e| is_pack_expansion(e.ty)) {
                    CanThrow::Dependent
                } else {
                    CanThrow::Can
                }
            }
            ExceptionSpec::None => CanThrow::Can,
            ExceptionSpec::ComputedNoexcept(_) => match self.noexcept_spec(tcx) {
                NoexceptResult::Dependent => CanThrow::Dependent,
                NoexceptResult::Nothrow => CanThrow::Cannot,
                _ => CanThrow::Can,
            },
        }
    }

    pub fn is_nothrow(&self, tcx: TyCtxt<'tcx>) -> bool {
        self.can_throw(tcx) == CanThrow::Cannot
    }

    /// Whether a parameter is a pack expansion (`Ts...`).
    pub fn is_template_variadic(&self) -> bool {
        self.params.iter().any(|p| matches!(p.kind(), TyKind::PackExpansion { .. }))
    }
}

impl<'tcx> Ty<'tcx> {
    /// The prototype of a function type, looking through sugar.
    pub fn as_fn_proto(self) -> Option<&'tcx FnProto<'tcx>> {
        match self.desugared_kind() {
            TyKind::FunctionProto(proto) => Some(proto),
            _ => None,
        }
    }

    /// The `auto` or deduced template specialization placeholder inside a
    /// declarator: `auto *`, `auto &`, `auto (*)[3]`, a function returning
    /// `auto`.
    pub fn contained_deduced_type(self) -> Option<Ty<'tcx>> {
        let mut cur = self;
        loop {
            cur = match *cur.kind() {
                TyKind::Auto { .. } | TyKind::DeducedTemplateSpecialization { .. } => return Some(cur),
                TyKind::Elaborated { named: next, .. }
                | TyKind::Pointer { pointee: next, .. }
                | TyKind::BlockPointer(next)
                | TyKind::LValueReference(next)
                | TyKind::RValueReference(next)
                | TyKind::MemberPointer { pointee: next, .. }
                | TyKind::ConstantArray { element: next, .. }
                | TyKind::IncompleteArray { element: next, .. }
                | TyKind::VariableArray { element: next, .. }
                | TyKind::DependentSizedArray { element: next, .. }
                | TyKind::DependentSizedExtVector { element: next, .. }
                | TyKind::Vector { element: next, .. }
                | TyKind::ExtVector { element: next, .. }
                | TyKind::FunctionNoProto { result: next }
                | TyKind::Paren(next)
                | TyKind::Attributed { modified: next, .. }
                | TyKind::Adjusted { original: next, .. }
                | TyKind::Decayed { original: next, .. } => next.ty,
                TyKind::FunctionProto(proto) => proto.result.ty,
                _ => return None,
            };
        }
    }
}
