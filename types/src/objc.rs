//! Objective-C object types and lightweight generics.
//!
//! An object type is either a bare class interface (`NSString`) or an
//! `ObjCObject` node that applies type arguments, protocol qualifiers or
//! `__kindof` to a base. Bases can nest (`__kindof NSArray<id>` is a kindof
//! object over a specialized object over the interface), and the queries
//! here look through that chain the way a reader of the source would.
//!
//! Type parameters of a generic class appear in member types as
//! `ObjCTypeParam` nodes. [`QualType::subst_type_args`] replaces them with
//! the arguments of a specialized receiver, or with the parameter bounds
//! when the receiver is unspecialized.

use core::convert::Infallible;

use smallvec::SmallVec;
use tracing::debug;

use crate::context::TyCtxt;
use crate::core::{BuiltinKind, FnProto, InterfaceId, ProtocolId, QualType, Ty, TyKind};
use crate::error::SubstError;
use crate::transform::simple_transform;

/// Where a substituted type is going to be used. Results and properties
/// of an unspecialized receiver get `__kindof` bounds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ObjCSubstitutionContext {
    Ordinary,
    Result,
    Property,
    Parameter,
    Superclass,
}

// === Object types ===

/// An object type: a class interface or an `ObjCObject` node, with sugar
/// already looked through.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjCObjectTy<'tcx>(Ty<'tcx>);

impl<'tcx> ObjCObjectTy<'tcx> {
    pub fn ty(self) -> Ty<'tcx> {
        self.0
    }

    /// The type this object type builds on. A class interface is its own
    /// base.
    pub fn base_type(self) -> QualType<'tcx> {
        match *self.0.kind() {
            TyKind::ObjCObject { base, .. } => base,
            _ => QualType::unqualified(self.0),
        }
    }

    pub fn type_args_as_written(self) -> &'tcx [QualType<'tcx>] {
        match *self.0.kind() {
            TyKind::ObjCObject { type_args, .. } => type_args,
            _ => &[],
        }
    }

    pub fn protocols(self) -> &'tcx [ProtocolId] {
        match *self.0.kind() {
            TyKind::ObjCObject { protocols, .. } => protocols,
            _ => &[],
        }
    }

    pub fn is_kind_of_as_written(self) -> bool {
        matches!(*self.0.kind(), TyKind::ObjCObject { kind_of: true, .. })
    }

    /// The next object type in the base chain, stopping at the interface.
    fn base_object(self) -> Option<ObjCObjectTy<'tcx>> {
        match *self.0.kind() {
            TyKind::ObjCObject { base, .. } => {
                base.ty.as_objc_object().filter(|next| !matches!(next.0.kind(), TyKind::ObjCInterface(_)))
            }
            _ => None,
        }
    }

    pub fn is_specialized_as_written(self) -> bool {
        !self.type_args_as_written().is_empty()
    }

    /// Whether type arguments are applied here or anywhere down the base
    /// chain.
    pub fn is_specialized(self) -> bool {
        let mut cur = Some(self);
        while let Some(obj) = cur {
            if obj.is_specialized_as_written() {
                return true;
            }
            cur = obj.base_object();
        }
        false
    }

    pub fn is_unspecialized(self) -> bool {
        !self.is_specialized()
    }

    /// The type arguments in effect: the nearest ones in the base chain.
    pub fn type_args(self) -> &'tcx [QualType<'tcx>] {
        let mut cur = Some(self);
        while let Some(obj) = cur {
            if obj.is_specialized_as_written() {
                return obj.type_args_as_written();
            }
            cur = obj.base_object();
        }
        &[]
    }

    pub fn is_kind_of_type(self) -> bool {
        let mut cur = Some(self);
        while let Some(obj) = cur {
            if obj.is_kind_of_as_written() {
                return true;
            }
            cur = obj.base_object();
        }
        false
    }

    /// The class at the root of the base chain; `None` for `id` and `Class`.
    pub fn interface(self) -> Option<InterfaceId> {
        let mut cur = self;
        loop {
            match *cur.0.kind() {
                TyKind::ObjCInterface(id) => return Some(id),
                TyKind::ObjCObject { base, .. } => cur = base.ty.as_objc_object()?,
                _ => return None,
            }
        }
    }

    fn base_builtin(self) -> Option<BuiltinKind> {
        match *self.base_type().ty.desugared_kind() {
            TyKind::Builtin(kind) => Some(kind),
            _ => None,
        }
    }

    /// `id` with no protocols.
    pub fn is_unqualified_id(self) -> bool {
        self.base_builtin() == Some(BuiltinKind::ObjCId) && self.protocols().is_empty()
    }

    /// `Class` with no protocols.
    pub fn is_unqualified_class(self) -> bool {
        self.base_builtin() == Some(BuiltinKind::ObjCClass) && self.protocols().is_empty()
    }

    pub fn is_qualified_id(self) -> bool {
        self.base_builtin() == Some(BuiltinKind::ObjCId) && !self.protocols().is_empty()
    }

    pub fn is_qualified_class(self) -> bool {
        self.base_builtin() == Some(BuiltinKind::ObjCClass) && !self.protocols().is_empty()
    }

    /// The superclass of this object type with this type's arguments
    /// substituted in. Computed once per node.
    pub fn superclass_type(self, tcx: TyCtxt<'tcx>) -> Option<QualType<'tcx>> {
        *self.0.node().superclass.get_or_init(|| {
            let superclass = self.compute_superclass_type(tcx);
            debug!(object = ?self.0, ?superclass, "cached superclass type");
            superclass
        })
    }

    fn compute_superclass_type(self, tcx: TyCtxt<'tcx>) -> Option<QualType<'tcx>> {
        let class = tcx.decls().interface(self.interface()?);
        let written = class.superclass?;
        let written_obj = written.ty.as_objc_object()?;
        let superclass = tcx.decls().interface(written_obj.interface()?);

        if !superclass.is_parameterized() || written_obj.is_unspecialized() || !class.is_parameterized() {
            return Some(written);
        }
        if self.is_unspecialized() {
            return written_obj.interface().map(|id| tcx.mk_objc_interface(id));
        }

        let args = self.type_args();
        debug_assert_eq!(args.len(), class.type_params().len(), "type argument count mismatch");
        Some(written.subst_type_args(tcx, args, ObjCSubstitutionContext::Superclass))
    }
}

// === Object pointers ===

/// An object pointer type, with sugar already looked through.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjCObjectPointerTy<'tcx>(Ty<'tcx>);

impl<'tcx> ObjCObjectPointerTy<'tcx> {
    pub fn ty(self) -> Ty<'tcx> {
        self.0
    }

    pub fn pointee_type(self) -> QualType<'tcx> {
        match *self.0.kind() {
            TyKind::ObjCObjectPointer(pointee) => pointee,
            _ => unreachable!("object pointer view over {:?}", self.0),
        }
    }

    /// The object type pointed to.
    pub fn object_type(self) -> ObjCObjectTy<'tcx> {
        let pointee = self.pointee_type();
        pointee.ty.as_objc_object().unwrap_or(ObjCObjectTy(pointee.ty.unqualified_desugared()))
    }

    pub fn is_objc_id_type(self) -> bool {
        self.object_type().is_unqualified_id()
    }

    pub fn is_objc_class_type(self) -> bool {
        self.object_type().is_unqualified_class()
    }

    pub fn is_objc_id_or_class_type(self) -> bool {
        self.is_objc_id_type() || self.is_objc_class_type()
    }

    pub fn is_kind_of_type(self) -> bool {
        self.object_type().is_kind_of_type()
    }

    pub fn is_specialized(self) -> bool {
        self.object_type().is_specialized()
    }

    pub fn type_args(self) -> &'tcx [QualType<'tcx>] {
        self.object_type().type_args()
    }

    pub fn interface_decl(self) -> Option<InterfaceId> {
        self.object_type().interface()
    }

    /// The superclass object type, wrapped in a pointer.
    pub fn superclass_type(self, tcx: TyCtxt<'tcx>) -> Option<QualType<'tcx>> {
        let object = self.object_type().superclass_type(tcx)?;
        Some(tcx.mk_objc_object_pointer(object))
    }
}

impl<'tcx> Ty<'tcx> {
    pub fn as_objc_object(self) -> Option<ObjCObjectTy<'tcx>> {
        let ty = self.unqualified_desugared();
        match ty.kind() {
            TyKind::ObjCObject { .. } | TyKind::ObjCInterface(_) => Some(ObjCObjectTy(ty)),
            _ => None,
        }
    }

    pub fn as_objc_object_pointer(self) -> Option<ObjCObjectPointerTy<'tcx>> {
        let ty = self.unqualified_desugared();
        match ty.kind() {
            TyKind::ObjCObjectPointer(_) => Some(ObjCObjectPointerTy(ty)),
            _ => None,
        }
    }

    pub fn is_objc_object_pointer_type(self) -> bool {
        self.as_objc_object_pointer().is_some()
    }

    pub fn is_objc_id_type(self) -> bool {
        self.as_objc_object_pointer().is_some_and(|p| p.is_objc_id_type())
    }

    pub fn is_objc_class_type(self) -> bool {
        self.as_objc_object_pointer().is_some_and(|p| p.is_objc_class_type())
    }

    /// `__kindof` on an object type or an object pointer.
    pub fn is_objc_kind_of_type(self) -> bool {
        if let Some(ptr) = self.as_objc_object_pointer() {
            return ptr.is_kind_of_type();
        }
        self.as_objc_object().is_some_and(|obj| obj.is_kind_of_type())
    }

    /// Whether this is a class interface type that takes type arguments.
    pub fn accepts_objc_type_params(self, tcx: TyCtxt<'tcx>) -> bool {
        self.as_objc_object()
            .and_then(|obj| obj.interface())
            .is_some_and(|id| tcx.decls().interface(id).is_parameterized())
    }

    /// The type arguments that apply to members declared in `dc` when
    /// accessed through a receiver of this type.
    ///
    /// `None` means there is nothing to substitute; an empty slice means
    /// the parameters' bounds are to be used.
    pub fn objc_substitutions(self, tcx: TyCtxt<'tcx>, dc: InterfaceId) -> Option<&'tcx [QualType<'tcx>]> {
        if !tcx.decls().interface(dc).is_parameterized() {
            return None;
        }

        let object = if let Some(ptr) = self.as_objc_object_pointer() {
            Some(ptr.object_type())
        } else if matches!(self.desugared_kind(), TyKind::BlockPointer(_)) {
            tcx.mk_objc_object(tcx.mk_builtin(BuiltinKind::ObjCId), &[], &[], false)
                .ty
                .as_objc_object()
        } else {
            self.as_objc_object()
        };

        let Some(mut object) = object else {
            return Some(&[]);
        };
        let Some(mut class) = object.interface() else {
            return Some(&[]);
        };

        while class != dc {
            let Some(next) = object.superclass_type(tcx).and_then(|s| s.ty.as_objc_object()) else {
                return Some(&[]);
            };
            object = next;
            match object.interface() {
                Some(id) => class = id,
                None => return Some(&[]),
            }
        }

        if object.is_unspecialized() {
            return Some(&[]);
        }
        Some(object.type_args())
    }

    /// Was this type written with `__unsafe_unretained` in a mode where it
    /// has no effect?
    pub fn is_objc_inert_unsafe_unretained_type(self) -> bool {
        self.find_sugar(|kind| {
            matches!(kind, TyKind::Attributed { attr: crate::core::AttrKind::ObjCInertUnsafeUnretained, .. })
        })
        .is_some()
    }
}

// === Substitution ===

impl<'tcx> QualType<'tcx> {
    /// Replaces type parameters with `args`, or with their bounds when
    /// `args` is empty.
    ///
    /// # Panics
    ///
    /// If a parameter index is out of range for `args`, or a bound used in
    /// a result or property context is not an object pointer. Use
    /// [`QualType::try_subst_type_args`] for arguments that were not
    /// checked against the class.
    pub fn subst_type_args(
        self,
        tcx: TyCtxt<'tcx>,
        args: &[QualType<'tcx>],
        context: ObjCSubstitutionContext,
    ) -> QualType<'tcx> {
        match self.try_subst_type_args(tcx, args, context) {
            Ok(qt) => qt,
            Err(err) => panic!("invalid type argument substitution into {self:?}: {err}"),
        }
    }

    pub fn try_subst_type_args(
        self,
        tcx: TyCtxt<'tcx>,
        args: &[QualType<'tcx>],
        context: ObjCSubstitutionContext,
    ) -> Result<QualType<'tcx>, SubstError> {
        debug!(ty = ?self, args = args.len(), ?context, "substituting type arguments");
        simple_transform(tcx, self, &mut |qt| subst_node(tcx, qt, args, context))
    }

    /// Substitutes the receiver's type arguments into the type of a member
    /// declared in `dc`.
    pub fn subst_member_type(
        self,
        tcx: TyCtxt<'tcx>,
        object_ty: QualType<'tcx>,
        dc: InterfaceId,
        context: ObjCSubstitutionContext,
    ) -> QualType<'tcx> {
        match object_ty.ty.objc_substitutions(tcx, dc) {
            Some(args) => self.subst_type_args(tcx, args, context),
            None => self,
        }
    }

    /// Removes `__kindof` everywhere in the type.
    pub fn strip_kind_of_type(self, tcx: TyCtxt<'tcx>) -> QualType<'tcx> {
        let stripped = simple_transform(tcx, self, &mut |qt| -> Result<_, Infallible> {
            let Some(obj) = qt.ty.as_objc_object() else {
                return Ok(qt);
            };
            if !obj.is_kind_of_type() {
                return Ok(qt);
            }
            let base = obj.base_type().strip_kind_of_type(tcx);
            let rebuilt = tcx.mk_objc_object(base, obj.type_args_as_written(), obj.protocols(), false);
            Ok(rebuilt.with_quals(qt.quals))
        });
        match stripped {
            Ok(qt) => qt,
            Err(never) => match never {},
        }
    }
}

fn subst_node<'tcx>(
    tcx: TyCtxt<'tcx>,
    qt: QualType<'tcx>,
    args: &[QualType<'tcx>],
    context: ObjCSubstitutionContext,
) -> Result<QualType<'tcx>, SubstError> {
    let (ty, quals) = qt.split();
    match *ty.kind() {
        TyKind::ObjCTypeParam { decl, protocols } => {
            let param = tcx.decls().type_param(decl);
            if !args.is_empty() {
                let arg = args.get(param.index as usize).copied().ok_or(SubstError::TypeArgCountMismatch {
                    index: param.index,
                    available: args.len(),
                })?;
                return Ok(tcx.apply_objc_protocol_qualifiers(arg, protocols).with_quals(quals));
            }
            match context {
                ObjCSubstitutionContext::Ordinary
                | ObjCSubstitutionContext::Parameter
                | ObjCSubstitutionContext::Superclass => Ok(param.bound.with_quals(quals)),
                ObjCSubstitutionContext::Result | ObjCSubstitutionContext::Property => {
                    let ptr = param
                        .bound
                        .ty
                        .as_objc_object_pointer()
                        .ok_or(SubstError::BoundNotObjectPointer { index: param.index })?;
                    if ptr.is_kind_of_type() || ptr.is_objc_id_or_class_type() {
                        return Ok(param.bound.with_quals(quals));
                    }
                    let obj = ptr.object_type();
                    let kind_of =
                        tcx.mk_objc_object(obj.base_type(), obj.type_args_as_written(), obj.protocols(), true);
                    Ok(tcx.mk_objc_object_pointer(kind_of).with_quals(quals))
                }
            }
        }

        TyKind::FunctionNoProto { result } => {
            let new_result = result.try_subst_type_args(tcx, args, ObjCSubstitutionContext::Result)?;
            if new_result == result {
                return Ok(qt);
            }
            Ok(tcx.mk_fn_no_proto(new_result).with_quals(quals))
        }

        TyKind::FunctionProto(proto) => {
            let result = proto.result.try_subst_type_args(tcx, args, ObjCSubstitutionContext::Result)?;
            let params = proto
                .params
                .iter()
                .map(|p| p.try_subst_type_args(tcx, args, ObjCSubstitutionContext::Parameter))
                .collect::<Result<SmallVec<[QualType<'tcx>; 8]>, _>>()?;
            let exceptions = proto
                .exception
                .exceptions()
                .iter()
                .map(|e| e.try_subst_type_args(tcx, args, ObjCSubstitutionContext::Ordinary))
                .collect::<Result<SmallVec<[QualType<'tcx>; 4]>, _>>()?;

            if result == proto.result
                && params.as_slice() == proto.params
                && exceptions.as_slice() == proto.exception.exceptions()
            {
                return Ok(qt);
            }
            let exception = match proto.exception {
                crate::core::ExceptionSpec::Dynamic(_) => {
                    crate::core::ExceptionSpec::Dynamic(tcx.mk_ty_list(exceptions.iter().copied()))
                }
                other => other,
            };
            let rebuilt = FnProto {
                result,
                params: tcx.mk_ty_list(params.iter().copied()),
                exception,
                ..proto
            };
            Ok(tcx.mk_fn(rebuilt).with_quals(quals))
        }

        TyKind::ObjCObject { base, type_args, protocols, kind_of } if !type_args.is_empty() => {
            let mut new_args: SmallVec<[QualType<'tcx>; 4]> = SmallVec::with_capacity(type_args.len());
            let mut any_changed = false;
            for &arg in type_args {
                let new_arg = arg.try_subst_type_args(tcx, args, ObjCSubstitutionContext::Ordinary)?;
                if new_arg != arg {
                    // An unspecialized receiver makes the result unspecialized.
                    if args.is_empty() && context != ObjCSubstitutionContext::Superclass {
                        return Ok(tcx.mk_objc_object(base, &[], protocols, kind_of));
                    }
                    any_changed = true;
                }
                new_args.push(new_arg);
            }
            if any_changed {
                return Ok(tcx.mk_objc_object(base, &new_args, protocols, kind_of));
            }
            Ok(qt)
        }

        _ => Ok(qt),
    }
}

impl<'tcx> TyCtxt<'tcx> {
    /// Adds protocol qualifiers to an object type, an object pointer or a
    /// type parameter. Other types are returned unchanged.
    pub fn apply_objc_protocol_qualifiers(
        self,
        qt: QualType<'tcx>,
        protocols: &[ProtocolId],
    ) -> QualType<'tcx> {
        if protocols.is_empty() {
            return qt;
        }
        // A parameter use keeps its identity; anything else is looked through.
        let (ty, quals) = match qt.kind() {
            TyKind::ObjCTypeParam { .. } => qt.split(),
            _ => qt.split_desugared(),
        };
        let merge = |existing: &[ProtocolId]| {
            let mut all: SmallVec<[ProtocolId; 8]> = existing.iter().copied().collect();
            for &p in protocols {
                if !all.contains(&p) {
                    all.push(p);
                }
            }
            all
        };
        let applied = match *ty.kind() {
            TyKind::ObjCObjectPointer(pointee) => {
                self.mk_objc_object_pointer(self.apply_objc_protocol_qualifiers(pointee, protocols))
            }
            TyKind::ObjCObject { base, type_args, protocols: existing, kind_of } => {
                self.mk_objc_object(base, type_args, &merge(existing), kind_of)
            }
            TyKind::ObjCInterface(_) => {
                self.mk_objc_object(QualType::unqualified(ty), &[], &merge(&[]), false)
            }
            TyKind::ObjCTypeParam { decl, protocols: existing } => {
                self.mk_objc_type_param(decl, &merge(existing))
            }
            _ => return qt,
        };
        applied.with_quals(quals)
    }
}
