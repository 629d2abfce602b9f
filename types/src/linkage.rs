//! Linkage and visibility of types.
//!
//! A type's linkage is the weakest linkage of any declaration it mentions:
//! `struct S *` inside an anonymous namespace has internal linkage, a
//! function type taking a local class has none. The result is computed on
//! the canonical form and cached on every node that asks; sugar nodes copy
//! the answer of their canonical node.

use core::convert::Infallible;

use tracing::{debug, warn};

use crate::context::TyCtxt;
use crate::core::walk::{Fold, FoldStep, drive_fold};
use crate::core::{Children, QualType, Ty, TyKind};

/// Linkage of a named entity, weakest first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Linkage {
    NoLinkage,
    Internal,
    /// External, but unique to one translation unit (anonymous namespaces
    /// seen from a module).
    UniqueExternal,
    #[default]
    External,
}

/// Symbol visibility, most restrictive first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Visibility {
    Hidden,
    Protected,
    #[default]
    Default,
}

/// What each node caches: its linkage, and whether it mentions a local or
/// unnamed type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CachedProperties {
    linkage: Linkage,
    local_or_unnamed: bool,
}

impl CachedProperties {
    /// The answer for types that mention no declaration.
    pub const EXTERNAL: CachedProperties = CachedProperties { linkage: Linkage::External, local_or_unnamed: false };

    pub fn new(linkage: Linkage, local_or_unnamed: bool) -> Self {
        Self { linkage, local_or_unnamed }
    }

    pub fn linkage(self) -> Linkage {
        self.linkage
    }

    pub fn has_local_or_unnamed_type(self) -> bool {
        self.local_or_unnamed
    }

    /// Weakest linkage, and local if either side is.
    #[must_use]
    pub fn merge(self, other: CachedProperties) -> CachedProperties {
        CachedProperties {
            linkage: self.linkage.min(other.linkage),
            local_or_unnamed: self.local_or_unnamed || other.local_or_unnamed,
        }
    }
}

/// Linkage together with visibility.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct LinkageInfo {
    pub linkage: Linkage,
    pub visibility: Visibility,
}

impl LinkageInfo {
    pub fn new(linkage: Linkage, visibility: Visibility) -> Self {
        Self { linkage, visibility }
    }

    pub fn external() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn merge(self, other: LinkageInfo) -> LinkageInfo {
        LinkageInfo {
            linkage: self.linkage.min(other.linkage),
            visibility: self.visibility.min(other.visibility),
        }
    }
}

impl<'tcx> Ty<'tcx> {
    /// Linkage properties of this type, computed once per node.
    pub fn cached_properties(self, tcx: TyCtxt<'tcx>) -> CachedProperties {
        if let Some(props) = self.node().linkage.get() {
            return *props;
        }
        let props = fold_properties(tcx, self, true);
        *self.node().linkage.get_or_init(|| props)
    }

    pub fn linkage(self, tcx: TyCtxt<'tcx>) -> Linkage {
        self.cached_properties(tcx).linkage()
    }

    /// Whether the type mentions a class or enum declared in a function
    /// body or without a name for linkage purposes.
    pub fn has_unnamed_or_local_type(self, tcx: TyCtxt<'tcx>) -> bool {
        self.cached_properties(tcx).has_local_or_unnamed_type()
    }

    /// Recomputes the properties from scratch and checks them against the
    /// cache. A consistency check, not a query.
    pub fn is_linkage_valid(self, tcx: TyCtxt<'tcx>) -> bool {
        let cached = self.cached_properties(tcx);
        let fresh = fold_properties(tcx, self.canonical_ty(), false);
        if cached != fresh {
            warn!(ty = ?self, ?cached, ?fresh, "stale linkage cache");
        }
        cached == fresh
    }

    /// Linkage and visibility, computed without the cache.
    pub fn linkage_and_visibility(self, tcx: TyCtxt<'tcx>) -> LinkageInfo {
        match drive_fold(QualType::unqualified(self), &mut VisibilityFold { tcx }) {
            Ok(info) => info,
            Err(never) => match never {},
        }
    }
}

/// Dependent shapes. Nothing is known about them until they are
/// instantiated, so they count as external and mention nothing local.
///
/// The expression-based and template-specialization shapes are canonical
/// only when they are dependent.
fn is_dependent_kind(kind: &TyKind<'_>) -> bool {
    matches!(
        kind,
        TyKind::TemplateTypeParm { .. }
            | TyKind::SubstTemplateTypeParmPack { .. }
            | TyKind::DependentSizedArray { .. }
            | TyKind::DependentSizedExtVector { .. }
            | TyKind::DependentAddressSpace { .. }
            | TyKind::DependentName { .. }
            | TyKind::PackExpansion { .. }
            | TyKind::TypeOfExpr { .. }
            | TyKind::TypeOf(_)
            | TyKind::Decltype { .. }
            | TyKind::UnaryTransform { .. }
            | TyKind::TemplateSpecialization { .. }
            | TyKind::TypeVariable { .. }
    )
}

fn fold_properties<'tcx>(tcx: TyCtxt<'tcx>, ty: Ty<'tcx>, cache: bool) -> CachedProperties {
    match drive_fold(QualType::unqualified(ty), &mut PropertyFold { tcx, cache }) {
        Ok(props) => props,
        Err(never) => match never {},
    }
}

/// Computes linkage properties bottom-up over canonical nodes. With `cache`
/// set, every canonical node it finishes gets its memo cell filled.
struct PropertyFold<'tcx> {
    tcx: TyCtxt<'tcx>,
    cache: bool,
}

impl<'tcx> PropertyFold<'tcx> {
    fn finish(&self, ty: Ty<'tcx>, props: CachedProperties) -> CachedProperties {
        if !self.cache {
            return props;
        }
        *ty.node().linkage.get_or_init(|| {
            debug!(ty = ?ty, ?props, "computed linkage");
            props
        })
    }
}

impl<'tcx> Fold<'tcx> for PropertyFold<'tcx> {
    type Output = CachedProperties;
    type Error = Infallible;

    fn visit(&mut self, qt: QualType<'tcx>) -> Result<FoldStep<'tcx, CachedProperties>, Infallible> {
        let ty = qt.ty;
        if self.cache {
            if let Some(props) = ty.node().linkage.get() {
                return Ok(FoldStep::Done(*props));
            }
        }
        if !ty.is_canonical() {
            return Ok(FoldStep::Replace(QualType::unqualified(ty.canonical_ty())));
        }
        let decls = self.tcx.decls();
        let leaf = match *ty.kind() {
            ref kind if is_dependent_kind(kind) => CachedProperties::EXTERNAL,
            TyKind::Record(id) => {
                let decl = decls.record(id);
                CachedProperties::new(decl.linkage, decl.is_in_function() || !decl.has_name_for_linkage())
            }
            TyKind::Enum(id) => {
                let decl = decls.enum_decl(id);
                CachedProperties::new(decl.linkage, decl.in_function || decl.name.is_none())
            }
            _ => return Ok(FoldStep::Recurse),
        };
        Ok(FoldStep::Done(self.finish(ty, leaf)))
    }

    fn children(&self, qt: QualType<'tcx>) -> Children<'tcx> {
        linkage_children(qt.kind())
    }

    fn combine(
        &mut self,
        qt: QualType<'tcx>,
        children: impl ExactSizeIterator<Item = CachedProperties> + DoubleEndedIterator,
    ) -> Result<CachedProperties, Infallible> {
        let props = children.fold(CachedProperties::EXTERNAL, CachedProperties::merge);
        Ok(self.finish(qt.ty, props))
    }
}

struct VisibilityFold<'tcx> {
    tcx: TyCtxt<'tcx>,
}

impl<'tcx> Fold<'tcx> for VisibilityFold<'tcx> {
    type Output = LinkageInfo;
    type Error = Infallible;

    fn visit(&mut self, qt: QualType<'tcx>) -> Result<FoldStep<'tcx, LinkageInfo>, Infallible> {
        let ty = qt.ty;
        if !ty.is_canonical() {
            return Ok(FoldStep::Replace(QualType::unqualified(ty.canonical_ty())));
        }
        let decls = self.tcx.decls();
        let info = match *ty.kind() {
            ref kind if is_dependent_kind(kind) => LinkageInfo::external(),
            TyKind::Record(id) => {
                let decl = decls.record(id);
                LinkageInfo::new(decl.linkage, decl.visibility)
            }
            TyKind::Enum(id) => {
                let decl = decls.enum_decl(id);
                LinkageInfo::new(decl.linkage, decl.visibility)
            }
            TyKind::ObjCInterface(id) => {
                let decl = decls.interface(id);
                LinkageInfo::new(decl.linkage, decl.visibility)
            }
            _ => return Ok(FoldStep::Recurse),
        };
        Ok(FoldStep::Done(info))
    }

    fn children(&self, qt: QualType<'tcx>) -> Children<'tcx> {
        linkage_children(qt.kind())
    }

    fn combine(
        &mut self,
        _qt: QualType<'tcx>,
        children: impl ExactSizeIterator<Item = LinkageInfo> + DoubleEndedIterator,
    ) -> Result<LinkageInfo, Infallible> {
        Ok(children.fold(LinkageInfo::external(), LinkageInfo::merge))
    }
}

/// Children that contribute to linkage. Exception specifications and the
/// protocols and arguments of object types do not.
fn linkage_children<'tcx>(kind: &TyKind<'tcx>) -> Children<'tcx> {
    match *kind {
        TyKind::Builtin(_)
        | TyKind::ObjCInterface(_)
        | TyKind::Auto { .. }
        | TyKind::DeducedTemplateSpecialization { .. }
        | TyKind::TypeVariable { .. } => Children::new(),
        TyKind::FunctionProto(proto) => {
            let mut out = Children::new();
            out.push(proto.result);
            out.extend(proto.params.iter().copied());
            out
        }
        TyKind::ObjCObject { base, .. } => Children::from_slice(&[base]),
        TyKind::MemberPointer { pointee, class } => Children::from_slice(&[pointee, QualType::unqualified(class)]),
        ref kind => kind.children(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{EnumDecl, RecordDecl, RecordFlags, TagKind};
    use crate::test_utils::with_tcx;
    use crate::ty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_laws() {
        let all = [Linkage::NoLinkage, Linkage::Internal, Linkage::UniqueExternal, Linkage::External];
        for a in all {
            for b in all {
                for (la, lb) in [(false, false), (true, false), (false, true)] {
                    let x = CachedProperties::new(a, la);
                    let y = CachedProperties::new(b, lb);
                    assert_eq!(x.merge(y), y.merge(x));
                    assert_eq!(x.merge(x), x);
                    assert_eq!(x.merge(y).linkage(), a.min(b));
                }
            }
        }
    }

    #[test]
    fn test_builtins_are_external() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, (Ptr[Const[Char]], Double) => Int);
            assert_eq!(t.ty.linkage(tcx), Linkage::External);
            assert!(!t.ty.has_unnamed_or_local_type(tcx));
        });
    }

    #[test]
    fn test_compound_types_take_weakest_child() {
        with_tcx(|tcx, decls| {
            let internal = decls.add_record(
                RecordDecl::new(TagKind::Struct, Some("Hidden"))
                    .with_linkage(Linkage::Internal, Visibility::Default),
            );
            let local = decls.add_record(
                RecordDecl::new(TagKind::Struct, Some("Local"))
                    .with_flags(RecordFlags::IN_FUNCTION)
                    .with_linkage(Linkage::NoLinkage, Visibility::Default),
            );
            let hidden = tcx.mk_record(internal);
            let local = tcx.mk_record(local);

            assert_eq!(tcx.mk_pointer(hidden).ty.linkage(tcx), hidden.ty.linkage(tcx));
            assert_eq!(ty!(tcx, Array[hidden; 4]).ty.linkage(tcx), Linkage::Internal);

            let f = tcx.mk_function(tcx.int(), [tcx.mk_pointer(hidden), local]);
            assert_eq!(f.ty.linkage(tcx), Linkage::NoLinkage);
            assert!(f.ty.has_unnamed_or_local_type(tcx));

            let g = tcx.mk_function(hidden, [tcx.int()]);
            assert_eq!(g.ty.linkage(tcx), Linkage::Internal);
            assert!(!g.ty.has_unnamed_or_local_type(tcx));
        });
    }

    #[test]
    fn test_unnamed_enum_is_flagged() {
        with_tcx(|tcx, decls| {
            let e = decls.add_enum(EnumDecl::new(None, tcx.uint()));
            let e = tcx.mk_enum(e);
            assert!(e.ty.has_unnamed_or_local_type(tcx));
            assert_eq!(e.ty.linkage(tcx), Linkage::External);
        });
    }

    #[test]
    fn test_sugar_copies_canonical_answer() {
        with_tcx(|tcx, decls| {
            let internal = decls.add_record(
                RecordDecl::new(TagKind::Struct, Some("S")).with_linkage(Linkage::Internal, Visibility::Hidden),
            );
            let td = decls.add_typedef("S_t", tcx.mk_record(internal));
            let alias = tcx.mk_typedef(td);
            assert_eq!(alias.ty.cached_properties(tcx), alias.canonical().ty.cached_properties(tcx));
            assert_eq!(alias.ty.linkage(tcx), Linkage::Internal);
            assert!(alias.ty.is_linkage_valid(tcx));
        });
    }

    #[test]
    fn test_dependent_types_are_external() {
        with_tcx(|tcx, _| {
            let param = tcx.mk_template_type_parm(0, 0, false);
            assert_eq!(param.ty.linkage(tcx), Linkage::External);
            assert!(!param.ty.has_unnamed_or_local_type(tcx));
            assert_eq!(param.ty.linkage_and_visibility(tcx), LinkageInfo::external());
        });
    }

    #[test]
    fn test_dependent_function_still_merges_children() {
        with_tcx(|tcx, decls| {
            let local = decls.add_record(
                RecordDecl::new(TagKind::Struct, None)
                    .with_flags(RecordFlags::IN_FUNCTION)
                    .with_linkage(Linkage::NoLinkage, Visibility::Default),
            );
            let local = tcx.mk_record(local);
            let param = tcx.mk_template_type_parm(0, 0, false);
            let f = tcx.mk_function(local, [param]);
            assert!(f.ty.is_dependent());

            assert_eq!(f.ty.linkage(tcx), local.ty.linkage(tcx).min(param.ty.linkage(tcx)));
            assert_eq!(f.ty.linkage(tcx), Linkage::NoLinkage);
            assert!(f.ty.has_unnamed_or_local_type(tcx));
            assert!(f.ty.is_linkage_valid(tcx));
            assert_eq!(f.ty.linkage_and_visibility(tcx).linkage, Linkage::NoLinkage);

            let p = ty!(tcx, Ptr[param]);
            assert_eq!(p.ty.linkage(tcx), Linkage::External);
        });
    }

    #[test]
    fn test_linkage_and_visibility() {
        with_tcx(|tcx, decls| {
            let hidden = decls.add_record(
                RecordDecl::new(TagKind::Struct, Some("H")).with_linkage(Linkage::External, Visibility::Hidden),
            );
            let internal = decls.add_record(
                RecordDecl::new(TagKind::Struct, Some("I")).with_linkage(Linkage::Internal, Visibility::Default),
            );
            let f = tcx.mk_function(tcx.mk_record(hidden), [tcx.mk_record(internal)]);
            assert_eq!(f.ty.linkage_and_visibility(tcx), LinkageInfo::new(Linkage::Internal, Visibility::Hidden));
            assert_eq!(tcx.int().ty.linkage_and_visibility(tcx), LinkageInfo::external());
        });
    }
}
