//! Tests for the fold engine and the rewriting built on it.

use core::convert::Infallible;
use core::ops::ControlFlow;

use bumpalo::Bump;
use pretty_assertions::assert_eq;
use quail_types::core::walk::{self, Fold, FoldStep, drive_fold};
use quail_types::{
    DeclTable, LangOptions, Linkage, LinkageInfo, QualType, RecordDecl, TagKind, TargetInfo, TyCtxt, TyKind, Visibility,
    simple_transform, ty,
};

fn with_tcx<R>(f: impl for<'tcx> FnOnce(TyCtxt<'tcx>, &'tcx DeclTable<'tcx>) -> R) -> R {
    let arena = Bump::new();
    let decls = DeclTable::new(&arena);
    let tcx = TyCtxt::new(&arena, &decls, LangOptions::c11(), TargetInfo::x86_64());
    f(tcx, &decls)
}

// ============================================================================
// Node counting - a fold that sums over children
// ============================================================================

struct NodeCounter;

impl<'tcx> Fold<'tcx> for NodeCounter {
    type Output = usize;
    type Error = Infallible;

    fn visit(&mut self, _qt: QualType<'tcx>) -> Result<FoldStep<'tcx, usize>, Infallible> {
        Ok(FoldStep::Recurse)
    }

    fn combine(
        &mut self,
        _qt: QualType<'tcx>,
        children: impl ExactSizeIterator<Item = usize> + DoubleEndedIterator,
    ) -> Result<usize, Infallible> {
        Ok(1 + children.sum::<usize>())
    }
}

fn count_nodes(qt: QualType<'_>) -> usize {
    match drive_fold(qt, &mut NodeCounter) {
        Ok(n) => n,
        Err(never) => match never {},
    }
}

#[test]
fn test_count_scalar() {
    with_tcx(|tcx, _| {
        assert_eq!(count_nodes(ty!(tcx, Int)), 1);
    });
}

#[test]
fn test_count_pointer_to_array() {
    with_tcx(|tcx, _| {
        assert_eq!(count_nodes(ty!(tcx, Ptr[Array[Int; 3]])), 3);
    });
}

#[test]
fn test_count_function() {
    with_tcx(|tcx, _| {
        assert_eq!(count_nodes(ty!(tcx, (Int, Ptr[Char]) => Void)), 5);
    });
}

// ============================================================================
// Depth - a fold that takes the maximum over children
// ============================================================================

struct Depth;

impl<'tcx> Fold<'tcx> for Depth {
    type Output = usize;
    type Error = Infallible;

    fn visit(&mut self, _qt: QualType<'tcx>) -> Result<FoldStep<'tcx, usize>, Infallible> {
        Ok(FoldStep::Recurse)
    }

    fn combine(
        &mut self,
        _qt: QualType<'tcx>,
        children: impl ExactSizeIterator<Item = usize> + DoubleEndedIterator,
    ) -> Result<usize, Infallible> {
        Ok(1 + children.max().unwrap_or(0))
    }
}

#[test]
fn test_depth_of_long_pointer_chain() {
    with_tcx(|tcx, _| {
        let mut qt = tcx.int();
        for _ in 0..10_000 {
            qt = tcx.mk_pointer(qt);
        }
        assert_eq!(drive_fold(qt, &mut Depth), Ok(10_001));
    });
}

#[test]
fn test_linkage_of_long_pointer_chain() {
    with_tcx(|tcx, decls| {
        let hidden = decls.add_record(
            RecordDecl::new(TagKind::Struct, Some("Hidden")).with_linkage(Linkage::Internal, Visibility::Hidden),
        );
        let mut qt = tcx.mk_record(hidden);
        for _ in 0..10_000 {
            qt = tcx.mk_pointer(qt);
        }
        assert_eq!(qt.ty.linkage(tcx), Linkage::Internal);
        assert!(!qt.ty.has_unnamed_or_local_type(tcx));
        assert!(qt.ty.is_linkage_valid(tcx));
        assert_eq!(qt.ty.linkage_and_visibility(tcx), LinkageInfo::new(Linkage::Internal, Visibility::Hidden));
    });
}

// ============================================================================
// Type substitution - replaces type variables with concrete types
// ============================================================================

fn substitute<'tcx>(
    tcx: TyCtxt<'tcx>,
    qt: QualType<'tcx>,
    args: &[QualType<'tcx>],
) -> Result<QualType<'tcx>, u32> {
    simple_transform(tcx, qt, &mut |node: QualType<'tcx>| match *node.kind() {
        TyKind::TypeVariable { depth: 0, index } => {
            args.get(index as usize).map(|arg| arg.with_quals(node.quals)).ok_or(index)
        }
        _ => Ok(node),
    })
}

#[test]
fn test_substitute_in_function() {
    with_tcx(|tcx, _| {
        let t0 = tcx.mk_type_variable(0, 0);
        let t1 = tcx.mk_type_variable(0, 1);
        let generic = ty!(tcx, (t0, Ptr[Const[t1]]) => t0);
        let result = substitute(tcx, generic, &[tcx.int(), tcx.char_ty()]);
        assert_eq!(result, Ok(ty!(tcx, (Int, Ptr[Const[Char]]) => Int)));
    });
}

#[test]
fn test_substitute_keeps_qualifiers_of_the_variable() {
    with_tcx(|tcx, _| {
        let t0 = tcx.mk_type_variable(0, 0);
        let result = substitute(tcx, ty!(tcx, Array[Volatile[t0]; 4]), &[tcx.long()]);
        assert_eq!(result, Ok(ty!(tcx, Array[Volatile[Long]; 4])));
    });
}

#[test]
fn test_substitute_ignores_other_depths() {
    with_tcx(|tcx, _| {
        let outer = tcx.mk_type_variable(1, 0);
        let qt = ty!(tcx, Ptr[outer]);
        assert_eq!(substitute(tcx, qt, &[tcx.int()]), Ok(qt));
    });
}

#[test]
fn test_substitute_unbound_variable_fails() {
    with_tcx(|tcx, _| {
        let t2 = tcx.mk_type_variable(0, 2);
        assert_eq!(substitute(tcx, ty!(tcx, Ptr[t2]), &[tcx.int()]), Err(2));
    });
}

#[test]
fn test_substitute_without_variables_allocates_nothing() {
    with_tcx(|tcx, _| {
        let qt = ty!(tcx, (Ptr[Const[Char]], ...) => Int);
        let before = tcx.interned_count();
        assert_eq!(substitute(tcx, qt, &[tcx.int()]), Ok(qt));
        assert_eq!(tcx.interned_count(), before);
    });
}

// ============================================================================
// Walking
// ============================================================================

#[test]
fn test_walk_finds_typedef_inside_declarator() {
    with_tcx(|tcx, decls| {
        let size_t = tcx.mk_typedef(decls.add_typedef("size_t", tcx.ulong()));
        let qt = ty!(tcx, Ptr[(size_t) => Void]);
        let found = walk::walk(qt, |node| match node.kind() {
            TyKind::Typedef { .. } => ControlFlow::Break(node),
            _ => ControlFlow::Continue(true),
        });
        assert_eq!(found, ControlFlow::Break(size_t));
    });
}

#[test]
fn test_any_respects_structure() {
    with_tcx(|tcx, _| {
        let is_double = |qt: QualType<'_>| matches!(qt.kind(), TyKind::Builtin(quail_types::BuiltinKind::Double));
        assert!(walk::any(ty!(tcx, Ptr[Array[Double; 2]]), is_double));
        assert!(!walk::any(ty!(tcx, Ptr[Array[Float; 2]]), is_double));
    });
}
