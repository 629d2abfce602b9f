//! Stack-based traversal over the type graph.
//!
//! [`drive_fold`] is the one traversal engine: it visits a node, optionally
//! descends into its children, and then combines the children's results.
//! The explicit work stack keeps deeply nested declarators (long pointer
//! chains, nested arrays) from overflowing the call stack.
//!
//! [`walk`] is a pre-order visitor built on the same engine for queries
//! that only need to look at every reachable node.

use alloc::{vec, vec::Vec};
use core::ops::ControlFlow;

use super::kind::Children;
use super::ty::QualType;

/// Control flow for the fold traversal.
///
/// - `Recurse`: process children, then call `combine`
/// - `Done(out)`: skip children, push `out` to the results stack
/// - `Replace(qt)`: visit `qt` instead
pub enum FoldStep<'tcx, Output> {
    Recurse,
    Done(Output),
    Replace(QualType<'tcx>),
}

/// A fold (catamorphism) over qualified types.
pub trait Fold<'tcx> {
    type Output;
    type Error;

    /// Called before processing a type's children.
    fn visit(&mut self, qt: QualType<'tcx>) -> Result<FoldStep<'tcx, Self::Output>, Self::Error>;

    /// The children to descend into after `visit` returned `Recurse`.
    fn children(&self, qt: QualType<'tcx>) -> Children<'tcx> {
        qt.kind().children()
    }

    /// Called after all children have been processed, with their results in
    /// the order returned by [`Fold::children`].
    fn combine(
        &mut self,
        qt: QualType<'tcx>,
        children: impl ExactSizeIterator<Item = Self::Output> + DoubleEndedIterator,
    ) -> Result<Self::Output, Self::Error>;
}

enum Task<'tcx> {
    Visit(QualType<'tcx>),
    Combine(usize, QualType<'tcx>),
}

/// Drive a fold over a type graph using stack-based iteration.
pub fn drive_fold<'tcx, F>(root: QualType<'tcx>, folder: &mut F) -> Result<F::Output, F::Error>
where
    F: Fold<'tcx>,
{
    let mut stack = vec![Task::Visit(root)];
    let mut results: Vec<F::Output> = Vec::new();

    while let Some(task) = stack.pop() {
        match task {
            Task::Visit(qt) => match folder.visit(qt)? {
                FoldStep::Done(out) => results.push(out),
                FoldStep::Replace(next) => stack.push(Task::Visit(next)),
                FoldStep::Recurse => {
                    let children = folder.children(qt);
                    stack.push(Task::Combine(children.len(), qt));
                    stack.extend(children.into_iter().rev().map(Task::Visit));
                }
            },
            Task::Combine(count, qt) => {
                let start = results
                    .len()
                    .checked_sub(count)
                    .expect("Bug: result stack underflow");
                let children = results.drain(start..);
                let out = folder.combine(qt, children)?;
                results.push(out);
            }
        }
    }

    debug_assert_eq!(results.len(), 1, "Algorithm bug: expected exactly one result");
    Ok(results.pop().expect("empty result stack"))
}

struct Walker<F> {
    f: F,
}

impl<'tcx, B, F> Fold<'tcx> for Walker<F>
where
    F: FnMut(QualType<'tcx>) -> ControlFlow<B, bool>,
{
    type Output = ();
    type Error = B;

    fn visit(&mut self, qt: QualType<'tcx>) -> Result<FoldStep<'tcx, ()>, B> {
        match (self.f)(qt) {
            ControlFlow::Break(b) => Err(b),
            ControlFlow::Continue(true) => Ok(FoldStep::Recurse),
            ControlFlow::Continue(false) => Ok(FoldStep::Done(())),
        }
    }

    fn combine(
        &mut self,
        _qt: QualType<'tcx>,
        _children: impl ExactSizeIterator<Item = ()> + DoubleEndedIterator,
    ) -> Result<(), B> {
        Ok(())
    }
}

/// Visits `root` and every node reachable from it, parents first.
///
/// The callback returns `Continue(true)` to descend into the node's
/// children, `Continue(false)` to skip them, or `Break` to stop the walk
/// with a value.
pub fn walk<'tcx, B>(
    root: QualType<'tcx>,
    f: impl FnMut(QualType<'tcx>) -> ControlFlow<B, bool>,
) -> ControlFlow<B> {
    match drive_fold(root, &mut Walker { f }) {
        Ok(()) => ControlFlow::Continue(()),
        Err(b) => ControlFlow::Break(b),
    }
}

/// Whether any node reachable from `root` satisfies `pred`.
pub fn any<'tcx>(root: QualType<'tcx>, mut pred: impl FnMut(QualType<'tcx>) -> bool) -> bool {
    walk(root, |qt| if pred(qt) { ControlFlow::Break(()) } else { ControlFlow::Continue(true) })
        .is_break()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TyKind;
    use crate::test_utils::with_tcx;
    use crate::ty;

    /// Counts nodes bottom-up, the way a size metric would.
    struct NodeCounter;

    impl<'tcx> Fold<'tcx> for NodeCounter {
        type Output = usize;
        type Error = ();

        fn visit(&mut self, _qt: QualType<'tcx>) -> Result<FoldStep<'tcx, usize>, ()> {
            Ok(FoldStep::Recurse)
        }

        fn combine(
            &mut self,
            _qt: QualType<'tcx>,
            children: impl ExactSizeIterator<Item = usize> + DoubleEndedIterator,
        ) -> Result<usize, ()> {
            Ok(1 + children.sum::<usize>())
        }
    }

    #[test]
    fn test_fold_counts_function_nodes() {
        with_tcx(|tcx, _| {
            let f = ty!(tcx, (Ptr[Int], Char) => Void);
            // function, void, pointer, int, char
            assert_eq!(drive_fold(f, &mut NodeCounter), Ok(5));
        });
    }

    #[test]
    fn test_walk_finds_nested_node() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, Ptr[Array[Ptr[Double]; 4]]);
            assert!(any(t, |qt| matches!(qt.kind(), TyKind::Builtin(b) if b.is_floating_point())));
            assert!(!any(t, |qt| matches!(qt.kind(), TyKind::Record(_))));
        });
    }

    #[test]
    fn test_walk_can_prune() {
        with_tcx(|tcx, _| {
            let t = ty!(tcx, Ptr[Ptr[Ptr[Int]]]);
            let mut seen = 0;
            let flow: ControlFlow<()> = walk(t, |_| {
                seen += 1;
                ControlFlow::Continue(seen < 2)
            });
            assert!(flow.is_continue());
            assert_eq!(seen, 2);
        });
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        with_tcx(|tcx, _| {
            let mut t = tcx.int();
            for _ in 0..10_000 {
                t = tcx.mk_pointer(t);
            }
            assert_eq!(drive_fold(t, &mut NodeCounter), Ok(10_001));
        });
    }
}
