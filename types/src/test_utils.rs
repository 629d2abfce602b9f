//! Shared fixtures for unit tests.

use bumpalo::Bump;

use crate::context::TyCtxt;
use crate::decl::DeclTable;
use crate::options::{LangOptions, TargetInfo};

/// Installs a tracing subscriber that writes to the test output.
///
/// Honors `RUST_LOG`, defaulting to `debug`. Safe to call from every test.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Runs `f` with a fresh C++17 context for an x86-64 target.
pub fn with_tcx<R>(f: impl for<'tcx> FnOnce(TyCtxt<'tcx>, &'tcx DeclTable<'tcx>) -> R) -> R {
    with_lang(LangOptions::cxx17(), f)
}

/// Runs `f` with a fresh context for the given dialect.
pub fn with_lang<R>(
    lang: LangOptions,
    f: impl for<'tcx> FnOnce(TyCtxt<'tcx>, &'tcx DeclTable<'tcx>) -> R,
) -> R {
    init_test_logging();
    let arena = Bump::new();
    let decls = DeclTable::new(&arena);
    let tcx = TyCtxt::new(&arena, &decls, lang, TargetInfo::x86_64());
    f(tcx, &decls)
}
