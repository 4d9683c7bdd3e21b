//! Logging facade for the layout engine.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported so
//! engine code can write `debug!(...)` or `debug_span!(...)` without caring
//! whether instrumentation is compiled in. Without the feature every macro
//! expands to nothing and span macros hand back a [`NoopSpan`].
//!
//! Span names used by the engine are collected in [`spans`] so tests that
//! capture spans can refer to them without repeating string literals.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Span names emitted by the engine crates.
pub mod spans {
    /// Re-synthesis of overlap constraints.
    pub const OVERLAP_CONNECT: &str = "alm.overlap.connect";
    /// Removal of previously synthesized overlap constraints.
    pub const OVERLAP_DISCONNECT: &str = "alm.overlap.disconnect";
    /// Gap closing after an area left a rectangle behind.
    pub const REMOVAL_AREA_REMOVED: &str = "alm.removal.area_removed";
    /// Gap closing after a single edge was detached.
    pub const REMOVAL_AREA_DETACHED: &str = "alm.removal.area_detached";
    /// Committing an edit action.
    pub const EDITOR_PERFORM: &str = "alm.editor.perform";
    /// Speculative feasibility test of an edit action.
    pub const EDITOR_TEST: &str = "alm.editor.test";
    /// One LP feasibility check.
    pub const SOLVER_SOLVE: &str = "alm.solver.solve";
}

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! info_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! warn_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! error_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in for `tracing::Span` when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span; the guard does nothing.
    #[must_use]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }

    /// Enter the span by value, mirroring `tracing::Span::entered`.
    #[must_use]
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }

    /// Run `f` "inside" the span.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
