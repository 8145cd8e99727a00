//! Logging facilities for Horizon Blockform.
//!
//! Horizon Blockform uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_blockform_runtime=debug")
//!         .init();
//! }
//! ```
//!
//! Recoverable failures (a widget rejecting a property, an asset that cannot
//! be loaded, a failing event handler) are logged at `warn` and never
//! propagated. Everything else is `debug` or `trace`.

/// Span names used throughout Horizon Blockform for tracing.
pub mod span_names {
    /// Widget materialization span.
    pub const MATERIALIZE: &str = "horizon_blockform::materialize";
    /// Host-ready pass over a form.
    pub const HOST_READY: &str = "horizon_blockform::host_ready";
    /// Whole-tree teardown.
    pub const TREE_DISCARD: &str = "horizon_blockform::tree_discard";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_blockform_core";
    /// Property store target.
    pub const PROPERTY: &str = "horizon_blockform_core::property";
    /// Descriptor table target.
    pub const DESCRIPTOR: &str = "horizon_blockform_core::descriptor";
    /// Signal target.
    pub const SIGNAL: &str = "horizon_blockform_core::signal";
    /// Drag acceptance target.
    pub const ACCEPTANCE: &str = "horizon_blockform_designer::acceptance";
    /// Mock tree target.
    pub const TREE: &str = "horizon_blockform_designer::tree";
    /// Component lifecycle target.
    pub const LIFECYCLE: &str = "horizon_blockform_runtime::lifecycle";
    /// Asset loading target.
    pub const ASSET: &str = "horizon_blockform_runtime::asset";
    /// Event dispatch target.
    pub const DISPATCH: &str = "horizon_blockform_runtime::dispatch";
    /// Hosting form target.
    pub const FORM: &str = "horizon_blockform_runtime::form";
}

/// A guard that keeps a timing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_blockform::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// Thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! blockform_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! blockform_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! blockform_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::util::SubscriberInitExt;

    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::MATERIALIZE);
    }

    #[test]
    fn test_core_targets_share_crate_prefix() {
        assert_eq!(targets::CORE, env!("CARGO_PKG_NAME").replace('-', "_"));
        for target in [targets::PROPERTY, targets::DESCRIPTOR, targets::SIGNAL] {
            assert!(target.starts_with(targets::CORE), "{target}");
        }
    }

    #[test]
    fn test_macros_expand() {
        let _guard = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .finish()
            .set_default();
        blockform_trace!(value = 1, "trace");
        blockform_debug!("debug {}", 2);
        blockform_warn!("warn");
    }
}
