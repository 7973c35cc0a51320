//! crates/logging/src/tracing_macros.rs
//! Convenience macros for pipetee-specific tracing.
//!
//! These macros provide ergonomic wrappers around standard tracing macros
//! with the targets [`DiagnosticLayer`](crate::DiagnosticLayer) maps to
//! verbosity flags. Crates using them must depend on `tracing`.

/// Emit a startup summary line.
///
/// # Example
/// ```ignore
/// trace_setup!("pipe input, buffers of size {}", capacity);
/// ```
#[macro_export]
macro_rules! trace_setup {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "pipetee::setup", $($arg)*);
    };
}

/// Emit a capacity negotiation trace.
///
/// # Example
/// ```ignore
/// trace_sizing!("stdin pipe raised to {}", granted);
/// ```
#[macro_export]
macro_rules! trace_sizing {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "pipetee::sizing", $($arg)*);
    };
}

/// Emit a per-chunk transfer trace.
///
/// # Example
/// ```ignore
/// trace_transfer!("pulled {} bytes", len);
/// ```
#[macro_export]
macro_rules! trace_transfer {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "pipetee::transfer", $($arg)*);
    };
}

/// Emit a statistics trace.
///
/// # Example
/// ```ignore
/// trace_stats!("transferred {} bytes", bytes);
/// ```
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "pipetee::stats", $($arg)*);
    };
}

/// Emit a teardown trace.
///
/// # Example
/// ```ignore
/// trace_teardown!("closed {} staging pipes", count);
/// ```
#[macro_export]
macro_rules! trace_teardown {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "pipetee::teardown", $($arg)*);
    };
}
