#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` owns pipetee's diagnostic output. Library crates emit ordinary
//! [`tracing`] events (usually through the `trace_*!` macros exported here);
//! this crate decides which of them reach the user and renders them as
//! single lines on stderr, in the `pipetee: <message>` shape shell users
//! expect from a pipeline filter.
//!
//! # Design
//!
//! Verbosity follows a flag model: each event target maps to an
//! [`InfoFlag`] or [`DebugFlag`], and a [`VerbosityConfig`] holds the level
//! enabled for every flag. The command line's `-v`/`-q` count selects a
//! preset through [`VerbosityConfig::from_verbose_level`].
//! [`DiagnosticLayer`] compares each event's level against its flag and
//! renders the survivors.
//!
//! # Invariants
//!
//! - Warnings and errors are rendered at every verbosity, including quiet.
//! - Rendering never fails the caller; write errors on the diagnostic stream
//!   are swallowed.
//! - Events from targets outside `pipetee::*` are never rendered.
//!
//! # Examples
//!
//! ```
//! use logging::{InfoFlag, VerbosityConfig};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert!(config.info_gte(InfoFlag::Stats, 1));
//! ```

mod config;
mod levels;
mod tracing_bridge;
mod tracing_macros;

pub use config::{MAX_VERBOSE_LEVEL, VerbosityConfig};
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use tracing_bridge::{DiagnosticLayer, diagnostic_subscriber};
