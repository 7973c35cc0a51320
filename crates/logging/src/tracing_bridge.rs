//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and pipetee's verbosity system.
//!
//! This module provides a tracing-subscriber layer that maps tracing events to
//! pipetee's info and debug flags and renders the accepted ones as single
//! `pipetee: ...` lines on a writer (stderr in production).
//!
//! # Architecture
//!
//! - [`DiagnosticLayer`]: a tracing-subscriber layer that filters and renders events
//! - Events are mapped to info/debug flags based on their target
//! - Warnings and errors are always rendered, whatever the verbosity
//! - Events from targets outside `pipetee::*` are ignored
//!
//! # Usage
//!
//! ```
//! use logging::{VerbosityConfig, diagnostic_subscriber};
//!
//! let subscriber = diagnostic_subscriber(
//!     VerbosityConfig::from_verbose_level(1),
//!     "pipetee",
//!     std::io::stderr,
//! );
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(target: "pipetee::setup", "pipe input, buffers of size 65536");
//! });
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use std::fmt::Write as _;
use std::io::Write as _;
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that renders pipetee diagnostics according to the
/// verbosity configuration.
pub struct DiagnosticLayer<W> {
    config: VerbosityConfig,
    program: &'static str,
    make_writer: W,
}

impl<W> DiagnosticLayer<W> {
    /// Create a layer that prefixes every line with `program`.
    #[must_use]
    pub const fn new(config: VerbosityConfig, program: &'static str, make_writer: W) -> Self {
        Self {
            config,
            program,
            make_writer,
        }
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        match target {
            t if t.ends_with("::setup") || t == "setup" => Some(InfoFlag::Setup),
            t if t.ends_with("::stats") || t == "stats" => Some(InfoFlag::Stats),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        match target {
            t if t.ends_with("::sizing") || t == "sizing" => Some(DebugFlag::Sizing),
            t if t.ends_with("::transfer") || t.ends_with("::io") || t == "transfer" => {
                Some(DebugFlag::Io)
            }
            t if t.ends_with("::teardown") || t.ends_with("::exit") || t == "teardown" => {
                Some(DebugFlag::Exit)
            }
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }

    fn accepts(&self, target: &str, level: &Level) -> bool {
        if !target.starts_with("pipetee") {
            return false;
        }
        if matches!(*level, Level::ERROR | Level::WARN) {
            return true;
        }

        let verbosity_level = Self::level_to_verbosity_level(level);
        // Try to map to debug flag first (more specific)
        if let Some(flag) = Self::target_to_debug_flag(target) {
            return self.config.debug_gte(flag, verbosity_level);
        }
        if let Some(flag) = Self::target_to_info_flag(target) {
            return self.config.info_gte(flag, verbosity_level);
        }
        false
    }

    fn render(&self, level: &Level, visitor: &MessageVisitor) -> String {
        let severity = match *level {
            Level::ERROR => "error: ",
            Level::WARN => "warning: ",
            _ => "",
        };
        let mut line = format!("{}: {severity}", self.program);
        if let Some(message) = &visitor.message {
            line.push_str(message);
        }
        for (name, value) in &visitor.fields {
            let _ = write!(line, " {name}={value}");
        }
        line.push('\n');
        line
    }
}

impl<S, W> Layer<S> for DiagnosticLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.accepts(metadata.target(), metadata.level()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = self.render(metadata.level(), &visitor);

        // Diagnostics are best-effort: a closed stderr must not abort the transfer.
        let mut writer = self.make_writer.make_writer();
        let _ = writer.write_all(line.as_bytes());
    }
}

/// Visitor to extract message and structured fields from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.fields.push((field.name(), value.to_owned()));
        }
    }
}

/// Build a subscriber that renders pipetee diagnostics to `make_writer`.
///
/// When `RUST_LOG` is set, its [`EnvFilter`] directives are applied in front
/// of the verbosity configuration and can only narrow what is printed.
pub fn diagnostic_subscriber<W>(
    config: VerbosityConfig,
    program: &'static str,
    make_writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env().ok();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(DiagnosticLayer::new(config, program, make_writer))
}
