//! Integration tests for verbosity level mapping and message filtering.
//!
//! These tests verify that the `-v`/`-q` counts select the diagnostic
//! categories users expect and that the rendered stream honours them.

use logging::{DebugFlag, InfoFlag, VerbosityConfig, diagnostic_subscriber};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriter(Arc::clone(&self.0))
    }
}

fn emit_one_of_each() {
    logging::trace_setup!("pipe input, buffers of size {}", 65536);
    logging::trace_sizing!("stdin pipe raised to {}", 262_144);
    logging::trace_transfer!("pulled {} bytes", 4096);
    logging::trace_stats!("transferred {} bytes", 4096);
    logging::trace_teardown!("closed {} staging pipes", 3);
}

fn render_at(level: u8) -> Vec<String> {
    let buffer = SharedBuffer::default();
    let subscriber = diagnostic_subscriber(
        VerbosityConfig::from_verbose_level(level),
        "pipetee",
        buffer.clone(),
    );
    tracing::subscriber::with_default(subscriber, emit_one_of_each);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn quiet_renders_nothing_informational() {
    assert!(render_at(0).is_empty());
}

#[test]
fn default_level_renders_only_the_setup_line() {
    assert_eq!(render_at(1), ["pipetee: pipe input, buffers of size 65536"]);
}

#[test]
fn single_v_adds_sizing_stats_and_teardown() {
    assert_eq!(
        render_at(2),
        [
            "pipetee: pipe input, buffers of size 65536",
            "pipetee: stdin pipe raised to 262144",
            "pipetee: transferred 4096 bytes",
            "pipetee: closed 3 staging pipes",
        ]
    );
}

#[test]
fn double_v_adds_per_chunk_tracing() {
    let lines = render_at(3);
    assert_eq!(lines.len(), 5);
    assert!(lines.contains(&"pipetee: pulled 4096 bytes".to_owned()));
}

#[test]
fn verbose_levels_map_to_expected_flags() {
    let default = VerbosityConfig::from_verbose_level(1);
    assert!(default.info_gte(InfoFlag::Setup, 1));
    assert!(!default.debug_gte(DebugFlag::Exit, 1));

    let verbose = VerbosityConfig::from_verbose_level(2);
    assert!(verbose.debug_gte(DebugFlag::Sizing, 2));
    assert!(!verbose.debug_gte(DebugFlag::Io, 3));

    let very_verbose = VerbosityConfig::from_verbose_level(3);
    assert!(very_verbose.debug_gte(DebugFlag::Io, 3));
}
