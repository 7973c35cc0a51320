#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end of `pipetee`. It parses the
//! destination operands and the handful of switches (`--size`, `--verbose`,
//! `--quiet`, `--help`, `--version`), installs the diagnostic subscriber for
//! the requested verbosity and hands the run to
//! [`engine::run_pipeline`].
//!
//! # Design
//!
//! [`run`] is the primary entry point. It accepts an iterator of arguments
//! together with handles for standard output and error, so tests can drive
//! the whole front-end in-process. [`run_with`] additionally takes the
//! descriptors the transfer reads from and writes to, which lets tests
//! substitute temporary files for the process's standard streams.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as non-zero exit codes.
//! - Usage errors are reported before any destination is opened.
//! - Help and version output go to the supplied standard output handle;
//!   usage and fatal errors go to the supplied standard error handle.
//!
//! # Errors
//!
//! Usage errors exit with [`ExitCode::Syntax`]. Engine failures map to an
//! [`ExitCode`] through their [`engine::ErrorClass`].
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["pipetee", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(stdout.starts_with(b"pipetee "));
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::path::PathBuf;

use engine::{PipelineOptions, run_pipeline};
use logging::{VerbosityConfig, diagnostic_subscriber};

mod arguments;
mod exit_code;

pub use arguments::{ParsedArgs, SIZE_ENV, parse_args};
pub use exit_code::ExitCode;

use arguments::PROGRAM_NAME;

/// Deterministic help text describing the command line.
const HELP_TEXT: &str = concat!(
    "pipetee ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: pipetee [-h] [-V] [-v | -q] [-s BYTES] FILE...\n",
    "\n",
    "Copy standard input to every FILE and to standard output. Data moves\n",
    "between kernel pipes with splice(2) and tee(2) and never passes through\n",
    "user space. Existing files are written from the start without being\n",
    "truncated.\n",
    "\n",
    "Options:\n",
    "  -s, --size BYTES  Staging buffer size (K and M suffixes accepted).\n",
    "                    Malformed values and values outside 1..=1M fall back\n",
    "                    to the input pipe's capacity, or 128K when standard\n",
    "                    input is a file.\n",
    "  -v, --verbose     Report capacity negotiation and transfer statistics;\n",
    "                    repeat for per-chunk tracing.\n",
    "  -q, --quiet       Only report errors.\n",
    "  -h, --help        Show this help message and exit.\n",
    "  -V, --version     Output version information and exit.\n",
    "\n",
    "Environment:\n",
    "  PIPETEE_SIZE      Default for --size.\n",
    "  RUST_LOG          Further restricts diagnostics (tracing filter syntax).\n",
);

/// Runs the CLI against the process's standard input and output.
///
/// Returns the process exit code that should be used by the caller.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let input = io::stdin();
    let output = io::stdout();
    run_with(arguments, input.as_fd(), output.as_fd(), stdout, stderr)
}

/// Runs the CLI, transferring from `input` to `output`.
///
/// `stdout` and `stderr` receive help, version and error text; the data
/// stream itself only ever touches `output`.
pub fn run_with<I, S, Out, Err>(
    arguments: I,
    input: BorrowedFd<'_>,
    output: BorrowedFd<'_>,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, input, output, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{PROGRAM_NAME}: {error}");
            ExitCode::Syntax.as_i32()
        }
    }
}

fn execute<Out, Err>(
    parsed: ParsedArgs,
    input: BorrowedFd<'_>,
    output: BorrowedFd<'_>,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    Out: Write,
    Err: Write,
{
    let ParsedArgs {
        show_help,
        show_version,
        verbosity,
        size,
        destinations,
    } = parsed;

    if show_help {
        return write_or_fail(stdout, stderr, HELP_TEXT);
    }
    if show_version {
        let banner = format!("{PROGRAM_NAME} {}\n", env!("CARGO_PKG_VERSION"));
        return write_or_fail(stdout, stderr, &banner);
    }

    let options = PipelineOptions::new(destinations.into_iter().map(PathBuf::from).collect())
        .with_requested_size(size);
    let subscriber = diagnostic_subscriber(
        VerbosityConfig::from_verbose_level(verbosity),
        PROGRAM_NAME,
        io::stderr,
    );

    match tracing::subscriber::with_default(subscriber, || {
        run_pipeline(&options, input, output)
    }) {
        Ok(_) => ExitCode::Ok.into(),
        Err(error) => {
            let code = ExitCode::from_class(error.class());
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            let _ = writeln!(stderr, "{PROGRAM_NAME} error: {code}");
            code.into()
        }
    }
}

fn write_or_fail<Out: Write, Err: Write>(stdout: &mut Out, stderr: &mut Err, text: &str) -> i32 {
    match stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
        Ok(()) => ExitCode::Ok.as_i32(),
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: failed to write to standard output: {error}");
            ExitCode::FileIo.as_i32()
        }
    }
}

/// Converts a numeric exit code into a [`std::process::ExitCode`].
///
/// Statuses outside `0..=255` map to [`std::process::ExitCode::FAILURE`]
/// and never to success.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    u8::try_from(status).map_or(std::process::ExitCode::FAILURE, std::process::ExitCode::from)
}

#[cfg(test)]
mod tests;
