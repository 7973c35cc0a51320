//! Staging buffer capacity negotiation.
//!
//! Every staging pipe must hold the largest chunk a single pull can move,
//! otherwise a duplication call could come up short. The capacity is
//! derived once, before any pipe is allocated:
//!
//! - standard input is not a pipe: the user override, or
//!   [`DEFAULT_FILE_CAPACITY`]
//! - standard input is a pipe: the user override, or the upstream pipe's own
//!   capacity. When the override is larger the upstream pipe (and, best
//!   effort, standard output) is raised to it and the kernel's answer wins.
//!
//! Overrides outside `(0, MAX_REQUESTED_CAPACITY]` are replaced by the
//! fallback without complaint.

use std::fmt;
use std::io;
use std::os::fd::BorrowedFd;

use logging::trace_sizing;

/// Capacity used when standard input is a regular file or device.
pub const DEFAULT_FILE_CAPACITY: usize = 128 * 1024;

/// Largest user override that is honoured.
pub const MAX_REQUESTED_CAPACITY: usize = 1024 * 1024;

/// Capacity control over something that may be a pipe.
pub trait PipeProbe {
    /// Current capacity, or an error when the descriptor is not a pipe.
    fn capacity(&self) -> io::Result<usize>;

    /// Requests a new capacity and returns the one the kernel granted.
    fn set_capacity(&self, bytes: usize) -> io::Result<usize>;
}

impl PipeProbe for BorrowedFd<'_> {
    fn capacity(&self) -> io::Result<usize> {
        fast_io::pipe_capacity(*self)
    }

    fn set_capacity(&self, bytes: usize) -> io::Result<usize> {
        fast_io::set_pipe_capacity(*self, bytes)
    }
}

/// How standard input was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Regular file, device or anything else that is not a pipe.
    File,
    /// A pipe whose capacity was `upstream` bytes before negotiation.
    Pipe {
        /// Capacity of the input pipe as first observed.
        upstream: usize,
    },
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Pipe { .. } => f.write_str("pipe"),
        }
    }
}

/// Outcome of capacity negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sizing {
    /// Capacity every staging pipe is sized to.
    pub capacity: usize,
    /// Input classification the capacity was derived from.
    pub mode: InputMode,
}

/// Returns `requested` when it lies in `(0, MAX_REQUESTED_CAPACITY]`,
/// `fallback` otherwise.
#[must_use]
pub const fn clamp_request(requested: usize, fallback: usize) -> usize {
    if requested == 0 || requested > MAX_REQUESTED_CAPACITY {
        fallback
    } else {
        requested
    }
}

/// Derives the staging capacity from the user override and the input and
/// output descriptors.
///
/// Never fails: a refused raise is logged and the clamped request is kept.
pub fn negotiate_capacity<I, O>(requested: usize, input: &I, output: &O) -> Sizing
where
    I: PipeProbe + ?Sized,
    O: PipeProbe + ?Sized,
{
    let Ok(upstream) = input.capacity() else {
        let capacity = clamp_request(requested, DEFAULT_FILE_CAPACITY);
        trace_sizing!("standard input is not a pipe, using {capacity} bytes");
        return Sizing {
            capacity,
            mode: InputMode::File,
        };
    };

    let mut capacity = clamp_request(requested, upstream);
    if capacity > upstream {
        match input.set_capacity(capacity) {
            Ok(granted) => {
                trace_sizing!("input pipe raised from {upstream} to {granted} bytes");
                capacity = granted;
            }
            Err(error) => report_refused_raise("input", capacity, &error),
        }

        if let Err(error) = output.set_capacity(capacity) {
            report_refused_raise("output", capacity, &error);
        }
    } else {
        trace_sizing!("input pipe holds {upstream} bytes, using {capacity}");
    }

    Sizing {
        capacity,
        mode: InputMode::Pipe { upstream },
    }
}

fn report_refused_raise(side: &str, capacity: usize, error: &io::Error) {
    match fast_io::max_pipe_capacity() {
        Ok(ceiling) if capacity > ceiling => {
            trace_sizing!(
                "could not raise {side} pipe to {capacity} bytes: {error} (system ceiling is {ceiling})"
            );
        }
        _ => {
            trace_sizing!("could not raise {side} pipe to {capacity} bytes: {error}");
        }
    }
}
