//! The zero-copy fan-out transfer loop.
//!
//! Each iteration runs three phases on the calling thread:
//!
//! 1. **Pull** - one `splice` of up to the staging capacity from standard
//!    input into the input stage. Zero bytes means end of input.
//! 2. **Duplicate and drain**, per destination in order - `tee` the whole
//!    chunk into the destination's stage, then `splice` that stage into the
//!    destination until the chunk is gone.
//! 3. **Drain primary** - `splice` the input stage into standard output.
//!
//! `tee` cannot be resumed once it duplicated part of a chunk, so any count
//! other than the chunk length aborts the run. Short `splice` counts while
//! draining are normal and simply continue with the remainder.
//!
//! The syscalls go through [`SpliceOps`] so tests can inject faults.

use std::io;
use std::os::fd::{AsFd, BorrowedFd};

use fast_io::{splice_move, tee_dup};
use logging::trace_transfer;

use crate::error::{FanOutError, FanOutResult};
use crate::staging::StagingSet;
use crate::stats::TransferStats;

/// The two zero-copy primitives the loop is built on.
pub trait SpliceOps {
    /// Moves up to `len` bytes from `from` to `to`; `0` means end of stream.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the underlying move.
    fn splice(
        &mut self,
        from: BorrowedFd<'_>,
        to: BorrowedFd<'_>,
        len: usize,
    ) -> io::Result<usize>;

    /// Duplicates up to `len` bytes queued in pipe `from` into pipe `to`.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the underlying duplication.
    fn tee(&mut self, from: BorrowedFd<'_>, to: BorrowedFd<'_>, len: usize) -> io::Result<usize>;
}

/// [`SpliceOps`] backed by the kernel's `splice(2)` and `tee(2)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct KernelSplice;

impl SpliceOps for KernelSplice {
    fn splice(
        &mut self,
        from: BorrowedFd<'_>,
        to: BorrowedFd<'_>,
        len: usize,
    ) -> io::Result<usize> {
        splice_move(from, to, len)
    }

    fn tee(&mut self, from: BorrowedFd<'_>, to: BorrowedFd<'_>, len: usize) -> io::Result<usize> {
        tee_dup(from, to, len)
    }
}

impl<T: SpliceOps + ?Sized> SpliceOps for &mut T {
    fn splice(
        &mut self,
        from: BorrowedFd<'_>,
        to: BorrowedFd<'_>,
        len: usize,
    ) -> io::Result<usize> {
        (**self).splice(from, to, len)
    }

    fn tee(&mut self, from: BorrowedFd<'_>, to: BorrowedFd<'_>, len: usize) -> io::Result<usize> {
        (**self).tee(from, to, len)
    }
}

/// Runs the transfer loop over a prepared [`StagingSet`].
#[derive(Debug)]
pub struct FanOut<'a, O> {
    staging: &'a StagingSet,
    ops: O,
}

impl<'a, O: SpliceOps> FanOut<'a, O> {
    /// Creates a loop over `staging` that moves bytes through `ops`.
    #[must_use]
    pub const fn new(staging: &'a StagingSet, ops: O) -> Self {
        Self { staging, ops }
    }

    /// Copies `input` to every destination and to `output` until `input`
    /// reaches end of stream.
    ///
    /// # Errors
    ///
    /// Stops at the first failure:
    /// - [`FanOutError::Pull`] when reading from `input` fails
    /// - [`FanOutError::Duplicate`] when a duplication call fails
    /// - [`FanOutError::ShortDuplicate`] when it copies the wrong byte count
    /// - [`FanOutError::Drain`] when writing to a destination fails
    /// - [`FanOutError::DrainPrimary`] when writing to `output` fails
    ///
    /// Bytes already drained before the failure stay where they landed.
    pub fn run(
        &mut self,
        input: BorrowedFd<'_>,
        output: BorrowedFd<'_>,
    ) -> FanOutResult<TransferStats> {
        let staging = self.staging;
        let capacity = staging.capacity();
        let stage = staging.input();
        let mut stats = TransferStats::new(staging.lanes().len());

        loop {
            let len = self
                .ops
                .splice(input, stage.writer(), capacity)
                .map_err(FanOutError::Pull)?;
            if len == 0 {
                trace_transfer!("end of input after {} chunks", stats.chunks());
                return Ok(stats);
            }
            stats.record_pull(len);
            trace_transfer!("pulled {len} bytes");

            for lane in staging.lanes() {
                let destination = lane.destination();
                let duplicated = self
                    .ops
                    .tee(stage.reader(), lane.stage().writer(), len)
                    .map_err(|source| FanOutError::Duplicate {
                        index: destination.index(),
                        path: destination.path().to_path_buf(),
                        source,
                    })?;
                if duplicated != len {
                    return Err(FanOutError::ShortDuplicate {
                        index: destination.index(),
                        path: destination.path().to_path_buf(),
                        expected: len,
                        duplicated,
                    });
                }

                drain(&mut self.ops, lane.stage().reader(), destination.as_fd(), len).map_err(
                    |source| FanOutError::Drain {
                        index: destination.index(),
                        path: destination.path().to_path_buf(),
                        source,
                    },
                )?;
                stats.record_destination(destination.index(), len);
            }

            drain(&mut self.ops, stage.reader(), output, len).map_err(FanOutError::DrainPrimary)?;
            stats.record_primary(len);
        }
    }
}

/// Moves exactly `len` queued bytes from pipe `from` into `to`.
fn drain<O: SpliceOps>(
    ops: &mut O,
    from: BorrowedFd<'_>,
    to: BorrowedFd<'_>,
    len: usize,
) -> io::Result<()> {
    let mut remaining = len;
    while remaining > 0 {
        let moved = ops.splice(from, to, remaining)?;
        if moved == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("target accepted no bytes with {remaining} of {len} pending"),
            ));
        }
        remaining = remaining.saturating_sub(moved);
    }
    Ok(())
}
