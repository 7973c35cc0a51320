//! Destinations and the staging pipes that feed them.
//!
//! A [`StagingSet`] owns one [`Lane`] per destination (the open destination
//! plus its private staging pipe) and the input stage that every pull lands
//! in. All pipes are sized before the set is handed to the transfer loop and
//! everything is closed together when the set is dropped.

use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use fast_io::KernelPipe;
use logging::trace_sizing;

use crate::error::{FanOutError, FanOutResult};

/// Permission bits for destinations that do not exist yet.
pub const DESTINATION_MODE: u32 = 0o644;

/// An open, writable destination.
#[derive(Debug)]
pub struct Destination {
    index: usize,
    path: PathBuf,
    file: File,
}

impl Destination {
    /// Opens `path` for writing, creating it with [`DESTINATION_MODE`] when
    /// absent. Existing content is not truncated.
    ///
    /// # Errors
    ///
    /// Returns [`FanOutError::OpenDestination`] when the path cannot be
    /// opened or created.
    pub fn open(index: usize, path: &Path) -> FanOutResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .mode(DESTINATION_MODE)
            .open(path)
            .map_err(|source| FanOutError::OpenDestination {
                index,
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            index,
            path: path.to_path_buf(),
            file,
        })
    }

    /// Position of the destination on the command line.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Path the destination was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raises the destination's own pipe buffer when it is a FIFO.
    ///
    /// Failures are logged and otherwise ignored.
    fn enlarge_if_fifo(&self, capacity: usize) {
        let is_fifo = self
            .file
            .metadata()
            .is_ok_and(|metadata| metadata.file_type().is_fifo());
        if !is_fifo {
            return;
        }

        match fast_io::set_pipe_capacity(self.file.as_fd(), capacity) {
            Ok(granted) => {
                trace_sizing!("destination {} pipe raised to {granted} bytes", self.path.display());
            }
            Err(error) => {
                trace_sizing!(
                    "could not raise destination {} pipe to {capacity} bytes: {error}",
                    self.path.display()
                );
            }
        }
    }
}

impl AsFd for Destination {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

/// A destination paired with its staging pipe.
#[derive(Debug)]
pub struct Lane {
    destination: Destination,
    stage: KernelPipe,
}

impl Lane {
    /// The destination this lane drains into.
    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// The lane's staging pipe.
    #[must_use]
    pub const fn stage(&self) -> &KernelPipe {
        &self.stage
    }
}

/// Every pipe and destination a fan-out run needs.
#[derive(Debug)]
pub struct StagingSet {
    capacity: usize,
    lanes: Vec<Lane>,
    input: KernelPipe,
}

impl StagingSet {
    /// Opens every destination in order and allocates its staging pipe,
    /// then allocates the input stage. Each pipe is sized to `capacity`.
    ///
    /// On failure, everything opened so far is closed before returning.
    ///
    /// # Errors
    ///
    /// - [`FanOutError::OpenDestination`] when a destination cannot be opened
    /// - [`FanOutError::CreateStage`] when a pipe cannot be allocated
    /// - [`FanOutError::ResizeStage`] when a pipe cannot be resized
    /// - [`FanOutError::StageTooSmall`] when the kernel grants less than
    ///   `capacity`
    pub fn open<P: AsRef<Path>>(capacity: usize, destinations: &[P]) -> FanOutResult<Self> {
        let mut lanes = Vec::with_capacity(destinations.len());

        for (index, path) in destinations.iter().enumerate() {
            let destination = Destination::open(index, path.as_ref())?;
            destination.enlarge_if_fifo(capacity);
            let stage = allocate_stage(capacity)?;
            lanes.push(Lane { destination, stage });
        }

        let input = allocate_stage(capacity)?;
        tracing::debug!(
            target: "pipetee::setup",
            "allocated {} staging pipes of {capacity} bytes",
            lanes.len() + 1
        );

        Ok(Self {
            capacity,
            lanes,
            input,
        })
    }

    /// Capacity every staging pipe holds.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Destination lanes in command line order.
    #[must_use]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// The stage every pull lands in.
    #[must_use]
    pub const fn input(&self) -> &KernelPipe {
        &self.input
    }

    /// Number of staging pipes, the input stage included.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.lanes.len() + 1
    }
}

fn allocate_stage(capacity: usize) -> FanOutResult<KernelPipe> {
    let pipe = KernelPipe::new().map_err(FanOutError::CreateStage)?;
    let granted = pipe
        .set_capacity(capacity)
        .map_err(|source| FanOutError::ResizeStage {
            requested: capacity,
            source,
        })?;

    if granted < capacity {
        return Err(FanOutError::StageTooSmall {
            granted,
            required: capacity,
        });
    }
    Ok(pipe)
}
