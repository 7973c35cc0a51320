//! Error taxonomy for the fan-out pipeline.
//!
//! Every variant is terminal: the pipeline stops at the first failure, drops
//! the handles it already opened and hands the error to the caller.

use std::io;
use std::path::PathBuf;

/// Result type for fan-out operations.
pub type FanOutResult<T> = Result<T, FanOutError>;

/// Errors produced while preparing or running the fan-out.
#[derive(Debug, thiserror::Error)]
pub enum FanOutError {
    /// A destination could not be opened or created.
    #[error("could not open '{}': {source}", .path.display())]
    OpenDestination {
        /// Position of the destination on the command line.
        index: usize,
        /// Path the destination was opened from.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A staging pipe could not be allocated.
    #[error("could not create staging pipe: {0}")]
    CreateStage(#[source] io::Error),

    /// A staging pipe could not be resized.
    #[error("could not size staging pipe to {requested} bytes: {source}")]
    ResizeStage {
        /// Capacity requested from the kernel.
        requested: usize,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The kernel granted a staging pipe less room than a chunk may need.
    #[error("staging pipe granted {granted} bytes, {required} required")]
    StageTooSmall {
        /// Capacity the kernel granted.
        granted: usize,
        /// Capacity every staging pipe must hold.
        required: usize,
    },

    /// Moving bytes from standard input into the input stage failed.
    #[error("input pull failed: {0}")]
    Pull(#[source] io::Error),

    /// The duplication call itself failed.
    #[error("could not duplicate chunk for '{}': {source}", .path.display())]
    Duplicate {
        /// Position of the destination on the command line.
        index: usize,
        /// Path of the destination.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The duplication call copied a different byte count than requested.
    #[error(
        "not able to duplicate a full chunk for '{}': {duplicated} of {expected} bytes",
        .path.display()
    )]
    ShortDuplicate {
        /// Position of the destination on the command line.
        index: usize,
        /// Path of the destination.
        path: PathBuf,
        /// Bytes the chunk holds.
        expected: usize,
        /// Bytes the kernel duplicated.
        duplicated: usize,
    },

    /// Draining a destination stage into its destination failed.
    #[error("destination drain to '{}' failed: {source}", .path.display())]
    Drain {
        /// Position of the destination on the command line.
        index: usize,
        /// Path of the destination.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Draining the input stage into standard output failed.
    #[error("primary drain to standard output failed: {0}")]
    DrainPrimary(#[source] io::Error),
}

/// Broad failure classes used for exit status reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// A destination could not be opened.
    Destination,
    /// A staging pipe could not be created or sized.
    Staging,
    /// A bulk move or duplication call failed.
    Transfer,
    /// A duplication call copied the wrong number of bytes.
    Integrity,
}

impl FanOutError {
    /// Returns the failure class of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::OpenDestination { .. } => ErrorClass::Destination,
            Self::CreateStage(_) | Self::ResizeStage { .. } | Self::StageTooSmall { .. } => {
                ErrorClass::Staging
            }
            Self::Pull(_)
            | Self::Duplicate { .. }
            | Self::Drain { .. }
            | Self::DrainPrimary(_) => ErrorClass::Transfer,
            Self::ShortDuplicate { .. } => ErrorClass::Integrity,
        }
    }

    /// Returns the underlying I/O error, if the failure came from a syscall.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::OpenDestination { source, .. }
            | Self::ResizeStage { source, .. }
            | Self::Duplicate { source, .. }
            | Self::Drain { source, .. }
            | Self::CreateStage(source)
            | Self::Pull(source)
            | Self::DrainPrimary(source) => Some(source),
            Self::StageTooSmall { .. } | Self::ShortDuplicate { .. } => None,
        }
    }
}
