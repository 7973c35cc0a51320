//! End-to-end fan-out run: sizing, staging, transfer, teardown.

use std::os::fd::BorrowedFd;
use std::path::PathBuf;

use logging::{trace_setup, trace_stats, trace_teardown};

use crate::error::FanOutResult;
use crate::fanout::{FanOut, KernelSplice};
use crate::sizing::negotiate_capacity;
use crate::staging::StagingSet;
use crate::stats::TransferStats;

/// What a single run should do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    requested_size: usize,
    destinations: Vec<PathBuf>,
}

impl PipelineOptions {
    /// Options writing to `destinations` with no size override.
    #[must_use]
    pub fn new(destinations: Vec<PathBuf>) -> Self {
        Self {
            requested_size: 0,
            destinations,
        }
    }

    /// Sets the staging buffer size override. `0` means unset.
    #[must_use]
    pub const fn with_requested_size(mut self, bytes: usize) -> Self {
        self.requested_size = bytes;
        self
    }

    /// The staging buffer size override, `0` when unset.
    #[must_use]
    pub const fn requested_size(&self) -> usize {
        self.requested_size
    }

    /// Destination paths in command line order.
    #[must_use]
    pub fn destinations(&self) -> &[PathBuf] {
        &self.destinations
    }
}

/// Copies `input` to every destination in `options` and to `output`.
///
/// Every destination and staging pipe is closed before this returns, on
/// success and on failure alike.
///
/// # Errors
///
/// Returns the first [`FanOutError`](crate::FanOutError) hit while opening
/// destinations, allocating staging pipes or transferring.
pub fn run_pipeline(
    options: &PipelineOptions,
    input: BorrowedFd<'_>,
    output: BorrowedFd<'_>,
) -> FanOutResult<TransferStats> {
    let sizing = negotiate_capacity(options.requested_size, &input, &output);
    let count = options.destinations.len();
    trace_setup!(
        "{} input, buffers of size {}, {count} destination{}",
        sizing.mode,
        sizing.capacity,
        if count == 1 { "" } else { "s" }
    );

    let staging = StagingSet::open(sizing.capacity, &options.destinations)?;
    let result = FanOut::new(&staging, KernelSplice).run(input, output);
    let stages = staging.stage_count();
    drop(staging);
    trace_teardown!("released {stages} staging pipes");

    let stats = result?;
    trace_stats!(
        "transferred {} bytes in {} chunks to {count} destinations and standard output",
        stats.bytes_pulled(),
        stats.chunks()
    );
    Ok(stats)
}
