#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` implements pipetee's fan-out: one byte stream read from standard
//! input is delivered, without passing through user-space memory, to every
//! destination and to standard output.
//!
//! A run has three phases, executed in order on the calling thread:
//!
//! 1. [`sizing`] derives the staging pipe capacity from the user override
//!    and the capacity of the input pipe.
//! 2. [`staging`] opens the destinations and allocates one staging pipe per
//!    destination plus the input stage, each sized to that capacity.
//! 3. [`fanout`] pulls chunks into the input stage, duplicates them into
//!    every destination stage with `tee(2)` and drains all stages with
//!    `splice(2)` until input ends.
//!
//! [`run_pipeline`] chains the phases and releases every handle before
//! returning.
//!
//! # Errors
//!
//! Every failure is terminal and surfaces as a [`FanOutError`];
//! [`FanOutError::class`] groups them for exit status reporting.
//!
//! # Examples
//!
//! ```no_run
//! use engine::{PipelineOptions, run_pipeline};
//! use std::io;
//! use std::os::fd::AsFd;
//!
//! let options = PipelineOptions::new(vec!["copy.log".into()]);
//! let stats = run_pipeline(&options, io::stdin().as_fd(), io::stdout().as_fd())?;
//! eprintln!("{} bytes", stats.bytes_pulled());
//! # Ok::<(), engine::FanOutError>(())
//! ```

mod error;
pub mod fanout;
mod pipeline;
pub mod sizing;
pub mod staging;
mod stats;

pub use error::{ErrorClass, FanOutError, FanOutResult};
pub use fanout::{FanOut, KernelSplice, SpliceOps};
pub use pipeline::{PipelineOptions, run_pipeline};
pub use sizing::{InputMode, Sizing, negotiate_capacity};
pub use staging::{Destination, Lane, StagingSet};
pub use stats::TransferStats;
