//! Zero-copy pipe primitives for pipetee.
//!
//! This crate wraps the handful of Linux syscalls that let bytes move between
//! file descriptors without ever being copied into user-space memory:
//!
//! - **`splice(2)`** moves bytes between a pipe and any other descriptor
//!   ([`splice::splice_move`])
//! - **`tee(2)`** duplicates bytes from one pipe into another without
//!   consuming them ([`splice::tee_dup`])
//! - **`fcntl(F_GETPIPE_SZ / F_SETPIPE_SZ)`** queries and resizes the kernel
//!   buffer behind a pipe ([`pipe::pipe_capacity`], [`pipe::set_pipe_capacity`])
//!
//! [`KernelPipe`] owns both ends of an anonymous pipe and is the staging
//! buffer type used by the fan-out engine.
//!
//! # Platform Support
//!
//! - **Linux**: all primitives are available.
//! - **Other Unix platforms**: pipes can be created, but the zero-copy and
//!   capacity primitives return [`std::io::ErrorKind::Unsupported`]. Callers
//!   treat that as a failed transfer rather than silently copying through
//!   user memory.
//!
//! # Design Principles
//!
//! 1. **One syscall per call** - wrappers never loop or retry; short counts
//!    are returned to the caller, which owns the retry policy
//! 2. **Borrowed descriptors** - functions take [`BorrowedFd`](std::os::fd::BorrowedFd)
//!    so ownership stays with the caller

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

pub mod pipe;
pub mod splice;

pub use pipe::{KernelPipe, max_pipe_capacity, pipe_capacity, set_pipe_capacity};
pub use splice::{splice_move, tee_dup};
