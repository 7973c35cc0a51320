//! Zero-copy byte movement with `splice(2)` and `tee(2)`.
//!
//! Both wrappers issue exactly one syscall and hand the raw byte count back.
//! Short counts are normal for `splice` (the destination may accept fewer
//! bytes than offered) and the caller decides whether to continue with the
//! remainder. For `tee` a short count cannot be resumed without re-reading
//! bytes the kernel already duplicated, which is why callers treat it as
//! fatal.
//!
//! # Platform Support
//!
//! - **Linux 2.6.17+**: native `splice` and `tee`
//! - **Other platforms**: always return [`io::ErrorKind::Unsupported`]
//!
//! # Example
//!
//! ```no_run
//! use std::io;
//! use std::os::fd::AsFd;
//! use fast_io::pipe::KernelPipe;
//! use fast_io::splice::{splice_move, tee_dup};
//!
//! # fn main() -> io::Result<()> {
//! let stage = KernelPipe::new()?;
//! let copy = KernelPipe::new()?;
//! let stdin = io::stdin();
//!
//! let pulled = splice_move(stdin.as_fd(), stage.writer(), 64 * 1024)?;
//! let duplicated = tee_dup(stage.reader(), copy.writer(), pulled)?;
//! assert_eq!(duplicated, pulled);
//! # Ok(())
//! # }
//! ```

use std::io;
use std::os::fd::BorrowedFd;
#[cfg(target_os = "linux")]
use std::os::fd::AsRawFd;

/// Moves up to `len` bytes from `from` to `to` without a user-space copy.
///
/// At least one of the descriptors must be a pipe. The current file offset
/// of a non-pipe descriptor is used and advanced. Returns the number of
/// bytes moved; `0` means `from` reached end-of-stream.
///
/// # Errors
///
/// Returns the OS error reported by `splice(2)`, e.g. `EPIPE` when the
/// reader of `to` has gone away or `EINVAL` when neither side is a pipe or
/// the target does not support splicing (terminals, `O_APPEND` files).
#[cfg(target_os = "linux")]
pub fn splice_move(from: BorrowedFd<'_>, to: BorrowedFd<'_>, len: usize) -> io::Result<usize> {
    // SAFETY: both descriptors are borrowed for the duration of the call.
    // Null offset pointers instruct the syscall to use and update the current
    // file position, which is the behavior we want.
    let result = unsafe {
        libc::splice(
            from.as_raw_fd(),
            std::ptr::null_mut(),
            to.as_raw_fd(),
            std::ptr::null_mut(),
            len,
            libc::SPLICE_F_MOVE,
        )
    };

    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(result as usize)
}

/// Stub for non-Linux platforms - always returns `Unsupported`.
#[cfg(not(target_os = "linux"))]
pub fn splice_move(_from: BorrowedFd<'_>, _to: BorrowedFd<'_>, _len: usize) -> io::Result<usize> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "splice not available on this platform",
    ))
}

/// Duplicates up to `len` bytes queued in pipe `from` into pipe `to`
/// without consuming them from `from`.
///
/// Both descriptors must be pipes. Returns the number of bytes duplicated,
/// which may be less than `len` when `to` lacks room or `from` holds fewer
/// bytes.
///
/// # Errors
///
/// Returns the OS error reported by `tee(2)`, e.g. `EINVAL` when either
/// side is not a pipe.
#[cfg(target_os = "linux")]
pub fn tee_dup(from: BorrowedFd<'_>, to: BorrowedFd<'_>, len: usize) -> io::Result<usize> {
    // SAFETY: both descriptors are borrowed for the duration of the call.
    let result = unsafe { libc::tee(from.as_raw_fd(), to.as_raw_fd(), len, 0) };

    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(result as usize)
}

/// Stub for non-Linux platforms - always returns `Unsupported`.
#[cfg(not(target_os = "linux"))]
pub fn tee_dup(_from: BorrowedFd<'_>, _to: BorrowedFd<'_>, _len: usize) -> io::Result<usize> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "tee not available on this platform",
    ))
}

#[cfg(test)]
mod tests;
