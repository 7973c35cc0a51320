//! Anonymous kernel pipes and pipe capacity control.
//!
//! A pipe is the only kind of descriptor `tee(2)` accepts on both sides, so
//! every staging buffer in pipetee is a [`KernelPipe`]. The kernel sizes new
//! pipes at 16 pages (64 KiB on most systems); [`set_pipe_capacity`] raises
//! or lowers that with `fcntl(F_SETPIPE_SZ)`. The kernel rounds requests up
//! to a power-of-two number of pages, so the value it returns is the
//! authoritative capacity, not the value requested.
//!
//! # Example
//!
//! ```no_run
//! use fast_io::pipe::KernelPipe;
//!
//! # fn main() -> std::io::Result<()> {
//! let pipe = KernelPipe::new()?;
//! let granted = pipe.set_capacity(256 * 1024)?;
//! assert!(granted >= 256 * 1024);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io;
use std::os::fd::{AsFd, BorrowedFd, FromRawFd, OwnedFd};
#[cfg(target_os = "linux")]
use std::os::fd::AsRawFd;

/// Location of the system-wide ceiling for unprivileged pipe resizes.
pub const PIPE_MAX_SIZE_PATH: &str = "/proc/sys/fs/pipe-max-size";

/// Both ends of an anonymous pipe, closed together on drop.
#[derive(Debug)]
pub struct KernelPipe {
    reader: OwnedFd,
    writer: OwnedFd,
}

impl KernelPipe {
    /// Creates a new pipe with close-on-exec set on both ends.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the process is out of descriptors or the
    /// kernel refuses to allocate another pipe.
    pub fn new() -> io::Result<Self> {
        let mut fds = [0 as libc::c_int; 2];

        #[cfg(target_os = "linux")]
        // SAFETY: `fds` is a valid, writable array of two c_ints.
        let result = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) };
        #[cfg(not(target_os = "linux"))]
        // SAFETY: `fds` is a valid, writable array of two c_ints.
        let result = unsafe { libc::pipe(fds.as_mut_ptr()) };

        if result < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: pipe(2) succeeded, so both descriptors are open and owned
        // by nobody else.
        let (reader, writer) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
        Ok(Self { reader, writer })
    }

    /// Readable end of the pipe.
    #[must_use]
    pub fn reader(&self) -> BorrowedFd<'_> {
        self.reader.as_fd()
    }

    /// Writable end of the pipe.
    #[must_use]
    pub fn writer(&self) -> BorrowedFd<'_> {
        self.writer.as_fd()
    }

    /// Current kernel buffer capacity of the pipe in bytes.
    ///
    /// # Errors
    ///
    /// See [`pipe_capacity`].
    pub fn capacity(&self) -> io::Result<usize> {
        pipe_capacity(self.reader())
    }

    /// Resizes the pipe and returns the capacity the kernel granted.
    ///
    /// # Errors
    ///
    /// See [`set_pipe_capacity`].
    pub fn set_capacity(&self, bytes: usize) -> io::Result<usize> {
        set_pipe_capacity(self.reader(), bytes)
    }

    /// Splits the pipe into its `(reader, writer)` descriptors.
    #[must_use]
    pub fn into_parts(self) -> (OwnedFd, OwnedFd) {
        (self.reader, self.writer)
    }
}

/// Returns the kernel buffer capacity of the pipe behind `fd`.
///
/// # Errors
///
/// Fails with `EBADF` when `fd` is not a pipe (regular files, terminals,
/// sockets), which callers use to detect "not a pipe". On non-Linux
/// platforms this always returns [`io::ErrorKind::Unsupported`].
#[cfg(target_os = "linux")]
pub fn pipe_capacity(fd: BorrowedFd<'_>) -> io::Result<usize> {
    // SAFETY: F_GETPIPE_SZ takes no argument and `fd` is a live descriptor.
    let result = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_GETPIPE_SZ) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(result as usize)
}

/// Stub for non-Linux platforms - always returns `Unsupported`.
#[cfg(not(target_os = "linux"))]
pub fn pipe_capacity(_fd: BorrowedFd<'_>) -> io::Result<usize> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "F_GETPIPE_SZ not available on this platform",
    ))
}

/// Resizes the pipe behind `fd` to at least `bytes` and returns the capacity
/// the kernel actually granted.
///
/// # Errors
///
/// - `EPERM` when `bytes` exceeds `/proc/sys/fs/pipe-max-size` for an
///   unprivileged process
/// - `EBUSY` when shrinking below the bytes currently queued in the pipe
/// - `EBADF` when `fd` is not a pipe
/// - [`io::ErrorKind::InvalidInput`] when `bytes` does not fit a C `int`
#[cfg(target_os = "linux")]
pub fn set_pipe_capacity(fd: BorrowedFd<'_>, bytes: usize) -> io::Result<usize> {
    let requested = libc::c_int::try_from(bytes).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("pipe capacity {bytes} exceeds the fcntl argument range"),
        )
    })?;

    // SAFETY: F_SETPIPE_SZ takes an int argument and `fd` is a live descriptor.
    let result = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETPIPE_SZ, requested) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(result as usize)
}

/// Stub for non-Linux platforms - always returns `Unsupported`.
#[cfg(not(target_os = "linux"))]
pub fn set_pipe_capacity(_fd: BorrowedFd<'_>, _bytes: usize) -> io::Result<usize> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "F_SETPIPE_SZ not available on this platform",
    ))
}

/// Reads the largest pipe capacity an unprivileged process may request.
///
/// # Errors
///
/// Returns the I/O error from reading [`PIPE_MAX_SIZE_PATH`], or
/// [`io::ErrorKind::InvalidData`] when its contents are not an integer.
pub fn max_pipe_capacity() -> io::Result<usize> {
    parse_pipe_max_size(&fs::read_to_string(PIPE_MAX_SIZE_PATH)?)
}

fn parse_pipe_max_size(contents: &str) -> io::Result<usize> {
    contents.trim().parse::<usize>().map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid {PIPE_MAX_SIZE_PATH} value {:?}: {error}", contents.trim()),
        )
    })
}

#[cfg(test)]
mod tests;
