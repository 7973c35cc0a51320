//! Process exit codes reported by pipetee.
//!
//! The numbering follows rsync's `errcode.h` so scripts that already
//! understand those codes can tell a usage error from a broken destination.

use std::fmt;

use engine::ErrorClass;

/// Exit codes returned by the `pipetee` binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Input reached end of stream and every byte was delivered.
    Ok = 0,

    /// Syntax or usage error.
    ///
    /// Returned for missing destinations, unknown flags and conflicting
    /// switches, before any destination is opened.
    Syntax = 1,

    /// A destination could not be opened or created.
    FileSelect = 3,

    /// A transfer step failed: the input pull, a destination drain, the
    /// standard output drain or a duplication call.
    FileIo = 11,

    /// A duplication call copied a different byte count than requested.
    StreamIo = 12,

    /// A staging pipe could not be created or sized.
    Ipc = 14,
}

impl ExitCode {
    /// Returns the numeric exit status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Short human-readable description of the code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::FileSelect => "errors selecting output files",
            Self::FileIo => "error in file I/O",
            Self::StreamIo => "incomplete duplication of the data stream",
            Self::Ipc => "error in staging pipe setup",
        }
    }

    /// Maps an engine failure class to its exit code.
    #[must_use]
    pub const fn from_class(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Destination => Self::FileSelect,
            ErrorClass::Staging => Self::Ipc,
            ErrorClass::Transfer => Self::FileIo,
            ErrorClass::Integrity => Self::StreamIo,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}
