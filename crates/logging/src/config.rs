//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Highest `-v` count with a distinct meaning.
pub const MAX_VERBOSE_LEVEL: u8 = 3;

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a verbose level.
    ///
    /// - `0`: quiet, only warnings and errors
    /// - `1`: the default startup summary line
    /// - `2`: capacity negotiation, statistics and teardown (`-v`)
    /// - `3`: per-chunk transfer tracing (`-vv`)
    ///
    /// Levels above [`MAX_VERBOSE_LEVEL`] behave like the maximum.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        match level.min(MAX_VERBOSE_LEVEL) {
            0 => {}
            1 => {
                config.info.setup = 1;
            }
            2 => {
                config.info.setup = 2;
                config.info.stats = 1;
                config.debug.sizing = 2;
                config.debug.exit = 2;
            }
            _ => {
                config.info.set_all(2);
                config.debug.sizing = 3;
                config.debug.io = 3;
                config.debug.exit = 2;
            }
        }

        config
    }

    /// Check if the info flag is at or above the specified level.
    #[must_use]
    pub const fn info_gte(&self, flag: InfoFlag, level: u8) -> bool {
        self.info.get(flag) >= level
    }

    /// Check if the debug flag is at or above the specified level.
    #[must_use]
    pub const fn debug_gte(&self, flag: DebugFlag, level: u8) -> bool {
        self.debug.get(flag) >= level
    }
}
