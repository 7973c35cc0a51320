//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfoFlag {
    /// Startup summary: input mode, buffer capacity, destination count.
    Setup,
    /// End-of-run transfer statistics.
    Stats,
}

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugFlag {
    /// Pipe capacity negotiation.
    Sizing,
    /// Per-chunk pull, duplicate and drain activity.
    Io,
    /// Teardown of staging pipes and destinations.
    Exit,
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct InfoLevels {
    /// Startup summary level.
    pub setup: u8,
    /// Transfer statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    #[must_use]
    pub const fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Setup => self.setup,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub const fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Setup => self.setup = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub const fn set_all(&mut self, level: u8) {
        self.setup = level;
        self.stats = level;
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DebugLevels {
    /// Capacity negotiation level.
    pub sizing: u8,
    /// Transfer loop level.
    pub io: u8,
    /// Teardown level.
    pub exit: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    #[must_use]
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Sizing => self.sizing,
            DebugFlag::Io => self.io,
            DebugFlag::Exit => self.exit,
        }
    }

    /// Set the level for a specific flag.
    pub const fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Sizing => self.sizing = level,
            DebugFlag::Io => self.io = level,
            DebugFlag::Exit => self.exit = level,
        }
    }

    /// Set all flags to the specified level.
    pub const fn set_all(&mut self, level: u8) {
        self.sizing = level;
        self.io = level;
        self.exit = level;
    }
}
