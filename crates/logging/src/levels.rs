//! crates/logging/src/levels.rs
//! Flag enum and level structure for debug verbosity.

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// TCP connection establishment towards the proxy.
    Connect,
    /// SOCKS4a request and reply handling.
    Proto,
    /// Transfer of the tunnel to the upper-layer protocol.
    Handoff,
}

impl DebugFlag {
    /// Every flag, in token order.
    pub const ALL: [Self; 3] = [Self::Connect, Self::Proto, Self::Handoff];

    /// Returns the token name used by [`VerbosityConfig::apply_debug_flag`](crate::VerbosityConfig::apply_debug_flag).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Proto => "proto",
            Self::Handoff => "handoff",
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Connection establishment level.
    pub connect: u8,
    /// Handshake protocol level.
    pub proto: u8,
    /// Handoff level.
    pub handoff: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Connect => self.connect,
            DebugFlag::Proto => self.proto,
            DebugFlag::Handoff => self.handoff,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Connect => self.connect = level,
            DebugFlag::Proto => self.proto = level,
            DebugFlag::Handoff => self.handoff = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.connect = level;
        self.proto = level;
        self.handoff = level;
    }
}
