//! crates/logging/src/config.rs
//! Verbosity configuration for the debug flags.

use super::levels::{DebugFlag, DebugLevels};

/// Verbosity configuration consulted by [`HopLayer`](crate::HopLayer).
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a verbose level (0-3).
    ///
    /// Level 1 reports connection attempts, level 2 adds handshake and handoff
    /// decisions, level 3 adds byte-level progress. Higher values saturate.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        match level {
            0 => {}
            1 => {
                config.debug.connect = 1;
            }
            2 => {
                config.debug.connect = 1;
                config.debug.proto = 2;
                config.debug.handoff = 2;
            }
            _ => {
                config.debug.set_all(3);
            }
        }

        config
    }

    /// Apply a debug flag token such as `proto2` or `handoff`.
    ///
    /// A token without digits sets the flag to level 1. The pseudo flag `all`
    /// applies the level to every flag.
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag = DebugFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown debug flag: {name}"))?;

        self.debug.set(flag, level);
        Ok(())
    }
}

/// Parse a flag token like "proto2" into ("proto", 2) or "connect" into ("connect", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(pos) => {
            let name = &token[..pos];
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}
