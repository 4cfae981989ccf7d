#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` routes the SOCKS4a hop's diagnostics through the `tracing`
//! facade while letting callers pick how chatty each subsystem is, using
//! `FLAG[LEVEL]` tokens such as `proto2`.
//!
//! # Design
//!
//! - [`trace_connect!`], [`trace_proto!`] and [`trace_handoff!`] emit events
//!   under fixed `socks4a::*` targets.
//! - [`HopLayer`] maps those targets onto [`DebugFlag`]s and records events the
//!   thread's [`VerbosityConfig`] admits; [`drain_events`] hands them back.
//!   Each thread keeps at most [`MAX_BUFFERED_EVENTS`] undrained events, so
//!   a process that never drains does not grow without bound.
//! - [`init_tracing`] installs the layer plus a stderr formatter globally.
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_flag("proto2").unwrap();
//! assert_eq!(config.debug.get(DebugFlag::Proto), 2);
//! ```

mod config;
mod levels;
mod thread_local;
mod tracing_bridge;
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels};
pub use thread_local::{
    DiagnosticEvent, MAX_BUFFERED_EVENTS, apply_debug_flag, debug_gte, drain_events, emit_debug,
    init,
};
pub use tracing_bridge::{HopLayer, init_tracing, init_tracing_with_filter};
