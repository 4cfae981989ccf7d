//! crates/logging/src/tracing_macros.rs
//! Convenience macros for SOCKS4a hop tracing.
//!
//! These macros wrap the standard tracing macros with the targets that
//! [`HopLayer`](crate::HopLayer) maps onto debug flags.

/// Emit a connection establishment trace.
///
/// # Example
/// ```ignore
/// trace_connect!("connecting to proxy {}", addr);
/// ```
#[macro_export]
macro_rules! trace_connect {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "socks4a::connect", $($arg)*);
    };
}

/// Emit a handshake protocol trace.
///
/// # Example
/// ```ignore
/// trace_proto!("reply status {}", status);
/// ```
#[macro_export]
macro_rules! trace_proto {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "socks4a::protocol", $($arg)*);
    };
}

/// Emit a handoff trace.
///
/// # Example
/// ```ignore
/// trace_handoff!("replaying {} bytes", leftover);
/// ```
#[macro_export]
macro_rules! trace_handoff {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "socks4a::handoff", $($arg)*);
    };
}
