//! crates/protocol/src/wire.rs
//!
//! Wire constants shared by the request encoder and reply decoder.
//!
//! ```text
//! request: VN(1)=4 | CD(1)=1 | DSTPORT(2, BE) | DSTIP(4)=0.0.0.1 | USERID | NUL | HOST | NUL
//! reply:   VN(1)=4 | CD(1)    | DSTPORT(2, BE) | DSTIP(4)
//! ```

/// Protocol version byte carried by every request and expected in every reply.
pub const SOCKS4_VERSION: u8 = 0x04;

/// Command code requesting an outbound stream connection.
pub const COMMAND_CONNECT: u8 = 0x01;

/// Destination address announcing that a domain name follows the user id.
///
/// Any `0.0.0.x` value with `x != 0` is accepted by SOCKS4a servers; `0.0.0.1`
/// is the conventional choice.
pub const UNRESOLVED_ADDRESS: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Fixed portion of a request, including the NUL that terminates the empty user id.
pub const REQUEST_HEADER_LEN: usize = 9;

/// Exact length of a proxy reply.
pub const REPLY_LEN: usize = 8;

/// Request granted.
pub const STATUS_GRANTED: u8 = 90;

/// Request rejected or failed.
pub const STATUS_REJECTED_OR_FAILED: u8 = 91;

/// Request rejected because the proxy could not reach an identd on the client.
pub const STATUS_NO_IDENTD: u8 = 92;

/// Request rejected because identd reported a different user id.
pub const STATUS_IDENTD_MISMATCH: u8 = 93;
