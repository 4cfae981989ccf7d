//! Proxy endpoint configuration.
//!
//! A proxy is named as `HOST:PORT`, `[IPv6]:PORT`, or either form prefixed
//! with `socks4a://` or `socks4://`. The host may be percent-encoded. The
//! [`PROXY_ENV`] variable supplies the same syntax from the environment.

use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use transport::Destination;

/// Environment variable consulted by [`load_proxy_from_env`].
pub const PROXY_ENV: &str = "SOCKS4A_PROXY";

/// A proxy specification could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// No host was given.
    #[error("proxy specification must name a proxy host")]
    MissingHost,
    /// A scheme other than `socks4a://` or `socks4://` was used.
    #[error("proxy scheme must be socks4a:// or socks4://, found {0}://")]
    UnsupportedScheme(String),
    /// A path followed the authority.
    #[error("proxy specification must not include a path component")]
    UnexpectedPath,
    /// `user@` information was given, which SOCKS4a cannot send.
    #[error("proxy specification must not include user information")]
    UnexpectedUserInfo,
    /// The port was absent.
    #[error("proxy specification must be in HOST:PORT form")]
    MissingPort,
    /// The port was not a number in `1..=65535`.
    #[error("proxy specification has an invalid port '{0}'")]
    InvalidPort(String),
    /// A `[` was not followed by `]:PORT`.
    #[error("proxy specification contains an invalid bracketed host")]
    InvalidBracketedHost,
    /// A `%` escape in the host was truncated or not hexadecimal.
    #[error("proxy host contains invalid percent-encoding")]
    InvalidPercentEncoding,
    /// The decoded host was not UTF-8.
    #[error("proxy host contains invalid UTF-8 after percent-decoding")]
    InvalidUtf8,
    /// The environment variable was set to a non-Unicode value.
    #[error("{PROXY_ENV} value must be valid UTF-8")]
    NotUnicode,
}

/// Where the SOCKS4a proxy listens.
///
/// Deserialized values go through the same checks as [`parse_proxy_spec`]:
/// the host must be non-blank and the port non-zero.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawProxyConfig"))]
pub struct ProxyConfig {
    host: String,
    port: u16,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawProxyConfig {
    host: String,
    port: u16,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProxyConfig> for ProxyConfig {
    type Error = ConfigError;

    fn try_from(raw: RawProxyConfig) -> Result<Self, Self::Error> {
        if raw.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if raw.port == 0 {
            return Err(ConfigError::InvalidPort(raw.port.to_string()));
        }
        Ok(Self {
            host: raw.host,
            port: raw.port,
        })
    }
}

impl ProxyConfig {
    /// Creates a configuration from parts that are already validated.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the proxy host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the proxy port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the proxy endpoint as a [`Destination`].
    #[must_use]
    pub fn destination(&self) -> Destination {
        Destination::new(self.host.clone(), self.port)
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ProxyConfig {
    type Err = ConfigError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        parse_proxy_spec(spec)
    }
}

/// Reads the proxy from [`PROXY_ENV`].
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn load_proxy_from_env() -> Result<Option<ProxyConfig>, ConfigError> {
    match env::var(PROXY_ENV) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_proxy_spec(trimmed).map(Some)
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode),
    }
}

/// Parses a proxy specification.
///
/// # Examples
///
/// ```
/// use client::parse_proxy_spec;
///
/// let proxy = parse_proxy_spec("socks4a://127.0.0.1:9050").unwrap();
/// assert_eq!(proxy.host(), "127.0.0.1");
/// assert_eq!(proxy.port(), 9050);
/// ```
pub fn parse_proxy_spec(spec: &str) -> Result<ProxyConfig, ConfigError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingHost);
    }

    let mut remainder = trimmed;
    if let Some((scheme, rest)) = trimmed.split_once("://") {
        if !scheme.eq_ignore_ascii_case("socks4a") && !scheme.eq_ignore_ascii_case("socks4") {
            return Err(ConfigError::UnsupportedScheme(scheme.to_owned()));
        }
        if rest.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        remainder = rest;
    }

    // a single trailing slash is tolerated, as in "socks4a://host:port/"
    let remainder = remainder.strip_suffix('/').unwrap_or(remainder);
    if remainder.contains('/') {
        return Err(ConfigError::UnexpectedPath);
    }
    if remainder.contains('@') {
        return Err(ConfigError::UnexpectedUserInfo);
    }

    let (host, port) = parse_host_port(remainder)?;
    Ok(ProxyConfig { host, port })
}

fn parse_host_port(input: &str) -> Result<(String, u16), ConfigError> {
    if let Some(rest) = input.strip_prefix('[') {
        let (host, port_text) = rest
            .split_once(']')
            .ok_or(ConfigError::InvalidBracketedHost)?;
        let port_text = port_text
            .strip_prefix(':')
            .ok_or(ConfigError::MissingPort)?;
        if host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        return Ok((decode_host(host)?, parse_port(port_text)?));
    }

    let (host, port_text) = input.rsplit_once(':').ok_or(ConfigError::MissingPort)?;
    if host.is_empty() {
        return Err(ConfigError::MissingHost);
    }
    Ok((decode_host(host)?, parse_port(port_text)?))
}

fn parse_port(text: &str) -> Result<u16, ConfigError> {
    if text.is_empty() {
        return Err(ConfigError::MissingPort);
    }
    match text.parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidPort(text.to_owned())),
        Ok(port) => Ok(port),
    }
}

fn decode_host(input: &str) -> Result<String, ConfigError> {
    if !input.contains('%') {
        return Ok(input.to_owned());
    }

    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'%' {
            let (Some(hi), Some(lo)) = (
                bytes.get(index + 1).copied().and_then(hex_value),
                bytes.get(index + 2).copied().and_then(hex_value),
            ) else {
                return Err(ConfigError::InvalidPercentEncoding);
            };
            decoded.push((hi << 4) | lo);
            index += 3;
            continue;
        }

        decoded.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(decoded).map_err(|_| ConfigError::InvalidUtf8)
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
