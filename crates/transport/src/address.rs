use std::fmt;
use std::net::SocketAddr;

/// A host and port pair, kept unresolved.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Destination {
    host: String,
    port: u16,
}

impl Destination {
    /// Creates a destination without resolving `host`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host name or address literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Best-effort description of the peer handed to the upper-layer factory.
///
/// Tunnels opened through the proxy report [`PeerAddress::Unresolved`]: the
/// proxy resolved the name, so no socket address is known locally.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PeerAddress {
    /// The destination as requested from the proxy.
    Unresolved(Destination),
    /// A concrete socket address.
    Resolved(SocketAddr),
}

impl PeerAddress {
    /// Reports whether the peer address was resolved locally.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(destination) => fmt::Display::fmt(destination, f),
            Self::Resolved(addr) => fmt::Display::fmt(addr, f),
        }
    }
}

/// Describes one connection attempt through the proxy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connector {
    proxy: Destination,
    destination: Destination,
}

impl Connector {
    /// Creates a descriptor for reaching `destination` via `proxy`.
    #[must_use]
    pub const fn new(proxy: Destination, destination: Destination) -> Self {
        Self { proxy, destination }
    }

    /// Returns the proxy endpoint the transport connects to.
    #[must_use]
    pub const fn proxy(&self) -> &Destination {
        &self.proxy
    }

    /// Returns the endpoint the proxy is asked to reach.
    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.destination, self.proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_brackets_ipv6_literals() {
        assert_eq!(Destination::new("fe80::1", 80).to_string(), "[fe80::1]:80");
        assert_eq!(Destination::new("example.onion", 80).to_string(), "example.onion:80");
    }

    #[test]
    fn connector_display_names_both_hops() {
        let connector = Connector::new(
            Destination::new("127.0.0.1", 9050),
            Destination::new("example.onion", 80),
        );
        assert_eq!(connector.to_string(), "example.onion:80 via 127.0.0.1:9050");
    }

    #[test]
    fn unresolved_peer_reports_destination() {
        let peer = PeerAddress::Unresolved(Destination::new("a.onion", 1));
        assert!(!peer.is_resolved());
        assert_eq!(peer.to_string(), "a.onion:1");

        let resolved = PeerAddress::Resolved("127.0.0.1:9".parse().expect("literal"));
        assert!(resolved.is_resolved());
    }
}
