#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `client` opens connections through a SOCKS4a proxy using blocking
//! sockets. It supplies the TCP [`Transport`](transport::Transport) the
//! handshake runs over and drives a
//! [`ProxiedConnection`](transport::ProxiedConnection) from the socket until
//! the tunnel opens or the attempt fails.
//!
//! # Design
//!
//! - [`config`] parses proxy endpoints from strings and from the
//!   [`PROXY_ENV`] variable.
//! - [`ConnectOptions`] carries the connect timeout, the optional reply
//!   timeout and the optional local bind address.
//! - [`connect_socks4a`] performs one attempt and returns a [`Tunnel`];
//!   [`ProxyDialer`] bundles a proxy with options so callers can route every
//!   connection they make through it.
//!
//! # Errors
//!
//! The upper-layer factory always receives the complete
//! [`ConnectError`](transport::ConnectError). The caller that started the
//! attempt gets a [`ClientError`] summarising the same failure.
//!
//! # Examples
//!
//! ```no_run
//! use client::{ConnectOptions, ProxyDialer, parse_proxy_spec};
//! # use client::TcpTransport;
//! # use transport::{ConnectError, Connector, PeerAddress, Protocol, ProtocolFactory};
//! # struct Http;
//! # impl Protocol<TcpTransport> for Http {
//! #     fn make_connection(&mut self, _transport: TcpTransport) {}
//! #     fn data_received(&mut self, _data: &[u8]) {}
//! # }
//! # struct HttpFactory;
//! # impl ProtocolFactory<TcpTransport> for HttpFactory {
//! #     type Protocol = Http;
//! #     fn build_protocol(&self, _peer: &PeerAddress) -> Http { Http }
//! #     fn on_connect_failed(&self, _connector: &Connector, _reason: ConnectError) {}
//! # }
//!
//! let proxy = parse_proxy_spec("127.0.0.1:9050")?;
//! let dialer = ProxyDialer::new(proxy, ConnectOptions::default());
//! let tunnel = dialer.connect("example.onion", 80, HttpFactory)?;
//! let _protocol = tunnel.run()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
mod connect;
mod error;
mod options;
mod tcp;

pub use config::{ConfigError, PROXY_ENV, ProxyConfig, load_proxy_from_env, parse_proxy_spec};
pub use connect::{ProxyDialer, Tunnel, connect_socks4a};
pub use error::ClientError;
pub use options::{ConnectOptions, DEFAULT_CONNECT_TIMEOUT};
pub use tcp::TcpTransport;
