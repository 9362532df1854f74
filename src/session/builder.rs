//! Session builders.
//!
//! # Entry Points
//!
//! - [`Session::v1()`] - SNMPv1 with community string
//! - [`Session::v2c()`] - SNMPv2c with community string
//!
//! ```rust,no_run
//! # use typed_snmp::Session;
//! # use std::time::Duration;
//! # async fn example() -> typed_snmp::Result<()> {
//! let session = Session::v2c("192.168.1.1:161")
//!     .community(b"public")
//!     .timeout(Duration::from_secs(2))
//!     .max_repetitions(25)
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::transport::{Transport, UdpTransport};
use crate::version::Version;

use super::{Session, SessionConfig};

/// Agent port used when the target names none.
pub const DEFAULT_PORT: u16 = 161;

struct BaseConfig {
    target: String,
    community: Bytes,
    timeout: Duration,
    max_repetitions: i32,
}

impl BaseConfig {
    fn new(target: impl Into<String>) -> Self {
        let defaults = SessionConfig::default();
        Self {
            target: target.into(),
            community: defaults.community,
            timeout: defaults.timeout,
            max_repetitions: defaults.max_repetitions,
        }
    }

    fn resolve_target(&self) -> Result<SocketAddr> {
        resolve_target(&self.target)
    }

    fn into_config(self, version: Version) -> SessionConfig {
        SessionConfig {
            version,
            community: self.community,
            timeout: self.timeout,
            max_repetitions: self.max_repetitions,
        }
    }
}

/// Resolve `host`, `host:port`, `a.b.c.d:port` or `[v6]:port`.
///
/// Targets without a port get [`DEFAULT_PORT`].
pub fn resolve_target(target: &str) -> Result<SocketAddr> {
    let io_err = |source| Error::Io {
        target: None,
        source,
    };

    // A bare IPv6 address would otherwise split at its last colon.
    let bare = target.trim_matches(|c| c == '[' || c == ']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    let mut addrs = match target.to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(_) => (target, DEFAULT_PORT).to_socket_addrs().map_err(io_err)?,
    };

    addrs.next().ok_or_else(|| {
        io_err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("could not resolve address '{target}'"),
        ))
    })
}

macro_rules! impl_builder {
    ($builder:ident, $version:expr) => {
        impl $builder {
            pub(crate) fn new(target: impl Into<String>) -> Self {
                Self {
                    base: BaseConfig::new(target),
                }
            }

            /// Set the community string.
            pub fn community(mut self, community: &[u8]) -> Self {
                self.base.community = Bytes::copy_from_slice(community);
                self
            }

            /// Set the response timeout.
            pub fn timeout(mut self, timeout: Duration) -> Self {
                self.base.timeout = timeout;
                self
            }

            /// Set the GETBULK page size used by
            /// [`walk_with`](Session::walk_with) in auto mode.
            pub fn max_repetitions(mut self, max_repetitions: i32) -> Self {
                self.base.max_repetitions = max_repetitions;
                self
            }

            /// Resolve the target, bind a UDP socket and create the session.
            pub async fn connect(self) -> Result<Session<UdpTransport>> {
                let addr = self.base.resolve_target()?;
                let transport = UdpTransport::connect(addr).await?;
                Ok(self.build(transport))
            }

            /// Create the session over a pre-supplied transport.
            pub fn build<T: Transport>(self, transport: T) -> Session<T> {
                Session::new(transport, self.base.into_config($version))
            }
        }
    };
}

/// Builder for SNMPv1 sessions.
///
/// Created via [`Session::v1()`].
pub struct V1SessionBuilder {
    base: BaseConfig,
}

impl_builder!(V1SessionBuilder, Version::V1);

/// Builder for SNMPv2c sessions.
///
/// Created via [`Session::v2c()`].
pub struct V2cSessionBuilder {
    base: BaseConfig,
}

impl_builder!(V2cSessionBuilder, Version::V2c);

impl Session<UdpTransport> {
    /// Create an SNMPv1 session builder.
    pub fn v1(target: impl Into<String>) -> V1SessionBuilder {
        V1SessionBuilder::new(target)
    }

    /// Create an SNMPv2c session builder.
    pub fn v2c(target: impl Into<String>) -> V2cSessionBuilder {
        V2cSessionBuilder::new(target)
    }
}
