//! Transport layer abstraction.
//!
//! A session only needs to send one datagram and wait for one reply, so
//! [`Transport`] is that and nothing more. Retransmission is left to the
//! caller.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Client-side transport to a single agent.
///
/// # Clone Requirement
///
/// Walk streams own a clone of the session and therefore of the transport.
/// Implementations keep their state behind an `Arc`, so cloning is cheap.
pub trait Transport: Send + Sync + Clone + 'static {
    /// Send one encoded request.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait for one datagram.
    ///
    /// `request_id` is only used for logging and for the
    /// [`Error::Timeout`](crate::Error::Timeout) this returns when nothing
    /// arrives within `timeout`. Returns the data and its source address.
    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    /// Throw away datagrams that arrived after their request gave up.
    ///
    /// Called before each send so a late reply cannot be read as the answer
    /// to the next request. Returns how many were dropped.
    fn discard_pending(&self) -> usize {
        0
    }

    /// The agent address requests go to.
    fn peer_addr(&self) -> SocketAddr;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}
