//! Connected UDP transport.

use super::Transport;
use crate::error::{Error, Result};
use crate::util::bind_udp_socket;
use bytes::Bytes;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Largest datagram accepted.
const MAX_DATAGRAM: usize = 65_535;

/// UDP socket connected to one agent.
///
/// The socket is bound to an ephemeral port and connected, so the kernel
/// drops datagrams from any other source.
#[derive(Clone)]
pub struct UdpTransport {
    inner: Arc<UdpTransportInner>,
}

struct UdpTransportInner {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local port and connect it to `target`.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        let bind_addr = if target.is_ipv6() {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        };

        let io_err = |source| Error::Io {
            target: Some(target),
            source,
        };

        let socket = bind_udp_socket(bind_addr).map_err(io_err)?;
        socket.connect(target).await.map_err(io_err)?;
        let local_addr = socket.local_addr().map_err(io_err)?;

        tracing::debug!(
            snmp.target = %target,
            snmp.local_addr = %local_addr,
            "UDP transport connected"
        );

        Ok(Self {
            inner: Arc::new(UdpTransportInner {
                socket,
                target,
                local_addr,
            }),
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            snmp.target = %self.inner.target,
            snmp.bytes = data.len(),
            "UDP send"
        );
        self.inner
            .socket
            .send(data)
            .await
            .map_err(|e| Error::Io {
                target: Some(self.inner.target),
                source: e,
            })?;
        Ok(())
    }

    async fn recv(&self, request_id: i32, timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        tracing::trace!(
            snmp.target = %self.inner.target,
            snmp.request_id = request_id,
            snmp.timeout_ms = timeout.as_millis() as u64,
            "UDP recv waiting"
        );

        let mut buf = vec![0u8; MAX_DATAGRAM];
        match tokio::time::timeout(timeout, self.inner.socket.recv_from(&mut buf)).await {
            Ok(Ok((len, source))) => {
                tracing::trace!(
                    snmp.target = %self.inner.target,
                    snmp.source = %source,
                    snmp.bytes = len,
                    "UDP recv complete"
                );
                buf.truncate(len);
                Ok((Bytes::from(buf), source))
            }
            Ok(Err(e)) => Err(Error::Io {
                target: Some(self.inner.target),
                source: e,
            }),
            Err(_) => {
                tracing::trace!(
                    snmp.target = %self.inner.target,
                    snmp.request_id = request_id,
                    "UDP recv timeout"
                );
                Err(Error::Timeout {
                    target: Some(self.inner.target),
                    elapsed: timeout,
                    request_id,
                })
            }
        }
    }

    fn discard_pending(&self) -> usize {
        // A short read truncates; the rest of the datagram is dropped with it.
        let mut scratch = [0u8; 64];
        let mut dropped = 0;
        loop {
            match self.inner.socket.try_recv(&mut scratch) {
                Ok(_) => {
                    dropped += 1;
                    tracing::debug!(
                        snmp.target = %self.inner.target,
                        "discarding stale datagram"
                    );
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return dropped,
                Err(e) => {
                    // An ICMP error left over from an earlier send; reading it clears it.
                    tracing::trace!(
                        snmp.target = %self.inner.target,
                        error = %e,
                        "stale socket error"
                    );
                    return dropped;
                }
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }
}
