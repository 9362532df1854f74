//! Scripted transport for tests.
//!
//! Responses are queued up front and handed out one per `recv`. Every
//! datagram the session sends is recorded for inspection.

use super::Transport;
use crate::error::{Error, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{Binding, Pdu};
use crate::value::Value;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

enum Scripted {
    Response(Bytes),
    Timeout,
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    /// Already "arrived" before the next send.
    late: VecDeque<Bytes>,
    sent: Vec<Bytes>,
}

/// In-memory transport that replays queued responses.
///
/// When the queue is empty, `recv` times out.
#[derive(Clone)]
pub struct MockTransport {
    target: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            target,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue an encoded response.
    pub fn queue_response(&self, data: Bytes) {
        self.state().queue.push_back(Scripted::Response(data));
    }

    /// Leave a datagram waiting as if it arrived after its request timed
    /// out. It is read before any queued response unless discarded first.
    pub fn queue_late_response(&self, data: Bytes) {
        self.state().late.push_back(data);
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        self.state().queue.push_back(Scripted::Timeout);
    }

    /// Every datagram sent so far, oldest first.
    pub fn sent_requests(&self) -> Vec<Bytes> {
        self.state().sent.clone()
    }

    /// The most recent request, decoded.
    pub fn last_request(&self) -> Option<CommunityMessage> {
        let last = self.state().sent.last().cloned()?;
        CommunityMessage::decode(last).ok()
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        self.state().sent.push(Bytes::copy_from_slice(data));
        Ok(())
    }

    async fn recv(&self, request_id: i32, timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let next = {
            let mut state = self.state();
            match state.late.pop_front() {
                Some(data) => Some(Scripted::Response(data)),
                None => state.queue.pop_front(),
            }
        };
        match next {
            Some(Scripted::Response(data)) => Ok((data, self.target)),
            Some(Scripted::Timeout) | None => Err(Error::Timeout {
                target: Some(self.target),
                elapsed: timeout,
                request_id,
            }),
        }
    }

    fn discard_pending(&self) -> usize {
        let mut state = self.state();
        let dropped = state.late.len();
        state.late.clear();
        dropped
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }
}

/// Builds encoded Response messages.
pub struct ResponseBuilder {
    request_id: i32,
    error_status: ErrorStatus,
    error_index: i32,
    bindings: Vec<Binding>,
}

impl ResponseBuilder {
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            error_status: ErrorStatus::NoError,
            error_index: 0,
            bindings: Vec::new(),
        }
    }

    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.bindings.push(Binding::new(oid, value));
        self
    }

    pub fn error_status(mut self, status: ErrorStatus) -> Self {
        self.error_status = status;
        self
    }

    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(Version::V1, community)
    }

    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(Version::V2c, community)
    }

    fn build(self, version: Version, community: &[u8]) -> Bytes {
        let pdu = Pdu::response(
            self.request_id,
            self.error_status,
            self.error_index,
            self.bindings,
        );
        CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu).encode()
    }
}
