//! Request sessions.
//!
//! A [`Session`] talks to one agent over one [`Transport`]. Each call is a
//! single request/response exchange: the request gets a fresh request-id,
//! the response must echo it, and agent-reported errors fail the whole
//! call. Nothing is retried, and a reply that arrives after its request
//! gave up is thrown away before the next request goes out.

mod builder;
mod walk;

pub use builder::*;
pub use walk::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::codec::{CommunityCodec, RequestKind};
use crate::error::{Error, ErrorStatus, RequestErrorKind, Result};
use crate::oid::Oid;
use crate::transport::Transport;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::varbind_list::VarBindList;
use crate::version::Version;

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub version: Version,
    pub community: Bytes,
    /// How long to wait for each response.
    pub timeout: Duration,
    /// Page size for walks that use GETBULK.
    pub max_repetitions: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            community: Bytes::from_static(b"public"),
            timeout: Duration::from_secs(5),
            max_repetitions: 10,
        }
    }
}

/// An SNMPv1/v2c session with one agent.
///
/// Cloning is cheap and clones share the request-id counter. Exchanges on
/// a session and its clones are serialized, so at most one request-id is
/// outstanding at a time.
///
/// ```rust,no_run
/// # use typed_snmp::{oid, Session};
/// # async fn example() -> typed_snmp::Result<()> {
/// let session = Session::v2c("192.168.1.1:161").community(b"public").connect().await?;
/// let result = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await?;
/// for vb in &result {
///     println!("{}", vb);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Session<T: Transport> {
    inner: Arc<SessionInner<T>>,
}

struct SessionInner<T> {
    transport: T,
    codec: CommunityCodec,
    config: SessionConfig,
    next_request_id: AtomicI32,
    exchange: tokio::sync::Mutex<()>,
}

impl<T: Transport> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> Session<T> {
    /// Create a session over an existing transport.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let codec = CommunityCodec::new(config.version, config.community.clone());
        Self {
            inner: Arc::new(SessionInner {
                transport,
                codec,
                config,
                next_request_id: AtomicI32::new(1),
                exchange: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn version(&self) -> Version {
        self.inner.config.version
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// The agent address.
    pub fn peer_addr(&self) -> std::net::SocketAddr {
        self.inner.transport.peer_addr()
    }

    /// Fetch exactly the given OIDs.
    ///
    /// The result has one binding per requested OID, in request order.
    /// Missing objects come back as NOSUCHOBJECT / NOSUCHINSTANCE values on
    /// v2c; on v1 the agent reports `noSuchName` and the call fails.
    pub async fn get(&self, oids: &[Oid]) -> Result<VarBindList> {
        self.request(RequestKind::Get, oids).await
    }

    /// Fetch the lexicographic successor of each OID.
    pub async fn get_next(&self, oids: &[Oid]) -> Result<VarBindList> {
        self.request(RequestKind::GetNext, oids).await
    }

    /// GETBULK (v2c only).
    ///
    /// The first `non_repeaters` OIDs get one successor each; the rest are
    /// repeated up to `max_repetitions` times. The agent may return fewer
    /// bindings than that.
    pub async fn get_bulk(
        &self,
        oids: &[Oid],
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<VarBindList> {
        if !self.version().supports_bulk() {
            return Err(Error::invalid_request(RequestErrorKind::BulkUnsupported(
                self.version(),
            )));
        }
        if non_repeaters < 0 {
            return Err(Error::invalid_request(
                RequestErrorKind::NegativeNonRepeaters(non_repeaters),
            ));
        }
        if max_repetitions < 0 {
            return Err(Error::invalid_request(
                RequestErrorKind::NegativeMaxRepetitions(max_repetitions),
            ));
        }
        self.request(
            RequestKind::GetBulk {
                non_repeaters,
                max_repetitions,
            },
            oids,
        )
        .await
    }

    /// Write each value to its OID in one SetRequest.
    ///
    /// The agent applies all of the values or none of them. On success the
    /// result holds the bindings the agent echoed back, in request order.
    ///
    /// ```rust,no_run
    /// # use typed_snmp::{oid, Session, SnmpType, Value};
    /// # async fn example() -> typed_snmp::Result<()> {
    /// let session = Session::v2c("192.168.1.1").community(b"private").connect().await?;
    /// session
    ///     .set(&[
    ///         (oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::from("rack 12")),
    ///         (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 3), Value::from_text(SnmpType::Integer, "2")?),
    ///     ])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set(&self, bindings: &[(Oid, Value)]) -> Result<VarBindList> {
        if let Some((_, value)) = bindings.iter().find(|(_, value)| value.is_exception()) {
            return Err(Error::invalid_request(RequestErrorKind::ExceptionInSet(
                value.snmp_type(),
            )));
        }
        let oids: Vec<Oid> = bindings.iter().map(|(oid, _)| oid.clone()).collect();
        let codec = &self.inner.codec;
        self.exchange(RequestKind::Set, &oids, |request_id| {
            codec.encode_set(request_id, bindings)
        })
        .await
    }

    /// Walk a subtree with GETNEXT.
    pub fn walk(&self, root: Oid) -> Walk<T> {
        Walk::new(self.clone(), root)
    }

    /// Walk a subtree with GETBULK pages of `max_repetitions`.
    pub fn bulk_walk(&self, root: Oid, max_repetitions: i32) -> BulkWalk<T> {
        BulkWalk::new(self.clone(), root, max_repetitions)
    }

    /// Walk a subtree with the chosen request type.
    ///
    /// [`WalkMode::Auto`] uses GETBULK with the configured page size on
    /// v2c and GETNEXT on v1.
    pub fn walk_with(&self, root: Oid, mode: WalkMode) -> WalkStream<T> {
        let bulk = match mode {
            WalkMode::Auto => self.version().supports_bulk(),
            WalkMode::GetNext => false,
            WalkMode::GetBulk => true,
        };
        if bulk {
            WalkStream::GetBulk(self.bulk_walk(root, self.inner.config.max_repetitions))
        } else {
            WalkStream::GetNext(self.walk(root))
        }
    }

    fn alloc_request_id(&self) -> i32 {
        let previous = self
            .inner
            .next_request_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                Some(if id == i32::MAX { 1 } else { id + 1 })
            });
        // The closure always returns Some.
        match previous {
            Ok(id) | Err(id) => id,
        }
    }

    async fn request(&self, kind: RequestKind, oids: &[Oid]) -> Result<VarBindList> {
        let codec = &self.inner.codec;
        self.exchange(kind, oids, |request_id| {
            codec.encode_request(request_id, kind, oids)
        })
        .await
    }

    /// One request/response round trip. `encode` builds the datagram once
    /// the request-id is known; `oids` are the OIDs it names, in order.
    async fn exchange(
        &self,
        kind: RequestKind,
        oids: &[Oid],
        encode: impl FnOnce(i32) -> Bytes,
    ) -> Result<VarBindList> {
        if oids.is_empty() {
            return Err(Error::invalid_request(RequestErrorKind::EmptyOidList));
        }

        let inner = &*self.inner;
        let target = inner.transport.peer_addr();
        let _exchange = inner.exchange.lock().await;

        let stale = inner.transport.discard_pending();
        if stale > 0 {
            tracing::debug!(
                snmp.target = %target,
                discarded = stale,
                "dropped late responses"
            );
        }

        let request_id = self.alloc_request_id();
        let data = encode(request_id);

        tracing::debug!(
            snmp.target = %target,
            snmp.request_id = request_id,
            snmp.pdu_type = %kind.pdu_type(),
            snmp.varbind_count = oids.len(),
            snmp.bytes = data.len(),
            "sending request"
        );

        let start = Instant::now();
        inner.transport.send(&data).await?;
        let (response, source) = inner
            .transport
            .recv(request_id, inner.config.timeout)
            .await?;

        if source != target {
            tracing::warn!(
                snmp.target = %target,
                snmp.source = %source,
                "response source address mismatch"
            );
        }

        let decoded = inner.codec.decode_response(response)?;

        if decoded.request_id != request_id {
            tracing::warn!(
                snmp.target = %target,
                snmp.request_id = request_id,
                snmp.response_request_id = decoded.request_id,
                "discarding response with mismatched request id"
            );
            return Err(Error::RequestIdMismatch {
                expected: request_id,
                actual: decoded.request_id,
            });
        }

        let status = decoded.status();
        if status != ErrorStatus::NoError {
            let index = u32::try_from(decoded.error_index).unwrap_or(0);
            let oid = index
                .checked_sub(1)
                .and_then(|i| oids.get(i as usize))
                .cloned();
            tracing::debug!(
                snmp.target = %target,
                snmp.request_id = request_id,
                snmp.error_status = %status,
                snmp.error_index = decoded.error_index,
                "agent reported error"
            );
            return Err(Error::Snmp {
                target: Some(target),
                status,
                index,
                oid,
            });
        }

        if kind.one_binding_per_oid() && decoded.bindings.len() != oids.len() {
            return Err(Error::VarbindCountMismatch {
                expected: oids.len(),
                actual: decoded.bindings.len(),
            });
        }

        if kind.echoes_oids() {
            let foreign = oids
                .iter()
                .zip(&decoded.bindings)
                .position(|(expected, binding)| *expected != binding.oid);
            if let Some(i) = foreign {
                return Err(Error::ResponseOidMismatch {
                    index: i + 1,
                    expected: oids[i].clone(),
                    actual: decoded.bindings[i].oid.clone(),
                });
            }
        }

        tracing::debug!(
            snmp.target = %target,
            snmp.request_id = request_id,
            snmp.varbind_count = decoded.bindings.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "response received"
        );

        Ok(decoded.bindings.into_iter().map(VarBind::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::pdu::PduType;
    use crate::transport::{MockTransport, ResponseBuilder};
    use crate::typed::{NativeValue, SnmpType};
    use crate::value::Value;

    fn mock_session(mock: MockTransport, version: Version) -> Session<MockTransport> {
        let config = SessionConfig {
            version,
            timeout: Duration::from_millis(100),
            ..SessionConfig::default()
        };
        Session::new(mock, config)
    }

    fn mock() -> MockTransport {
        MockTransport::new("127.0.0.1:161".parse().unwrap())
    }

    #[tokio::test]
    async fn test_get_returns_bindings_in_request_order() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("edge-rtr"))
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(4200))
                .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(4))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock.clone(), Version::V2c);

        let oids = [
            oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
            oid!(1, 3, 6, 1, 2, 1, 1, 3, 0),
            oid!(1, 3, 6, 1, 2, 1, 2, 1, 0),
        ];
        let result = session.get(&oids).await.unwrap();

        assert_eq!(result.oids().cloned().collect::<Vec<_>>(), oids);
        assert_eq!(result[0].value().raw(), "edge-rtr");
        assert_eq!(result[1].value().snmp_type(), SnmpType::Ticks);
        assert_eq!(
            result[2].value().native_value().unwrap(),
            NativeValue::Signed(4)
        );

        let request = mock.last_request().unwrap();
        assert_eq!(request.pdu.pdu_type, PduType::GetRequest);
        assert_eq!(request.pdu.request_id, 1);
        assert_eq!(request.pdu.bindings.len(), 3);
    }

    #[tokio::test]
    async fn test_request_ids_increase() {
        let mock = mock();
        for id in 1..=3 {
            mock.queue_response(
                ResponseBuilder::new(id)
                    .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("x"))
                    .build_v2c(b"public"),
            );
        }
        let session = mock_session(mock.clone(), Version::V2c);
        for _ in 0..3 {
            session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await.unwrap();
        }
        assert_eq!(mock.sent_requests().len(), 3);
        assert_eq!(mock.last_request().unwrap().pdu.request_id, 3);
    }

    #[test]
    fn test_request_id_wraps_to_one() {
        let session = mock_session(mock(), Version::V2c);
        session
            .inner
            .next_request_id
            .store(i32::MAX, Ordering::Relaxed);
        assert_eq!(session.alloc_request_id(), i32::MAX);
        assert_eq!(session.alloc_request_id(), 1);
        assert_eq!(session.alloc_request_id(), 2);
    }

    #[tokio::test]
    async fn test_mismatched_request_id_is_rejected() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(99)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("stale"))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let err = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::RequestIdMismatch {
                expected: 1,
                actual: 99
            }
        ));
    }

    #[tokio::test]
    async fn test_error_status_fails_whole_call() {
        let mock = mock();
        let oids = [
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
            oid!(1, 3, 6, 1, 2, 1, 1, 99, 0),
            oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
        ];
        mock.queue_response(
            ResponseBuilder::new(1)
                .error_status(ErrorStatus::NoSuchName)
                .error_index(1)
                .varbind(oids[0].clone(), Value::Null)
                .varbind(oids[1].clone(), Value::Null)
                .varbind(oids[2].clone(), Value::Null)
                .build_v1(b"public"),
        );
        let session = mock_session(mock, Version::V1);

        let err = session.get(&oids).await.unwrap_err();
        match err {
            Error::Snmp {
                status, index, oid, ..
            } => {
                assert_eq!(status, ErrorStatus::NoSuchName);
                assert_eq!(status.as_i32(), 2);
                assert_eq!(index, 1);
                assert_eq!(oid, Some(oids[0].clone()));
            }
            other => panic!("expected SNMP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exception_values_are_not_errors() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("ok"))
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 99, 0), Value::NoSuchObject)
                .build_v2c(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let result = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), oid!(1, 3, 6, 1, 2, 1, 1, 99, 0)])
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[1].value().is_exception());
    }

    #[tokio::test]
    async fn test_varbind_count_mismatch() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("only one"))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let err = session
            .get_next(&[oid!(1, 3, 6, 1, 2, 1, 1, 1), oid!(1, 3, 6, 1, 2, 1, 1, 5)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::VarbindCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_get_rejects_foreign_oid() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 4, 1, 9, 9), Value::from("elsewhere"))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let err = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)])
            .await
            .unwrap_err();
        match err {
            Error::ResponseOidMismatch {
                index,
                expected,
                actual,
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected, oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
                assert_eq!(actual, oid!(1, 3, 6, 1, 4, 1, 9, 9));
            }
            other => panic!("expected OID mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_rejects_reordered_bindings() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(5))
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("sw"))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let err = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseOidMismatch { index: 1, .. }));
    }

    #[tokio::test]
    async fn test_late_reply_is_dropped_before_next_request() {
        let mock = mock();
        mock.queue_timeout();
        let session = mock_session(mock.clone(), Version::V2c);

        let err = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { request_id: 1, .. }));

        // The answer to request 1 shows up after the caller gave up.
        mock.queue_late_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("old"))
                .build_v2c(b"public"),
        );
        mock.queue_response(
            ResponseBuilder::new(2)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("new"))
                .build_v2c(b"public"),
        );

        let result = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)]).await.unwrap();
        assert_eq!(result[0].value().raw(), "new");
        assert_eq!(mock.discard_pending(), 0);
    }

    #[tokio::test]
    async fn test_set_sends_values_and_returns_echo() {
        let mock = mock();
        let sys_location = oid!(1, 3, 6, 1, 2, 1, 1, 6, 0);
        let if_admin_status = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 3);
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(sys_location.clone(), Value::from("rack 12"))
                .varbind(if_admin_status.clone(), Value::Integer(2))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock.clone(), Version::V2c);

        let result = session
            .set(&[
                (sys_location.clone(), Value::from("rack 12")),
                (if_admin_status.clone(), Value::Integer(2)),
            ])
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value().raw(), "rack 12");
        assert_eq!(
            result[1].value().native_value().unwrap(),
            NativeValue::Signed(2)
        );

        let request = mock.last_request().unwrap();
        assert_eq!(request.pdu.pdu_type, PduType::SetRequest);
        assert_eq!(request.pdu.bindings[0].value, Value::from("rack 12"));
        assert_eq!(request.pdu.bindings[1].value, Value::Integer(2));
    }

    #[tokio::test]
    async fn test_set_error_names_offending_oid() {
        let mock = mock();
        let oids = [oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)];
        mock.queue_response(
            ResponseBuilder::new(1)
                .error_status(ErrorStatus::NotWritable)
                .error_index(2)
                .varbind(oids[0].clone(), Value::from("lab"))
                .varbind(oids[1].clone(), Value::TimeTicks(0))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let err = session
            .set(&[
                (oids[0].clone(), Value::from("lab")),
                (oids[1].clone(), Value::TimeTicks(0)),
            ])
            .await
            .unwrap_err();
        match err {
            Error::Snmp {
                status, index, oid, ..
            } => {
                assert_eq!(status, ErrorStatus::NotWritable);
                assert_eq!(index, 2);
                assert_eq!(oid, Some(oids[1].clone()));
            }
            other => panic!("expected SNMP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_set_rejects_exception_values() {
        let mock = mock();
        let session = mock_session(mock.clone(), Version::V2c);

        let err = session
            .set(&[(oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::NoSuchInstance)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRequest {
                kind: RequestErrorKind::ExceptionInSet(SnmpType::NoSuchInstance)
            }
        ));
        assert!(matches!(
            session.set(&[]).await,
            Err(Error::InvalidRequest {
                kind: RequestErrorKind::EmptyOidList
            })
        ));
        assert!(mock.sent_requests().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_surfaced() {
        let mock = mock();
        mock.queue_timeout();
        let session = mock_session(mock, Version::V2c);

        let err = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { request_id: 1, .. }));
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("v1 reply"))
                .build_v1(b"public"),
        );
        let session = mock_session(mock, Version::V2c);

        let err = session
            .get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_request_validation() {
        let mock = mock();
        let v2 = mock_session(mock.clone(), Version::V2c);
        let v1 = mock_session(mock.clone(), Version::V1);

        assert!(matches!(
            v2.get(&[]).await,
            Err(Error::InvalidRequest {
                kind: RequestErrorKind::EmptyOidList
            })
        ));
        assert!(matches!(
            v2.get_bulk(&[oid!(1, 3, 6, 1)], -1, 10).await,
            Err(Error::InvalidRequest {
                kind: RequestErrorKind::NegativeNonRepeaters(-1)
            })
        ));
        assert!(matches!(
            v2.get_bulk(&[oid!(1, 3, 6, 1)], 0, -5).await,
            Err(Error::InvalidRequest {
                kind: RequestErrorKind::NegativeMaxRepetitions(-5)
            })
        ));
        assert!(matches!(
            v1.get_bulk(&[oid!(1, 3, 6, 1)], 0, 10).await,
            Err(Error::InvalidRequest {
                kind: RequestErrorKind::BulkUnsupported(Version::V1)
            })
        ));
        assert!(mock.sent_requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_bulk_sends_parameters() {
        let mock = mock();
        mock.queue_response(
            ResponseBuilder::new(1)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(1))
                .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo"))
                .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 2), Value::from("eth0"))
                .build_v2c(b"public"),
        );
        let session = mock_session(mock.clone(), Version::V2c);

        let result = session
            .get_bulk(
                &[oid!(1, 3, 6, 1, 2, 1, 1, 3), oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)],
                1,
                2,
            )
            .await
            .unwrap();
        assert_eq!(result.len(), 3);

        let request = mock.last_request().unwrap();
        assert_eq!(request.pdu.pdu_type, PduType::GetBulkRequest);
        assert_eq!(request.pdu.non_repeaters(), 1);
        assert_eq!(request.pdu.max_repetitions(), 2);
    }
}
