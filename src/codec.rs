//! Request encoding and response decoding for one community session.
//!
//! The codec is the boundary between wire values and typed bindings:
//! requests go out as BER, responses come back as
//! `(oid, type, text)` triples ready to become [`VarBind`](crate::VarBind)s.

use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{Binding, Pdu, PduType};
use crate::typed::SnmpType;
use crate::value::Value;
use crate::version::Version;
use bytes::Bytes;

/// Which request to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Get,
    GetNext,
    GetBulk {
        non_repeaters: i32,
        max_repetitions: i32,
    },
    Set,
}

impl RequestKind {
    pub fn pdu_type(self) -> PduType {
        match self {
            RequestKind::Get => PduType::GetRequest,
            RequestKind::GetNext => PduType::GetNextRequest,
            RequestKind::GetBulk { .. } => PduType::GetBulkRequest,
            RequestKind::Set => PduType::SetRequest,
        }
    }

    /// Whether the response must name the request OIDs one-for-one.
    pub fn echoes_oids(self) -> bool {
        match self {
            RequestKind::Get | RequestKind::Set => true,
            RequestKind::GetNext | RequestKind::GetBulk { .. } => false,
        }
    }

    /// Whether the response must carry one binding per request OID.
    pub fn one_binding_per_oid(self) -> bool {
        match self {
            RequestKind::Get | RequestKind::GetNext | RequestKind::Set => true,
            RequestKind::GetBulk { .. } => false,
        }
    }
}

/// One decoded binding: the OID, its abstract type and its rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBinding {
    pub oid: Oid,
    pub snmp_type: SnmpType,
    pub raw: String,
}

/// The parts of a Response PDU a session needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResponse {
    pub request_id: i32,
    pub error_status: i32,
    pub error_index: i32,
    pub bindings: Vec<RawBinding>,
}

impl DecodedResponse {
    pub fn status(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }
}

/// Encoder/decoder bound to a version and community.
#[derive(Debug, Clone)]
pub struct CommunityCodec {
    version: Version,
    community: Bytes,
}

impl CommunityCodec {
    pub fn new(version: Version, community: impl Into<Bytes>) -> Self {
        Self {
            version,
            community: community.into(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn community(&self) -> &[u8] {
        &self.community
    }

    /// Encode a complete request message.
    ///
    /// Every OID goes out with a NULL value, so a [`RequestKind::Set`] built
    /// here writes NULLs; use [`encode_set`](Self::encode_set) for real values.
    pub fn encode_request(&self, request_id: i32, kind: RequestKind, oids: &[Oid]) -> Bytes {
        let pdu = match kind {
            RequestKind::Set => {
                Pdu::set_request(request_id, oids.iter().cloned().map(Binding::null).collect())
            }
            RequestKind::Get => Pdu::get_request(request_id, oids),
            RequestKind::GetNext => Pdu::get_next_request(request_id, oids),
            RequestKind::GetBulk {
                non_repeaters,
                max_repetitions,
            } => Pdu::get_bulk(request_id, non_repeaters, max_repetitions, oids),
        };
        CommunityMessage::new(self.version, self.community.clone(), pdu).encode()
    }

    /// Encode a SetRequest writing each value to its OID.
    pub fn encode_set(&self, request_id: i32, bindings: &[(Oid, Value)]) -> Bytes {
        let bindings = bindings
            .iter()
            .map(|(oid, value)| Binding::new(oid.clone(), value.clone()))
            .collect();
        let pdu = Pdu::set_request(request_id, bindings);
        CommunityMessage::new(self.version, self.community.clone(), pdu).encode()
    }

    /// Decode a response message.
    ///
    /// Fails if the message is of another version or does not carry a
    /// Response PDU. The community is not checked; agents answer with the
    /// one they were sent.
    pub fn decode_response(&self, data: Bytes) -> Result<DecodedResponse> {
        let msg = CommunityMessage::decode(data)?;

        if msg.version != self.version {
            return Err(Error::VersionMismatch {
                expected: self.version,
                actual: msg.version,
            });
        }

        if msg.pdu.pdu_type != PduType::Response {
            return Err(Error::decode(
                0,
                DecodeErrorKind::UnexpectedPduType(msg.pdu.pdu_type.tag()),
            ));
        }

        let Pdu {
            request_id,
            error_status,
            error_index,
            bindings,
            ..
        } = msg.pdu;

        Ok(DecodedResponse {
            request_id,
            error_status,
            error_index,
            bindings: bindings
                .into_iter()
                .map(|b| RawBinding {
                    snmp_type: b.value.snmp_type(),
                    raw: b.value.to_string(),
                    oid: b.oid,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn response(version: Version, pdu: Pdu) -> Bytes {
        CommunityMessage::new(version, "public", pdu).encode()
    }

    #[test]
    fn test_encode_request_kinds() {
        let codec = CommunityCodec::new(Version::V2c, "public");
        let oids = [oid!(1, 3, 6, 1, 2, 1, 1)];

        let bytes = codec.encode_request(
            5,
            RequestKind::GetBulk {
                non_repeaters: 0,
                max_repetitions: 10,
            },
            &oids,
        );
        let msg = CommunityMessage::decode(bytes).unwrap();
        assert_eq!(msg.version, Version::V2c);
        assert_eq!(&msg.community[..], b"public");
        assert_eq!(msg.pdu.pdu_type, PduType::GetBulkRequest);
        assert_eq!(msg.pdu.request_id, 5);
        assert_eq!(msg.pdu.max_repetitions(), 10);
        assert_eq!(msg.pdu.bindings, vec![Binding::null(oids[0].clone())]);
    }

    #[test]
    fn test_encode_set_keeps_values() {
        let codec = CommunityCodec::new(Version::V1, "private");
        let bytes = codec.encode_set(
            11,
            &[
                (oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::from("rack 4")),
                (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 2), Value::Integer(2)),
            ],
        );
        let msg = CommunityMessage::decode(bytes).unwrap();
        assert_eq!(msg.version, Version::V1);
        assert_eq!(&msg.community[..], b"private");
        assert_eq!(msg.pdu.pdu_type, PduType::SetRequest);
        assert_eq!(msg.pdu.request_id, 11);
        assert_eq!(
            msg.pdu.bindings,
            vec![
                Binding::new(oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::from("rack 4")),
                Binding::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 2), Value::Integer(2)),
            ]
        );
    }

    #[test]
    fn test_decode_response_renders_values() {
        let codec = CommunityCodec::new(Version::V2c, "public");
        let data = response(
            Version::V2c,
            Pdu::response(
                3,
                ErrorStatus::NoError,
                0,
                vec![
                    Binding::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1")),
                    Binding::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 1), Value::Counter32(77)),
                    Binding::new(oid!(1, 3, 6, 1, 2, 1, 1, 9, 0), Value::NoSuchObject),
                ],
            ),
        );

        let decoded = codec.decode_response(data).unwrap();
        assert_eq!(decoded.request_id, 3);
        assert_eq!(decoded.status(), ErrorStatus::NoError);
        let triples: Vec<(SnmpType, &str)> = decoded
            .bindings
            .iter()
            .map(|b| (b.snmp_type, b.raw.as_str()))
            .collect();
        assert_eq!(
            triples,
            [
                (SnmpType::OctetStr, "core-sw1"),
                (SnmpType::Counter, "77"),
                (SnmpType::NoSuchObject, "NOSUCHOBJECT"),
            ]
        );
    }

    #[test]
    fn test_decode_response_version_mismatch() {
        let codec = CommunityCodec::new(Version::V2c, "public");
        let data = response(Version::V1, Pdu::response(1, ErrorStatus::NoError, 0, vec![]));
        assert!(matches!(
            codec.decode_response(data),
            Err(Error::VersionMismatch {
                expected: Version::V2c,
                actual: Version::V1
            })
        ));
    }

    #[test]
    fn test_decode_response_rejects_request_pdu() {
        let codec = CommunityCodec::new(Version::V1, "public");
        let data = response(Version::V1, Pdu::get_request(1, &[oid!(1, 3)]));
        assert!(matches!(
            codec.decode_response(data),
            Err(Error::Decode {
                kind: DecodeErrorKind::UnexpectedPduType(0xA0),
                ..
            })
        ));
    }
}
