//! Error types for typed-snmp.
//!
//! Per-binding exception values (`noSuchObject`, `noSuchInstance`,
//! `endOfMibView`) are *not* errors. They arrive as ordinary
//! [`TypedValue`](crate::TypedValue)s and callers branch on them.

use std::net::SocketAddr;
use std::time::Duration;

use crate::typed::SnmpType;

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Why a datagram failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnexpectedTag { expected: u8, actual: u8 },
    /// Ran out of input mid-element.
    TruncatedData,
    IndefiniteLength,
    /// INTEGER wider than the target type.
    IntegerOverflow,
    ZeroLengthInteger,
    InvalidOidEncoding,
    OidTooLong { count: usize, max: usize },
    /// Version field other than 0 or 1.
    UnknownVersion(i32),
    UnknownPduType(u8),
    /// A well-formed PDU that is not a Response.
    UnexpectedPduType(u8),
    ConstructedOctetString,
    InvalidNull,
    /// IpAddress content not exactly 4 octets.
    InvalidIpAddressLength { length: usize },
    LengthTooLong { octets: usize },
    LengthExceedsMax { length: usize, max: usize },
    /// Counter64 content longer than 9 octets.
    Integer64TooLong { length: usize },
    /// Bytes left over after the outer SEQUENCE.
    TrailingData { length: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::UnexpectedPduType(t) => write!(f, "unexpected PDU type: 0x{:02X}", t),
            Self::ConstructedOctetString => {
                write!(f, "constructed OCTET STRING (0x24) not supported")
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::Integer64TooLong { length } => {
                write!(f, "integer64 too long: {} bytes", length)
            }
            Self::TrailingData { length } => {
                write!(f, "{} trailing bytes after message", length)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Invalid arc value.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// Why a value's text could not be converted to its native form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// Text was empty.
    Empty,
    /// Text contained something other than an optional sign and decimal digits.
    InvalidDigit,
    /// Number does not fit the target type.
    Overflow,
    /// Text is not a dotted-quad IPv4 address.
    InvalidAddress,
    /// The type has no settable wire form.
    NotSettable,
}

impl From<&std::num::IntErrorKind> for ConversionErrorKind {
    fn from(kind: &std::num::IntErrorKind) -> Self {
        use std::num::IntErrorKind;
        match kind {
            IntErrorKind::Empty => Self::Empty,
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Self::Overflow,
            _ => Self::InvalidDigit,
        }
    }
}

impl std::fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty value"),
            Self::InvalidDigit => write!(f, "not a decimal integer"),
            Self::Overflow => write!(f, "integer out of range"),
            Self::InvalidAddress => write!(f, "not an IPv4 address"),
            Self::NotSettable => write!(f, "type cannot be sent in a SET"),
        }
    }
}

/// Request validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// No OIDs were supplied.
    EmptyOidList,
    /// GETBULK non-repeaters was negative.
    NegativeNonRepeaters(i32),
    /// GETBULK max-repetitions was negative.
    NegativeMaxRepetitions(i32),
    /// GETBULK was requested on an SNMPv1 session.
    BulkUnsupported(crate::version::Version),
    /// SET carried an exception value.
    ExceptionInSet(SnmpType),
}

impl std::fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOidList => write!(f, "at least one OID is required"),
            Self::NegativeNonRepeaters(n) => {
                write!(f, "non-repeaters must be >= 0, got {}", n)
            }
            Self::NegativeMaxRepetitions(n) => {
                write!(f, "max-repetitions must be >= 0, got {}", n)
            }
            Self::BulkUnsupported(v) => write!(f, "GETBULK is not supported by {}", v),
            Self::ExceptionInSet(t) => write!(f, "{} cannot be set", t),
        }
    }
}

macro_rules! error_statuses {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// PDU error-status (RFC 3416 section 3).
        ///
        /// Codes outside 0..=18 are kept as [`ErrorStatus::Unknown`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum ErrorStatus {
            $($variant,)*
            Unknown(i32),
        }

        impl ErrorStatus {
            pub fn from_i32(value: i32) -> Self {
                match value {
                    $($code => Self::$variant,)*
                    other => Self::Unknown(other),
                }
            }

            pub fn as_i32(&self) -> i32 {
                match self {
                    $(Self::$variant => $code,)*
                    Self::Unknown(code) => *code,
                }
            }

            /// The RFC name, e.g. `noSuchName`.
            pub fn name(&self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some($name),)*
                    Self::Unknown(_) => None,
                }
            }
        }
    };
}

error_statuses! {
    NoError = 0 => "noError",
    TooBig = 1 => "tooBig",
    NoSuchName = 2 => "noSuchName",
    BadValue = 3 => "badValue",
    ReadOnly = 4 => "readOnly",
    GenErr = 5 => "genErr",
    NoAccess = 6 => "noAccess",
    WrongType = 7 => "wrongType",
    WrongLength = 8 => "wrongLength",
    WrongEncoding = 9 => "wrongEncoding",
    WrongValue = 10 => "wrongValue",
    NoCreation = 11 => "noCreation",
    InconsistentValue = 12 => "inconsistentValue",
    ResourceUnavailable = 13 => "resourceUnavailable",
    CommitFailed = 14 => "commitFailed",
    UndoFailed = 15 => "undoFailed",
    AuthorizationError = 16 => "authorizationError",
    NotWritable = 17 => "notWritable",
    InconsistentName = 18 => "inconsistentName",
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown({})", self.as_i32()),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during communication.
    #[error("I/O error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// No response arrived within the configured timeout.
    #[error("timeout after {elapsed:?}{} (request_id={request_id})", target.map(|t| format!(" waiting for {}", t)).unwrap_or_default())]
    Timeout {
        target: Option<SocketAddr>,
        elapsed: Duration,
        request_id: i32,
    },

    /// SNMP protocol error returned by agent.
    ///
    /// `index` is the 1-based position in the request (0 when the agent did
    /// not blame a specific binding); `oid` is the request OID at that position.
    #[error("SNMP error{}: {status} at index {index}{}", target.map(|t| format!(" from {}", t)).unwrap_or_default(), oid.as_ref().map(|o| format!(" ({})", o)).unwrap_or_default())]
    Snmp {
        target: Option<SocketAddr>,
        status: ErrorStatus,
        index: u32,
        oid: Option<crate::oid::Oid>,
    },

    /// Invalid OID format.
    #[error("invalid OID{}: {kind}", input.as_ref().map(|i| format!(" '{}'", i)).unwrap_or_default())]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// BER decoding error.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// Value text could not be converted for its type.
    #[error("cannot convert {snmp_type} value '{input}': {kind}")]
    Conversion {
        snmp_type: SnmpType,
        input: Box<str>,
        kind: ConversionErrorKind,
    },

    /// Request rejected before anything was sent.
    #[error("invalid request: {kind}")]
    InvalidRequest { kind: RequestErrorKind },

    /// Response request ID doesn't match.
    #[error("request ID mismatch: expected {expected}, got {actual}")]
    RequestIdMismatch { expected: i32, actual: i32 },

    /// Response version doesn't match request.
    #[error("version mismatch: expected {expected:?}, got {actual:?}")]
    VersionMismatch {
        expected: crate::version::Version,
        actual: crate::version::Version,
    },

    /// Response carried a different number of bindings than were requested.
    #[error("response has {actual} varbinds, expected {expected}")]
    VarbindCountMismatch { expected: usize, actual: usize },

    /// A GET or SET response named a different OID than was requested.
    ///
    /// `index` is 1-based, like the agent's error-index.
    #[error("response binding {index} is {actual}, expected {expected}")]
    ResponseOidMismatch {
        index: usize,
        expected: crate::oid::Oid,
        actual: crate::oid::Oid,
    },

    /// Non-increasing OID detected during walk (agent misbehavior).
    ///
    /// Returned when a walk operation receives an OID that is not
    /// lexicographically greater than the previous OID, which would
    /// cause an infinite loop. This indicates a non-conformant SNMP agent.
    #[error("walk detected non-increasing OID: {previous} >= {current}")]
    NonIncreasingOid {
        previous: crate::oid::Oid,
        current: crate::oid::Oid,
    },
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(kind: RequestErrorKind) -> Self {
        Self::InvalidRequest { kind }
    }

    /// Get the target address if this error has one.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. } => *target,
            Self::Timeout { target, .. } => *target,
            Self::Snmp { target, .. } => *target,
            _ => None,
        }
    }

    /// Whether this is a transport-level failure (timeout or I/O).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_error_status_roundtrip() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(99), ErrorStatus::Unknown(99));
        assert_eq!(ErrorStatus::Unknown(99).as_i32(), 99);
    }

    #[test]
    fn test_error_status_display() {
        assert_eq!(ErrorStatus::NoSuchName.to_string(), "noSuchName");
        assert_eq!(ErrorStatus::InconsistentName.to_string(), "inconsistentName");
        assert_eq!(ErrorStatus::Unknown(42).to_string(), "unknown(42)");
    }

    #[test]
    fn test_snmp_error_display_includes_oid() {
        let err = Error::Snmp {
            target: Some("10.0.0.1:161".parse().unwrap()),
            status: ErrorStatus::NoSuchName,
            index: 1,
            oid: Some(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
        };
        assert_eq!(
            err.to_string(),
            "SNMP error from 10.0.0.1:161: noSuchName at index 1 (1.3.6.1.2.1.1.1.0)"
        );
    }

    #[test]
    fn test_target_and_transport_classification() {
        let addr: SocketAddr = "127.0.0.1:161".parse().unwrap();
        let timeout = Error::Timeout {
            target: Some(addr),
            elapsed: Duration::from_secs(1),
            request_id: 7,
        };
        assert_eq!(timeout.target(), Some(addr));
        assert!(timeout.is_transport());

        let mismatch = Error::RequestIdMismatch {
            expected: 1,
            actual: 2,
        };
        assert_eq!(mismatch.target(), None);
        assert!(!mismatch.is_transport());
    }

    #[test]
    fn test_conversion_error_display() {
        let err = Error::Conversion {
            snmp_type: SnmpType::Counter,
            input: "abc".into(),
            kind: ConversionErrorKind::InvalidDigit,
        };
        assert_eq!(
            err.to_string(),
            "cannot convert COUNTER value 'abc': not a decimal integer"
        );
    }
}
