//! Wire-level SNMP values.
//!
//! [`Value`] mirrors the BER encoding one-to-one. Sessions never hand these
//! to callers; the codec renders each one to text and pairs it with its
//! [`SnmpType`] to build a [`TypedValue`](crate::TypedValue).

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{ConversionErrorKind, DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::typed::SnmpType;
use bytes::Bytes;
use std::fmt;

/// A decoded SNMP value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Value {
    Integer(i32),
    OctetString(Bytes),
    Null,
    ObjectIdentifier(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    /// Gauge32, also used for Unsigned32.
    Gauge32(u32),
    /// Hundredths of a second.
    TimeTicks(u32),
    Opaque(Bytes),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    /// Any tag this crate does not interpret, kept verbatim.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// The abstract type this value carries.
    pub fn snmp_type(&self) -> SnmpType {
        match self {
            Value::Integer(_) => SnmpType::Integer,
            Value::OctetString(_) => SnmpType::OctetStr,
            Value::Null => SnmpType::Null,
            Value::ObjectIdentifier(_) => SnmpType::ObjectId,
            Value::IpAddress(_) => SnmpType::IpAddr,
            Value::Counter32(_) => SnmpType::Counter,
            Value::Gauge32(_) => SnmpType::Gauge,
            Value::TimeTicks(_) => SnmpType::Ticks,
            Value::Opaque(_) => SnmpType::Opaque,
            Value::Counter64(_) => SnmpType::Counter64,
            Value::NoSuchObject => SnmpType::NoSuchObject,
            Value::NoSuchInstance => SnmpType::NoSuchInstance,
            Value::EndOfMibView => SnmpType::EndOfMibView,
            Value::Unknown { .. } => SnmpType::Unknown,
        }
    }

    /// Whether this is one of the v2c exception values.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Build a value to SET from its type and text.
    ///
    /// Numbers are decimal and must fit the wire type, IP addresses are
    /// dotted quads, and OCTETSTR/BITS text is sent as its UTF-8 bytes.
    /// OPAQUE, the exception types and UNKNOWN have no text form to send.
    ///
    /// ```
    /// use typed_snmp::{SnmpType, Value};
    ///
    /// assert_eq!(Value::from_text(SnmpType::Gauge, "42").unwrap(), Value::Gauge32(42));
    /// assert!(Value::from_text(SnmpType::Counter, "4294967296").is_err());
    /// ```
    pub fn from_text(snmp_type: SnmpType, text: &str) -> Result<Value> {
        let fail = |kind| Error::Conversion {
            snmp_type,
            input: text.into(),
            kind,
        };
        let trimmed = text.trim();
        let number = |e: std::num::ParseIntError| fail(ConversionErrorKind::from(e.kind()));

        match snmp_type {
            SnmpType::Integer | SnmpType::Integer32 => {
                trimmed.parse().map(Value::Integer).map_err(number)
            }
            SnmpType::Unsigned32 | SnmpType::Gauge | SnmpType::UInteger => {
                trimmed.parse().map(Value::Gauge32).map_err(number)
            }
            SnmpType::Counter => trimmed.parse().map(Value::Counter32).map_err(number),
            SnmpType::Ticks => trimmed.parse().map(Value::TimeTicks).map_err(number),
            SnmpType::Counter64 => trimmed.parse().map(Value::Counter64).map_err(number),
            SnmpType::OctetStr | SnmpType::Bits => Ok(Value::from(text)),
            SnmpType::ObjectId => {
                Oid::parse(&crate::varbind::sanitize_oid_text(text)).map(Value::ObjectIdentifier)
            }
            SnmpType::IpAddr | SnmpType::NetAddr => trimmed
                .parse::<std::net::Ipv4Addr>()
                .map(|addr| Value::IpAddress(addr.octets()))
                .map_err(|_| fail(ConversionErrorKind::InvalidAddress)),
            SnmpType::Null => Ok(Value::Null),
            SnmpType::Opaque
            | SnmpType::NoSuchObject
            | SnmpType::NoSuchInstance
            | SnmpType::EndOfMibView
            | SnmpType::Unknown => Err(fail(ConversionErrorKind::NotSettable)),
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_tagged_bytes(tag::application::IP_ADDRESS, addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_tagged_bytes(tag::application::OPAQUE, data),
            Value::Counter64(v) => buf.push_integer64(*v),
            Value::NoSuchObject => buf.push_empty(tag::context::NO_SUCH_OBJECT),
            Value::NoSuchInstance => buf.push_empty(tag::context::NO_SUCH_INSTANCE),
            Value::EndOfMibView => buf.push_empty(tag::context::END_OF_MIB_VIEW),
            Value::Unknown { tag, data } => buf.push_tagged_bytes(*tag, data),
        }
    }

    /// Decode one value TLV.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag_offset = decoder.offset();
        let value_tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match value_tag {
            tag::universal::INTEGER => decoder.read_integer_value(len).map(Value::Integer),
            tag::universal::OCTET_STRING => decoder.read_bytes(len).map(Value::OctetString),
            tag::universal::OCTET_STRING_CONSTRUCTED => Err(Error::decode(
                tag_offset,
                DecodeErrorKind::ConstructedOctetString,
            )),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(tag_offset, DecodeErrorKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                decoder.read_oid_value(len).map(Value::ObjectIdentifier)
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::decode(
                        tag_offset,
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let data = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([data[0], data[1], data[2], data[3]]))
            }
            tag::application::COUNTER32 => {
                decoder.read_unsigned32_value(len).map(Value::Counter32)
            }
            tag::application::GAUGE32 => decoder.read_unsigned32_value(len).map(Value::Gauge32),
            tag::application::TIMETICKS => {
                decoder.read_unsigned32_value(len).map(Value::TimeTicks)
            }
            tag::application::OPAQUE => decoder.read_bytes(len).map(Value::Opaque),
            tag::application::COUNTER64 => {
                decoder.read_integer64_value(len).map(Value::Counter64)
            }
            // Exception values should be empty; tolerate stray content.
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            other => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag: other, data })
            }
        }
    }
}

/// Text form of a value as stored in a [`TypedValue`](crate::TypedValue).
///
/// Integers are decimal (TimeTicks in raw centiseconds), printable octet
/// strings are shown as text and anything else as spaced upper-case hex.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => match printable_text(data) {
                Some(text) => f.write_str(text),
                None => write_hex(f, data),
            },
            Value::Null => Ok(()),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress([a, b, c, d]) => write!(f, "{}.{}.{}.{}", a, b, c, d),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => write!(f, "{}", v),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::Opaque(data) | Value::Unknown { data, .. } => write_hex(f, data),
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
                write!(f, "{}", self.snmp_type())
            }
        }
    }
}

/// The bytes as text, if they are UTF-8 with no control characters other
/// than whitespace.
fn printable_text(bytes: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;
    text.chars()
        .all(|c| !c.is_control() || c.is_ascii_whitespace())
        .then_some(text)
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{:02X}", b)?;
    }
    Ok(())
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}
