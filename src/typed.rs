//! Typed values: an abstract SNMP type plus the value's text.
//!
//! A [`TypedValue`] is what callers see for every binding. The text is
//! sanitized once on construction; conversion to a native number happens
//! on demand through [`TypedValue::native_value`].

use crate::error::{ConversionErrorKind, Error, Result};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Abstract SNMP type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SnmpType {
    Integer,
    Integer32,
    Unsigned32,
    Counter,
    Counter64,
    Gauge,
    Ticks,
    UInteger,
    OctetStr,
    ObjectId,
    IpAddr,
    NetAddr,
    Opaque,
    Null,
    Bits,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    Unknown,
}

impl SnmpType {
    /// Every type, in declaration order.
    pub const ALL: [SnmpType; 19] = [
        SnmpType::Integer,
        SnmpType::Integer32,
        SnmpType::Unsigned32,
        SnmpType::Counter,
        SnmpType::Counter64,
        SnmpType::Gauge,
        SnmpType::Ticks,
        SnmpType::UInteger,
        SnmpType::OctetStr,
        SnmpType::ObjectId,
        SnmpType::IpAddr,
        SnmpType::NetAddr,
        SnmpType::Opaque,
        SnmpType::Null,
        SnmpType::Bits,
        SnmpType::NoSuchObject,
        SnmpType::NoSuchInstance,
        SnmpType::EndOfMibView,
        SnmpType::Unknown,
    ];

    /// Upper-case type name, e.g. `COUNTER64`.
    pub fn name(self) -> &'static str {
        match self {
            SnmpType::Integer => "INTEGER",
            SnmpType::Integer32 => "INTEGER32",
            SnmpType::Unsigned32 => "UNSIGNED32",
            SnmpType::Counter => "COUNTER",
            SnmpType::Counter64 => "COUNTER64",
            SnmpType::Gauge => "GAUGE",
            SnmpType::Ticks => "TICKS",
            SnmpType::UInteger => "UINTEGER",
            SnmpType::OctetStr => "OCTETSTR",
            SnmpType::ObjectId => "OBJECTID",
            SnmpType::IpAddr => "IPADDR",
            SnmpType::NetAddr => "NETADDR",
            SnmpType::Opaque => "OPAQUE",
            SnmpType::Null => "NULL",
            SnmpType::Bits => "BITS",
            SnmpType::NoSuchObject => "NOSUCHOBJECT",
            SnmpType::NoSuchInstance => "NOSUCHINSTANCE",
            SnmpType::EndOfMibView => "ENDOFMIBVIEW",
            SnmpType::Unknown => "UNKNOWN",
        }
    }

    /// Types whose text converts to a 64-bit integer.
    pub fn is_integer_family(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// `noSuchObject`, `noSuchInstance` or `endOfMibView`.
    pub fn is_exception(self) -> bool {
        matches!(
            self,
            SnmpType::NoSuchObject | SnmpType::NoSuchInstance | SnmpType::EndOfMibView
        )
    }

    fn is_signed(self) -> bool {
        matches!(self, SnmpType::Integer | SnmpType::Integer32)
    }

    fn is_unsigned(self) -> bool {
        matches!(
            self,
            SnmpType::Unsigned32
                | SnmpType::Counter
                | SnmpType::Counter64
                | SnmpType::Gauge
                | SnmpType::Ticks
                | SnmpType::UInteger
        )
    }
}

impl fmt::Display for SnmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SNMP type name '{0}'")]
pub struct UnknownTypeName(pub Box<str>);

impl FromStr for SnmpType {
    type Err = UnknownTypeName;

    /// Parse a type name, ignoring case. The long spellings
    /// `OCTET_STRING`, `OBJECT_IDENTIFIER` and `IPADDRESS` are accepted too.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let alias = match upper.as_str() {
            "OCTET_STRING" => Some(SnmpType::OctetStr),
            "OBJECT_IDENTIFIER" => Some(SnmpType::ObjectId),
            "IPADDRESS" => Some(SnmpType::IpAddr),
            _ => None,
        };
        alias
            .or_else(|| SnmpType::ALL.into_iter().find(|t| t.name() == upper))
            .ok_or_else(|| UnknownTypeName(s.into()))
    }
}

/// A value's native form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeValue<'a> {
    /// INTEGER and INTEGER32.
    Signed(i64),
    /// The unsigned counter, gauge and ticks types.
    Unsigned(u64),
    /// Every other type, as the stored text.
    Text(&'a str),
}

impl<'a> NativeValue<'a> {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            NativeValue::Signed(v) => Some(v),
            NativeValue::Unsigned(v) => i64::try_from(v).ok(),
            NativeValue::Text(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            NativeValue::Signed(v) => u64::try_from(v).ok(),
            NativeValue::Unsigned(v) => Some(v),
            NativeValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            NativeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for NativeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Signed(v) => write!(f, "{}", v),
            NativeValue::Unsigned(v) => write!(f, "{}", v),
            NativeValue::Text(s) => f.write_str(s),
        }
    }
}

/// A value's abstract type together with its sanitized text.
///
/// ```
/// use typed_snmp::{NativeValue, SnmpType, TypedValue};
///
/// let v = TypedValue::new(SnmpType::Counter64, "18446744073709551615");
/// assert_eq!(v.native_value().unwrap(), NativeValue::Unsigned(u64::MAX));
///
/// let s = TypedValue::new(SnmpType::OctetStr, "eth0\r\n");
/// assert_eq!(s.raw(), "eth0  ");
/// assert_eq!(s.native_value().unwrap(), NativeValue::Text("eth0  "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedValue {
    snmp_type: SnmpType,
    raw: String,
}

impl TypedValue {
    /// Construct a value. Never fails; the text is sanitized.
    pub fn new(snmp_type: SnmpType, raw: impl AsRef<str>) -> Self {
        Self {
            snmp_type,
            raw: sanitize(raw.as_ref()),
        }
    }

    pub fn snmp_type(&self) -> SnmpType {
        self.snmp_type
    }

    /// The stored text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_exception(&self) -> bool {
        self.snmp_type.is_exception()
    }

    pub fn is_end_of_mib_view(&self) -> bool {
        self.snmp_type == SnmpType::EndOfMibView
    }

    /// Convert the text to its native form.
    ///
    /// Integer-family types parse as 64-bit decimal integers (surrounding
    /// spaces ignored); malformed or out-of-range text is an
    /// [`Error::Conversion`]. Every other type returns the text unchanged.
    pub fn native_value(&self) -> Result<NativeValue<'_>> {
        let text = self.raw.trim();
        if self.snmp_type.is_signed() {
            text.parse::<i64>()
                .map(NativeValue::Signed)
                .map_err(|e| self.conversion_error(e.kind()))
        } else if self.snmp_type.is_unsigned() {
            text.parse::<u64>()
                .map(NativeValue::Unsigned)
                .map_err(|e| self.conversion_error(e.kind()))
        } else {
            Ok(NativeValue::Text(&self.raw))
        }
    }

    fn conversion_error(&self, kind: &IntErrorKind) -> Error {
        Error::Conversion {
            snmp_type: self.snmp_type,
            input: self.raw.as_str().into(),
            kind: ConversionErrorKind::from(kind),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.snmp_type, self.raw)
    }
}

impl From<&crate::value::Value> for TypedValue {
    fn from(value: &crate::value::Value) -> Self {
        TypedValue::new(value.snmp_type(), value.to_string())
    }
}

/// Strip control characters from externally sourced text.
///
/// Tab, newline and carriage return each become a single space; all other
/// control characters are dropped.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
