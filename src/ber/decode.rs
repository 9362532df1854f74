//! BER decoding.
//!
//! [`Decoder`] reads from a shared [`Bytes`] buffer, so octet strings and
//! nested TLVs are sliced without copying.

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Cursor over BER-encoded data.
pub struct Decoder {
    data: Bytes,
    pos: usize,
    /// Offset of `data[0]` within the outermost buffer, for error reporting.
    base: usize,
}

impl Decoder {
    /// Create a decoder over the whole buffer.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Create a decoder over a copy of a byte slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Absolute offset of the read position.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Read a single-octet tag.
    pub fn read_tag(&mut self) -> Result<u8> {
        let tag = self
            .peek_tag()
            .ok_or_else(|| Error::decode(self.offset(), DecodeErrorKind::TruncatedData))?;
        self.pos += 1;
        Ok(tag)
    }

    /// Read a length and check that the content fits in what remains.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.pos..], self.offset())?;
        self.pos += consumed;
        if len > self.remaining() {
            return Err(Error::decode(self.offset(), DecodeErrorKind::TruncatedData));
        }
        Ok(len)
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        if len > self.remaining() {
            return Err(Error::decode(self.offset(), DecodeErrorKind::TruncatedData));
        }
        let bytes = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(bytes)
    }

    /// Read a tag and fail unless it matches `expected`.
    pub fn expect_tag(&mut self, expected: u8) -> Result<()> {
        let offset = self.offset();
        let actual = self.read_tag()?;
        if actual != expected {
            return Err(Error::decode(
                offset,
                DecodeErrorKind::UnexpectedTag { expected, actual },
            ));
        }
        Ok(())
    }

    /// Split off the next `len` bytes as an independent decoder.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let data = self.read_bytes(len)?;
        Ok(Decoder { data, pos: 0, base })
    }

    /// Read a SEQUENCE header and return a decoder over its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.expect_tag(tag::universal::SEQUENCE)?;
        let len = self.read_length()?;
        self.sub_decoder(len)
    }

    /// Read a complete INTEGER TLV.
    pub fn read_integer(&mut self) -> Result<i32> {
        self.expect_tag(tag::universal::INTEGER)?;
        let len = self.read_length()?;
        self.read_integer_value(len)
    }

    /// Read a complete OCTET STRING TLV.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        self.expect_tag(tag::universal::OCTET_STRING)?;
        let len = self.read_length()?;
        self.read_bytes(len)
    }

    /// Read a complete OBJECT IDENTIFIER TLV.
    pub fn read_oid(&mut self) -> Result<Oid> {
        self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        let len = self.read_length()?;
        self.read_oid_value(len)
    }

    /// Read signed INTEGER content octets.
    ///
    /// Up to 5 octets are accepted when the extra leading octet is pure sign
    /// extension, which some agents emit.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i32> {
        let offset = self.offset();
        if len == 0 {
            return Err(Error::decode(offset, DecodeErrorKind::ZeroLengthInteger));
        }
        if len > 5 {
            return Err(Error::decode(offset, DecodeErrorKind::IntegerOverflow));
        }
        let bytes = self.read_bytes(len)?;
        let wide = bytes.iter().skip(1).fold(
            i64::from(bytes[0] as i8),
            |acc, &b| (acc << 8) | i64::from(b),
        );
        i32::try_from(wide).map_err(|_| Error::decode(offset, DecodeErrorKind::IntegerOverflow))
    }

    /// Read unsigned 32-bit content octets (Counter32, Gauge32, TimeTicks).
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        let offset = self.offset();
        let value = self.read_unsigned(len, 5)?;
        u32::try_from(value).map_err(|_| Error::decode(offset, DecodeErrorKind::IntegerOverflow))
    }

    /// Read unsigned 64-bit content octets (Counter64).
    pub fn read_integer64_value(&mut self, len: usize) -> Result<u64> {
        let offset = self.offset();
        if len > 9 {
            return Err(Error::decode(
                offset,
                DecodeErrorKind::Integer64TooLong { length: len },
            ));
        }
        let value = self.read_unsigned(len, 9)?;
        u64::try_from(value).map_err(|_| Error::decode(offset, DecodeErrorKind::IntegerOverflow))
    }

    /// Read OBJECT IDENTIFIER content octets.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let offset = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).map_err(|e| match e {
            Error::Decode { offset: inner, kind } => Error::decode(offset + inner, kind),
            other => other,
        })
    }

    fn read_unsigned(&mut self, len: usize, max_len: usize) -> Result<u128> {
        let offset = self.offset();
        if len == 0 {
            return Err(Error::decode(offset, DecodeErrorKind::ZeroLengthInteger));
        }
        if len > max_len {
            return Err(Error::decode(offset, DecodeErrorKind::IntegerOverflow));
        }
        let bytes = self.read_bytes(len)?;
        // A set high bit is read as magnitude, not sign, as net-snmp does.
        Ok(bytes
            .iter()
            .fold(0u128, |acc, &b| (acc << 8) | u128::from(b)))
    }
}
