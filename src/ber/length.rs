//! BER length encoding and decoding (X.690 Section 8.1.3).

use crate::error::{DecodeErrorKind, Error, Result};

/// Largest content length accepted by the decoder.
///
/// SNMP messages travel in single datagrams, so anything beyond this is
/// malformed input rather than a legitimate message.
pub const MAX_LENGTH: usize = 0x00FF_FFFF;

/// Encode a length, returning the octets in *reverse* order and their count.
///
/// The reverse order matches [`EncodeBuf`](super::EncodeBuf), which prepends.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut out = [0u8; 5];

    if len < 0x80 {
        out[0] = len as u8;
        return (out, 1);
    }

    let mut count = 0;
    let mut remaining = len;
    while remaining > 0 && count < 4 {
        out[count] = (remaining & 0xFF) as u8;
        remaining >>= 8;
        count += 1;
    }
    out[count] = 0x80 | count as u8;
    (out, count + 1)
}

/// Decode a length from the start of `data`, returning (length, octets consumed).
///
/// `base_offset` is only used to report error positions.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    if first < 0x80 {
        return Ok((first as usize, 1));
    }

    if first == 0x80 {
        return Err(Error::decode(base_offset, DecodeErrorKind::IndefiniteLength));
    }

    let octets = (first & 0x7F) as usize;
    if octets > 4 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthTooLong { octets },
        ));
    }

    let Some(bytes) = data.get(1..=octets) else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    // Non-minimal long forms are accepted, as net-snmp does.
    let len = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, octets + 1))
}
