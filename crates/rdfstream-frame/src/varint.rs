//! Unsigned LEB128 varints, as used for protobuf length prefixes.

use bytes::BufMut;

use crate::error::{FrameError, Result};

/// Maximum varint bytes (u64 needs at most 10 bytes).
pub const MAX_VARINT_BYTES: usize = 10;

/// Append `value` as an unsigned varint.
pub fn encode_varint(mut value: u64, dst: &mut impl BufMut) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            dst.put_u8(byte);
            return;
        }
        dst.put_u8(byte | 0x80);
    }
}

/// Number of bytes `value` occupies when varint-encoded.
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint from the front of `src`.
///
/// Returns `Ok(None)` if `src` ends before the varint does, and
/// `Ok(Some((value, bytes_consumed)))` otherwise.
pub fn decode_varint(src: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value: u64 = 0;
    for (i, &byte) in src.iter().enumerate() {
        if i == MAX_VARINT_BYTES {
            return Err(FrameError::InvalidVarint);
        }
        let low = u64::from(byte & 0x7F);
        // The tenth byte may only carry the single remaining bit.
        if i == MAX_VARINT_BYTES - 1 && low > 1 {
            return Err(FrameError::InvalidVarint);
        }
        value |= low << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }
    if src.len() >= MAX_VARINT_BYTES {
        return Err(FrameError::InvalidVarint);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        buf
    }

    #[test]
    fn single_byte_values() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(10), vec![0x0A]);
        assert_eq!(encoded(127), vec![0x7F]);
    }

    #[test]
    fn multi_byte_values() {
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(130), vec![0x82, 0x01]);
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn len_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            assert_eq!(varint_len(value), encoded(value).len(), "value {value}");
        }
    }

    #[test]
    fn decode_reports_consumed_bytes() {
        let mut buf = encoded(300);
        buf.extend_from_slice(b"rest");
        assert_eq!(decode_varint(&buf).unwrap(), Some((300, 2)));
    }

    #[test]
    fn decode_incomplete() {
        assert_eq!(decode_varint(&[]).unwrap(), None);
        assert_eq!(decode_varint(&[0x80, 0x80]).unwrap(), None);
    }

    #[test]
    fn decode_max_value() {
        let buf = encoded(u64::MAX);
        assert_eq!(buf.len(), MAX_VARINT_BYTES);
        assert_eq!(decode_varint(&buf).unwrap(), Some((u64::MAX, MAX_VARINT_BYTES)));
    }

    #[test]
    fn decode_rejects_overlong() {
        let buf = [0xFF; 11];
        assert!(matches!(decode_varint(&buf), Err(FrameError::InvalidVarint)));
    }

    #[test]
    fn decode_rejects_overflowing_tenth_byte() {
        let mut buf = vec![0xFF; 9];
        buf.push(0x02);
        assert!(matches!(decode_varint(&buf), Err(FrameError::InvalidVarint)));
    }
}
