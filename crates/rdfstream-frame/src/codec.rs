use bytes::{Buf, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint::{decode_varint, encode_varint, varint_len};

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Encode one frame in delimited form.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬──────────────────────┐
/// │ Length (varint)  │ Frame bytes          │
/// │ 1..=5 bytes      │ (Length bytes)       │
/// └──────────────────┴──────────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;
    dst.reserve(varint_len(u64::from(len)) + payload.len());
    encode_varint(u64::from(len), dst);
    dst.extend_from_slice(payload);
    Ok(())
}

/// Decode one delimited frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let Some((len, prefix_len)) = decode_varint(src)? else {
        return Ok(None); // Need more data
    };

    let payload_len = usize::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
        size: usize::MAX,
        max: max_payload,
    })?;
    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    if src.len() < prefix_len + payload_len {
        return Ok(None); // Need more data
    }

    src.advance(prefix_len);
    Ok(Some(src.split_to(payload_len).freeze()))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// `tokio_util` codec for varint-delimited frames.
#[cfg(feature = "async")]
#[derive(Debug, Clone, Default)]
pub struct DelimitedCodec {
    config: FrameConfig,
}

#[cfg(feature = "async")]
impl DelimitedCodec {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "async")]
impl tokio_util::codec::Decoder for DelimitedCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        decode_frame(src, self.config.max_payload_size)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

#[cfg(feature = "async")]
impl<T: AsRef<[u8]>> tokio_util::codec::Encoder<T> for DelimitedCodec {
    type Error = FrameError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<()> {
        let payload = item.as_ref();
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }
        encode_frame(payload, dst)
    }
}
