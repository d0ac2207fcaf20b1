use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::codec::{decode_frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::varint::{decode_varint, MAX_VARINT_BYTES};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete delimited frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
/// The reader buffers ahead, so it must own the rest of the stream; use
/// [`read_delimited_frame`] when the stream is shared with other consumers.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        self.next_frame()?.ok_or(FrameError::ConnectionClosed)
    }

    /// Read the next complete frame, or `Ok(None)` at a clean end of stream.
    ///
    /// EOF in the middle of a frame is still an error.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                return Ok(Some(frame));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    ///
    /// Bytes already buffered but not yet returned as frames are dropped.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Read exactly one delimited frame without reading past its end.
///
/// Returns `Ok(None)` if the stream is already at EOF.
pub fn read_delimited_frame<R: Read + ?Sized>(
    input: &mut R,
    max_payload: usize,
) -> Result<Option<Bytes>> {
    let mut prefix = [0u8; MAX_VARINT_BYTES];
    let mut prefix_len = 0usize;
    let len = loop {
        let mut byte = [0u8; 1];
        match input.read(&mut byte) {
            Ok(0) if prefix_len == 0 => return Ok(None),
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
        if prefix_len == MAX_VARINT_BYTES {
            return Err(FrameError::InvalidVarint);
        }
        prefix[prefix_len] = byte[0];
        prefix_len += 1;
        if let Some((len, _)) = decode_varint(&prefix[..prefix_len])? {
            break len;
        }
    };

    let mut payload = vec![0u8; checked_payload_len(len, max_payload)?];
    input.read_exact(&mut payload).map_err(payload_read_error)?;
    Ok(Some(Bytes::from(payload)))
}

/// Async counterpart of [`read_delimited_frame`] for tokio readers.
#[cfg(feature = "async")]
pub async fn read_delimited_frame_async<R>(
    input: &mut R,
    max_payload: usize,
) -> Result<Option<Bytes>>
where
    R: tokio::io::AsyncRead + Unpin + ?Sized,
{
    use tokio::io::AsyncReadExt;

    let mut prefix = [0u8; MAX_VARINT_BYTES];
    let mut prefix_len = 0usize;
    let len = loop {
        let mut byte = [0u8; 1];
        match input.read(&mut byte).await {
            Ok(0) if prefix_len == 0 => return Ok(None),
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
        if prefix_len == MAX_VARINT_BYTES {
            return Err(FrameError::InvalidVarint);
        }
        prefix[prefix_len] = byte[0];
        prefix_len += 1;
        if let Some((len, _)) = decode_varint(&prefix[..prefix_len])? {
            break len;
        }
    };

    let mut payload = vec![0u8; checked_payload_len(len, max_payload)?];
    input
        .read_exact(&mut payload)
        .await
        .map_err(payload_read_error)?;
    Ok(Some(Bytes::from(payload)))
}

fn checked_payload_len(len: u64, max_payload: usize) -> Result<usize> {
    usize::try_from(len)
        .ok()
        .filter(|len| *len <= max_payload)
        .ok_or(FrameError::PayloadTooLarge {
            size: usize::try_from(len).unwrap_or(usize::MAX),
            max: max_payload,
        })
}

fn payload_read_error(err: std::io::Error) -> FrameError {
    match err.kind() {
        ErrorKind::UnexpectedEof => FrameError::ConnectionClosed,
        _ => FrameError::Io(err),
    }
}
