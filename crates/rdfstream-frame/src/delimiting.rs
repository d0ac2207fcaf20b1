//! Conversion and detection between delimited and non-delimited framing.

use std::io::{BufRead, Chain, Cursor, ErrorKind, Read, Write};

use bytes::BytesMut;
use tracing::debug;

use crate::codec::encode_frame;
use crate::error::{FrameError, Result};

/// Tag byte of the first field (stream rows, field 1, length-delimited) that
/// every non-delimited frame starts with.
pub const NON_DELIMITED_TAG: u8 = 0x0A;

const SCOUT_LEN: usize = 3;

/// Outcome of [`autodetect_delimiting`].
#[derive(Debug)]
pub struct AutodetectDelimiting<R> {
    /// True if the stream is a sequence of length-delimited frames.
    pub is_delimited: bool,
    /// The input stream, with the peeked bytes put back in front.
    pub input: Chain<Cursor<Vec<u8>>, R>,
}

/// Detect whether `input` is delimited by peeking its first three bytes.
///
/// Truth table (`0A` = 0x0A, `NN` = not 0x0A, `??` = any):
/// ```text
/// NN ?? ??  delimited      (every non-delimited frame starts with 0A)
/// 0A NN ??  non-delimited
/// 0A 0A NN  delimited      (total frame size is 10)
/// 0A 0A 0A  non-delimited  (stream options message size is 10)
/// ```
/// Streams shorter than three bytes are classified as delimited. A multi-byte
/// length varint can never start with 0A, as its continuation bit would be set.
pub fn autodetect_delimiting<R: Read>(mut input: R) -> Result<AutodetectDelimiting<R>> {
    let mut scout = [0u8; SCOUT_LEN];
    let mut filled = 0usize;
    while filled < SCOUT_LEN {
        match input.read(&mut scout[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    let is_delimited = filled < SCOUT_LEN
        || scout[0] != NON_DELIMITED_TAG
        || (scout[1] == NON_DELIMITED_TAG && scout[2] != NON_DELIMITED_TAG);
    debug!(peeked = filled, is_delimited, "autodetected stream delimiting");

    let replay = Cursor::new(scout[..filled].to_vec());
    Ok(AutodetectDelimiting {
        is_delimited,
        input: replay.chain(input),
    })
}

/// Write exactly one already-serialized, non-delimited frame in delimited form.
///
/// Useful when frames are stored individually (e.g. in a database) and need to
/// be streamed out without re-parsing them.
pub fn write_frame_as_delimited<W: Write>(frame: &[u8], output: &mut W) -> Result<()> {
    let mut buf = BytesMut::new();
    encode_frame(frame, &mut buf)?;
    output.write_all(&buf)?;
    Ok(())
}

/// Decode frames from `input` until it is exhausted or `decode` yields `None`.
///
/// `decode` is handed the stream and reads exactly one frame from it;
/// `on_frame` receives every decoded frame in order.
pub fn read_framed_stream<R, T, D, C>(input: &mut R, mut decode: D, mut on_frame: C) -> Result<()>
where
    R: BufRead,
    D: FnMut(&mut R) -> Result<Option<T>>,
    C: FnMut(T),
{
    loop {
        let exhausted = match input.fill_buf() {
            Ok(buf) => buf.is_empty(),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        };
        if exhausted {
            return Ok(());
        }

        match decode(input)? {
            Some(frame) => on_frame(frame),
            None => return Ok(()),
        }
    }
}
