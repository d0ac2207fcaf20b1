//! Length-delimited framing for RDF stream frames.
//!
//! A stream is either *non-delimited* (exactly one serialized frame, no length
//! prefix) or *delimited* (a sequence of frames, each preceded by its byte
//! length as an unsigned varint). This crate provides:
//! - Varint encoding/decoding for the length prefix
//! - Frame encode/decode on `BytesMut` buffers
//! - Blocking [`FrameReader`] / [`FrameWriter`] over any `Read` / `Write`, plus an
//!   async delimited reader behind the `async` feature
//! - Delimiting autodetection that peeks only the first three bytes

pub mod codec;
pub mod delimiting;
pub mod error;
pub mod reader;
pub mod varint;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameConfig, DEFAULT_MAX_PAYLOAD};
#[cfg(feature = "async")]
pub use codec::DelimitedCodec;
pub use delimiting::{
    autodetect_delimiting, read_framed_stream, write_frame_as_delimited, AutodetectDelimiting,
    NON_DELIMITED_TAG,
};
pub use error::{FrameError, Result};
pub use reader::{read_delimited_frame, FrameReader};
#[cfg(feature = "async")]
pub use reader::read_delimited_frame_async;
pub use varint::{decode_varint, encode_varint, varint_len, MAX_VARINT_BYTES};
pub use writer::FrameWriter;
