//! Core of a streaming RDF encoding.
//!
//! Terms are compressed against three bounded lookup tables (IRI names, IRI
//! prefixes and literal datatypes). New table entries are emitted as rows
//! ahead of the terms that reference them, so a decoder can rebuild the same
//! tables while reading. This crate provides:
//! - [`LookupTable`]: string to id mapping with LRU eviction and generations
//! - [`TermEncoder`]: term encoding with dependent caches over the tables
//! - [`TermDecoder`]: the mirror image, for reading streams back
//! - [`StreamOptions`] presets and [`check_compatibility`]
//!
//! Framing lives in `rdfstream-frame` and is re-exported as [`frame`].

pub mod cache;
pub mod converter;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod lookup;
pub mod options;
mod recency;
pub mod term;

pub use rdfstream_frame as frame;

pub use cache::{node_cache, DependentNode, SlotRef};
pub use converter::TermConverter;
pub use decoder::{DecodedLiteral, DecodedLiteralKind, DecodedTerm, DecodedTriple, TermDecoder};
pub use encoder::{split_iri, EncoderConfig, TermEncoder};
pub use error::{Result, StreamError};
pub use lookup::{LookupEntry, LookupTable};
pub use options::{
    check_compatibility, check_logical_stream_type, LogicalStreamType, PhysicalStreamType,
    StreamOptions, PROTO_VERSION, PROTO_VERSION_1_0_X, PROTO_VERSION_1_1_X,
};
pub use term::{
    EntryRow, LiteralKind, RdfIri, RdfLiteral, RdfQuad, RdfTerm, RdfTriple, RowSink, TableRow,
};
