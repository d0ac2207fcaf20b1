//! Streaming RDF term encoding.
//!
//! rdfstream compresses RDF terms against bounded lookup tables and frames the
//! resulting messages for transport or storage.
//!
//! # Crate Structure
//!
//! - [`frame`]: varint length-delimited framing and delimiter autodetection
//! - [`encoding`]: lookup tables, term encoder/decoder and stream options
//! - [`oxrdf`]: adapter for `oxrdf` terms (behind `oxrdf` feature)

/// Re-export frame types.
pub mod frame {
    pub use rdfstream_frame::*;
}

/// Re-export encoding types.
pub mod encoding {
    pub use rdfstream_core::*;
}

/// Re-export the oxrdf adapter (requires `oxrdf` feature).
#[cfg(feature = "oxrdf")]
pub mod oxrdf {
    pub use rdfstream_oxrdf::*;
}

pub use rdfstream_core::{
    check_compatibility, EncoderConfig, RdfIri, RdfTerm, StreamError, StreamOptions, TableRow,
    TermDecoder, TermEncoder,
};
