//! Encode a few quads, frame each batch as a delimited frame and read them back.
//!
//! Frames carry JSON here to keep the example self-contained; a real stream
//! would carry the protobuf serialization of the same rows and terms.

use std::io::{BufReader, Cursor};

use oxrdf::vocab::xsd;
use oxrdf::{GraphName, Literal, NamedNode, Quad};
use rdfstream::encoding::{EncoderConfig, StreamOptions, TableRow};
use rdfstream::frame::{
    autodetect_delimiting, read_delimited_frame, read_framed_stream, write_frame_as_delimited,
    DEFAULT_MAX_PAYLOAD,
};
use rdfstream::oxrdf::{OxrdfConverter, OxrdfEncoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ex = |local: &str| NamedNode::new_unchecked(format!("http://example.org/{local}"));
    let quads = [
        Quad::new(ex("alice"), ex("knows"), ex("bob"), GraphName::DefaultGraph),
        Quad::new(
            ex("alice"),
            ex("age"),
            Literal::new_typed_literal("42", xsd::INTEGER.into_owned()),
            ex("people"),
        ),
        Quad::new(
            ex("bob"),
            ex("name"),
            Literal::new_simple_literal("Bob"),
            ex("people"),
        ),
    ];

    let options = StreamOptions::small_strict();
    let mut encoder: OxrdfEncoder<Vec<TableRow>> =
        OxrdfEncoder::new(&EncoderConfig::from_options(&options), Vec::new())?;

    let mut stream = Vec::new();
    for quad in &quads {
        let wire = OxrdfConverter.quad_to_wire(&mut encoder, quad)?;
        let rows = std::mem::take(encoder.sink_mut());
        let frame = serde_json::to_vec(&(rows, wire))?;
        write_frame_as_delimited(&frame, &mut stream)?;
    }

    let detected = autodetect_delimiting(Cursor::new(stream))?;
    println!("delimited: {}", detected.is_delimited);

    let mut input = BufReader::new(detected.input);
    read_framed_stream(
        &mut input,
        |r| read_delimited_frame(r, DEFAULT_MAX_PAYLOAD),
        |frame| println!("{}", String::from_utf8_lossy(&frame)),
    )?;
    Ok(())
}
