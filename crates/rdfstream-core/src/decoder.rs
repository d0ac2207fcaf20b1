//! Decoder-side mirror of the encoder's lookup state.

use tracing::trace;

use crate::error::{Result, StreamError};
use crate::options::{check_compatibility, StreamOptions};
use crate::term::{EntryRow, LiteralKind, RdfIri, RdfTerm, TableRow};

/// Lookup table filled from entry rows.
#[derive(Debug, Clone)]
struct DecoderLookup {
    table: &'static str,
    values: Vec<Option<String>>,
    last_set_id: u32,
}

impl DecoderLookup {
    fn new(table: &'static str, size: usize) -> Self {
        Self {
            table,
            values: vec![None; size + 1],
            last_set_id: 0,
        }
    }

    fn set(&mut self, entry: &EntryRow) -> Result<()> {
        let id = if entry.id == 0 {
            self.last_set_id + 1
        } else {
            entry.id
        };
        let size = self.values.len() - 1;
        if id == 0 || id as usize > size {
            return Err(StreamError::Deserialization(format!(
                "{} entry id {} is outside the table size {}",
                self.table, id, size
            )));
        }
        self.values[id as usize] = Some(entry.value.clone());
        self.last_set_id = id;
        Ok(())
    }

    fn get(&self, id: u32) -> Result<&str> {
        self.values
            .get(id as usize)
            .and_then(|v| v.as_deref())
            .ok_or_else(|| {
                StreamError::Deserialization(format!("{} id {} is not set", self.table, id))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodedLiteralKind {
    Simple,
    Lang(String),
    Datatype(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedLiteral {
    pub lex: String,
    pub kind: DecodedLiteralKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedTriple {
    pub subject: DecodedTerm,
    pub predicate: DecodedTerm,
    pub object: DecodedTerm,
}

/// A wire term with every lookup reference resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodedTerm {
    Iri(String),
    BlankNode(String),
    Literal(DecodedLiteral),
    Triple(Box<DecodedTriple>),
    DefaultGraph,
}

/// Resolves wire terms back to full strings.
///
/// Rows must be ingested in the order they were emitted, each before any term
/// that refers to it.
#[derive(Debug, Clone)]
pub struct TermDecoder {
    options: StreamOptions,
    names: DecoderLookup,
    prefixes: DecoderLookup,
    datatypes: DecoderLookup,
    last_name_id: u32,
    last_prefix_id: u32,
}

impl TermDecoder {
    /// Validate `requested` against `supported`, then size tables from it.
    pub fn new(requested: &StreamOptions, supported: &StreamOptions) -> Result<Self> {
        check_compatibility(requested, supported)?;
        let size = |n: i32| usize::try_from(n).unwrap_or(0);
        Ok(Self {
            options: requested.clone(),
            names: DecoderLookup::new("name", size(requested.max_name_table_size)),
            prefixes: DecoderLookup::new("prefix", size(requested.max_prefix_table_size)),
            datatypes: DecoderLookup::new("datatype", size(requested.max_datatype_table_size)),
            last_name_id: 0,
            last_prefix_id: 0,
        })
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    pub fn ingest_row(&mut self, row: &TableRow) -> Result<()> {
        trace!(table = row.table_name(), id = row.entry().id, "ingesting row");
        match row {
            TableRow::Name(entry) => self.names.set(entry),
            TableRow::Prefix(entry) => self.prefixes.set(entry),
            TableRow::Datatype(entry) => self.datatypes.set(entry),
        }
    }

    /// Resolve an IRI. The delta state only advances when both ids resolve.
    pub fn decode_iri(&mut self, iri: RdfIri) -> Result<String> {
        let prefix_id = match iri.prefix_id {
            0 => self.last_prefix_id,
            id => id,
        };
        let name_id = match iri.name_id {
            0 => self.last_name_id + 1,
            id => id,
        };
        let prefix = match prefix_id {
            0 => "",
            id => self.prefixes.get(id)?,
        };
        let decoded = format!("{prefix}{}", self.names.get(name_id)?);
        self.last_prefix_id = prefix_id;
        self.last_name_id = name_id;
        Ok(decoded)
    }

    pub fn decode_term(&mut self, term: &RdfTerm) -> Result<DecodedTerm> {
        Ok(match term {
            RdfTerm::Iri(iri) => DecodedTerm::Iri(self.decode_iri(*iri)?),
            RdfTerm::BlankNode(label) => DecodedTerm::BlankNode(label.clone()),
            RdfTerm::Literal(literal) => {
                let kind = match &literal.kind {
                    LiteralKind::Simple => DecodedLiteralKind::Simple,
                    LiteralKind::LangTag(lang) => DecodedLiteralKind::Lang(lang.clone()),
                    LiteralKind::Datatype(id) => {
                        DecodedLiteralKind::Datatype(self.datatypes.get(*id)?.to_owned())
                    }
                };
                DecodedTerm::Literal(DecodedLiteral {
                    lex: literal.lex.clone(),
                    kind,
                })
            }
            RdfTerm::Triple(triple) => DecodedTerm::Triple(Box::new(DecodedTriple {
                subject: self.decode_term(&triple.subject)?,
                predicate: self.decode_term(&triple.predicate)?,
                object: self.decode_term(&triple.object)?,
            })),
            RdfTerm::DefaultGraph => DecodedTerm::DefaultGraph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PhysicalStreamType;
    use crate::term::RdfLiteral;

    fn decoder() -> TermDecoder {
        TermDecoder::new(
            &StreamOptions::small_strict(),
            &StreamOptions::default_supported(),
        )
        .unwrap()
    }

    fn row(kind: fn(EntryRow) -> TableRow, id: u32, value: &str) -> TableRow {
        kind(EntryRow {
            id,
            value: value.into(),
        })
    }

    #[test]
    fn incompatible_options_fail_before_decoding() {
        let requested = StreamOptions::small_strict().with_table_sizes(15, 16, 16);
        let err = TermDecoder::new(&requested, &StreamOptions::default_supported()).unwrap_err();
        assert!(matches!(err, StreamError::Deserialization(_)));

        let requested = StreamOptions::small_strict()
            .with_physical_type(PhysicalStreamType::Triples)
            .with_logical_type(crate::options::LogicalStreamType::FlatQuads);
        assert!(TermDecoder::new(&requested, &StreamOptions::default_supported()).is_err());
    }

    #[test]
    fn implicit_ids_follow_last_set_id() {
        let mut dec = decoder();
        dec.ingest_row(&row(TableRow::Prefix, 0, "http://e.org/")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 0, "a")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 0, "b")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 7, "g")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 0, "h")).unwrap();

        assert_eq!(dec.decode_iri(RdfIri::new(1, 0)).unwrap(), "http://e.org/a");
        assert_eq!(dec.decode_iri(RdfIri::ZERO).unwrap(), "http://e.org/b");
        assert_eq!(dec.decode_iri(RdfIri::new(0, 8)).unwrap(), "http://e.org/h");
        assert_eq!(dec.decode_iri(RdfIri::new(0, 7)).unwrap(), "http://e.org/g");
    }

    #[test]
    fn no_prefix_means_empty_prefix() {
        let mut dec = decoder();
        dec.ingest_row(&row(TableRow::Name, 0, "urn:x")).unwrap();
        assert_eq!(dec.decode_iri(RdfIri::ZERO).unwrap(), "urn:x");
    }

    #[test]
    fn out_of_range_rows_rejected() {
        let mut dec = decoder();
        let err = dec.ingest_row(&row(TableRow::Prefix, 17, "x")).unwrap_err();
        assert!(matches!(err, StreamError::Deserialization(_)));
        assert!(dec.ingest_row(&row(TableRow::Name, 129, "x")).is_err());
    }

    #[test]
    fn unknown_ids_rejected() {
        let mut dec = decoder();
        assert!(dec.decode_iri(RdfIri::new(3, 1)).is_err());
        let literal = RdfTerm::Literal(RdfLiteral::datatype("1", 2));
        assert!(dec.decode_term(&literal).is_err());
    }

    #[test]
    fn failed_iri_leaves_delta_state_alone() {
        let mut dec = decoder();
        dec.ingest_row(&row(TableRow::Prefix, 0, "http://e.org/")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 0, "a")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 0, "b")).unwrap();
        assert_eq!(dec.decode_iri(RdfIri::new(1, 0)).unwrap(), "http://e.org/a");

        // unknown prefix, then unknown name
        assert!(dec.decode_iri(RdfIri::new(9, 2)).is_err());
        assert!(dec.decode_iri(RdfIri::new(1, 40)).is_err());

        assert_eq!(dec.decode_iri(RdfIri::ZERO).unwrap(), "http://e.org/b");
    }

    #[test]
    fn decodes_literals_and_triples() {
        let mut dec = decoder();
        dec.ingest_row(&row(TableRow::Datatype, 0, "http://dt")).unwrap();
        dec.ingest_row(&row(TableRow::Name, 0, "urn:s")).unwrap();

        let quoted = RdfTerm::from(crate::term::RdfTriple {
            subject: RdfIri::ZERO.into(),
            predicate: RdfTerm::BlankNode("b0".into()),
            object: RdfLiteral::datatype("5", 1).into(),
        });
        let decoded = dec.decode_term(&quoted).unwrap();
        assert_eq!(
            decoded,
            DecodedTerm::Triple(Box::new(DecodedTriple {
                subject: DecodedTerm::Iri("urn:s".into()),
                predicate: DecodedTerm::BlankNode("b0".into()),
                object: DecodedTerm::Literal(DecodedLiteral {
                    lex: "5".into(),
                    kind: DecodedLiteralKind::Datatype("http://dt".into()),
                }),
            }))
        );
        assert_eq!(
            dec.decode_term(&RdfTerm::DefaultGraph).unwrap(),
            DecodedTerm::DefaultGraph
        );
    }
}
