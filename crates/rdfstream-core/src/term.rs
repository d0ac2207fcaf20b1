//! Wire-level terms and lookup rows.
//!
//! These mirror the shape of the stream's message schema; the actual protobuf
//! field encoding is left to the message layer.

use serde::{Deserialize, Serialize};

/// An IRI as a (prefix id, name id) pair.
///
/// Id `0` is never a table slot; it selects an implicit value instead:
/// - `prefix_id == 0`: same prefix as the previous IRI
/// - `name_id == 0`: previous name id plus one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfIri {
    pub prefix_id: u32,
    pub name_id: u32,
}

impl RdfIri {
    /// Both ids implicit: unchanged prefix, next name.
    pub const ZERO: RdfIri = RdfIri::new(0, 0);

    pub const fn new(prefix_id: u32, name_id: u32) -> Self {
        Self { prefix_id, name_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    /// Plain literal, implicitly `xsd:string`.
    Simple,
    LangTag(String),
    /// Datatype table id (never implicit).
    Datatype(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfLiteral {
    pub lex: String,
    pub kind: LiteralKind,
}

impl RdfLiteral {
    pub fn simple(lex: impl Into<String>) -> Self {
        Self {
            lex: lex.into(),
            kind: LiteralKind::Simple,
        }
    }

    pub fn lang(lex: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lex: lex.into(),
            kind: LiteralKind::LangTag(lang.into()),
        }
    }

    pub fn datatype(lex: impl Into<String>, datatype_id: u32) -> Self {
        Self {
            lex: lex.into(),
            kind: LiteralKind::Datatype(datatype_id),
        }
    }
}

/// A triple used as a term (RDF-star) or as a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfTriple {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
}

/// A quad statement; `graph` may be [`RdfTerm::DefaultGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfQuad {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
    pub graph: RdfTerm,
}

/// Any term that can appear in a statement position on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RdfTerm {
    Iri(RdfIri),
    BlankNode(String),
    Literal(RdfLiteral),
    Triple(Box<RdfTriple>),
    /// Only valid in graph position.
    DefaultGraph,
}

impl From<RdfIri> for RdfTerm {
    fn from(iri: RdfIri) -> Self {
        RdfTerm::Iri(iri)
    }
}

impl From<RdfLiteral> for RdfTerm {
    fn from(literal: RdfLiteral) -> Self {
        RdfTerm::Literal(literal)
    }
}

impl From<RdfTriple> for RdfTerm {
    fn from(triple: RdfTriple) -> Self {
        RdfTerm::Triple(Box::new(triple))
    }
}

/// A lookup table definition row.
///
/// `id == 0` means "previously set id of the same table plus one".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    pub id: u32,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum TableRow {
    Name(EntryRow),
    Prefix(EntryRow),
    Datatype(EntryRow),
}

impl TableRow {
    pub fn entry(&self) -> &EntryRow {
        match self {
            TableRow::Name(entry) | TableRow::Prefix(entry) | TableRow::Datatype(entry) => entry,
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            TableRow::Name(_) => "name",
            TableRow::Prefix(_) => "prefix",
            TableRow::Datatype(_) => "datatype",
        }
    }
}

/// Consumer of new lookup entries, called synchronously at insertion time.
///
/// Each distinct table entry is delivered at most once per insertion, in the
/// order the encoder created them.
pub trait RowSink {
    fn append_name_entry(&mut self, entry: EntryRow);
    fn append_prefix_entry(&mut self, entry: EntryRow);
    fn append_datatype_entry(&mut self, entry: EntryRow);
}

impl RowSink for Vec<TableRow> {
    fn append_name_entry(&mut self, entry: EntryRow) {
        self.push(TableRow::Name(entry));
    }

    fn append_prefix_entry(&mut self, entry: EntryRow) {
        self.push(TableRow::Prefix(entry));
    }

    fn append_datatype_entry(&mut self, entry: EntryRow) {
        self.push(TableRow::Datatype(entry));
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn append_name_entry(&mut self, entry: EntryRow) {
        (**self).append_name_entry(entry);
    }

    fn append_prefix_entry(&mut self, entry: EntryRow) {
        (**self).append_prefix_entry(entry);
    }

    fn append_datatype_entry(&mut self, entry: EntryRow) {
        (**self).append_datatype_entry(entry);
    }
}
