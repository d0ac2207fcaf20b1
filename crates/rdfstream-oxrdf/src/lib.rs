//! [`oxrdf`] terms for the rdfstream encoder and decoder.
//!
//! Literal caches are keyed by the `oxrdf::Literal` itself. Literals typed
//! `xsd:string` are written as simple literals and read back the same way.

use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad, Subject, Term, Triple};
use rdfstream_core::{
    DecodedLiteralKind, DecodedTerm, DecodedTriple, RdfQuad, RdfTerm, RdfTriple, Result, RowSink,
    StreamError, TermConverter, TermEncoder,
};

/// Encoder specialised to oxrdf literal keys.
pub type OxrdfEncoder<S> = TermEncoder<Literal, S>;

/// [`TermConverter`] for oxrdf terms, including RDF-star quoted triples.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxrdfConverter;

impl OxrdfConverter {
    pub fn subject_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        subject: &Subject,
    ) -> Result<RdfTerm> {
        match subject {
            Subject::NamedNode(node) => Ok(encoder.encode_iri(node.as_str()).into()),
            Subject::BlankNode(node) => Ok(encoder.encode_blank_node(node.as_str())),
            Subject::Triple(triple) => self.quoted_triple_to_wire(encoder, triple),
        }
    }

    pub fn triple_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        triple: &Triple,
    ) -> Result<RdfTriple> {
        Ok(RdfTriple {
            subject: self.subject_to_wire(encoder, &triple.subject)?,
            predicate: encoder.encode_iri(triple.predicate.as_str()).into(),
            object: self.term_to_wire(encoder, &triple.object)?,
        })
    }

    pub fn quad_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        quad: &Quad,
    ) -> Result<RdfQuad> {
        Ok(RdfQuad {
            subject: self.subject_to_wire(encoder, &quad.subject)?,
            predicate: encoder.encode_iri(quad.predicate.as_str()).into(),
            object: self.term_to_wire(encoder, &quad.object)?,
            graph: self.graph_to_wire(encoder, &quad.graph_name)?,
        })
    }

    pub fn triple_from_wire(&self, triple: DecodedTriple) -> Result<Triple> {
        let subject = match self.term_from_wire(triple.subject)? {
            Term::NamedNode(node) => Subject::NamedNode(node),
            Term::BlankNode(node) => Subject::BlankNode(node),
            Term::Triple(triple) => Subject::Triple(triple),
            Term::Literal(literal) => {
                return Err(StreamError::Deserialization(format!(
                    "literal {literal} cannot be a subject"
                )))
            }
        };
        let predicate = match self.term_from_wire(triple.predicate)? {
            Term::NamedNode(node) => node,
            other => {
                return Err(StreamError::Deserialization(format!(
                    "{other} cannot be a predicate"
                )))
            }
        };
        let object = self.term_from_wire(triple.object)?;
        Ok(Triple::new(subject, predicate, object))
    }

    fn quoted_triple_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        triple: &Triple,
    ) -> Result<RdfTerm> {
        let RdfTriple {
            subject,
            predicate,
            object,
        } = self.triple_to_wire(encoder, triple)?;
        Ok(encoder.encode_quoted_triple(subject, predicate, object))
    }

    fn literal_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        literal: &Literal,
    ) -> Result<RdfTerm> {
        if let Some(lang) = literal.language() {
            return Ok(encoder.encode_lang_literal(literal, literal.value(), lang));
        }
        let datatype = literal.datatype();
        if datatype == xsd::STRING {
            return Ok(encoder.encode_simple_literal(literal.value()));
        }
        encoder.encode_datatype_literal(literal, literal.value(), datatype.as_str())
    }
}

impl TermConverter for OxrdfConverter {
    type Node = Term;
    type GraphNode = GraphName;
    type Key = Literal;

    fn term_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        node: &Term,
    ) -> Result<RdfTerm> {
        match node {
            Term::NamedNode(node) => Ok(encoder.encode_iri(node.as_str()).into()),
            Term::BlankNode(node) => Ok(encoder.encode_blank_node(node.as_str())),
            Term::Literal(literal) => self.literal_to_wire(encoder, literal),
            Term::Triple(triple) => self.quoted_triple_to_wire(encoder, triple),
        }
    }

    fn graph_to_wire<S: RowSink>(
        &self,
        encoder: &mut OxrdfEncoder<S>,
        graph: &GraphName,
    ) -> Result<RdfTerm> {
        match graph {
            GraphName::NamedNode(node) => Ok(encoder.encode_iri(node.as_str()).into()),
            GraphName::BlankNode(node) => Ok(encoder.encode_blank_node(node.as_str())),
            GraphName::DefaultGraph => Ok(encoder.encode_default_graph()),
        }
    }

    fn term_from_wire(&self, term: DecodedTerm) -> Result<Term> {
        Ok(match term {
            DecodedTerm::Iri(iri) => NamedNode::new_unchecked(iri).into(),
            DecodedTerm::BlankNode(label) => BlankNode::new_unchecked(label).into(),
            DecodedTerm::Literal(literal) => match literal.kind {
                DecodedLiteralKind::Simple => Literal::new_simple_literal(literal.lex),
                DecodedLiteralKind::Lang(lang) => {
                    Literal::new_language_tagged_literal_unchecked(literal.lex, lang)
                }
                DecodedLiteralKind::Datatype(datatype) => {
                    Literal::new_typed_literal(literal.lex, NamedNode::new_unchecked(datatype))
                }
            }
            .into(),
            DecodedTerm::Triple(triple) => Term::Triple(Box::new(self.triple_from_wire(*triple)?)),
            DecodedTerm::DefaultGraph => {
                return Err(StreamError::Deserialization(
                    "default graph is only valid in graph position".to_string(),
                ))
            }
        })
    }

    fn graph_from_wire(&self, term: DecodedTerm) -> Result<GraphName> {
        match term {
            DecodedTerm::Iri(iri) => Ok(NamedNode::new_unchecked(iri).into()),
            DecodedTerm::BlankNode(label) => Ok(BlankNode::new_unchecked(label).into()),
            DecodedTerm::DefaultGraph => Ok(GraphName::DefaultGraph),
            other => Err(StreamError::Deserialization(format!(
                "{other:?} cannot be a graph name"
            ))),
        }
    }
}
