use std::hash::Hash;

use crate::decoder::DecodedTerm;
use crate::encoder::TermEncoder;
use crate::error::Result;
use crate::term::{RdfTerm, RowSink};

/// Bridge between a host RDF library's term types and the wire model.
///
/// Implementations inspect host terms and call the matching `encode_*`
/// method of the encoder; the encoder never looks at host terms itself.
pub trait TermConverter {
    /// Term in subject, predicate or object position.
    type Node;
    /// Term in graph position.
    type GraphNode;
    /// Identity of host literals, used to key the literal caches.
    type Key: Hash + Eq + Clone;

    fn term_to_wire<S: RowSink>(
        &self,
        encoder: &mut TermEncoder<Self::Key, S>,
        node: &Self::Node,
    ) -> Result<RdfTerm>;

    fn graph_to_wire<S: RowSink>(
        &self,
        encoder: &mut TermEncoder<Self::Key, S>,
        graph: &Self::GraphNode,
    ) -> Result<RdfTerm>;

    fn term_from_wire(&self, term: DecodedTerm) -> Result<Self::Node>;

    fn graph_from_wire(&self, term: DecodedTerm) -> Result<Self::GraphNode>;
}
