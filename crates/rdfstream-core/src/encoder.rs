//! Encoding of host RDF terms into wire terms and lookup rows.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::trace;

use crate::cache::{get_or_put, node_cache, DependentNode, SlotRef};
use crate::error::{Result, StreamError};
use crate::lookup::LookupTable;
use crate::options::StreamOptions;
use crate::term::{EntryRow, RdfIri, RdfLiteral, RdfTerm, RdfTriple, RowSink};

/// Default size of the caches for terms that do not depend on lookups.
pub const DEFAULT_NODE_CACHE_SIZE: usize = 1024;
/// Default size of the IRI cache.
pub const DEFAULT_IRI_CACHE_SIZE: usize = 1024;
/// Default size of the datatype literal cache.
pub const DEFAULT_DATATYPE_LITERAL_CACHE_SIZE: usize = 256;

/// Sizes of the encoder's lookup tables and node caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub max_name_table_size: i32,
    /// `0` disables prefix splitting.
    pub max_prefix_table_size: i32,
    /// `0` disables datatype literals.
    pub max_datatype_table_size: i32,
    pub node_cache_size: usize,
    pub iri_cache_size: usize,
    pub datatype_literal_cache_size: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::from_options(&StreamOptions::small_strict())
    }
}

impl EncoderConfig {
    /// Table sizes from `options`, default cache sizes.
    pub fn from_options(options: &StreamOptions) -> Self {
        Self {
            max_name_table_size: options.max_name_table_size,
            max_prefix_table_size: options.max_prefix_table_size,
            max_datatype_table_size: options.max_datatype_table_size,
            node_cache_size: DEFAULT_NODE_CACHE_SIZE,
            iri_cache_size: DEFAULT_IRI_CACHE_SIZE,
            datatype_literal_cache_size: DEFAULT_DATATYPE_LITERAL_CACHE_SIZE,
        }
    }

    pub fn with_cache_sizes(mut self, node: usize, iri: usize, datatype_literal: usize) -> Self {
        self.node_cache_size = node;
        self.iri_cache_size = iri;
        self.datatype_literal_cache_size = datatype_literal;
        self
    }
}

fn table_size(table: &str, size: i32) -> Result<usize> {
    usize::try_from(size).map_err(|_| {
        StreamError::Config(format!("{table} table size must not be negative, got {size}"))
    })
}

/// Stateful encoder for one stream.
///
/// `K` identifies host literals for the literal caches; `S` receives every new
/// lookup entry as soon as it is created, before the term that references it is
/// returned.
pub struct TermEncoder<K, S> {
    names: LookupTable,
    prefixes: Option<LookupTable>,
    datatypes: Option<LookupTable>,
    iri_cache: LruCache<String, DependentNode<RdfIri>>,
    datatype_literal_cache: LruCache<K, DependentNode<RdfLiteral>>,
    blank_node_cache: LruCache<String, RdfTerm>,
    simple_literal_cache: LruCache<String, RdfTerm>,
    lang_literal_cache: LruCache<K, RdfTerm>,
    last_name_id: u32,
    last_prefix_id: Option<u32>,
    sink: S,
}

impl<K: Hash + Eq + Clone, S: RowSink> TermEncoder<K, S> {
    pub fn new(config: &EncoderConfig, sink: S) -> Result<Self> {
        let name_size = table_size("name", config.max_name_table_size)?;
        let prefix_size = table_size("prefix", config.max_prefix_table_size)?;
        let datatype_size = table_size("datatype", config.max_datatype_table_size)?;

        let name_size = NonZeroUsize::new(name_size)
            .ok_or_else(|| StreamError::Config("name table size must be positive".to_string()))?;
        let prefixes = NonZeroUsize::new(prefix_size).map(|size| LookupTable::new(size, true));
        let datatypes = NonZeroUsize::new(datatype_size).map(|size| LookupTable::new(size, true));
        // Name generations only matter to the IRI cache, which needs prefixes.
        let names = LookupTable::new(name_size, prefixes.is_some());

        Ok(Self {
            names,
            prefixes,
            datatypes,
            iri_cache: node_cache(config.iri_cache_size),
            datatype_literal_cache: node_cache(config.datatype_literal_cache_size),
            blank_node_cache: node_cache(config.node_cache_size),
            simple_literal_cache: node_cache(config.node_cache_size),
            lang_literal_cache: node_cache(config.node_cache_size),
            last_name_id: 0,
            last_prefix_id: None,
            sink,
        })
    }

    pub fn from_options(options: &StreamOptions, sink: S) -> Result<Self> {
        Self::new(&EncoderConfig::from_options(options), sink)
    }

    /// Encode an IRI, applying same-prefix and next-name compression.
    pub fn encode_iri(&mut self, iri: &str) -> RdfIri {
        let Some(prefixes) = self.prefixes.as_mut() else {
            let entry = self.names.get_or_add(iri);
            if entry.new_entry {
                trace!(id = entry.set_id, value = iri, "name entry");
                self.sink.append_name_entry(EntryRow {
                    id: entry.set_id,
                    value: iri.to_owned(),
                });
            }
            let name_id = entry.get_id;
            let implicit = self.last_name_id + 1 == name_id;
            self.last_name_id = name_id;
            return if implicit {
                RdfIri::ZERO
            } else {
                RdfIri::new(0, name_id)
            };
        };

        if let Some(node) = self.iri_cache.get(iri) {
            if node.is_current(&self.names, Some(&*prefixes)) {
                let encoded = node.encoded;
                self.names.on_access(encoded.name_id);
                prefixes.on_access(encoded.prefix_id);
                return self.output_iri(encoded);
            }
        }

        let (prefix, name) = split_iri(iri);
        let prefix_entry = prefixes.get_or_add(prefix);
        let name_entry = self.names.get_or_add(name);
        if prefix_entry.new_entry {
            trace!(id = prefix_entry.set_id, value = prefix, "prefix entry");
            self.sink.append_prefix_entry(EntryRow {
                id: prefix_entry.set_id,
                value: prefix.to_owned(),
            });
        }
        if name_entry.new_entry {
            trace!(id = name_entry.set_id, value = name, "name entry");
            self.sink.append_name_entry(EntryRow {
                id: name_entry.set_id,
                value: name.to_owned(),
            });
        }

        let encoded = RdfIri::new(prefix_entry.get_id, name_entry.get_id);
        let node = DependentNode {
            encoded,
            primary: SlotRef::capture(&self.names, encoded.name_id),
            secondary: Some(SlotRef::capture(prefixes, encoded.prefix_id)),
        };
        self.iri_cache.put(iri.to_owned(), node);
        self.output_iri(encoded)
    }

    /// Wire form of an IRI given the previously emitted one.
    fn output_iri(&mut self, encoded: RdfIri) -> RdfIri {
        let RdfIri { prefix_id, name_id } = encoded;
        let next_name = self.last_name_id + 1 == name_id;
        self.last_name_id = name_id;

        if self.last_prefix_id == Some(prefix_id) {
            if next_name {
                RdfIri::ZERO
            } else {
                RdfIri::new(0, name_id)
            }
        } else {
            self.last_prefix_id = Some(prefix_id);
            if next_name {
                RdfIri::new(prefix_id, 0)
            } else {
                encoded
            }
        }
    }

    pub fn encode_blank_node(&mut self, label: &str) -> RdfTerm {
        get_or_put(&mut self.blank_node_cache, label, || {
            RdfTerm::BlankNode(label.to_owned())
        })
    }

    pub fn encode_simple_literal(&mut self, lex: &str) -> RdfTerm {
        get_or_put(&mut self.simple_literal_cache, lex, || {
            RdfLiteral::simple(lex).into()
        })
    }

    pub fn encode_lang_literal(&mut self, key: &K, lex: &str, lang: &str) -> RdfTerm {
        get_or_put(&mut self.lang_literal_cache, key, || {
            RdfLiteral::lang(lex, lang).into()
        })
    }

    /// Encode a typed literal. Fails when the datatype table is disabled.
    pub fn encode_datatype_literal(
        &mut self,
        key: &K,
        lex: &str,
        datatype: &str,
    ) -> Result<RdfTerm> {
        let Some(datatypes) = self.datatypes.as_mut() else {
            return Err(StreamError::Serialization(
                "datatype literals cannot be encoded when the datatype table is disabled; \
                 set the datatype table size to a positive value"
                    .to_string(),
            ));
        };

        if let Some(node) = self.datatype_literal_cache.get(key) {
            if node.is_current(datatypes, None) {
                let encoded = node.encoded.clone();
                datatypes.on_access(node.primary.id);
                return Ok(encoded.into());
            }
        }

        let entry = datatypes.get_or_add(datatype);
        if entry.new_entry {
            trace!(id = entry.set_id, value = datatype, "datatype entry");
            self.sink.append_datatype_entry(EntryRow {
                id: entry.set_id,
                value: datatype.to_owned(),
            });
        }

        let encoded = RdfLiteral::datatype(lex, entry.get_id);
        let node = DependentNode {
            encoded: encoded.clone(),
            primary: SlotRef::capture(datatypes, entry.get_id),
            secondary: None,
        };
        self.datatype_literal_cache.put(key.clone(), node);
        Ok(encoded.into())
    }

    /// Compose an RDF-star quoted triple from already encoded terms.
    pub fn encode_quoted_triple(
        &mut self,
        subject: RdfTerm,
        predicate: RdfTerm,
        object: RdfTerm,
    ) -> RdfTerm {
        RdfTriple {
            subject,
            predicate,
            object,
        }
        .into()
    }

    /// Marker for the default graph in graph position.
    pub fn encode_default_graph(&self) -> RdfTerm {
        RdfTerm::DefaultGraph
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn name_table(&self) -> &LookupTable {
        &self.names
    }

    pub fn prefix_table(&self) -> Option<&LookupTable> {
        self.prefixes.as_ref()
    }

    pub fn datatype_table(&self) -> Option<&LookupTable> {
        self.datatypes.as_ref()
    }
}

/// Split an IRI into prefix and local name.
///
/// The prefix ends after the first `#` at or past byte 8, else after the last
/// `/`, else it is empty.
pub fn split_iri(iri: &str) -> (&str, &str) {
    let split = iri
        .as_bytes()
        .iter()
        .skip(8)
        .position(|&b| b == b'#')
        .map(|i| i + 8)
        .or_else(|| iri.rfind('/'));
    match split {
        Some(i) => iri.split_at(i + 1),
        None => ("", iri),
    }
}
