//! Stream options, presets and the compatibility check run before decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StreamError};

/// Protocol version 1.0.x.
pub const PROTO_VERSION_1_0_X: u32 = 1;
/// Protocol version 1.1.x.
pub const PROTO_VERSION_1_1_X: u32 = 2;
/// Highest protocol version this crate understands.
pub const PROTO_VERSION: u32 = PROTO_VERSION_1_1_X;

/// Smallest name table a stream may declare.
pub const MIN_NAME_TABLE_SIZE: i32 = 16;
/// Smallest datatype table a stream may declare.
pub const MIN_DATATYPE_TABLE_SIZE: i32 = 8;

const BIG_NAME_TABLE_SIZE: i32 = 4000;
const BIG_PREFIX_TABLE_SIZE: i32 = 150;
const BIG_DATATYPE_TABLE_SIZE: i32 = 32;
const SMALL_NAME_TABLE_SIZE: i32 = 128;
const SMALL_PREFIX_TABLE_SIZE: i32 = 16;
const SMALL_DATATYPE_TABLE_SIZE: i32 = 16;

const STAX_PREFIX: &str = "https://w3id.org/stax/ontology#";

/// Kind of statements carried in stream frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicalStreamType {
    #[default]
    Unspecified = 0,
    Triples = 1,
    Quads = 2,
    Graphs = 3,
}

impl PhysicalStreamType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Triples),
            2 => Some(Self::Quads),
            3 => Some(Self::Graphs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "PHYSICAL_STREAM_TYPE_UNSPECIFIED",
            Self::Triples => "PHYSICAL_STREAM_TYPE_TRIPLES",
            Self::Quads => "PHYSICAL_STREAM_TYPE_QUADS",
            Self::Graphs => "PHYSICAL_STREAM_TYPE_GRAPHS",
        }
    }
}

impl fmt::Display for PhysicalStreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the statement stream should be interpreted.
///
/// Subtypes end with the decimal digits of their parent type, so the base
/// type is the value modulo 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalStreamType {
    #[default]
    Unspecified = 0,
    FlatTriples = 1,
    FlatQuads = 2,
    Graphs = 3,
    Datasets = 4,
    SubjectGraphs = 13,
    NamedGraphs = 14,
    TimestampedNamedGraphs = 114,
}

impl LogicalStreamType {
    pub const ALL: [LogicalStreamType; 8] = [
        Self::Unspecified,
        Self::FlatTriples,
        Self::FlatQuads,
        Self::Graphs,
        Self::Datasets,
        Self::SubjectGraphs,
        Self::NamedGraphs,
        Self::TimestampedNamedGraphs,
    ];

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| *t as u32 == value)
    }

    /// The base concrete type, e.g. `Datasets` for `TimestampedNamedGraphs`.
    pub fn base_type(self) -> Self {
        Self::from_u32(self as u32 % 10).unwrap_or(Self::Unspecified)
    }

    /// Direct supertype, if any.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::SubjectGraphs => Some(Self::Graphs),
            Self::NamedGraphs => Some(Self::Datasets),
            Self::TimestampedNamedGraphs => Some(Self::NamedGraphs),
            _ => None,
        }
    }

    pub fn is_equal_or_subtype_of(self, other: Self) -> bool {
        let mut current = Some(self);
        while let Some(t) = current {
            if t == other {
                return true;
            }
            current = t.parent();
        }
        false
    }

    /// RDF-STaX ontology IRI of the type; `None` for `Unspecified`.
    pub fn rdf_stax_type(self) -> Option<String> {
        let local = match self {
            Self::Unspecified => return None,
            Self::FlatTriples => "flatTripleStream",
            Self::FlatQuads => "flatQuadStream",
            Self::Graphs => "graphStream",
            Self::Datasets => "datasetStream",
            Self::SubjectGraphs => "subjectGraphStream",
            Self::NamedGraphs => "namedGraphStream",
            Self::TimestampedNamedGraphs => "timestampedNamedGraphStream",
        };
        Some(format!("{STAX_PREFIX}{local}"))
    }

    /// Inverse of [`rdf_stax_type`](Self::rdf_stax_type).
    pub fn from_rdf_stax_type(iri: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.rdf_stax_type().as_deref() == Some(iri))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "LOGICAL_STREAM_TYPE_UNSPECIFIED",
            Self::FlatTriples => "LOGICAL_STREAM_TYPE_FLAT_TRIPLES",
            Self::FlatQuads => "LOGICAL_STREAM_TYPE_FLAT_QUADS",
            Self::Graphs => "LOGICAL_STREAM_TYPE_GRAPHS",
            Self::Datasets => "LOGICAL_STREAM_TYPE_DATASETS",
            Self::SubjectGraphs => "LOGICAL_STREAM_TYPE_SUBJECT_GRAPHS",
            Self::NamedGraphs => "LOGICAL_STREAM_TYPE_NAMED_GRAPHS",
            Self::TimestampedNamedGraphs => "LOGICAL_STREAM_TYPE_TIMESTAMPED_NAMED_GRAPHS",
        }
    }
}

impl fmt::Display for LogicalStreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options declared at the start of a stream.
///
/// Table sizes are signed as on the wire; negative values are rejected by
/// [`check_compatibility`] and by encoder construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    pub stream_name: String,
    pub physical_type: PhysicalStreamType,
    pub generalized_statements: bool,
    pub rdf_star: bool,
    pub max_name_table_size: i32,
    pub max_prefix_table_size: i32,
    pub max_datatype_table_size: i32,
    pub logical_type: LogicalStreamType,
    pub version: u32,
}

impl StreamOptions {
    fn preset(name: i32, prefix: i32, datatype: i32) -> Self {
        Self {
            max_name_table_size: name,
            max_prefix_table_size: prefix,
            max_datatype_table_size: datatype,
            ..Self::default()
        }
    }

    /// Large tables for high-volume streams; no generalized or RDF-star statements.
    pub fn big_strict() -> Self {
        Self::preset(BIG_NAME_TABLE_SIZE, BIG_PREFIX_TABLE_SIZE, BIG_DATATYPE_TABLE_SIZE)
    }

    pub fn big_generalized() -> Self {
        Self::big_strict().with_generalized_statements(true)
    }

    pub fn big_rdf_star() -> Self {
        Self::big_strict().with_rdf_star(true)
    }

    pub fn big_all_features() -> Self {
        Self::big_generalized().with_rdf_star(true)
    }

    /// Small tables for low-volume streams; no generalized or RDF-star statements.
    pub fn small_strict() -> Self {
        Self::preset(
            SMALL_NAME_TABLE_SIZE,
            SMALL_PREFIX_TABLE_SIZE,
            SMALL_DATATYPE_TABLE_SIZE,
        )
    }

    pub fn small_generalized() -> Self {
        Self::small_strict().with_generalized_statements(true)
    }

    pub fn small_rdf_star() -> Self {
        Self::small_strict().with_rdf_star(true)
    }

    pub fn small_all_features() -> Self {
        Self::small_generalized().with_rdf_star(true)
    }

    /// Upper limits a decoder accepts unless configured otherwise.
    ///
    /// A zeroed `StreamOptions` would reject every stream, so decoders should
    /// start from this and tighten it.
    pub fn default_supported() -> Self {
        Self {
            version: PROTO_VERSION,
            generalized_statements: true,
            rdf_star: true,
            max_name_table_size: 4096,
            max_prefix_table_size: 1024,
            max_datatype_table_size: 256,
            ..Self::default()
        }
    }

    pub fn with_stream_name(mut self, name: impl Into<String>) -> Self {
        self.stream_name = name.into();
        self
    }

    pub fn with_physical_type(mut self, physical_type: PhysicalStreamType) -> Self {
        self.physical_type = physical_type;
        self
    }

    pub fn with_logical_type(mut self, logical_type: LogicalStreamType) -> Self {
        self.logical_type = logical_type;
        self
    }

    pub fn with_generalized_statements(mut self, enabled: bool) -> Self {
        self.generalized_statements = enabled;
        self
    }

    pub fn with_rdf_star(mut self, enabled: bool) -> Self {
        self.rdf_star = enabled;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_table_sizes(mut self, name: i32, prefix: i32, datatype: i32) -> Self {
        self.max_name_table_size = name;
        self.max_prefix_table_size = prefix;
        self.max_datatype_table_size = datatype;
        self
    }
}

/// Check that a stream declaring `requested` can be safely decoded by a
/// reader limited to `supported`.
///
/// Must run before any table is allocated from `requested`. The physical type
/// and stream name are not validated here.
pub fn check_compatibility(requested: &StreamOptions, supported: &StreamOptions) -> Result<()> {
    if requested.version > PROTO_VERSION || requested.version > supported.version {
        return Err(reject(format!(
            "unsupported proto version {}, expected at most {}",
            requested.version,
            supported.version.min(PROTO_VERSION)
        )));
    }
    if requested.generalized_statements && !supported.generalized_statements {
        return Err(reject(
            "stream uses generalized statements, which are not supported".to_string(),
        ));
    }
    if requested.rdf_star && !supported.rdf_star {
        return Err(reject(
            "stream uses RDF-star statements, which are not supported".to_string(),
        ));
    }

    check_table_size(
        "name",
        requested.max_name_table_size,
        supported.max_name_table_size,
        MIN_NAME_TABLE_SIZE,
    )?;
    check_table_size(
        "prefix",
        requested.max_prefix_table_size,
        supported.max_prefix_table_size,
        0,
    )?;
    check_table_size(
        "datatype",
        requested.max_datatype_table_size,
        supported.max_datatype_table_size,
        MIN_DATATYPE_TABLE_SIZE,
    )?;

    check_logical_stream_type(requested, supported.logical_type)
}

/// Check that the logical type of `options` agrees with its physical type and,
/// unless `expected` is unspecified, is `expected` or one of its subtypes.
pub fn check_logical_stream_type(
    options: &StreamOptions,
    expected: LogicalStreamType,
) -> Result<()> {
    let requested = options.logical_type;
    let physical = options.physical_type;

    let conflict = match requested.base_type() {
        LogicalStreamType::FlatTriples | LogicalStreamType::Graphs => matches!(
            physical,
            PhysicalStreamType::Quads | PhysicalStreamType::Graphs
        ),
        LogicalStreamType::FlatQuads | LogicalStreamType::Datasets => {
            physical == PhysicalStreamType::Triples
        }
        _ => false,
    };
    if conflict {
        return Err(reject(format!(
            "logical stream type {requested} is incompatible with physical stream type {physical}"
        )));
    }

    if expected == LogicalStreamType::Unspecified {
        return Ok(());
    }
    if !requested.is_equal_or_subtype_of(expected) {
        return Err(reject(format!(
            "expected logical stream type {expected}, got {requested}, which is not a subtype of it"
        )));
    }
    Ok(())
}

fn check_table_size(table: &str, requested: i32, supported: i32, min: i32) -> Result<()> {
    if requested < min {
        return Err(reject(format!(
            "max {table} table size {requested} is below the minimum of {min}"
        )));
    }
    if requested > supported {
        return Err(reject(format!(
            "max {table} table size {requested} exceeds the supported maximum of {supported}"
        )));
    }
    Ok(())
}

fn reject(message: String) -> StreamError {
    debug!(reason = %message, "stream options rejected");
    StreamError::Deserialization(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> StreamOptions {
        StreamOptions::default_supported()
    }

    fn rejection(result: Result<()>) -> String {
        match result {
            Err(StreamError::Deserialization(message)) => message,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn presets_are_supported_by_default() {
        for preset in [
            StreamOptions::big_strict(),
            StreamOptions::big_generalized(),
            StreamOptions::big_rdf_star(),
            StreamOptions::big_all_features(),
            StreamOptions::small_strict(),
            StreamOptions::small_generalized(),
            StreamOptions::small_rdf_star(),
            StreamOptions::small_all_features(),
        ] {
            check_compatibility(&preset.clone().with_version(PROTO_VERSION), &supported())
                .unwrap_or_else(|e| panic!("{preset:?}: {e}"));
        }
    }

    #[test]
    fn compatibility_is_reflexive() {
        let opts = StreamOptions::small_all_features()
            .with_version(PROTO_VERSION_1_0_X)
            .with_physical_type(PhysicalStreamType::Quads)
            .with_logical_type(LogicalStreamType::NamedGraphs);
        check_compatibility(&opts, &opts).unwrap();
        check_compatibility(&supported(), &supported()).unwrap();
    }

    #[test]
    fn name_table_below_minimum_rejected() {
        let opts = StreamOptions::small_strict().with_table_sizes(15, 16, 16);
        let message = rejection(check_compatibility(&opts, &supported()));
        assert!(message.contains("name"), "{message}");
        assert!(message.contains("15"), "{message}");
    }

    #[test]
    fn datatype_table_below_minimum_rejected() {
        let opts = StreamOptions::small_strict().with_table_sizes(128, 16, 7);
        let message = rejection(check_compatibility(&opts, &supported()));
        assert!(message.contains("datatype"), "{message}");
    }

    #[test]
    fn negative_prefix_table_rejected() {
        let opts = StreamOptions::small_strict().with_table_sizes(128, -1, 16);
        let message = rejection(check_compatibility(&opts, &supported()));
        assert!(message.contains("prefix"), "{message}");
    }

    #[test]
    fn tables_above_supported_rejected() {
        let opts = StreamOptions::small_strict().with_table_sizes(5000, 16, 16);
        let message = rejection(check_compatibility(&opts, &supported()));
        assert!(message.contains("4096"), "{message}");

        let opts = StreamOptions::small_strict().with_table_sizes(128, 2000, 16);
        assert!(check_compatibility(&opts, &supported()).is_err());
    }

    #[test]
    fn zero_prefix_table_accepted() {
        let opts = StreamOptions::small_strict().with_table_sizes(128, 0, 16);
        check_compatibility(&opts, &supported()).unwrap();
    }

    #[test]
    fn version_limits() {
        let too_new = StreamOptions::small_strict().with_version(PROTO_VERSION + 1);
        assert!(check_compatibility(&too_new, &supported()).is_err());

        let limited = supported().with_version(PROTO_VERSION_1_0_X);
        let opts = StreamOptions::small_strict().with_version(PROTO_VERSION_1_1_X);
        assert!(check_compatibility(&opts, &limited).is_err());
    }

    #[test]
    fn feature_flags_must_be_supported() {
        let strict = supported().with_generalized_statements(false).with_rdf_star(false);
        assert!(check_compatibility(&StreamOptions::small_generalized(), &strict).is_err());
        assert!(check_compatibility(&StreamOptions::small_rdf_star(), &strict).is_err());
        check_compatibility(&StreamOptions::small_strict(), &strict).unwrap();
    }

    #[test]
    fn flat_quads_over_triples_rejected() {
        let opts = StreamOptions::small_strict()
            .with_physical_type(PhysicalStreamType::Triples)
            .with_logical_type(LogicalStreamType::FlatQuads);
        let message = rejection(check_compatibility(&opts, &supported()));
        assert!(message.contains("LOGICAL_STREAM_TYPE_FLAT_QUADS"), "{message}");
    }

    #[test]
    fn triples_family_over_quads_or_graphs_rejected() {
        for logical in [
            LogicalStreamType::FlatTriples,
            LogicalStreamType::Graphs,
            LogicalStreamType::SubjectGraphs,
        ] {
            for physical in [PhysicalStreamType::Quads, PhysicalStreamType::Graphs] {
                let opts = StreamOptions::small_strict()
                    .with_physical_type(physical)
                    .with_logical_type(logical);
                assert!(
                    check_logical_stream_type(&opts, LogicalStreamType::Unspecified).is_err(),
                    "{logical} over {physical}"
                );
            }
        }
    }

    #[test]
    fn unspecified_logical_type_never_conflicts() {
        for physical in [
            PhysicalStreamType::Unspecified,
            PhysicalStreamType::Triples,
            PhysicalStreamType::Quads,
            PhysicalStreamType::Graphs,
        ] {
            let opts = StreamOptions::small_strict().with_physical_type(physical);
            check_logical_stream_type(&opts, LogicalStreamType::Unspecified).unwrap();
        }
    }

    #[test]
    fn expected_logical_type_accepts_subtypes() {
        let opts = StreamOptions::small_strict()
            .with_physical_type(PhysicalStreamType::Quads)
            .with_logical_type(LogicalStreamType::TimestampedNamedGraphs);
        check_logical_stream_type(&opts, LogicalStreamType::Datasets).unwrap();
        check_logical_stream_type(&opts, LogicalStreamType::NamedGraphs).unwrap();

        let message = rejection(check_logical_stream_type(&opts, LogicalStreamType::FlatQuads));
        assert!(message.contains("expected"), "{message}");
    }

    #[test]
    fn expected_logical_type_comes_from_supported_options() {
        let opts = StreamOptions::small_strict()
            .with_physical_type(PhysicalStreamType::Triples)
            .with_logical_type(LogicalStreamType::FlatTriples);
        let wants_graphs = supported().with_logical_type(LogicalStreamType::Graphs);
        assert!(check_compatibility(&opts, &wants_graphs).is_err());
    }

    #[test]
    fn base_types_and_subtyping() {
        use LogicalStreamType::*;
        assert_eq!(TimestampedNamedGraphs.base_type(), Datasets);
        assert_eq!(SubjectGraphs.base_type(), Graphs);
        assert_eq!(FlatTriples.base_type(), FlatTriples);
        assert!(SubjectGraphs.is_equal_or_subtype_of(Graphs));
        assert!(!Graphs.is_equal_or_subtype_of(SubjectGraphs));
        assert!(!NamedGraphs.is_equal_or_subtype_of(FlatQuads));
        assert!(!Unspecified.is_equal_or_subtype_of(FlatTriples));
    }

    #[test]
    fn stax_iris_round_trip() {
        assert_eq!(LogicalStreamType::Unspecified.rdf_stax_type(), None);
        for t in LogicalStreamType::ALL.into_iter().skip(1) {
            let iri = t.rdf_stax_type().unwrap();
            assert!(iri.starts_with(STAX_PREFIX));
            assert_eq!(LogicalStreamType::from_rdf_stax_type(&iri), Some(t));
        }
        assert_eq!(
            LogicalStreamType::FlatTriples.rdf_stax_type().as_deref(),
            Some("https://w3id.org/stax/ontology#flatTripleStream")
        );
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: StreamOptions = serde_json::from_str(
            r#"{"max_name_table_size": 128, "physical_type": "QUADS", "logical_type": "NAMED_GRAPHS"}"#,
        )
        .unwrap();
        assert_eq!(opts.max_name_table_size, 128);
        assert_eq!(opts.physical_type, PhysicalStreamType::Quads);
        assert_eq!(opts.logical_type, LogicalStreamType::NamedGraphs);
        assert_eq!(opts.max_prefix_table_size, 0);
        assert!(!opts.rdf_star);
    }
}
