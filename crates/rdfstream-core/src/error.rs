/// Errors raised while encoding, decoding or negotiating an RDF stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Invalid encoder or decoder configuration (e.g. a negative table size).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A term cannot be represented with the current stream options.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Incoming stream data or options are unsupported or inconsistent.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rdfstream_frame::FrameError),

    /// An I/O error from the underlying byte stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
