use std::fmt;
use std::io;

use rdfstream_core::StreamError;
use rdfstream_frame::FrameError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidVarint
        | FrameError::PayloadTooLarge { .. }
        | FrameError::ConnectionClosed => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    match err {
        StreamError::Frame(err) => frame_error(context, err),
        StreamError::Io(err) => io_error(context, err),
        StreamError::Config(_) => CliError::new(USAGE, format!("{context}: {err}")),
        StreamError::Serialization(_) | StreamError::Deserialization(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_stream_is_invalid_data() {
        let err = frame_error("frames", FrameError::ConnectionClosed);
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn missing_file_is_failure() {
        let err = io_error("open", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("open: "));
    }

    #[test]
    fn rejected_options_are_invalid_data() {
        let err = stream_error("check", StreamError::Deserialization("x".into()));
        assert_eq!(err.code, DATA_INVALID);
        let err = stream_error("encode", StreamError::Config("x".into()));
        assert_eq!(err.code, USAGE);
    }
}
