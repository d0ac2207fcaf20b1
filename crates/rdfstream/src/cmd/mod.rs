use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use rdfstream_core::StreamOptions;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod delimit;
pub mod detect;
pub mod encode_iris;
pub mod frames;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect whether a stream file is length-delimited.
    Detect(DetectArgs),
    /// Write one non-delimited frame file as a delimited frame.
    Delimit(DelimitArgs),
    /// List the frames of a stream file.
    Frames(FramesArgs),
    /// Check requested stream options against supported ones.
    Check(CheckArgs),
    /// Encode IRIs (one per line) and print lookup rows and wire terms.
    EncodeIris(EncodeIrisArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Detect(args) => detect::run(args, format),
        Command::Delimit(args) => delimit::run(args, format),
        Command::Frames(args) => frames::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::EncodeIris(args) => encode_iris::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Stream file to inspect.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct DelimitArgs {
    /// File holding exactly one serialized frame.
    pub input: PathBuf,
    /// Destination file.
    pub output: PathBuf,
    /// Append to the destination instead of truncating it.
    #[arg(long)]
    pub append: bool,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Stream file to read.
    pub path: PathBuf,
    /// Largest accepted frame in bytes.
    #[arg(long, default_value_t = rdfstream_frame::DEFAULT_MAX_PAYLOAD)]
    pub max_frame_size: usize,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON file with the requested stream options.
    pub requested: PathBuf,
    /// JSON file with the supported options. Default: built-in decoder limits.
    #[arg(long, value_name = "FILE")]
    pub supported: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Small,
    Big,
}

impl Preset {
    pub fn options(self) -> StreamOptions {
        match self {
            Preset::Small => StreamOptions::small_strict(),
            Preset::Big => StreamOptions::big_strict(),
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeIrisArgs {
    /// File with one IRI per line. Default: stdin.
    pub input: Option<PathBuf>,
    /// Table size preset.
    #[arg(long, value_enum, default_value = "small")]
    pub preset: Preset,
    /// Disable the prefix table and encode whole IRIs as names.
    #[arg(long)]
    pub no_prefixes: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
