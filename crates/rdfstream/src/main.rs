mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rdfstream", version, about = "Streaming RDF encoding tools")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "RDFSTREAM_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "rdfstream",
            "check",
            "requested.json",
            "--supported",
            "supported.json",
        ])
        .expect("check args should parse");

        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn parses_encode_iris_with_preset() {
        let cli = Cli::try_parse_from([
            "rdfstream",
            "--format",
            "json",
            "encode-iris",
            "--preset",
            "big",
            "--no-prefixes",
        ])
        .expect("encode-iris args should parse");

        let Command::EncodeIris(args) = cli.command else {
            panic!("expected encode-iris");
        };
        assert!(args.no_prefixes);
        assert!(args.input.is_none());
    }

    #[test]
    fn rejects_unknown_preset() {
        let err = Cli::try_parse_from(["rdfstream", "encode-iris", "--preset", "huge"])
            .expect_err("unknown preset should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn delimit_requires_output() {
        let err = Cli::try_parse_from(["rdfstream", "delimit", "in.bin"])
            .expect_err("missing output should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
