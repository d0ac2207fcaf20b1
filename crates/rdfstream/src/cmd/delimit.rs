use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use rdfstream_frame::{varint_len, write_frame_as_delimited};
use serde::Serialize;
use tracing::info;

use crate::cmd::DelimitArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct DelimitOutput {
    input: String,
    output: String,
    frame_size: usize,
    written: usize,
}

pub fn run(args: DelimitArgs, format: OutputFormat) -> CliResult<i32> {
    if args.input == args.output {
        return Err(CliError::new(
            USAGE,
            "input and output must be different files",
        ));
    }

    let frame = std::fs::read(&args.input)
        .map_err(|err| io_error(&format!("read {}", args.input.display()), err))?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(args.append)
        .truncate(!args.append)
        .open(&args.output)
        .map_err(|err| io_error(&format!("open {}", args.output.display()), err))?;
    let mut writer = BufWriter::new(file);
    write_frame_as_delimited(&frame, &mut writer).map_err(|err| frame_error("write", err))?;
    writer.flush().map_err(|err| io_error("flush", err))?;

    let out = DelimitOutput {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        frame_size: frame.len(),
        written: varint_len(frame.len() as u64) + frame.len(),
    };
    info!(frame_size = out.frame_size, written = out.written, "frame delimited");

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            ["INPUT", "OUTPUT", "FRAME SIZE", "WRITTEN"],
            [vec![
                out.input.clone(),
                out.output.clone(),
                out.frame_size.to_string(),
                out.written.to_string(),
            ]],
        ),
        OutputFormat::Pretty => println!(
            "wrote {} bytes ({}-byte frame) to {}",
            out.written, out.frame_size, out.output
        ),
    }
    Ok(SUCCESS)
}
