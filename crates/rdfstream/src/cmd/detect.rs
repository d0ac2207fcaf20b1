use std::fs::File;
use std::io::Read;

use rdfstream_frame::autodetect_delimiting;
use serde::Serialize;

use crate::cmd::DetectArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{hex_preview, print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct DetectOutput {
    path: String,
    delimited: bool,
    leading_bytes: String,
}

pub fn run(args: DetectArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.path)
        .map_err(|err| io_error(&format!("open {}", args.path.display()), err))?;
    let detected = autodetect_delimiting(file).map_err(|err| frame_error("detect", err))?;

    let mut leading = Vec::with_capacity(3);
    detected
        .input
        .take(3)
        .read_to_end(&mut leading)
        .map_err(|err| io_error("read", err))?;

    let out = DetectOutput {
        path: args.path.display().to_string(),
        delimited: detected.is_delimited,
        leading_bytes: hex_preview(&leading),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            ["PATH", "DELIMITED", "LEADING BYTES"],
            [vec![
                out.path.clone(),
                out.delimited.to_string(),
                out.leading_bytes.clone(),
            ]],
        ),
        OutputFormat::Pretty => println!(
            "{}: {} (leading bytes: {})",
            out.path,
            if out.delimited {
                "delimited"
            } else {
                "non-delimited"
            },
            out.leading_bytes
        ),
    }
    Ok(SUCCESS)
}
