use std::fs::File;
use std::io::{BufReader, Read};

use rdfstream_frame::{autodetect_delimiting, read_delimited_frame, read_framed_stream};
use serde::Serialize;
use tracing::debug;

use crate::cmd::FramesArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{hex_preview, print_json, print_table, OutputFormat};

const PREVIEW_LEN: usize = 8;

#[derive(Serialize)]
struct FrameInfo {
    index: usize,
    size: usize,
    preview: String,
}

#[derive(Serialize)]
struct FramesOutput {
    path: String,
    delimited: bool,
    frames: Vec<FrameInfo>,
}

pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.path)
        .map_err(|err| io_error(&format!("open {}", args.path.display()), err))?;
    let detected = autodetect_delimiting(file).map_err(|err| frame_error("detect", err))?;
    let mut input = BufReader::new(detected.input);

    let mut frames = Vec::new();
    if detected.is_delimited {
        read_framed_stream(
            &mut input,
            |r| read_delimited_frame(r, args.max_frame_size),
            |frame| frames.push(frame.to_vec()),
        )
        .map_err(|err| frame_error("read frames", err))?;
    } else {
        let mut frame = Vec::new();
        input
            .read_to_end(&mut frame)
            .map_err(|err| io_error("read frame", err))?;
        frames.push(frame);
    }
    debug!(count = frames.len(), delimited = detected.is_delimited, "frames read");

    let out = FramesOutput {
        path: args.path.display().to_string(),
        delimited: detected.is_delimited,
        frames: frames
            .iter()
            .enumerate()
            .map(|(index, frame)| FrameInfo {
                index,
                size: frame.len(),
                preview: hex_preview(&frame[..frame.len().min(PREVIEW_LEN)]),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            ["#", "SIZE", "PREVIEW"],
            out.frames
                .iter()
                .map(|f| vec![f.index.to_string(), f.size.to_string(), f.preview.clone()]),
        ),
        OutputFormat::Pretty => {
            println!(
                "{} ({}, {} frames)",
                out.path,
                if out.delimited {
                    "delimited"
                } else {
                    "non-delimited"
                },
                out.frames.len()
            );
            for f in &out.frames {
                println!("  #{} size={} [{}]", f.index, f.size, f.preview);
            }
        }
    }
    Ok(SUCCESS)
}
