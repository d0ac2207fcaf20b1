use std::path::Path;

use rdfstream_core::{check_compatibility, StreamOptions};
use serde::Serialize;

use crate::cmd::CheckArgs;
use crate::exit::{io_error, json_error, stream_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct CheckOutput<'a> {
    compatible: bool,
    requested: &'a StreamOptions,
    supported: &'a StreamOptions,
    logical_type_iri: Option<String>,
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let requested = read_options(&args.requested)?;
    let supported = match &args.supported {
        Some(path) => read_options(path)?,
        None => StreamOptions::default_supported(),
    };

    check_compatibility(&requested, &supported)
        .map_err(|err| stream_error("incompatible stream options", err))?;

    let out = CheckOutput {
        compatible: true,
        requested: &requested,
        supported: &supported,
        logical_type_iri: requested.logical_type.rdf_stax_type(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Stream options are compatible:");
            println!("  Version:           {}", requested.version);
            println!("  Physical type:     {}", requested.physical_type);
            println!("  Logical type:      {}", requested.logical_type);
            if let Some(iri) = &out.logical_type_iri {
                println!("  RDF-STaX type:     {iri}");
            }
            println!(
                "  Tables:            name={} prefix={} datatype={}",
                requested.max_name_table_size,
                requested.max_prefix_table_size,
                requested.max_datatype_table_size
            );
        }
    }
    Ok(SUCCESS)
}

fn read_options(path: &Path) -> CliResult<StreamOptions> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("read {}", path.display()), err))?;
    serde_json::from_str(&raw).map_err(|err| json_error(&format!("parse {}", path.display()), err))
}
