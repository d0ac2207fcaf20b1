use std::fs::File;
use std::io::{BufRead, BufReader};

use rdfstream_core::{EncoderConfig, RdfIri, TableRow, TermEncoder};
use serde::Serialize;
use tracing::debug;

use crate::cmd::EncodeIrisArgs;
use crate::exit::{io_error, stream_error, CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct EncodedLine {
    iri: String,
    rows: Vec<TableRow>,
    term: RdfIri,
}

pub fn run(args: EncodeIrisArgs, format: OutputFormat) -> CliResult<i32> {
    let mut options = args.preset.options();
    if args.no_prefixes {
        options.max_prefix_table_size = 0;
    }
    let mut encoder: TermEncoder<String, Vec<TableRow>> =
        TermEncoder::new(&EncoderConfig::from_options(&options), Vec::new())
            .map_err(|err| stream_error("encoder", err))?;

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|err| {
            io_error(&format!("open {}", path.display()), err)
        })?)),
        None => Box::new(std::io::stdin().lock()),
    };

    let mut encoded = Vec::new();
    for line in input.lines() {
        let line = line.map_err(|err| io_error("read", err))?;
        let iri = line.trim();
        if iri.is_empty() {
            continue;
        }
        let term = encoder.encode_iri(iri);
        encoded.push(EncodedLine {
            iri: iri.to_string(),
            rows: std::mem::take(encoder.sink_mut()),
            term,
        });
    }
    debug!(
        iris = encoded.len(),
        names = encoder.name_table().len(),
        "encoded IRIs"
    );

    match format {
        OutputFormat::Json => {
            for line in &encoded {
                print_json(line);
            }
        }
        OutputFormat::Table => print_table(
            ["IRI", "ROWS", "PREFIX", "NAME"],
            encoded.iter().map(|line| {
                vec![
                    line.iri.clone(),
                    describe_rows(&line.rows),
                    line.term.prefix_id.to_string(),
                    line.term.name_id.to_string(),
                ]
            }),
        ),
        OutputFormat::Pretty => {
            for line in &encoded {
                for row in &line.rows {
                    println!("  + {}", describe_row(row));
                }
                println!(
                    "{} -> ({}, {})",
                    line.iri, line.term.prefix_id, line.term.name_id
                );
            }
        }
    }
    Ok(SUCCESS)
}

fn describe_row(row: &TableRow) -> String {
    let entry = row.entry();
    format!("{}[{}]={}", row.table_name(), entry.id, entry.value)
}

fn describe_rows(rows: &[TableRow]) -> String {
    rows.iter().map(describe_row).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use rdfstream_core::EntryRow;

    use super::*;

    #[test]
    fn rows_are_described_compactly() {
        let rows = vec![
            TableRow::Prefix(EntryRow {
                id: 0,
                value: "http://e.org/".into(),
            }),
            TableRow::Name(EntryRow {
                id: 3,
                value: "a".into(),
            }),
        ];
        assert_eq!(describe_rows(&rows), "prefix[0]=http://e.org/, name[3]=a");
    }
}
