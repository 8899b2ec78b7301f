use log::{debug, info, warn};

use election_graph::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use chrono::Local;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_common;
pub mod io_tsv;
pub mod summary;

#[cfg(test)]
mod fixtures;

use crate::report::config_reader::*;
use crate::report::io_common::*;
use crate::report::io_tsv::read_table;
use crate::report::summary::build_summary;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error reading table {path}"))]
    ReadingTable { source: csv::Error, path: String },
    #[snafu(display("Error writing table {path}"))]
    WritingTable { source: csv::Error, path: String },
    #[snafu(display("Empty table {path}"))]
    EmptyTable { path: String },
    #[snafu(display("No delimiter found in the header of {path}: {line:?}"))]
    MissingDelimiter { path: String, line: String },
    #[snafu(display("Error loading {path}"))]
    Loading { source: LoadError, path: String },
    #[snafu(display("Error summarizing contest {contest_id}"))]
    Summarizing {
        source: LoadError,
        contest_id: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

pub fn read_json(path: &Path) -> ReportResult<JSValue> {
    let p = display_path(path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: p.clone() })?;
    debug!("read_json: {}: {} bytes", p, contents.len());
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: p })
}

/// Loads the election file, then the contest statuses and the detailed
/// results when the configuration asks for them.
pub fn load_election(config: &ReportConfig, paths: &ReportPaths) -> ReportResult<ElectionGraph> {
    let root = read_json(&paths.election)?;
    let build_time = Local::now().naive_local();
    let mut graph = build_graph(root, Some(build_time)).context(LoadingSnafu {
        path: display_path(&paths.election),
    })?;
    info!(
        "load_election: loaded {} contests from {}",
        graph.election.contests.len(),
        display_path(&paths.election)
    );

    if config.load_status() {
        let status_path = display_path(&paths.contest_status);
        let records = match read_json(&paths.contest_status)? {
            JSValue::Array(l) => l,
            _ => whatever!("{}: expected a list of contest statuses", status_path),
        };
        apply_contest_status(&mut graph.election, records)
            .context(LoadingSnafu { path: status_path })?;
    }

    if config.load_results() {
        let contest_ids: Vec<String> = graph
            .election
            .contests
            .iter()
            .map(|c| c.id.clone())
            .collect();
        for contest_id in contest_ids {
            let path = paths.contest_results(&contest_id);
            let table = read_table(&path)?;
            graph
                .election
                .load_contest_results(&contest_id, &table.header, table.rows)
                .context(LoadingSnafu {
                    path: display_path(&path),
                })?;
        }
    }
    Ok(graph)
}

fn write_summary(out: Option<&str>, pretty_js: &str) -> ReportResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("write_summary: writing summary to {}", path);
            fs::write(path, pretty_js).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

fn check_summary(reference_path: &str, pretty_js: &str) -> ReportResult<()> {
    let summary_ref = read_json(Path::new(reference_path))?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js {
        warn!("Found differences with the reference summary {}", reference_path);
        print_diff(pretty_js_summary_ref.as_str(), pretty_js, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("check_summary: summary matches {}", reference_path);
    Ok(())
}

fn merge_args(args: &Args) -> ReportResult<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(Path::new(path))?,
        None => ReportConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input_directory = Some(input.clone());
    }
    if let Some(stat) = &args.continuing_stat {
        config.continuing_stat_id = Some(stat.clone());
    }
    Ok(config)
}

pub fn run_report(args: &Args) -> ReportResult<()> {
    let config = merge_args(args)?;
    info!("config: {:?}", config);
    let paths = ReportPaths::from_config(&config)?;

    let graph = load_election(&config, &paths)?;

    let summary = build_summary(&graph, &config.continuing_stat_id())?;
    let pretty_js = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
    write_summary(args.out.as_deref(), &pretty_js)?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_summary(reference_path, &pretty_js)?;
    }

    Ok(())
}
