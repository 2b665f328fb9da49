// Orchestration of one analysis run: load the roll-call CSV, apply the
// transformation rules, write out the scores or the transformed table.

use log::info;

use snafu::{prelude::*, Snafu};

use std::fs;

use serde::Serialize;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use vote_cohesion::*;

use crate::args::Args;

pub mod io_csv;

#[derive(Debug, Snafu)]
pub enum PipelineError {
    #[snafu(display("No input file provided, pass one with --input"))]
    MissingInput {},
    #[snafu(display("Unknown metric {name:?}, expected rice_index or adjusted_rice_index"))]
    UnknownMetric { name: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV record"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("The input file {path} has no header row"))]
    EmptyCsv { path: String },
    #[snafu(display("Malformed input table"))]
    BadTable { source: CohesionErrors },
    #[snafu(display("Error assembling the output CSV"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error serializing the JSON summary"))]
    JsonWrite { source: serde_json::Error },
    #[snafu(display("Error writing the results to {path}"))]
    WritingOutput { source: std::io::Error, path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Runs a complete analysis as described by the command line arguments.
pub fn run_analysis(args: &Args) -> PipelineResult<()> {
    let input = args.input.clone().context(MissingInputSnafu {})?;
    let metric = match &args.metric {
        Some(name) => Some(
            MetricKind::from_name(name).context(UnknownMetricSnafu {
                name: name.as_str(),
            })?,
        ),
        None => None,
    };
    let rules = AnalysisRules {
        metric,
        majority_percentual: args.majority_percentual,
        group_by: args.groupby.clone(),
        filters: metadata_filters(args),
    };

    let rollcall = io_csv::read_rollcall(&input, &VoteCoding::numeric())?;
    info!(
        "run_analysis: loaded {} rows over {} polls from {}",
        rollcall.num_rows(),
        rollcall.poll_names().len(),
        input
    );
    let outcome = run_cohesion_stats(rollcall, &rules).context(BadTableSnafu {})?;

    let rendered = match &args.out {
        Some(path) if path.ends_with(".json") => render_json(&outcome, &rules)?,
        _ => render_csv(&outcome)?,
    };
    write_output(&rendered, args.out.as_deref())
}

/// One filter per recognized metadata column; empty flag lists simply impose
/// no constraint downstream.
fn metadata_filters(args: &Args) -> Vec<MetadataFilter> {
    vec![
        MetadataFilter {
            column: "name".to_string(),
            values: args.name.clone(),
        },
        MetadataFilter {
            column: "party".to_string(),
            values: args.party.clone(),
        },
        MetadataFilter {
            column: "state".to_string(),
            values: args.state.clone(),
        },
    ]
}

fn render_csv(outcome: &AnalysisOutcome) -> PipelineResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    match outcome {
        AnalysisOutcome::Scores(scores) => {
            if scores.is_empty() {
                return Ok(String::new());
            }
            wtr.write_record(scores.iter().map(|s| s.poll.as_str()))
                .context(CsvWriteSnafu {})?;
            wtr.write_record(scores.iter().map(|s| match s.score {
                Some(x) => x.to_string(),
                None => String::new(),
            }))
            .context(CsvWriteSnafu {})?;
        }
        AnalysisOutcome::Table(view) => {
            if view.columns.is_empty() {
                return Ok(String::new());
            }
            wtr.write_record(&view.columns).context(CsvWriteSnafu {})?;
            for row in view.rows.iter() {
                wtr.write_record(row.iter().map(|c| c.clone().unwrap_or_default()))
                    .context(CsvWriteSnafu {})?;
            }
        }
    }
    let bytes = match wtr.into_inner() {
        Ok(bytes) => bytes,
        Err(e) => whatever!("Could not flush the output CSV: {}", e),
    };
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => whatever!("The output CSV is not valid UTF-8: {}", e),
    }
}

#[derive(Serialize, Debug, Clone)]
struct JsonSummary {
    metric: Option<String>,
    results: JSValue,
}

fn render_json(outcome: &AnalysisOutcome, rules: &AnalysisRules) -> PipelineResult<String> {
    let results = match outcome {
        AnalysisOutcome::Scores(scores) => {
            let mut polls: JSMap<String, JSValue> = JSMap::new();
            for s in scores.iter() {
                let score = s.score.map(JSValue::from).unwrap_or(JSValue::Null);
                polls.insert(s.poll.clone(), score);
            }
            JSValue::Object(polls)
        }
        AnalysisOutcome::Table(view) => {
            let mut rows: Vec<JSValue> = Vec::new();
            for row in view.rows.iter() {
                let mut cells: JSMap<String, JSValue> = JSMap::new();
                for (column, cell) in view.columns.iter().zip(row.iter()) {
                    let value = cell
                        .as_ref()
                        .map(|c| JSValue::from(c.as_str()))
                        .unwrap_or(JSValue::Null);
                    cells.insert(column.clone(), value);
                }
                rows.push(JSValue::Object(cells));
            }
            JSValue::Array(rows)
        }
    };
    let summary = JsonSummary {
        metric: rules.metric.map(|m| m.name().to_string()),
        results,
    };
    serde_json::to_string_pretty(&summary).context(JsonWriteSnafu {})
}

fn write_output(rendered: &str, out: Option<&str>) -> PipelineResult<()> {
    match out {
        None | Some("stdout") => {
            print!("{}", rendered);
            Ok(())
        }
        Some(path) => fs::write(path, rendered).context(WritingOutputSnafu { path }),
    }
}
