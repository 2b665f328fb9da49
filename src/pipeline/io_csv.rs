// Primitives for reading the roll-call CSV files.

use log::debug;

use snafu::prelude::*;

use vote_cohesion::builder::Builder;
use vote_cohesion::{Rollcall, VoteCoding};

use crate::pipeline::*;

/// Reads a roll-call table from a CSV file: a header row naming the columns,
/// then one row of raw cells per voter. Ragged rows are rejected by the CSV
/// reader before the table is even assembled.
pub fn read_rollcall(path: &str, coding: &VoteCoding) -> PipelineResult<Rollcall> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header = match records.next() {
        Some(record) => record.context(CsvLineParseSnafu {})?,
        None => return EmptyCsvSnafu { path }.fail(),
    };
    let columns: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    debug!("read_rollcall: header: {:?}", columns);

    let mut builder = Builder::new(coding)
        .columns(&columns)
        .context(BadTableSnafu {})?;
    for record in records {
        let record = record.context(CsvLineParseSnafu {})?;
        let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        builder.add_row(&cells).context(BadTableSnafu {})?;
    }
    builder.build().context(BadTableSnafu {})
}
