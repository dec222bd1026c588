// Primitives for reading CSV files.

use log::debug;
use snafu::prelude::*;

use crate::report::{
    io_common::{normalize_cell, simplify_file_name},
    *,
};

pub fn read_csv_dataset(path: &str) -> RepResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let columns: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_dataset: columns: {:?}", columns);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        ensure!(
            line.len() == columns.len(),
            CsvLineLengthSnafu {
                lineno,
                found: line.len(),
                expected: columns.len(),
            }
        );
        rows.push(line.iter().map(normalize_cell).collect());
    }
    debug!(
        "read_csv_dataset: {} rows in {}",
        rows.len(),
        simplify_file_name(path)
    );

    Ok(Dataset { columns, rows })
}
