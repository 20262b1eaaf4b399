//! Read ledger rows from a CSV export (header row first).

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::raw::RawRow;

/// Read every data row from `reader`, keyed by the header row.
///
/// Rows shorter than the header leave the trailing columns absent; cells
/// under a blank header are ignored.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .collect();
        rows.push(row);
    }

    debug!(columns = headers.len(), rows = rows.len(), "read CSV rows");
    Ok(rows)
}

pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_rows(file)
}
