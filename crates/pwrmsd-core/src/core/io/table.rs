use crate::core::models::table::{PairwiseTable, Score, TableError};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const INDEX_HEADER: &str = "geometry";
const PARTIAL_SUFFIX: &str = "partial";

/// CSV persistence for [`PairwiseTable`].
///
/// The header is `geometry,0,1,...,N-1`, where `N` is the number of columns. Each record
/// starts with the geometry index of the row followed by one field per column; absent
/// scores are written as empty fields, which most dataframe readers load as NaN.
pub struct TableFile;

impl TableFile {
    pub fn write_to(table: &PairwiseTable, writer: impl Write) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let header = std::iter::once(INDEX_HEADER.to_string())
            .chain((0..table.total_columns()).map(|c| c.to_string()));
        csv_writer.write_record(header)?;

        for (index, row) in table.rows().enumerate() {
            let record =
                std::iter::once(index.to_string()).chain(row.iter().map(Score::to_string));
            csv_writer.write_record(record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn read_from(cycle: usize, reader: impl Read) -> Result<PairwiseTable, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let header = csv_reader.headers()?.clone();
        if header.get(0) != Some(INDEX_HEADER) {
            return Err(TableError::Malformed(format!(
                "first header field must be '{}'",
                INDEX_HEADER
            )));
        }
        let total_columns = header.len() - 1;

        let mut rows = Vec::new();
        for (record_index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let geometry: usize = record
                .get(0)
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| TableError::InvalidCell {
                    record: record_index,
                    column: 0,
                    value: record.get(0).unwrap_or_default().to_string(),
                })?;
            if geometry != record_index {
                return Err(TableError::Malformed(format!(
                    "record {} is labelled geometry {}",
                    record_index, geometry
                )));
            }

            let cells = record
                .iter()
                .skip(1)
                .enumerate()
                .map(|(column, field)| parse_cell(field, record_index, column))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }

        PairwiseTable::from_rows(cycle, total_columns, rows)
    }

    /// Writes the table to `path` without ever exposing a half-written file.
    ///
    /// Data goes to a `.partial` sibling first and is renamed over `path` once complete.
    pub fn write_to_path<P: AsRef<Path>>(table: &PairwiseTable, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let partial = partial_path(path);
        debug!("Writing table for cycle {} to {:?}", table.cycle(), &partial);

        let result = File::create(&partial)
            .map_err(TableError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                Self::write_to(table, &mut writer)?;
                writer.flush()?;
                Ok(())
            })
            .and_then(|_| fs::rename(&partial, path).map_err(TableError::from));

        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result
    }

    pub fn read_from_path<P: AsRef<Path>>(
        cycle: usize,
        path: P,
    ) -> Result<PairwiseTable, TableError> {
        let file = File::open(path)?;
        Self::read_from(cycle, file)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

fn parse_cell(field: &str, record: usize, column: usize) -> Result<Score, TableError> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Ok(Score::Absent);
    }
    field
        .parse()
        .map(Score::Rmsd)
        .map_err(|_| TableError::InvalidCell {
            record,
            column: column + 1,
            value: field.to_string(),
        })
}
