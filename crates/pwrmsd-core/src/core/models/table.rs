use std::fmt;
use thiserror::Error;

/// A single cell of a pairwise table.
///
/// Cells that are not computed by the owning row (self-comparisons, comparisons owned by
/// an earlier row, and comparisons touching an invalid conformer) are [`Score::Absent`].
/// A computed RMSD of exactly zero is still [`Score::Rmsd`], so it never collides with a
/// placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Score {
    #[default]
    Absent,
    Rmsd(f64),
}

impl Score {
    pub fn is_absent(&self) -> bool {
        matches!(self, Score::Absent)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Absent => None,
            Score::Rmsd(v) => Some(*v),
        }
    }
}

impl From<Option<f64>> for Score {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Score::Absent, Score::Rmsd)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Absent => Ok(()),
            Score::Rmsd(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row index {row} is out of range for a table with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("Invalid value '{value}' in record {record}, column {column}")]
    InvalidCell {
        record: usize,
        column: usize,
        value: String,
    },
    #[error("Malformed table: {0}")]
    Malformed(String),
}

/// The scores computed while processing one cycle.
///
/// Rows are indexed by the geometry index within the cycle; columns span every
/// conformer of the run in cycle-major order, so each row holds exactly
/// `total_columns` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseTable {
    cycle: usize,
    total_columns: usize,
    rows: Vec<Vec<Score>>,
}

impl PairwiseTable {
    /// Creates a table of `num_rows` rows, every cell [`Score::Absent`].
    pub fn new(cycle: usize, num_rows: usize, total_columns: usize) -> Self {
        Self {
            cycle,
            total_columns,
            rows: vec![vec![Score::Absent; total_columns]; num_rows],
        }
    }

    pub(crate) fn from_rows(
        cycle: usize,
        total_columns: usize,
        rows: Vec<Vec<Score>>,
    ) -> Result<Self, TableError> {
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != total_columns {
                return Err(TableError::RowLength {
                    row,
                    expected: total_columns,
                    found: cells.len(),
                });
            }
        }
        Ok(Self {
            cycle,
            total_columns,
            rows,
        })
    }

    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    /// Replaces a whole row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowOutOfRange`] if `row` does not exist, or
    /// [`TableError::RowLength`] if `cells` does not span every column.
    pub fn set_row(&mut self, row: usize, cells: Vec<Score>) -> Result<(), TableError> {
        let rows = self.rows.len();
        let slot = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfRange { row, rows })?;
        if cells.len() != self.total_columns {
            return Err(TableError::RowLength {
                row,
                expected: self.total_columns,
                found: cells.len(),
            });
        }
        *slot = cells;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<&[Score]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<Score> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Score]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterates over every computed score as `(row, column, rmsd)`.
    pub fn rmsd_values(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(c, score)| score.value().map(|v| (r, c, v)))
        })
    }

    pub fn computed_count(&self) -> usize {
        self.rmsd_values().count()
    }
}
