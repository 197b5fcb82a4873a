use super::cycle;
use crate::core::alignment::Aligner;
use crate::engine::config::RunConfig;
use crate::engine::error::EngineError;
use crate::engine::invalid::{InvalidSet, find_invalid_conformers};
use crate::engine::layout::ConformerLayout;
use crate::engine::progress::{Progress, ProgressReporter};
use std::ops::Range;
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles whose table was computed and written by this run.
    pub computed: Vec<usize>,
    /// Cycles whose table already existed and was left untouched.
    pub skipped: Vec<usize>,
    pub invalid_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStatus {
    pub cycle: usize,
    pub table_path: PathBuf,
    pub complete: bool,
}

/// Computes the invalid set and, if the configuration names a list file, saves it there.
pub fn scan(config: &RunConfig) -> Result<InvalidSet, EngineError> {
    let invalid = find_invalid_conformers(config)?;
    if let Some(path) = &config.invalid_list_path {
        invalid.save(path)?;
    }
    Ok(invalid)
}

/// Processes the cycles in `range` (zero-based, end exclusive) one after the other.
///
/// The invalid set is computed once up front. A cycle whose table already exists is
/// skipped without being read or validated, so disjoint ranges can be spread over several
/// processes or nodes and an interrupted run can simply be restarted.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCycleRange`] if the range does not fit the run, and stops
/// at the first cycle that fails; tables written before the failure are kept.
#[instrument(skip_all, name = "driver", fields(start = range.start, stop = range.end))]
pub fn run<A>(
    range: Range<usize>,
    config: &RunConfig,
    aligner: &A,
    reporter: &ProgressReporter,
) -> Result<RunSummary, EngineError>
where
    A: Aligner + ?Sized,
{
    validate_range(&range, config)?;

    let invalid = scan(config)?;
    let layout = ConformerLayout::new(config);
    let mut summary = RunSummary {
        invalid_count: invalid.len(),
        ..Default::default()
    };
    reporter.report(Progress::Message(format!(
        "{} of {} conformers have no result file",
        invalid.len(),
        config.conformers.total_conformers()
    )));

    for c in range {
        let table_path = layout.table_path(c);
        if table_path.is_file() {
            info!("Table {:?} already exists; skipping cycle {:04}.", &table_path, c + 1);
            reporter.report(Progress::CycleSkipped { cycle: c });
            summary.skipped.push(c);
            continue;
        }

        cycle::write_table(c, config, &invalid, aligner, reporter)?;
        summary.computed.push(c);
    }

    info!(
        computed = summary.computed.len(),
        skipped = summary.skipped.len(),
        "Run finished."
    );
    Ok(summary)
}

/// Reports which cycles in `range` already have a table on disk.
pub fn status(range: Range<usize>, config: &RunConfig) -> Result<Vec<CycleStatus>, EngineError> {
    validate_range(&range, config)?;
    let layout = ConformerLayout::new(config);
    Ok(range
        .map(|cycle| {
            let table_path = layout.table_path(cycle);
            let complete = table_path.is_file();
            CycleStatus {
                cycle,
                table_path,
                complete,
            }
        })
        .collect())
}

fn validate_range(range: &Range<usize>, config: &RunConfig) -> Result<(), EngineError> {
    let total = config.conformers.total_cycles;
    if range.start > range.end || range.end > total {
        return Err(EngineError::InvalidCycleRange {
            start: range.start,
            stop: range.end,
            total,
        });
    }
    Ok(())
}
