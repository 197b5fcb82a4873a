use crate::core::alignment::Aligner;
use crate::core::io::table::TableFile;
use crate::core::models::conformer::ConformerId;
use crate::core::models::table::PairwiseTable;
use crate::engine::config::RunConfig;
use crate::engine::error::EngineError;
use crate::engine::invalid::InvalidSet;
use crate::engine::layout::ConformerLayout;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Builds the pairwise table of `cycle`, one row per geometry in geometry order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCycleRange`] if `cycle` is outside the run, and
/// propagates any failure of the row computations.
#[instrument(skip_all, name = "cycle_workflow", fields(cycle = cycle))]
pub fn build_table<A>(
    cycle: usize,
    config: &RunConfig,
    invalid: &InvalidSet,
    aligner: &A,
    reporter: &ProgressReporter,
) -> Result<PairwiseTable, EngineError>
where
    A: Aligner + ?Sized,
{
    let total_cycles = config.conformers.total_cycles;
    if cycle >= total_cycles {
        return Err(EngineError::InvalidCycleRange {
            start: cycle,
            stop: cycle + 1,
            total: total_cycles,
        });
    }

    let total_geometries = config.conformers.total_geometries;
    let mut table = PairwiseTable::new(
        cycle,
        total_geometries,
        config.conformers.total_conformers(),
    );

    reporter.report(Progress::PhaseStart {
        name: format!("Cycle {:04}", cycle + 1),
    });
    reporter.report(Progress::TaskStart {
        total_steps: total_geometries as u64,
    });

    for geometry in 0..total_geometries {
        let row = tasks::pairwise_row::run(
            ConformerId::new(cycle, geometry),
            config,
            invalid,
            aligner,
        )?;
        table
            .set_row(geometry, row)
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        computed = table.computed_count(),
        "Cycle {:04} table complete.",
        cycle + 1
    );
    Ok(table)
}

/// Builds the table of `cycle` and writes it to its artifact path.
///
/// The output directory is created if needed. The artifact only appears once the table
/// is complete, so a failed cycle leaves nothing behind.
///
/// # Return
///
/// The path of the written table.
pub fn write_table<A>(
    cycle: usize,
    config: &RunConfig,
    invalid: &InvalidSet,
    aligner: &A,
    reporter: &ProgressReporter,
) -> Result<PathBuf, EngineError>
where
    A: Aligner + ?Sized,
{
    let table = build_table(cycle, config, invalid, aligner, reporter)?;

    let output_dir = &config.paths.output_dir;
    fs::create_dir_all(output_dir).map_err(|source| EngineError::Io {
        path: output_dir.clone(),
        source,
    })?;

    let path = ConformerLayout::new(config).table_path(cycle);
    TableFile::write_to_path(&table, &path).map_err(|source| EngineError::Table {
        path: path.clone(),
        source,
    })?;

    info!("Wrote {:?}", &path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::kabsch::KabschAligner;
    use crate::core::models::table::Score;
    use crate::engine::invalid::find_invalid_conformers;
    use crate::testing::{CountingAligner, Fixture};
    use std::sync::Mutex;

    #[test]
    fn all_valid_cycle_is_upper_triangular() {
        let fixture = Fixture::complete(3, 2);
        let invalid = find_invalid_conformers(&fixture.config).unwrap();

        for cycle in 0..3 {
            let table = build_table(
                cycle,
                &fixture.config,
                &invalid,
                &KabschAligner::default(),
                &ProgressReporter::new(),
            )
            .unwrap();

            assert_eq!(table.num_rows(), 2);
            for (geometry, row) in table.rows().enumerate() {
                let own = ConformerId::new(cycle, geometry).flat_index(2);
                for (column, cell) in row.iter().enumerate() {
                    if column <= own {
                        assert!(cell.is_absent(), "cell ({}, {}) should be absent", geometry, column);
                    } else {
                        assert!(!cell.is_absent(), "cell ({}, {}) should be scored", geometry, column);
                    }
                }
            }
        }
    }

    #[test]
    fn self_comparison_is_never_scored() {
        let fixture = Fixture::complete(2, 3);
        let table = build_table(
            1,
            &fixture.config,
            &InvalidSet::new(),
            &KabschAligner::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        for geometry in 0..3 {
            let own = ConformerId::new(1, geometry).flat_index(3);
            assert_eq!(table.cell(geometry, own), Some(Score::Absent));
        }
    }

    #[test]
    fn invalid_slot_gets_an_empty_row_and_no_alignment() {
        let fixture = Fixture::new(2, 2);
        fixture.write_all_geometries();
        fixture.mark_all_valid();
        let dead = ConformerId::new(0, 1);
        std::fs::remove_file(fixture.layout().result_path(dead)).unwrap();
        let invalid = find_invalid_conformers(&fixture.config).unwrap();
        let aligner = CountingAligner::default();

        let table = build_table(
            0,
            &fixture.config,
            &invalid,
            &aligner,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(table.row(1).unwrap().iter().all(Score::is_absent));
        // row 0 compares against (0,1) [invalid], (1,0) and (1,1)
        assert_eq!(table.cell(0, 1), Some(Score::Absent));
        assert_eq!(aligner.calls(), 2);
    }

    #[test]
    fn progress_reports_one_increment_per_geometry() {
        let fixture = Fixture::complete(1, 3);
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        build_table(
            0,
            &fixture.config,
            &InvalidSet::new(),
            &KabschAligner::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        assert_eq!(increments, 3);
        assert!(matches!(&events[0], Progress::PhaseStart { name } if name == "Cycle 0001"));
        assert!(matches!(events.last(), Some(Progress::PhaseFinish)));
    }

    #[test]
    fn cycle_outside_run_is_rejected() {
        let fixture = Fixture::complete(2, 2);
        let result = build_table(
            2,
            &fixture.config,
            &InvalidSet::new(),
            &KabschAligner::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidCycleRange { total: 2, .. })
        ));
    }

    #[test]
    fn written_table_matches_built_table() {
        let fixture = Fixture::complete(2, 2);
        let invalid = InvalidSet::new();
        let aligner = KabschAligner::default();

        let path = write_table(0, &fixture.config, &invalid, &aligner, &ProgressReporter::new())
            .unwrap();
        let built = build_table(0, &fixture.config, &invalid, &aligner, &ProgressReporter::new())
            .unwrap();

        assert_eq!(path, fixture.layout().table_path(0));
        let reread = TableFile::read_from_path(0, &path).unwrap();
        assert_eq!(reread, built);
    }

    #[test]
    fn failed_cycle_leaves_no_artifact() {
        let fixture = Fixture::new(1, 2);
        fixture.mark_all_valid();
        fixture.write_geometry(ConformerId::new(0, 0));

        let result = write_table(
            0,
            &fixture.config,
            &InvalidSet::new(),
            &KabschAligner::default(),
            &ProgressReporter::new(),
        );

        assert!(matches!(result, Err(EngineError::Geometry { .. })));
        assert!(!fixture.layout().table_path(0).exists());
    }
}
