use crate::core::alignment::Aligner;
use crate::core::io::traits::GeometryFile;
use crate::core::io::xyz::XyzFile;
use crate::core::models::conformer::{Conformer, ConformerId};
use crate::core::models::table::Score;
use crate::engine::config::RunConfig;
use crate::engine::error::EngineError;
use crate::engine::invalid::InvalidSet;
use crate::engine::layout::ConformerLayout;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Computes the table row of one conformer slot.
///
/// The row spans every conformer of the run. Cells for slots at or before `id` in
/// cycle-major order are [`Score::Absent`], since those pairs belong to earlier rows or to
/// the self-comparison. If `id` itself is invalid, the whole row is absent and no
/// comparison is attempted. Otherwise every later conformer is compared in parallel, each
/// task yielding [`Score::Absent`] when its own target is invalid.
///
/// # Errors
///
/// Returns [`EngineError::Geometry`] if a geometry of a valid conformer cannot be read, or
/// [`EngineError::Alignment`] if the aligner rejects a pair.
#[instrument(skip_all, name = "pairwise_row_task", fields(cycle = id.cycle, geometry = id.geometry))]
pub fn run<A>(
    id: ConformerId,
    config: &RunConfig,
    invalid: &InvalidSet,
    aligner: &A,
) -> Result<Vec<Score>, EngineError>
where
    A: Aligner + ?Sized,
{
    let layout = ConformerLayout::new(config);
    let total_columns = config.conformers.total_conformers();
    let prev = id.flat_index(config.conformers.total_geometries);

    let mut row = Vec::with_capacity(total_columns);
    row.resize(prev, Score::Absent);
    row.push(Score::Absent);

    let reference_path = layout.geometry_path(id);
    if invalid.contains(&reference_path) {
        debug!("Conformer {} is invalid; row left empty.", id);
        row.resize(total_columns, Score::Absent);
        return Ok(row);
    }

    let targets: Vec<PathBuf> = layout
        .later_ids(id)
        .map(|target| layout.geometry_path(target))
        .collect();

    let reference = if targets.iter().any(|t| !invalid.contains(t)) {
        Some(load_geometry(&reference_path)?)
    } else {
        None
    };

    trace!(comparisons = targets.len(), "Dispatching comparisons.");

    #[cfg(not(feature = "parallel"))]
    let iterator = targets.iter();

    #[cfg(feature = "parallel")]
    let iterator = targets.par_iter();

    let scores: Vec<Score> = iterator
        .map(|target| compare(&reference_path, reference.as_ref(), target, invalid, aligner))
        .collect::<Result<_, _>>()?;

    row.extend(scores);

    if row.len() != total_columns {
        return Err(EngineError::Internal(format!(
            "row for {} has {} cells, expected {}",
            id,
            row.len(),
            total_columns
        )));
    }
    Ok(row)
}

fn compare<A>(
    reference_path: &Path,
    reference: Option<&Conformer>,
    target_path: &Path,
    invalid: &InvalidSet,
    aligner: &A,
) -> Result<Score, EngineError>
where
    A: Aligner + ?Sized,
{
    let Some(reference) = reference.filter(|_| !invalid.contains(target_path)) else {
        return Ok(Score::Absent);
    };

    let target = load_geometry(target_path)?;
    let rmsd = aligner
        .rmsd(reference, &target)
        .map_err(|source| EngineError::Alignment {
            reference: reference_path.to_path_buf(),
            target: target_path.to_path_buf(),
            source,
        })?;
    Ok(Score::Rmsd(rmsd))
}

fn load_geometry(path: &Path) -> Result<Conformer, EngineError> {
    XyzFile::read_from_path(path).map_err(|source| EngineError::Geometry {
        path: path.to_path_buf(),
        source,
    })
}
