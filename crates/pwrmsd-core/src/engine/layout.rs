use super::config::RunConfig;
use crate::core::models::conformer::ConformerId;
use itertools::iproduct;
use std::path::PathBuf;

pub const GEOMETRY_EXTENSION: &str = "xyz";
pub const RESULT_EXTENSION: &str = "tsv";
pub const TABLE_EXTENSION: &str = "csv";

/// Maps conformer identifiers of one run to the paths of its input and output files.
///
/// ```text
/// {geometry_root}/cycle_0001_geom02/{ID}_{ADD}_0001_geom02.xyz
/// {result_dir}/{ID}_{ADD}_0001_geom02.tsv
/// {output_dir}/{ID}_{ADD}_cycle0001_pwrmsd.csv
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConformerLayout<'a> {
    config: &'a RunConfig,
}

impl<'a> ConformerLayout<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    fn stem(&self, id: ConformerId) -> String {
        format!(
            "{}_{}_geom{}",
            self.config.conformers.label(),
            id.cycle_label(),
            id.geometry_label()
        )
    }

    pub fn geometry_path(&self, id: ConformerId) -> PathBuf {
        self.config
            .paths
            .geometry_root
            .join(id.to_string())
            .join(format!("{}.{}", self.stem(id), GEOMETRY_EXTENSION))
    }

    pub fn result_file_name(&self, id: ConformerId) -> String {
        format!("{}.{}", self.stem(id), RESULT_EXTENSION)
    }

    pub fn result_path(&self, id: ConformerId) -> PathBuf {
        self.config.paths.result_dir.join(self.result_file_name(id))
    }

    /// Path of the persisted table for `cycle` (zero-based; the name is one-based).
    pub fn table_path(&self, cycle: usize) -> PathBuf {
        self.config.paths.output_dir.join(format!(
            "{}_cycle{:04}_pwrmsd.{}",
            self.config.conformers.label(),
            cycle + 1,
            TABLE_EXTENSION
        ))
    }

    /// Every conformer of the run in cycle-major order.
    pub fn all_ids(&self) -> impl Iterator<Item = ConformerId> {
        let conformers = &self.config.conformers;
        iproduct!(0..conformers.total_cycles, 0..conformers.total_geometries)
            .map(|(cycle, geometry)| ConformerId::new(cycle, geometry))
    }

    /// The conformers compared against `id`: the later geometries of its own cycle,
    /// followed by every geometry of every later cycle.
    pub fn later_ids(&self, id: ConformerId) -> impl Iterator<Item = ConformerId> {
        let conformers = &self.config.conformers;
        let same_cycle = (id.geometry + 1..conformers.total_geometries)
            .map(move |geometry| ConformerId::new(id.cycle, geometry));
        let later_cycles = iproduct!(
            id.cycle + 1..conformers.total_cycles,
            0..conformers.total_geometries
        )
        .map(|(cycle, geometry)| ConformerId::new(cycle, geometry));
        same_cycle.chain(later_cycles)
    }
}
