use crate::core::alignment::kabsch::KabschAligner;
use crate::core::alignment::{AlignmentError, Aligner};
use crate::core::io::traits::GeometryFile;
use crate::core::io::xyz::XyzFile;
use crate::core::models::atom::Atom;
use crate::core::models::conformer::{Conformer, ConformerId};
use crate::engine::config::{RunConfig, RunConfigBuilder};
use crate::engine::layout::ConformerLayout;
use nalgebra::Point3;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub const MOLECULE_ID: &str = "RWZYAGGXGHYGMB-UHFFFAOYSA-N";
pub const ADDUCT: &str = "+De";

/// A throwaway directory tree shaped like the upstream pipeline output.
pub struct Fixture {
    dir: TempDir,
    pub config: RunConfig,
}

impl Fixture {
    /// Creates the geometry root and an empty result directory; nothing else.
    pub fn new(total_cycles: usize, total_geometries: usize) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        let config = RunConfigBuilder::new()
            .molecule_id(MOLECULE_ID)
            .adduct(ADDUCT)
            .total_cycles(total_cycles)
            .total_geometries(total_geometries)
            .geometry_root(root.join("dft").join(format!("{}_{}", MOLECULE_ID, ADDUCT)))
            .result_dir(root.join("conformer_ccs"))
            .output_dir(root.join("pwRMSD"))
            .build()
            .expect("valid fixture config");
        fs::create_dir_all(&config.paths.geometry_root).unwrap();
        fs::create_dir_all(&config.paths.result_dir).unwrap();
        Self { dir, config }
    }

    /// Every geometry written and every result present.
    pub fn complete(total_cycles: usize, total_geometries: usize) -> Self {
        let fixture = Self::new(total_cycles, total_geometries);
        fixture.write_all_geometries();
        fixture.mark_all_valid();
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn layout(&self) -> ConformerLayout<'_> {
        ConformerLayout::new(&self.config)
    }

    pub fn mark_valid(&self, id: ConformerId) {
        fs::write(self.layout().result_path(id), "ccs\t123.4\n").unwrap();
    }

    pub fn mark_all_valid(&self) {
        for id in self.layout().all_ids() {
            self.mark_valid(id);
        }
    }

    pub fn write_geometry(&self, id: ConformerId) {
        let path = self.layout().geometry_path(id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        XyzFile::write_to_path(&conformer_for(id, self.config.conformers.total_geometries), &path)
            .unwrap();
    }

    pub fn write_all_geometries(&self) {
        for id in self.layout().all_ids() {
            self.write_geometry(id);
        }
    }
}

/// A small bent molecule whose angle opens up with the conformer's global index, so
/// distinct conformers have distinct, nonzero RMSDs.
pub fn conformer_for(id: ConformerId, total_geometries: usize) -> Conformer {
    let k = id.flat_index(total_geometries) as f64;
    Conformer::new(
        &id.to_string(),
        vec![
            Atom::new("C", Point3::new(0.0, 0.0, 0.0)),
            Atom::new("C", Point3::new(1.5, 0.0, 0.0)),
            Atom::new("O", Point3::new(2.0, 1.0 + 0.2 * k, 0.0)),
            Atom::new("H", Point3::new(-0.5, -0.9, 0.0)),
        ],
    )
}

/// Wraps the Kabsch aligner and counts how many comparisons were requested.
#[derive(Default)]
pub struct CountingAligner {
    inner: KabschAligner,
    calls: AtomicUsize,
}

impl CountingAligner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Aligner for CountingAligner {
    fn rmsd(&self, reference: &Conformer, target: &Conformer) -> Result<f64, AlignmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.rmsd(reference, target)
    }
}
