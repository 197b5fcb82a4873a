use std::path::PathBuf;

pub struct DefaultsConfig {
    pub total_cycles: usize,
    pub total_geometries: usize,
    pub geometry_root_parent: PathBuf,
    pub result_dir: PathBuf,
    pub output_dir: PathBuf,
    pub invalid_list: PathBuf,
    pub include_hydrogens: bool,
    pub symmetry: bool,
}

impl DefaultsConfig {
    /// `output/dft/{ID}_{ADD}`, the layout written by the upstream pipeline.
    pub fn geometry_root(&self, molecule_id: &str, adduct: &str) -> PathBuf {
        self.geometry_root_parent
            .join(format!("{}_{}", molecule_id, adduct))
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            total_cycles: 1000,
            total_geometries: 50,
            geometry_root_parent: PathBuf::from("output/dft"),
            result_dir: PathBuf::from("output/mobility/mobcal/conformer_ccs"),
            output_dir: PathBuf::from("pwRMSD"),
            invalid_list: PathBuf::from("invalid_conf_paths.txt"),
            include_hydrogens: false,
            symmetry: true,
        }
    }
}
