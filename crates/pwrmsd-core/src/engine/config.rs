use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// The molecule whose conformers are compared, and how many the upstream pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformerSet {
    /// Molecule identifier, typically an InChIKey.
    pub molecule_id: String,
    /// Adduct label, e.g. `+Na`.
    pub adduct: String,
    pub total_cycles: usize,
    pub total_geometries: usize,
}

impl ConformerSet {
    /// The `{ID}_{ADD}` prefix shared by every file name of the run.
    pub fn label(&self) -> String {
        format!("{}_{}", self.molecule_id, self.adduct)
    }

    pub fn total_conformers(&self) -> usize {
        self.total_cycles * self.total_geometries
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    /// Root of the per-conformer geometry tree (`cycle_XXXX_geomYY/...xyz`).
    pub geometry_root: PathBuf,
    /// Flat directory of per-conformer result files, only tested for presence.
    pub result_dir: PathBuf,
    /// Directory receiving one table per cycle.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentConfig {
    pub include_hydrogens: bool,
    /// Let topologically equivalent atoms trade places during superposition.
    pub symmetry: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            include_hydrogens: false,
            symmetry: true,
        }
    }
}

/// Everything a run needs. Every path is absolute once built, so derived paths and the
/// saved invalid list mean the same thing from any working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub conformers: ConformerSet,
    pub paths: PathLayout,
    pub alignment: AlignmentConfig,
    /// Where to write the list of invalid conformer paths, if anywhere.
    pub invalid_list_path: Option<PathBuf>,
}

#[derive(Default)]
pub struct RunConfigBuilder {
    molecule_id: Option<String>,
    adduct: Option<String>,
    total_cycles: Option<usize>,
    total_geometries: Option<usize>,
    geometry_root: Option<PathBuf>,
    result_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    include_hydrogens: bool,
    symmetry: Option<bool>,
    invalid_list_path: Option<PathBuf>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn molecule_id(mut self, id: impl Into<String>) -> Self {
        self.molecule_id = Some(id.into());
        self
    }
    pub fn adduct(mut self, adduct: impl Into<String>) -> Self {
        self.adduct = Some(adduct.into());
        self
    }
    pub fn total_cycles(mut self, n: usize) -> Self {
        self.total_cycles = Some(n);
        self
    }
    pub fn total_geometries(mut self, n: usize) -> Self {
        self.total_geometries = Some(n);
        self
    }
    pub fn geometry_root(mut self, path: PathBuf) -> Self {
        self.geometry_root = Some(path);
        self
    }
    pub fn result_dir(mut self, path: PathBuf) -> Self {
        self.result_dir = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn include_hydrogens(mut self, include: bool) -> Self {
        self.include_hydrogens = include;
        self
    }
    pub fn symmetry(mut self, symmetry: bool) -> Self {
        self.symmetry = Some(symmetry);
        self
    }
    pub fn invalid_list_path(mut self, path: Option<PathBuf>) -> Self {
        self.invalid_list_path = path;
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let molecule_id = non_empty(
            "molecule_id",
            self.molecule_id
                .ok_or(ConfigError::MissingParameter("molecule_id"))?,
        )?;
        let adduct = non_empty(
            "adduct",
            self.adduct.ok_or(ConfigError::MissingParameter("adduct"))?,
        )?;
        let total_cycles = positive(
            "total_cycles",
            self.total_cycles
                .ok_or(ConfigError::MissingParameter("total_cycles"))?,
        )?;
        let total_geometries = positive(
            "total_geometries",
            self.total_geometries
                .ok_or(ConfigError::MissingParameter("total_geometries"))?,
        )?;

        // file names only have room for 4-digit cycles and 2-digit geometries
        if total_cycles > 9999 {
            return Err(ConfigError::InvalidParameter {
                name: "total_cycles",
                reason: format!("{} exceeds the four-digit cycle label", total_cycles),
            });
        }
        if total_geometries > 99 {
            return Err(ConfigError::InvalidParameter {
                name: "total_geometries",
                reason: format!("{} exceeds the two-digit geometry label", total_geometries),
            });
        }

        let paths = PathLayout {
            geometry_root: absolute(
                "geometry_root",
                self.geometry_root
                    .ok_or(ConfigError::MissingParameter("geometry_root"))?,
            )?,
            result_dir: absolute(
                "result_dir",
                self.result_dir
                    .ok_or(ConfigError::MissingParameter("result_dir"))?,
            )?,
            output_dir: absolute(
                "output_dir",
                self.output_dir
                    .ok_or(ConfigError::MissingParameter("output_dir"))?,
            )?,
        };
        let invalid_list_path = self
            .invalid_list_path
            .map(|path| absolute("invalid_list_path", path))
            .transpose()?;

        Ok(RunConfig {
            conformers: ConformerSet {
                molecule_id,
                adduct,
                total_cycles,
                total_geometries,
            },
            paths,
            alignment: AlignmentConfig {
                include_hydrogens: self.include_hydrogens,
                symmetry: self.symmetry.unwrap_or(true),
            },
            invalid_list_path,
        })
    }
}

fn non_empty(name: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

fn absolute(name: &'static str, path: PathBuf) -> Result<PathBuf, ConfigError> {
    std::path::absolute(&path).map_err(|e| ConfigError::InvalidParameter {
        name,
        reason: format!("cannot resolve {:?}: {}", path, e),
    })
}

fn positive(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}
