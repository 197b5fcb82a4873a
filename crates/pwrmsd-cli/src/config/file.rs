use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConformersConfig {
    #[serde(rename = "molecule-id")]
    pub molecule_id: Option<String>,
    pub adduct: Option<String>,
    #[serde(rename = "total-cycles")]
    pub total_cycles: Option<usize>,
    #[serde(rename = "total-geometries")]
    pub total_geometries: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePathsConfig {
    #[serde(rename = "geometry-root")]
    pub geometry_root: Option<PathBuf>,
    #[serde(rename = "result-dir")]
    pub result_dir: Option<PathBuf>,
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,
    #[serde(rename = "invalid-list")]
    pub invalid_list: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileAlignmentConfig {
    #[serde(rename = "include-hydrogens")]
    pub include_hydrogens: Option<bool>,
    pub symmetry: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub conformers: Option<FileConformersConfig>,
    pub paths: Option<FilePathsConfig>,
    pub alignment: Option<FileAlignmentConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_every_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pwrmsd.toml");
        fs::write(
            &path,
            r#"
            [conformers]
            molecule-id = "QBUVFDKTZJNUPP-BBROENKCNA-N"
            adduct = "+Na"
            total-cycles = 200
            total-geometries = 25

            [paths]
            geometry-root = "dft/mol"
            result-dir = "ccs"
            output-dir = "tables"
            invalid-list = "invalid.txt"

            [alignment]
            include-hydrogens = true
            symmetry = false
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let conformers = config.conformers.unwrap();
        assert_eq!(conformers.adduct.as_deref(), Some("+Na"));
        assert_eq!(conformers.total_cycles, Some(200));
        assert_eq!(
            config.paths.unwrap().output_dir,
            Some(PathBuf::from("tables"))
        );
        let alignment = config.alignment.unwrap();
        assert_eq!(alignment.include_hydrogens, Some(true));
        assert_eq!(alignment.symmetry, Some(false));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pwrmsd.toml");
        fs::write(&path, "[conformers]\nmolecule = \"x\"\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FileConfig::from_file(Path::new("/nonexistent/pwrmsd.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
