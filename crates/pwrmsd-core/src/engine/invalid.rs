use super::config::RunConfig;
use super::error::EngineError;
use super::layout::{ConformerLayout, RESULT_EXTENSION};
use crate::core::models::conformer::ConformerId;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Geometry paths of the conformers whose downstream result file is missing.
///
/// Computed once at the start of a run and only read afterwards. Iteration follows the
/// cycle-major order in which the conformers were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidSet {
    ordered: Vec<PathBuf>,
    lookup: HashSet<PathBuf>,
}

impl InvalidSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut set = Self::new();
        for path in paths {
            if set.lookup.insert(path.clone()) {
                set.ordered.push(path);
            }
        }
        set
    }

    pub fn contains(&self, geometry_path: &Path) -> bool {
        self.lookup.contains(geometry_path)
    }

    pub fn contains_id(&self, layout: &ConformerLayout<'_>, id: ConformerId) -> bool {
        self.contains(&layout.geometry_path(id))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.ordered.iter().map(PathBuf::as_path)
    }

    /// Writes one path per line, creating the parent directory when needed.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let io_err = |source: io::Error| EngineError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        for item in &self.ordered {
            writeln!(writer, "{}", item.display()).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;

        info!(count = self.len(), "Invalid conformer list written to {:?}", path);
        Ok(())
    }
}

/// Finds every expected conformer whose result file is absent from the result directory.
///
/// The result directory is listed once; only `*.tsv` entries count. An empty or missing
/// directory is not an error: every expected conformer is then reported as invalid.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the result directory exists but cannot be listed.
#[instrument(skip_all, name = "invalid_scan")]
pub fn find_invalid_conformers(config: &RunConfig) -> Result<InvalidSet, EngineError> {
    let layout = ConformerLayout::new(config);
    let present = list_result_files(&config.paths.result_dir)?;
    debug!(
        present = present.len(),
        "Listed result directory {:?}", &config.paths.result_dir
    );

    let invalid = InvalidSet::from_paths(
        layout
            .all_ids()
            .filter(|&id| !present.contains(&layout.result_file_name(id)))
            .map(|id| layout.geometry_path(id)),
    );

    info!(
        invalid = invalid.len(),
        expected = config.conformers.total_conformers(),
        "Invalid conformer scan complete."
    );
    Ok(invalid)
}

fn list_result_files(dir: &Path) -> Result<HashSet<String>, EngineError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Result directory {:?} does not exist; treating it as empty.", dir);
            return Ok(HashSet::new());
        }
        Err(source) => {
            return Err(EngineError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut names = HashSet::new();
    for entry in entries {
        let entry = entry.map_err(|source| EngineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RESULT_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}
