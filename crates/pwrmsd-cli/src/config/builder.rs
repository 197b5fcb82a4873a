use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::RunOptions;
use crate::error::{CliError, Result};
use pwrmsd::engine::config::{RunConfig, RunConfigBuilder};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Resolves the run configuration from command-line options, `--set` overrides,
/// the optional TOML file and the built-in defaults, in that order of precedence.
pub fn build_config(options: &RunOptions) -> Result<RunConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &options.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &options.set_values)?;

    let conformers_file = file_config.conformers.take().unwrap_or_default();
    let molecule_id = options
        .molecule_id
        .clone()
        .or(conformers_file.molecule_id)
        .ok_or_else(|| {
            CliError::Config(
                "A molecule identifier is required (--molecule-id or `conformers.molecule-id`)"
                    .to_string(),
            )
        })?;
    let adduct = options
        .adduct
        .clone()
        .or(conformers_file.adduct)
        .ok_or_else(|| {
            CliError::Config(
                "An adduct is required (--adduct or `conformers.adduct`)".to_string(),
            )
        })?;
    let total_cycles = options
        .total_cycles
        .or(conformers_file.total_cycles)
        .unwrap_or(defaults.total_cycles);
    let total_geometries = options
        .total_geometries
        .or(conformers_file.total_geometries)
        .unwrap_or(defaults.total_geometries);

    let paths_file = file_config.paths.take().unwrap_or_default();
    let geometry_root = options
        .geometry_root
        .clone()
        .or(paths_file.geometry_root)
        .unwrap_or_else(|| defaults.geometry_root(&molecule_id, &adduct));
    let result_dir = options
        .result_dir
        .clone()
        .or(paths_file.result_dir)
        .unwrap_or_else(|| defaults.result_dir.clone());
    let output_dir = options
        .output_dir
        .clone()
        .or(paths_file.output_dir)
        .unwrap_or_else(|| defaults.output_dir.clone());
    let invalid_list_path = resolve_invalid_list(options, paths_file.invalid_list, &defaults);

    let alignment_file = file_config.alignment.take().unwrap_or_default();
    let include_hydrogens = match (
        options.hydrogens.include_hydrogens,
        options.hydrogens.exclude_hydrogens,
    ) {
        (true, false) => true,
        (false, true) => false,
        _ => alignment_file
            .include_hydrogens
            .unwrap_or(defaults.include_hydrogens),
    };
    let symmetry = !options.no_symmetry
        && alignment_file.symmetry.unwrap_or(defaults.symmetry);

    let config = RunConfigBuilder::new()
        .molecule_id(molecule_id)
        .adduct(adduct)
        .total_cycles(total_cycles)
        .total_geometries(total_geometries)
        .geometry_root(geometry_root)
        .result_dir(result_dir)
        .output_dir(output_dir)
        .include_hydrogens(include_hydrogens)
        .symmetry(symmetry)
        .invalid_list_path(invalid_list_path)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!("Resolved run configuration: {:?}", &config);
    Ok(config)
}

fn resolve_invalid_list(
    options: &RunOptions,
    file_val: Option<PathBuf>,
    defaults: &DefaultsConfig,
) -> Option<PathBuf> {
    if options.no_save_invalid {
        return None;
    }
    Some(
        options
            .invalid_list
            .clone()
            .or(file_val)
            .unwrap_or_else(|| defaults.invalid_list.clone()),
    )
}

fn parse_set_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key.trim() {
            "conformers.molecule-id" => {
                config
                    .conformers
                    .get_or_insert_with(Default::default)
                    .molecule_id = Some(value_str.to_string());
            }
            "conformers.adduct" => {
                config.conformers.get_or_insert_with(Default::default).adduct =
                    Some(value_str.to_string());
            }
            "conformers.total-cycles" => {
                config
                    .conformers
                    .get_or_insert_with(Default::default)
                    .total_cycles = Some(parse_set_value(key, value_str, "integer")?);
            }
            "conformers.total-geometries" => {
                config
                    .conformers
                    .get_or_insert_with(Default::default)
                    .total_geometries = Some(parse_set_value(key, value_str, "integer")?);
            }
            "paths.geometry-root" => {
                config.paths.get_or_insert_with(Default::default).geometry_root =
                    Some(PathBuf::from(value_str));
            }
            "paths.result-dir" => {
                config.paths.get_or_insert_with(Default::default).result_dir =
                    Some(PathBuf::from(value_str));
            }
            "paths.output-dir" => {
                config.paths.get_or_insert_with(Default::default).output_dir =
                    Some(PathBuf::from(value_str));
            }
            "paths.invalid-list" => {
                config.paths.get_or_insert_with(Default::default).invalid_list =
                    Some(PathBuf::from(value_str));
            }
            "alignment.include-hydrogens" => {
                config
                    .alignment
                    .get_or_insert_with(Default::default)
                    .include_hydrogens = Some(parse_set_value(key, value_str, "boolean")?);
            }
            "alignment.symmetry" => {
                config.alignment.get_or_insert_with(Default::default).symmetry =
                    Some(parse_set_value(key, value_str, "boolean")?);
            }
            other => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    other
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::HydrogenSelection;
    use std::fs;
    use tempfile::tempdir;

    const ID: &str = "QBUVFDKTZJNUPP-BBROENKCNA-N";

    fn base_options() -> RunOptions {
        RunOptions {
            molecule_id: Some(ID.to_string()),
            adduct: Some("+Na".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_everything_not_given() {
        let config = build_config(&base_options()).unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(config.conformers.total_cycles, 1000);
        assert_eq!(config.conformers.total_geometries, 50);
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            config.paths.geometry_root,
            cwd.join("output/dft/QBUVFDKTZJNUPP-BBROENKCNA-N_+Na")
        );
        assert_eq!(config.paths.result_dir, cwd.join(&defaults.result_dir));
        assert_eq!(config.paths.output_dir, cwd.join("pwRMSD"));
        assert_eq!(
            config.invalid_list_path,
            Some(cwd.join("invalid_conf_paths.txt"))
        );
        assert!(!config.alignment.include_hydrogens);
        assert!(config.alignment.symmetry);
    }

    #[test]
    fn missing_molecule_id_is_a_config_error() {
        let options = RunOptions {
            adduct: Some("+H".to_string()),
            ..Default::default()
        };
        assert!(matches!(build_config(&options), Err(CliError::Config(_))));
    }

    #[test]
    fn file_values_are_used_and_cli_wins_over_them() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("pwrmsd.toml");
        fs::write(
            &cfg_path,
            r#"
            [conformers]
            molecule-id = "BXNJHAXVSOCGBA-UHFFFAOYSA-N"
            adduct = "+H"
            total-cycles = 200
            total-geometries = 20

            [paths]
            result-dir = "ccs"
            output-dir = "from-file"

            [alignment]
            include-hydrogens = true
            "#,
        )
        .unwrap();

        let options = RunOptions {
            config: Some(cfg_path),
            total_cycles: Some(10),
            output_dir: Some(PathBuf::from("from-cli")),
            ..Default::default()
        };
        let config = build_config(&options).unwrap();

        assert_eq!(config.conformers.molecule_id, "BXNJHAXVSOCGBA-UHFFFAOYSA-N");
        assert_eq!(config.conformers.total_cycles, 10);
        assert_eq!(config.conformers.total_geometries, 20);
        assert!(config.paths.result_dir.ends_with("ccs"));
        assert!(config.paths.output_dir.ends_with("from-cli"));
        assert!(
            config
                .paths
                .geometry_root
                .ends_with("output/dft/BXNJHAXVSOCGBA-UHFFFAOYSA-N_+H")
        );
        assert!(config.alignment.include_hydrogens);
    }

    #[test]
    fn set_values_override_the_file() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("pwrmsd.toml");
        fs::write(&cfg_path, "[conformers]\ntotal-geometries = 20\n").unwrap();

        let mut options = base_options();
        options.config = Some(cfg_path);
        options.set_values = vec![
            "conformers.total-geometries=5".to_string(),
            "paths.invalid-list=lists/invalid.txt".to_string(),
            "alignment.include-hydrogens=true".to_string(),
        ];
        let config = build_config(&options).unwrap();

        assert_eq!(config.conformers.total_geometries, 5);
        let list = config.invalid_list_path.unwrap();
        assert!(list.is_absolute());
        assert!(list.ends_with("lists/invalid.txt"));
        assert!(config.alignment.include_hydrogens);
    }

    #[test]
    fn unknown_set_key_is_rejected() {
        let mut options = base_options();
        options.set_values = vec!["conformers.cycles=3".to_string()];
        let err = build_config(&options).unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration key"));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let mut options = base_options();
        options.set_values = vec!["conformers.total-cycles".to_string()];
        assert!(matches!(build_config(&options), Err(CliError::Config(_))));

        options.set_values = vec!["conformers.total-cycles=many".to_string()];
        assert!(matches!(build_config(&options), Err(CliError::Config(_))));
    }

    #[test]
    fn exclude_hydrogens_flag_overrides_file() {
        let mut options = base_options();
        options.set_values = vec!["alignment.include-hydrogens=true".to_string()];
        options.hydrogens = HydrogenSelection {
            include_hydrogens: false,
            exclude_hydrogens: true,
        };
        assert!(!build_config(&options).unwrap().alignment.include_hydrogens);
    }

    #[test]
    fn symmetry_follows_file_unless_disabled_on_command_line() {
        let mut options = base_options();
        options.set_values = vec!["alignment.symmetry=false".to_string()];
        assert!(!build_config(&options).unwrap().alignment.symmetry);

        let mut options = base_options();
        options.no_symmetry = true;
        assert!(!build_config(&options).unwrap().alignment.symmetry);
    }

    #[test]
    fn no_save_invalid_disables_the_list() {
        let mut options = base_options();
        options.no_save_invalid = true;
        assert!(build_config(&options).unwrap().invalid_list_path.is_none());
    }

    #[test]
    fn core_validation_errors_surface_as_config_errors() {
        let mut options = base_options();
        options.total_geometries = Some(0);
        let err = build_config(&options).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("total_geometries"));
    }
}
