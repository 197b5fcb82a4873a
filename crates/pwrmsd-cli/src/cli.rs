use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "pwrmsd - Pairwise RMSD between the conformers of a generative quantum-chemistry run, written as one table per cycle.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for pairwise comparisons.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute and write the pairwise RMSD tables of a range of cycles.
    Run(RunArgs),
    /// Only scan for invalid conformers and write their list.
    Scan(ScanArgs),
    /// Show which cycles of a range already have a table.
    Status(StatusArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// First cycle to process (zero-based, inclusive).
    #[arg(value_name = "START")]
    pub start: usize,

    /// Cycle to stop at (zero-based, exclusive).
    #[arg(value_name = "STOP")]
    pub stop: usize,

    #[command(flatten)]
    pub options: RunOptions,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Also print every invalid conformer path to standard output.
    #[arg(long)]
    pub print: bool,

    #[command(flatten)]
    pub options: RunOptions,
}

/// Arguments for the `status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// First cycle to report (zero-based, inclusive).
    #[arg(value_name = "START")]
    pub start: usize,

    /// Cycle to stop at (zero-based, exclusive).
    #[arg(value_name = "STOP")]
    pub stop: usize,

    #[command(flatten)]
    pub options: RunOptions,
}

/// Options describing the run, shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Conformer Set ---
    /// Molecule identifier, e.g. an InChIKey.
    #[arg(long, value_name = "ID")]
    pub molecule_id: Option<String>,

    /// Adduct label, e.g. '+Na'.
    #[arg(long, value_name = "ADDUCT", allow_hyphen_values = true)]
    pub adduct: Option<String>,

    /// Number of cycles produced upstream.
    #[arg(long, value_name = "INT")]
    pub total_cycles: Option<usize>,

    /// Number of geometries produced per cycle.
    #[arg(long, value_name = "INT")]
    pub total_geometries: Option<usize>,

    // --- Paths ---
    /// Root of the per-conformer geometry tree.
    /// Defaults to 'output/dft/{ID}_{ADDUCT}'.
    #[arg(long, value_name = "PATH")]
    pub geometry_root: Option<PathBuf>,

    /// Directory holding the per-conformer result (.tsv) files.
    #[arg(long, value_name = "PATH")]
    pub result_dir: Option<PathBuf>,

    /// Directory receiving the per-cycle tables.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Where to write the list of invalid conformer paths.
    #[arg(long, value_name = "PATH", conflicts_with = "no_save_invalid")]
    pub invalid_list: Option<PathBuf>,

    /// Do not write the list of invalid conformer paths.
    #[arg(long)]
    pub no_save_invalid: bool,

    // --- Alignment ---
    /// Override `alignment.include-hydrogens` from the config file.
    #[command(flatten)]
    pub hydrogens: HydrogenSelection,

    /// Match atoms strictly by file order, without swapping equivalent atoms.
    #[arg(long)]
    pub no_symmetry: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S conformers.total-cycles=200
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// A group to handle mutually exclusive flags for hydrogen handling during alignment.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct HydrogenSelection {
    /// Include hydrogens in the superposition.
    #[arg(long)]
    pub include_hydrogens: bool,
    /// Exclude hydrogens from the superposition.
    #[arg(long)]
    pub exclude_hydrogens: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_parses_positional_cycle_range() {
        let cli = Cli::try_parse_from([
            "pwrmsd",
            "run",
            "10",
            "20",
            "--molecule-id",
            "QBUVFDKTZJNUPP-BBROENKCNA-N",
            "--adduct",
            "+Na",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.start, 10);
                assert_eq!(args.stop, 20);
                assert_eq!(args.options.adduct.as_deref(), Some("+Na"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn adduct_may_start_with_a_hyphen() {
        let cli = Cli::try_parse_from(["pwrmsd", "scan", "--adduct", "-H"]).unwrap();
        match cli.command {
            Commands::Scan(args) => assert_eq!(args.options.adduct.as_deref(), Some("-H")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn run_requires_both_cycle_bounds() {
        assert!(Cli::try_parse_from(["pwrmsd", "run", "3"]).is_err());
    }

    #[test]
    fn hydrogen_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "pwrmsd",
            "scan",
            "--include-hydrogens",
            "--exclude-hydrogens",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pwrmsd", "-q", "-v", "scan"]).is_err());
    }

    #[test]
    fn global_options_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["pwrmsd", "status", "0", "5", "-vv", "-j", "4"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
    }
}
