use crate::cli::RunArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pwrmsd::core::alignment::kabsch::KabschAligner;
use pwrmsd::engine::progress::ProgressReporter;
use pwrmsd::workflows::driver;
use std::time::Instant;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    if args.start > args.stop {
        return Err(CliError::Argument(format!(
            "START ({}) must not be greater than STOP ({})",
            args.start, args.stop
        )));
    }

    let config = config::build_config(&args.options)?;
    let aligner = KabschAligner::new(config.alignment.include_hydrogens)
        .with_symmetry(config.alignment.symmetry);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Computing pairwise RMSD tables for {} cycles {}..{}",
        config.conformers.label(),
        args.start,
        args.stop
    );
    info!("Invoking the driver workflow...");

    let started = Instant::now();
    let summary = driver::run(args.start..args.stop, &config, &aligner, &reporter)?;
    let elapsed_hours = started.elapsed().as_secs_f64() / 3600.0;

    println!(
        "{} of {} conformers are invalid (no result file).",
        summary.invalid_count,
        config.conformers.total_conformers()
    );
    println!(
        "Wrote {} table(s), skipped {} already present, in {:.3} hrs.",
        summary.computed.len(),
        summary.skipped.len(),
        elapsed_hours
    );
    if let Some(path) = &config.invalid_list_path {
        println!("Invalid conformer list written to: {}", path.display());
    }

    Ok(())
}
