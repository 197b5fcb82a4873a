use crate::cli::ScanArgs;
use crate::config;
use crate::error::Result;
use pwrmsd::workflows::driver;
use tracing::info;

pub fn run(args: ScanArgs) -> Result<()> {
    let config = config::build_config(&args.options)?;

    info!("Scanning {:?} for result files...", &config.paths.result_dir);
    let invalid = driver::scan(&config)?;

    if args.print {
        for path in invalid.iter() {
            println!("{}", path.display());
        }
    }

    println!(
        "{} of {} conformers are invalid.",
        invalid.len(),
        config.conformers.total_conformers()
    );
    if let Some(path) = &config.invalid_list_path {
        println!("List written to: {}", path.display());
    }

    Ok(())
}
