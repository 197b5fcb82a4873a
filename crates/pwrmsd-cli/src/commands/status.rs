use crate::cli::StatusArgs;
use crate::config;
use crate::error::{CliError, Result};
use pwrmsd::workflows::driver;

pub fn run(args: StatusArgs) -> Result<()> {
    if args.start > args.stop {
        return Err(CliError::Argument(format!(
            "START ({}) must not be greater than STOP ({})",
            args.start, args.stop
        )));
    }

    let config = config::build_config(&args.options)?;
    let statuses = driver::status(args.start..args.stop, &config)?;

    let mut complete = 0;
    for status in &statuses {
        let state = if status.complete {
            complete += 1;
            "complete"
        } else {
            "pending"
        };
        println!(
            "cycle {:04}  {:<8}  {}",
            status.cycle + 1,
            state,
            status.table_path.display()
        );
    }
    println!("{} of {} cycle(s) complete.", complete, statuses.len());

    Ok(())
}
