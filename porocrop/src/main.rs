use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{self, Context};
use porosity_common::{
    batch::{self, BatchConfig},
    bin_common::{
        args::borders::BordersCli,
        init::{init_eyre, init_logger},
        termination::StopRequest,
    },
};

#[derive(Parser)]
#[command()]
/// Crops every picture in a folder and measures how porous the rest is
struct Cli {
    #[command(flatten)]
    borders: BordersCli,

    /// Also write the log to this file
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Also log the threshold of every picture
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Folder with the pictures to process
    input: PathBuf,

    /// Folder to put the cropped pictures and masks in, created if missing
    output: PathBuf,
}

fn main() -> eyre::Result<()> {
    init_eyre()?;
    let cli = Cli::parse();
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    init_logger(level, cli.logfile.as_deref())?;

    let config = BatchConfig::new(&cli.input, &cli.output, cli.borders.to_args())
        .wrap_err("invalid arguments")?;

    let stop = StopRequest::install().wrap_err("failed to install the signal handlers")?;
    let report =
        batch::process_until(&config, stop.poll()).wrap_err("the batch failed")?;

    print!("{}", report.results);

    if report.cancelled {
        log::warn!("Interrupted, not all pictures were processed");
    }
    log::info!(
        "Done! {} processed, {} skipped",
        report.results.len(),
        report.skipped.len()
    );

    Ok(())
}
