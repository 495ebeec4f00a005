use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{self, Context};
use porosity_common::{
    batch::{MASK_EXTENSION, MASK_SUFFIX},
    bin_common::init::init_eyre,
    porosity,
    utils::{fsutils, imgutils},
};

#[derive(Parser)]
#[command()]
/// Measures the porosity of whole pictures, without cropping them
struct Cli {
    /// Save the pore masks in this folder
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// The image files to measure
    inputs: Vec<PathBuf>,
}

fn main() -> eyre::Result<()> {
    init_eyre()?;
    let cli = Cli::parse();

    if let Some(output) = &cli.output {
        fsutils::ensure_dir(output)
            .wrap_err_with(|| format!("Could not create {output:?}"))?;
    }

    for input in cli.inputs {
        let pic = imgutils::open_rgb(&input)
            .wrap_err_with(|| format!("Could not open {input:?}"))?;

        let estimate = porosity::estimate(&pic);

        if let Some(output) = &cli.output {
            let mask_name =
                fsutils::replaced_file_name(&input, MASK_SUFFIX, MASK_EXTENSION);
            let mask_path = output.join(mask_name);
            imgutils::save_as_extension(&estimate.mask.0, &mask_path)
                .wrap_err_with(|| format!("Could not save to {mask_path:?}"))?;
        }

        let input = input.display();
        println!(
            "{input}: porosity={:.2} threshold={}",
            estimate.porosity, estimate.threshold
        );
    }

    Ok(())
}
