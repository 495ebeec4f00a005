//! Crops every picture in a folder and measures the porosity of what is left.

pub mod results;

use std::{
    io,
    path::{Path, PathBuf},
};

use image::{EncodableLayout, ImageBuffer, ImageError, PixelWithColorType};

use crate::{
    bin_common::args::borders::BordersArgs,
    porosity,
    utils::{fsutils, imgutils},
};

use self::results::{PorosityResult, ResultTable};

pub const CROPPED_SUFFIX: &str = "_cropped";
pub const MASK_SUFFIX: &str = "_otsu";
pub const MASK_EXTENSION: &str = "png";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no input folder was given")]
    MissingInputFolder,
    #[error("no output folder was given")]
    MissingOutputFolder,
    #[error("the input folder {0:?} is not a directory")]
    InputNotADirectory(PathBuf),
}

/// Errors that abort a whole batch
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("could not create the output folder {path:?}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not list the input folder {path:?}")]
    InputFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single picture didn't produce a result. The batch continues with the next one.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("could not read the image")]
    UnreadableImage(#[source] ImageError),
    #[error("the borders don't fit inside the {width}x{height} image")]
    InvalidCropGeometry { width: u32, height: u32 },
    #[error("could not write {path:?}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: ResultTable,
    pub skipped: Vec<Skipped>,
    /// The batch was asked to stop before all pictures were processed
    pub cancelled: bool,
}

#[derive(Clone, Debug)]
pub struct BatchConfig {
    input: PathBuf,
    output: PathBuf,
    borders: BordersArgs,
}

impl BatchConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        borders: BordersArgs,
    ) -> Result<Self, ConfigError> {
        let input = input.into();
        let output = output.into();

        if input.as_os_str().is_empty() {
            return Err(ConfigError::MissingInputFolder);
        }
        if output.as_os_str().is_empty() {
            return Err(ConfigError::MissingOutputFolder);
        }
        if !input.is_dir() {
            return Err(ConfigError::InputNotADirectory(input));
        }

        Ok(Self {
            input,
            output,
            borders,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn borders(&self) -> BordersArgs {
        self.borders
    }
}

/// Runs the whole batch and only returns the table
pub fn run_batch(config: &BatchConfig) -> Result<ResultTable, BatchError> {
    process(config).map(|report| report.results)
}

pub fn process(config: &BatchConfig) -> Result<BatchReport, BatchError> {
    process_until(config, || false)
}

/// Same as [`process`], but `should_stop` is asked before every picture and the batch
/// ends early if it returns true.
pub fn process_until<F>(
    config: &BatchConfig,
    mut should_stop: F,
) -> Result<BatchReport, BatchError>
where
    F: FnMut() -> bool,
{
    fsutils::ensure_dir(&config.output).map_err(|source| BatchError::OutputFolder {
        path: config.output.clone(),
        source,
    })?;

    let files =
        fsutils::image_files(&config.input).map_err(|source| BatchError::InputFolder {
            path: config.input.clone(),
            source,
        })?;
    log::info!("Found {} pictures in {:?}", files.len(), config.input);

    let mut report = BatchReport::default();
    for file in files {
        if should_stop() {
            log::warn!("Stopping before {file:?}");
            report.cancelled = true;
            break;
        }

        match process_one(&file, config) {
            Ok(result) => {
                log::info!("{}: {:.2}", result.image, result.porosity);
                report.results.push(result);
            }
            Err(reason) => {
                log::warn!("Skipping {file:?}: {reason}");
                report.skipped.push(Skipped { path: file, reason });
            }
        }
    }

    Ok(report)
}

fn process_one(file: &Path, config: &BatchConfig) -> Result<PorosityResult, SkipReason> {
    let img = imgutils::open_rgb(file).map_err(SkipReason::UnreadableImage)?;

    let (width, height) = img.dimensions();
    let rect = config
        .borders
        .crop_rect(width, height)
        .ok_or(SkipReason::InvalidCropGeometry { width, height })?;
    let cropped = imgutils::crop(&img, rect);
    drop(img);

    let cropped_name = fsutils::suffixed_file_name(file, CROPPED_SUFFIX);
    let cropped_path = config.output.join(&cropped_name);
    save(&cropped, &cropped_path)?;

    let estimate = porosity::estimate(&cropped);
    log::debug!("{cropped_path:?}: otsu threshold {}", estimate.threshold);

    let mask_name =
        fsutils::replaced_file_name(&cropped_name, MASK_SUFFIX, MASK_EXTENSION);
    save(&estimate.mask.0, &config.output.join(mask_name))?;

    Ok(PorosityResult {
        image: cropped_name.to_string_lossy().into_owned(),
        porosity: estimate.porosity,
    })
}

fn save<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, path: &Path) -> Result<(), SkipReason>
where
    P: PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    imgutils::save_as_extension(img, path).map_err(|source| SkipReason::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
