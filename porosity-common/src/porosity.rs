//! Estimates how much of a micrograph is pore space.
//!
//! The picture is converted to its blue-difference chroma channel, split in two with
//! Otsu's method and everything with a chroma above the threshold is counted as pore.

pub mod chroma;
pub mod otsu;

use image::RgbImage;

use crate::utils::{
    imgutils::{maskify_inverse, Mask},
    percent::Percent64,
};

use self::otsu::{otsu_threshold, Histogram};

pub struct Estimate {
    /// Percentage of the pixels that are pores
    pub porosity: Percent64,
    /// The chroma value separating pore from solid, pores are strictly above it
    pub threshold: u8,
    /// White where there are pores
    pub mask: Mask,
}

pub fn estimate(img: &RgbImage) -> Estimate {
    let chroma = chroma::blue_chroma_channel(img);
    let threshold = otsu_threshold(&Histogram::of(&chroma));

    // The inverse threshold marks the solid material, flipping it gives the pores.
    let mask = maskify_inverse(chroma, threshold).inverted();

    let porosity =
        Percent64::of_count(mask.count_white(), mask.total()).unwrap_or(Percent64::ZERO);

    Estimate {
        porosity,
        threshold,
        mask,
    }
}
