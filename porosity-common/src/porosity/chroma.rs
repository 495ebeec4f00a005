//! Luma/chroma conversion of 8-bit RGB, done in 14-bit fixed point so the results match
//! what common computer vision libraries produce for the same pixels.

use image::{GrayImage, Luma, Rgb, RgbImage};

const SHIFT: u32 = 14;
const ROUND: i32 = 1 << (SHIFT - 1);
const CHROMA_OFFSET: i32 = 128 << SHIFT;

const R_TO_Y: i32 = 4899;
const G_TO_Y: i32 = 9617;
const B_TO_Y: i32 = 1868;
const B_TO_CB: i32 = 9241;

fn descale(x: i32) -> i32 {
    (x + ROUND) >> SHIFT
}

fn luma_i32(Rgb([r, g, b]): Rgb<u8>) -> i32 {
    descale(r as i32 * R_TO_Y + g as i32 * G_TO_Y + b as i32 * B_TO_Y)
}

pub fn luma(rgb: Rgb<u8>) -> u8 {
    // NOTE: the coefficients sum to 1 << SHIFT so this never leaves 0..=255
    luma_i32(rgb) as u8
}

/// The blue-difference chroma (Cb) of a pixel
pub fn blue_chroma(rgb: Rgb<u8>) -> u8 {
    let y = luma_i32(rgb);
    let cb = descale((rgb[2] as i32 - y) * B_TO_CB + CHROMA_OFFSET);
    cb.clamp(u8::MIN.into(), u8::MAX.into()) as u8
}

/// Extracts the Cb channel of every pixel
pub fn blue_chroma_channel(img: &RgbImage) -> GrayImage {
    let mut channel = GrayImage::new(img.width(), img.height());
    channel
        .pixels_mut()
        .zip(img.pixels())
        .for_each(|(cb, rgb)| *cb = Luma([blue_chroma(*rgb)]));
    channel
}
