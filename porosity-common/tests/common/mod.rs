// NOTE: every test will complain about the functions it doesn't use
#![allow(unused)]

use std::path::{Path, PathBuf};

use image::RgbImage;
use porosity_common::utils::imgutils;
use tempfile::TempDir;

/// Returns a temporary directory inside cargo's tmpdir
pub fn tmp_dir() -> TempDir {
    TempDir::new_in(cargo_tmpdir()).expect("could not create temporary dir")
}

/// Returns cargo's tmpdir
pub fn cargo_tmpdir() -> PathBuf {
    PathBuf::from(option_env!("CARGO_TARGET_TMPDIR").expect("no cargo tmpdir???"))
}

/// Saves `img` as `name` inside `dir`, in the format of the extension
pub fn write_image(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    imgutils::save_as_extension(img, &path).expect("could not save the test image");
    path
}

/// Writes something that definitely is not a picture
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not a picture").expect("could not write garbage");
    path
}

/// Left `pore_columns` columns blue, the rest black
pub fn striped(width: u32, height: u32, pore_columns: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < pore_columns {
            image::Rgb([0, 0, 255])
        } else {
            image::Rgb([0, 0, 0])
        }
    })
}

pub fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).expect("could not read the dimensions")
}
