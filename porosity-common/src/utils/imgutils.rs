use std::{
    fs::{self, File},
    io::{BufWriter, Cursor, Write},
    path::Path,
};

use image::imageops::{crop_imm, invert};
use image::io::Reader;
use image::math::Rect;
use image::{
    DynamicImage, EncodableLayout, GrayImage, ImageBuffer, ImageFormat,
    ImageOutputFormat, ImageResult, Pixel, PixelWithColorType, RgbImage,
};

pub const WHITE: u8 = u8::MAX;
pub const BLACK: u8 = u8::MIN;

/// Quality used when writing JPEGs.
pub const JPEG_QUALITY: u8 = 95;

/// A binary image where every pixel is either [`WHITE`] or [`BLACK`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mask(pub GrayImage);

impl Mask {
    /// Swaps white and black
    pub fn inverted(mut self) -> Self {
        invert(&mut self.0);
        self
    }

    pub fn count_white(&self) -> u64 {
        self.0.pixels().filter(|p| p[0] == WHITE).count() as u64
    }

    pub fn total(&self) -> u64 {
        self.0.width() as u64 * self.0.height() as u64
    }
}

pub fn filled(width: u32, height: u32, red: u8, green: u8, blue: u8) -> RgbImage {
    let mut buf = ImageBuffer::new(width, height);
    buf.enumerate_pixels_mut()
        .for_each(|(_, _, pixel)| *pixel = image::Rgb([red, green, blue]));
    buf
}

pub fn construct_gray(raw: &[&[u8]]) -> GrayImage {
    assert!(raw.windows(2).all(|w| w[0].len() == w[1].len()));
    let height = raw.len() as u32;
    let width = raw.iter().next().map(|row| row.len()).unwrap_or(0) as u32;
    GrayImage::from_fn(width, height, |x, y| {
        image::Luma([raw[y as usize][x as usize]])
    })
}

/// Opens a picture, guessing the format from the contents before falling back on the
/// extension, turns it upright according to its EXIF orientation and converts it to 8-bit
/// RGB.
pub fn open_rgb(path: &Path) -> ImageResult<RgbImage> {
    let bytes = fs::read(path)?;
    let mut reader = Reader::new(Cursor::new(&bytes[..])).with_guessed_format()?;
    if reader.format().is_none() {
        reader.set_format(ImageFormat::from_path(path)?);
    }
    let img = reader.decode()?;
    Ok(apply_orientation(img, exif_orientation(&bytes)).to_rgb8())
}

/// The EXIF orientation tag of an encoded picture, `1` (upright) if it has none.
pub fn exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let Ok(data) = exif::Reader::new().read_from_container(&mut cursor) else {
        return 1;
    };
    data.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1)
}

/// Rotates and flips `img` so that a picture with the EXIF `orientation` is shown
/// upright. Unknown values leave it as it is.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Everything at or below the threshold becomes white, the rest black.
pub fn maskify_inverse(mut img: GrayImage, threshold: u8) -> Mask {
    img.pixels_mut().for_each(|p| {
        p.apply(|value| (value <= threshold).then_some(WHITE).unwrap_or(BLACK))
    });
    Mask(img)
}

/// Copies the part of `img` inside `rect`
pub fn crop(img: &RgbImage, rect: Rect) -> RgbImage {
    crop_imm(img, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Saves the image in the format implied by the extension of `path`. JPEGs are written
/// with [`JPEG_QUALITY`] instead of the encoder's default.
pub fn save_as_extension<P>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    path: &Path,
) -> ImageResult<()>
where
    P: Pixel + PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    let format = match ImageFormat::from_path(path)? {
        ImageFormat::Jpeg => ImageOutputFormat::Jpeg(JPEG_QUALITY),
        other => other.into(),
    };

    let mut buf = BufWriter::new(File::create(path)?);
    img.write_to(&mut buf, format)?;
    buf.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn crop_dimensions() {
        let img = filled(100, 50, 1, 2, 3);
        let cropped = crop(
            &img,
            Rect {
                x: 10,
                y: 5,
                width: 70,
                height: 30,
            },
        );
        assert_eq!((70, 30), cropped.dimensions());
        assert!(cropped.pixels().all(|p| p.0 == [1, 2, 3]));
    }

    #[test]
    fn crop_keeps_content() {
        let img = RgbImage::from_fn(4, 4, |x, y| image::Rgb([x as u8, y as u8, 0]));
        let cropped = crop(
            &img,
            Rect {
                x: 1,
                y: 2,
                width: 2,
                height: 1,
            },
        );
        assert_eq!(image::Rgb([1, 2, 0]), *cropped.get_pixel(0, 0));
        assert_eq!(image::Rgb([2, 2, 0]), *cropped.get_pixel(1, 0));
    }

    #[test]
    fn mask_counts() {
        let mask = Mask(construct_gray(&[&[WHITE, BLACK], &[BLACK, BLACK]]));
        assert_eq!(1, mask.count_white());
        assert_eq!(4, mask.total());
    }

    #[test]
    fn maskify_inverse_threshold_is_white() {
        let gray = construct_gray(&[&[0, 9, 10, 11, 255]]);
        let mask = maskify_inverse(gray, 10);
        assert_eq!(construct_gray(&[&[WHITE, WHITE, WHITE, BLACK, BLACK]]), mask.0);

        let inverted = mask.inverted();
        assert_eq!(construct_gray(&[&[BLACK, BLACK, BLACK, WHITE, WHITE]]), inverted.0);
    }

    #[test]
    fn save_unknown_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let img = filled(2, 2, 0, 0, 0);
        assert!(save_as_extension(&img, &tmp.path().join("a.what")).is_err());
        assert!(!tmp.path().join("a.what").exists());
    }

    #[test]
    fn open_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(open_rgb(&path).is_err());
        assert!(open_rgb(&tmp.path().join("missing.png")).is_err());
    }

    #[test]
    fn open_wrong_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let png = tmp.path().join("a.png");
        let img = filled(3, 2, 10, 20, 30);
        save_as_extension(&img, &png).unwrap();

        let jpg = tmp.path().join("a.jpg");
        std::fs::rename(&png, &jpg).unwrap();
        assert_eq!(img, open_rgb(&jpg).unwrap());
    }

    /// A JPEG of `img` with an APP1 segment holding only the orientation tag
    fn jpeg_with_orientation(img: &RgbImage, orientation: u8) -> Vec<u8> {
        let mut jpeg = Cursor::new(Vec::new());
        img.write_to(&mut jpeg, ImageOutputFormat::Jpeg(JPEG_QUALITY))
            .unwrap();
        let jpeg = jpeg.into_inner();
        assert_eq!([0xFF, 0xD8], jpeg[..2]);

        #[rustfmt::skip]
        let app1 = [
            0xFF, 0xE1, 0x00, 0x22,
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            // big endian TIFF header, first IFD at offset 8
            b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
            // one entry: Orientation, SHORT, count 1
            0x00, 0x01,
            0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01,
            0x00, orientation, 0x00, 0x00,
            // no next IFD
            0x00, 0x00, 0x00, 0x00,
        ];

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn orientation_without_exif() {
        let mut png = Cursor::new(Vec::new());
        filled(3, 2, 0, 0, 0)
            .write_to(&mut png, ImageOutputFormat::Png)
            .unwrap();
        assert_eq!(1, exif_orientation(png.get_ref()));
        assert_eq!(1, exif_orientation(b"garbage"));
    }

    #[test]
    fn orientation_tag_is_read() {
        let img = filled(4, 2, 100, 100, 100);
        assert_eq!(6, exif_orientation(&jpeg_with_orientation(&img, 6)));
        assert_eq!(3, exif_orientation(&jpeg_with_orientation(&img, 3)));
    }

    #[test]
    fn apply_orientations() {
        let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 0]));
        let oriented = |orientation| {
            apply_orientation(DynamicImage::ImageRgb8(img.clone()), orientation).to_rgb8()
        };

        assert_eq!(img, oriented(1));
        assert_eq!(img, oriented(0));
        assert_eq!(img, oriented(42));

        // rotated clockwise, the bottom left pixel ends up top left
        let rotated = oriented(6);
        assert_eq!((2, 3), rotated.dimensions());
        assert_eq!(image::Rgb([0, 1, 0]), *rotated.get_pixel(0, 0));

        // transposed, every pixel swaps its coordinates
        let transposed = oriented(5);
        assert_eq!((2, 3), transposed.dimensions());
        for (x, y, p) in transposed.enumerate_pixels() {
            assert_eq!(image::Rgb([y as u8, x as u8, 0]), *p);
        }

        let mirrored = oriented(2);
        assert_eq!(image::Rgb([2, 0, 0]), *mirrored.get_pixel(0, 0));
    }

    #[test]
    fn open_turns_upright() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sideways.jpg");
        let img = filled(4, 2, 50, 60, 70);
        std::fs::write(&path, jpeg_with_orientation(&img, 6)).unwrap();
        assert_eq!((2, 4), open_rgb(&path).unwrap().dimensions());
    }

    #[test]
    fn save_png_lossless() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mask.png");
        let mask = construct_gray(&[&[WHITE, BLACK, WHITE]]);
        save_as_extension(&mask, &path).unwrap();
        let read = image::open(&path).unwrap().to_luma8();
        assert_eq!(mask, read);
    }
}
