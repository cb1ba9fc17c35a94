//! Image loading utilities.

use std::path::Path;

use image::RgbImage;
use ndarray::Array3;

use crate::error::{Error, Result};

use super::{RgbPlanes, RGB_CHANNELS};

/// Load an image from disk as 8-bit RGB.
///
/// Any decodable raster format is accepted; alpha and non-RGB color types are
/// converted. Zero-sized images are rejected up front so downstream stages can
/// rely on positive dimensions.
///
/// # Errors
///
/// Returns [`Error::ImageLoad`] if the file cannot be decoded and
/// [`Error::InvalidImage`] if it decodes to an empty image.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(Error::InvalidImage {
            reason: format!("{} decoded to an empty image", path.display()),
        });
    }

    Ok(rgb)
}

/// Convert an 8-bit RGB image to normalized float planes in [0, 1].
#[must_use]
pub fn to_planes(image: &RgbImage) -> RgbPlanes {
    let (width, height) = (image.width() as usize, image.height() as usize);

    let mut planes = Array3::<f32>::zeros((height, width, RGB_CHANNELS));
    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..RGB_CHANNELS {
            planes[[y as usize, x as usize, c]] = f32::from(pixel[c]) / 255.0;
        }
    }

    planes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_planes_shape_and_range() {
        let mut img = RgbImage::new(4, 3);
        img.put_pixel(0, 0, Rgb([255, 0, 128]));

        let planes = to_planes(&img);

        assert_eq!(planes.dim(), (3, 4, 3));
        assert!((planes[[0, 0, 0]] - 1.0).abs() < f32::EPSILON);
        assert!(planes[[0, 0, 1]].abs() < f32::EPSILON);
        assert!((planes[[0, 0, 2]] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rgb("definitely/not/a/file.png").unwrap_err();
        assert!(matches!(err, Error::ImageLoad { .. }));
    }
}
