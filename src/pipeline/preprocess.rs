//! Network input preparation.
//!
//! The predictor consumes a fixed-size square input regardless of the source
//! resolution. Preparation keeps two artifacts: the luminance plane at the
//! source's native resolution (recombined with the predicted chrominance at
//! the end, never resampled) and the stretched, luminance-only RGB input for
//! the network.

use image::RgbImage;

use crate::color;
use crate::error::{Error, Result};
use crate::image::{LuminancePlane, RgbPlanes};

use super::resample;

/// Output of [`prepare`]: everything the synthesis step needs.
pub struct PreparedFrame {
    /// Luminance at the source image's native resolution.
    pub luminance: LuminancePlane,
    /// Luminance-only RGB planes at `target_size` x `target_size`, in [0, 1].
    pub network_input: RgbPlanes,
}

/// Build the network input from an arbitrary-resolution source image.
///
/// 1. Normalize the image to [0, 1] float planes.
/// 2. Extract the native-resolution luminance plane.
/// 3. Stretch-resize the planes to `target_size` square (aspect ratio is not
///    preserved) with bilinear interpolation.
/// 4. Extract luminance from the resized planes and rebuild a neutral
///    three-channel RGB rendition of it.
///
/// # Errors
///
/// Returns [`Error::InvalidImage`] for an empty image and
/// [`Error::InvalidParameter`] for a zero `target_size`.
pub fn prepare(image: &RgbImage, target_size: u32) -> Result<PreparedFrame> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::InvalidImage {
            reason: format!(
                "cannot colorize an empty {}x{} image",
                image.width(),
                image.height()
            ),
        });
    }
    if target_size == 0 {
        return Err(Error::InvalidParameter {
            name: "target_size".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let planes = crate::image::to_planes(image);
    let luminance = color::luminance(&planes);

    let size = target_size as usize;
    let resized = resample::bilinear(&planes, size, size);
    let small_luminance = color::luminance(&resized);
    let network_input = color::grayscale_to_rgb(&small_luminance);

    Ok(PreparedFrame {
        luminance,
        network_input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_shapes() {
        let img = RgbImage::from_pixel(100, 50, Rgb([120, 120, 120]));

        let prepared = prepare(&img, 64).unwrap();

        assert_eq!(prepared.luminance.dim(), (50, 100));
        assert_eq!(prepared.network_input.dim(), (64, 64, 3));
    }

    #[test]
    fn test_network_input_is_neutral() {
        let img = RgbImage::from_pixel(10, 10, Rgb([200, 40, 90]));

        let prepared = prepare(&img, 8).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                let r = prepared.network_input[[y, x, 0]];
                let g = prepared.network_input[[y, x, 1]];
                let b = prepared.network_input[[y, x, 2]];
                assert!((r - g).abs() < 5e-3);
                assert!((g - b).abs() < 5e-3);
            }
        }
    }

    #[test]
    fn test_zero_target_size_rejected() {
        let img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        assert!(matches!(
            prepare(&img, 0),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
