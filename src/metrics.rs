//! Image fidelity metrics.
//!
//! Reported alongside colorization results when requested; never part of the
//! pipeline contract. Both metrics operate on [0, 1]-normalized samples.

use image::RgbImage;

use crate::error::{Error, Result};

/// SSIM stabilization constants for a [0, 1] dynamic range.
const SSIM_C1: f64 = 0.01 * 0.01;
const SSIM_C2: f64 = 0.03 * 0.03;

/// Peak signal-to-noise ratio between two images, in decibels.
///
/// Returns `f64::INFINITY` for identical images.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] when dimensions disagree.
pub fn psnr(reference: &RgbImage, candidate: &RgbImage) -> Result<f64> {
    check_dimensions(reference, candidate)?;

    let mut sum_sq = 0.0_f64;
    for (a, b) in reference.as_raw().iter().zip(candidate.as_raw()) {
        let diff = (f64::from(*a) - f64::from(*b)) / 255.0;
        sum_sq += diff * diff;
    }

    let mse = sum_sq / reference.as_raw().len() as f64;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }

    Ok(20.0 * (1.0 / mse.sqrt()).log10())
}

/// Global structural similarity index between two images, computed on the
/// luma plane over the whole image.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] when dimensions disagree.
pub fn ssim(reference: &RgbImage, candidate: &RgbImage) -> Result<f64> {
    check_dimensions(reference, candidate)?;

    let a = luma_samples(reference);
    let b = luma_samples(candidate);
    let n = a.len() as f64;

    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut var_a = 0.0;
    let mut var_b = 0.0;
    let mut covar = 0.0;
    for (x, y) in a.iter().zip(&b) {
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
        covar += (x - mean_a) * (y - mean_b);
    }
    var_a /= n;
    var_b /= n;
    covar /= n;

    let numerator = (2.0 * mean_a * mean_b + SSIM_C1) * (2.0 * covar + SSIM_C2);
    let denominator = (mean_a * mean_a + mean_b * mean_b + SSIM_C1) * (var_a + var_b + SSIM_C2);

    Ok(numerator / denominator)
}

/// Rec. 601 luma of every pixel, normalized to [0, 1].
fn luma_samples(image: &RgbImage) -> Vec<f64> {
    image
        .pixels()
        .map(|p| {
            (0.299 * f64::from(p[0]) + 0.587 * f64::from(p[1]) + 0.114 * f64::from(p[2])) / 255.0
        })
        .collect()
}

fn check_dimensions(reference: &RgbImage, candidate: &RgbImage) -> Result<()> {
    if reference.dimensions() != candidate.dimensions() {
        return Err(Error::ShapeMismatch {
            expected: format!("{:?}", reference.dimensions()),
            actual: format!("{:?}", candidate.dimensions()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_identical_images() {
        let img = RgbImage::from_pixel(8, 8, Rgb([100, 150, 200]));

        assert!(psnr(&img, &img).unwrap().is_infinite());
        assert!((ssim(&img, &img).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_psnr_drops_with_noise() {
        let reference = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
        let near = RgbImage::from_pixel(8, 8, Rgb([101, 100, 100]));
        let far = RgbImage::from_pixel(8, 8, Rgb([160, 100, 100]));

        let psnr_near = psnr(&reference, &near).unwrap();
        let psnr_far = psnr(&reference, &far).unwrap();

        assert!(psnr_near > psnr_far);
        assert!(psnr_far > 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = RgbImage::new(4, 4);
        let b = RgbImage::new(4, 5);
        assert!(matches!(psnr(&a, &b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(ssim(&a, &b), Err(Error::ShapeMismatch { .. })));
    }
}
