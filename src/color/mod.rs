//! sRGB / CIELAB color space codec.
//!
//! Colorization operates in CIELAB: the network predicts the a*/b*
//! chrominance planes while the L* luminance plane is carried through from
//! the source image untouched. All conversions here are pure f32 arithmetic
//! over D65 sRGB; quantization to 8-bit happens only at the final
//! [`from_luminance_chrominance`] step.
//!
//! Plane conventions:
//! - RGB planes: `(H, W, 3)`, values in [0, 1]
//! - luminance: `(H, W)`, L*/100 so values sit in [0, 1]
//! - chrominance: `(H, W, 2)`, raw CIELAB a*/b* units

use image::RgbImage;
use ndarray::{Array2, Array3};

use crate::error::{Error, Result};
use crate::image::{ChromaPlanes, LuminancePlane, RgbPlanes};

/// D65 reference white point.
const WHITE_X: f32 = 0.950_47;
const WHITE_Z: f32 = 1.088_83;

/// CIELAB transfer function constants: epsilon = (6/29)^3, kappa = (29/3)^3.
const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

/// Convert RGB planes (values in [0, 1]) to luminance and chrominance planes.
///
/// Deterministic and side-effect free. Luminance comes back as L*/100 so it
/// stays in [0, 1]; chrominance is raw a*/b*.
#[must_use]
pub fn to_luminance_chrominance(rgb: &RgbPlanes) -> (LuminancePlane, ChromaPlanes) {
    let (height, width, _) = rgb.dim();

    let mut luminance = Array2::<f32>::zeros((height, width));
    let mut chroma = Array3::<f32>::zeros((height, width, 2));

    for y in 0..height {
        for x in 0..width {
            let (l, a, b) = srgb_to_lab(rgb[[y, x, 0]], rgb[[y, x, 1]], rgb[[y, x, 2]]);
            luminance[[y, x]] = l / 100.0;
            chroma[[y, x, 0]] = a;
            chroma[[y, x, 1]] = b;
        }
    }

    (luminance, chroma)
}

/// Extract only the luminance plane from RGB planes.
///
/// Same transform as [`to_luminance_chrominance`] without materializing the
/// chrominance planes the caller is going to discard.
#[must_use]
pub fn luminance(rgb: &RgbPlanes) -> LuminancePlane {
    let (height, width, _) = rgb.dim();

    let mut plane = Array2::<f32>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let (l, _, _) = srgb_to_lab(rgb[[y, x, 0]], rgb[[y, x, 1]], rgb[[y, x, 2]]);
            plane[[y, x]] = l / 100.0;
        }
    }

    plane
}

/// Recombine luminance and chrominance planes into an 8-bit RGB image.
///
/// Each component is rounded and clamped to [0, 255].
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] when the plane dimensions disagree.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn from_luminance_chrominance(
    luminance: &LuminancePlane,
    chroma: &ChromaPlanes,
) -> Result<RgbImage> {
    let (height, width) = luminance.dim();
    let (ch, cw, cc) = chroma.dim();

    if (ch, cw) != (height, width) || cc != 2 {
        return Err(Error::ShapeMismatch {
            expected: format!("chrominance planes of shape ({height}, {width}, 2)"),
            actual: format!("({ch}, {cw}, {cc})"),
        });
    }

    // Safe: plane dimensions originate from image dimensions, which fit in u32
    let mut out = RgbImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = lab_to_srgb(
                luminance[[y, x]] * 100.0,
                chroma[[y, x, 0]],
                chroma[[y, x, 1]],
            );
            out.put_pixel(
                x as u32,
                y as u32,
                image::Rgb([quantize(r), quantize(g), quantize(b)]),
            );
        }
    }

    Ok(out)
}

/// Build RGB planes visualizing a luminance-only channel.
///
/// Chrominance is neutral (a* = b* = 0), so the result is a gray three-channel
/// rendition of the luminance plane. This is what the predictor sees as input:
/// three channels carrying no color information.
#[must_use]
pub fn grayscale_to_rgb(luminance: &LuminancePlane) -> RgbPlanes {
    let (height, width) = luminance.dim();

    let mut rgb = Array3::<f32>::zeros((height, width, 3));
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = lab_to_srgb(luminance[[y, x]] * 100.0, 0.0, 0.0);
            rgb[[y, x, 0]] = r;
            rgb[[y, x, 1]] = g;
            rgb[[y, x, 2]] = b;
        }
    }

    rgb
}

/// Convert one sRGB pixel (components in [0, 1]) to CIELAB (L* in [0, 100]).
fn srgb_to_lab(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let rl = srgb_to_linear(r);
    let gl = srgb_to_linear(g);
    let bl = srgb_to_linear(b);

    // Linear sRGB -> XYZ (D65)
    let x = 0.412_456_4_f32.mul_add(rl, 0.357_576_1_f32.mul_add(gl, 0.180_437_5 * bl));
    let y = 0.212_672_9_f32.mul_add(rl, 0.715_152_2_f32.mul_add(gl, 0.072_175 * bl));
    let z = 0.019_333_9_f32.mul_add(rl, 0.119_192_f32.mul_add(gl, 0.950_304_1 * bl));

    let fx = lab_f(x / WHITE_X);
    let fy = lab_f(y);
    let fz = lab_f(z / WHITE_Z);

    let l = 116.0_f32.mul_add(fy, -16.0);
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    (l, a, b)
}

/// Convert one CIELAB pixel back to sRGB components (unclamped).
fn lab_to_srgb(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let xr = lab_f_inv(fx);
    let yr = if l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        l / LAB_KAPPA
    };
    let zr = lab_f_inv(fz);

    let x = xr * WHITE_X;
    let y = yr;
    let z = zr * WHITE_Z;

    // XYZ -> linear sRGB (D65)
    let rl = 3.240_454_2_f32.mul_add(x, (-1.537_138_5_f32).mul_add(y, -0.498_531_4 * z));
    let gl = (-0.969_266_f32).mul_add(x, 1.876_010_8_f32.mul_add(y, 0.041_556 * z));
    let bl = 0.055_643_4_f32.mul_add(x, (-0.204_025_9_f32).mul_add(y, 1.057_225_2 * z));

    (linear_to_srgb(rl), linear_to_srgb(gl), linear_to_srgb(bl))
}

/// CIELAB forward transfer function.
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA.mul_add(t, 16.0) / 116.0
    }
}

/// Inverse of [`lab_f`].
fn lab_f_inv(f: f32) -> f32 {
    let cubed = f * f * f;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        116.0_f32.mul_add(f, -16.0) / LAB_KAPPA
    }
}

/// sRGB gamma expansion.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma compression.
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055_f32.mul_add(c.max(0.0).powf(1.0 / 2.4), -0.055)
    }
}

/// Scale a [0, 1] component to an 8-bit sample, rounding and clamping.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] before casting
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
