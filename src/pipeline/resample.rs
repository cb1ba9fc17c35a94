//! Bilinear resampling of float planes.

use ndarray::Array3;

/// Resize `(H, W, C)` float planes to `(out_h, out_w, C)` with bilinear
/// interpolation.
///
/// Sample positions use the half-pixel-center convention, matching the
/// behavior of the common image resize implementations the predictor was
/// trained against. Aspect ratio is not preserved; the caller chooses the
/// target shape.
///
/// # Panics
///
/// Panics if any of the source or target dimensions is zero; callers validate
/// image dimensions before reaching this point.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
#[must_use]
pub fn bilinear(src: &Array3<f32>, out_h: usize, out_w: usize) -> Array3<f32> {
    let (height, width, channels) = src.dim();
    assert!(height > 0 && width > 0, "source planes must be non-empty");
    assert!(out_h > 0 && out_w > 0, "target shape must be non-empty");

    let scale_y = height as f32 / out_h as f32;
    let scale_x = width as f32 / out_w as f32;

    let mut out = Array3::<f32>::zeros((out_h, out_w, channels));

    for oy in 0..out_h {
        let sy = (oy as f32 + 0.5).mul_add(scale_y, -0.5).max(0.0);
        // Safe: sy is non-negative and bounded by the source height
        let y0 = (sy.floor() as usize).min(height - 1);
        let y1 = (y0 + 1).min(height - 1);
        let fy = sy - y0 as f32;

        for ox in 0..out_w {
            let sx = (ox as f32 + 0.5).mul_add(scale_x, -0.5).max(0.0);
            let x0 = (sx.floor() as usize).min(width - 1);
            let x1 = (x0 + 1).min(width - 1);
            let fx = sx - x0 as f32;

            for c in 0..channels {
                let top = src[[y0, x0, c]].mul_add(1.0 - fx, src[[y0, x1, c]] * fx);
                let bottom = src[[y1, x0, c]].mul_add(1.0 - fx, src[[y1, x1, c]] * fx);
                out[[oy, ox, c]] = top.mul_add(1.0 - fy, bottom * fy);
            }
        }
    }

    out
}
