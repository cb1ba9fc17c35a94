//! Image loading, saving, and plane conversion utilities.

mod load;
mod save;

pub use load::{load_rgb, to_planes};
pub use save::save_image;

use ndarray::{Array2, Array3, Array4};

/// RGB planes in HWC layout `(H, W, 3)`, values normalized to [0, 1].
pub type RgbPlanes = Array3<f32>;

/// Luminance plane `(H, W)`, CIELAB L*/100 so values sit in [0, 1].
pub type LuminancePlane = Array2<f32>;

/// Chrominance planes `(H, W, 2)` in raw CIELAB a*/b* units.
pub type ChromaPlanes = Array3<f32>;

/// Predictor input tensor in NCHW layout `(1, 3, S, S)`.
pub type NetworkTensor = Array4<f32>;

/// Predictor output tensor in NCHW layout `(1, 2, S, S)`.
pub type ChromaTensor = Array4<f32>;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Number of predicted chrominance channels.
pub const CHROMA_CHANNELS: usize = 2;
