//! Colorization pipeline.
//!
//! [`Colorizer`] wires the preprocessing transform, the injected chrominance
//! predictor, and the recombination step into a single per-image operation.
//! The luminance plane always comes from the source resolution; only the
//! predicted chrominance is upsampled, so the channel carrying most of the
//! perceptual detail is never interpolated twice.

mod preprocess;
mod resample;

pub use preprocess::{prepare, PreparedFrame};
pub use resample::bilinear;

use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use ndarray::{Array3, Array4};

use crate::color;
use crate::error::{Error, Result};
use crate::image::{ChromaPlanes, ChromaTensor, NetworkTensor, RgbPlanes, RGB_CHANNELS};
use crate::model::{ChromaPredictor, ModelVariant};

/// Immutable configuration for the colorization pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Square resolution the predictor sees, independent of input size.
    pub input_size: u32,

    /// Model capacity variant; affects only which weights are loaded.
    pub variant: ModelVariant,

    /// Frames per second for assembled video output.
    pub frame_rate: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_size: 512,
            variant: ModelVariant::Large,
            frame_rate: 30,
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::InvalidParameter {
                name: "input_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.frame_rate == 0 {
            return Err(Error::InvalidParameter {
                name: "frame_rate".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Colorizes grayscale images with an injected chrominance predictor.
pub struct Colorizer<P> {
    config: PipelineConfig,
    predictor: P,
}

impl<P: ChromaPredictor> Colorizer<P> {
    /// Create a colorizer from a validated configuration and a loaded
    /// predictor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PipelineConfig, predictor: P) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, predictor })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Colorize one image.
    ///
    /// The result has the same dimensions as the input regardless of the
    /// configured inference resolution. The predictor is invoked exactly once,
    /// synchronously, with no retry and no fallback color.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::InvalidImage`] from preprocessing; predictor
    /// failures surface as [`Error::Inference`] or [`Error::ShapeMismatch`].
    pub fn colorize_image(&mut self, image: &RgbImage) -> Result<RgbImage> {
        let started = Instant::now();

        let prepared = prepare(image, self.config.input_size)?;

        let input = planes_to_tensor(&prepared.network_input);
        let output = self.predictor.predict(input)?;

        let chroma_small = tensor_to_chroma(&output);
        let (height, width) = prepared.luminance.dim();
        let chroma = resample::bilinear(&chroma_small, height, width);

        let result = color::from_luminance_chrominance(&prepared.luminance, &chroma)?;

        tracing::debug!(
            "Colorized {}x{} image in {:.2?}",
            image.width(),
            image.height(),
            started.elapsed()
        );

        Ok(result)
    }

    /// Colorize an image file and write the result.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, colorizing, or saving fails.
    pub fn process<I: AsRef<Path>, O: AsRef<Path>>(&mut self, input: I, output: O) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();

        tracing::info!("Colorizing image: {}", input.display());

        let image = crate::image::load_rgb(input)?;
        let colorized = self.colorize_image(&image)?;

        tracing::info!("Saving output to: {}", output.display());
        crate::image::save_image(&colorized, output)?;

        Ok(())
    }
}

/// Convert HWC RGB planes to the predictor's NCHW input layout.
fn planes_to_tensor(planes: &RgbPlanes) -> NetworkTensor {
    let (height, width, _) = planes.dim();

    let mut tensor = Array4::<f32>::zeros((1, RGB_CHANNELS, height, width));
    for y in 0..height {
        for x in 0..width {
            for c in 0..RGB_CHANNELS {
                tensor[[0, c, y, x]] = planes[[y, x, c]];
            }
        }
    }

    tensor
}

/// Convert the predictor's `(1, 2, H, W)` output to HWC chrominance planes.
fn tensor_to_chroma(tensor: &ChromaTensor) -> ChromaPlanes {
    let (_, channels, height, width) = tensor.dim();

    let mut planes = Array3::<f32>::zeros((height, width, channels));
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                planes[[y, x, c]] = tensor[[0, c, y, x]];
            }
        }
    }

    planes
}
