//! # `rechroma`
//!
//! A library for colorizing grayscale images and videos with a pretrained
//! chrominance predictor.
//!
//! Colorization runs in CIELAB space: the source image's luminance plane is
//! kept at native resolution while a neural predictor estimates the a*/b*
//! chrominance at a fixed square resolution, which is then upsampled and
//! recombined. Videos are processed frame by frame through the same pipeline
//! and reassembled into an MPEG-4 container.
//!
//! ## Example
//!
//! ```no_run
//! use rechroma::{Colorizer, OnnxPredictor, PipelineConfig};
//!
//! # fn main() -> rechroma::Result<()> {
//! let predictor = OnnxPredictor::from_file("ddcolor_large.onnx")?;
//! let mut colorizer = Colorizer::new(PipelineConfig::default(), predictor)?;
//!
//! colorizer.process("grayscale.png", "colorized.png")?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod error;
pub mod image;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod video;

pub use error::{Error, Result};
pub use model::{ChromaPredictor, ModelVariant, OnnxPredictor};
pub use pipeline::{Colorizer, PipelineConfig};
