//! Chrominance predictor abstraction and model loading.
//!
//! The pipeline is polymorphic over a single capability: turn a luminance-only
//! RGB tensor into a two-channel chrominance tensor. Anything implementing
//! [`ChromaPredictor`] can drive the colorization, whether it is the bundled
//! ONNX runtime session, a remote inference service, or a test stub.

mod loader;

pub use loader::{resolve_model_path, OnnxPredictor};

use crate::error::Result;
use crate::image::{ChromaTensor, NetworkTensor};

/// A pretrained chrominance predictor.
///
/// Input is a `(1, 3, S, S)` float tensor: a grayscale image replicated to
/// three channels, values in [0, 1]. Output must be a `(1, 2, S, S)` float
/// tensor of CIELAB a*/b* chrominance.
///
/// `predict` takes `&mut self`: an invocation has exclusive access to the
/// predictor. Sharing one predictor between threads requires an external
/// mutex; the predictor itself is a single long-lived resource loaded once at
/// startup.
pub trait ChromaPredictor {
    /// Run one synchronous inference call. No retries, no batching.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying runtime fails or produces a
    /// malformed output.
    fn predict(&mut self, input: NetworkTensor) -> Result<ChromaTensor>;
}

/// Model capacity variant. Selects which weights file is resolved; the
/// pipeline itself is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    /// Full-capacity model (convnext-l encoder).
    Large,
    /// Reduced-capacity model (convnext-t encoder) for constrained hosts.
    Tiny,
}

impl ModelVariant {
    /// Weights filename for this variant inside the model cache directory.
    #[must_use]
    pub const fn filename(&self) -> &'static str {
        match self {
            Self::Large => "ddcolor_large.onnx",
            Self::Tiny => "ddcolor_tiny.onnx",
        }
    }
}
