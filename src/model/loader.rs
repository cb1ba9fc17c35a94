//! ONNX model loading and the session-backed predictor.

use std::path::{Path, PathBuf};

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::{ChromaTensor, NetworkTensor, CHROMA_CHANNELS};

use super::{ChromaPredictor, ModelVariant};

/// Chrominance predictor backed by an ONNX Runtime session.
///
/// The session holds the loaded weights for the lifetime of the process and
/// is reused across all colorization calls.
#[derive(Debug)]
pub struct OnnxPredictor {
    session: Session,
}

impl OnnxPredictor {
    /// Load a predictor from an ONNX weights file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if the file is missing and
    /// [`Error::ModelLoad`] if the runtime rejects it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::info!("Loading model from {}", path.display());

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let session = Session::builder()
            .map_err(|source| Error::ModelLoad {
                name: name.clone(),
                source,
            })?
            .commit_from_file(path)
            .map_err(|source| Error::ModelLoad { name, source })?;

        Ok(Self { session })
    }
}

impl ChromaPredictor for OnnxPredictor {
    fn predict(&mut self, input: NetworkTensor) -> Result<ChromaTensor> {
        let input_value =
            Tensor::from_array(input).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Inference { source })?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "chrominance output".to_string(),
                actual: "no output".to_string(),
            })?;

        let tensor = extract_array4(&output)?;

        let dims = tensor.dim();
        if dims.0 != 1 || dims.1 != CHROMA_CHANNELS {
            return Err(Error::ShapeMismatch {
                expected: "(1, 2, S, S) chrominance tensor".to_string(),
                actual: format!("{dims:?}"),
            });
        }

        Ok(tensor)
    }
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<Array4<f32>> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}

/// Resolve the weights file to load.
///
/// An explicit path wins; otherwise the platform cache directory is searched
/// for the variant's filename:
/// - Linux: `~/.cache/rechroma/models/`
/// - macOS: `~/Library/Caches/rechroma/models/`
/// - Windows: `%LOCALAPPDATA%\rechroma\models\`
///
/// # Errors
///
/// Returns [`Error::ModelNotFound`] when no weights file exists at the
/// resolved location.
pub fn resolve_model_path(explicit: Option<&Path>, variant: ModelVariant) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
            base.join("rechroma").join("models").join(variant.filename())
        }
    };

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::ModelNotFound { path })
    }
}
