//! Custom error types for rechroma.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the rechroma library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image is empty or structurally unusable.
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    /// Video container could not be opened or decoded.
    #[error("cannot read video {path}: {reason}")]
    UnreadableVideo { path: PathBuf, reason: String },

    /// Video encoding failed.
    #[error("failed to encode video {path}: {reason}")]
    VideoEncode { path: PathBuf, reason: String },

    /// Assembly was attempted with no usable frames.
    #[error("no frames found in {dir}")]
    NoFrames { dir: PathBuf },

    /// Failed to load an ONNX model.
    #[error("failed to load model {name}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// Model weights file is missing.
    #[error("model weights not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Shape mismatch in tensor or plane operations.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rechroma operations.
pub type Result<T> = std::result::Result<T, Error>;
