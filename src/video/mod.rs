//! Video colorization: frame extraction, per-frame processing, reassembly.
//!
//! Videos are handled as a batch of still frames. Extraction writes each
//! decoded frame to disk under a zero-padded sequential name, so a
//! lexicographic listing reproduces temporal order; assembly streams the
//! colorized frames back into an MPEG-4 container. Both ends ride on a
//! spawned `ffmpeg` process.

mod assemble;
mod batch;
mod extract;

pub use assemble::{assemble_video, AssemblyReport};
pub use batch::{colorize_frames, run, BatchReport};
pub use extract::extract_frames;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Image extensions recognized as frames.
const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// List frame image files in a directory, sorted lexicographically.
///
/// With the zero-padded naming convention used by extraction, lexicographic
/// order equals temporal order.
pub(crate) fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                })
        })
        .collect();

    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(frames)
}
