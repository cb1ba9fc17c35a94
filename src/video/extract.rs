//! Frame extraction from video containers.

use std::fs;
use std::path::Path;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use image::RgbImage;

use crate::error::{Error, Result};

/// Decode a video into per-frame image files.
///
/// Frames are written to `out_dir` (created if absent) in temporal order as
/// `frame_0000.png`, `frame_0001.png`, ..., zero-padded so lexicographic
/// sort order equals temporal order. Returns the number of frames written;
/// 0 with a clean decoder exit is not an error.
///
/// A decoder failure after some frames were already produced is logged and
/// the partial count returned, matching the batch pipeline's best-effort
/// posture.
///
/// # Errors
///
/// Returns [`Error::UnreadableVideo`] when the container cannot be opened or
/// produces no frames before the decoder fails.
pub fn extract_frames(video: &Path, out_dir: &Path) -> Result<u32> {
    fs::create_dir_all(out_dir)?;

    tracing::info!("Extracting frames from {}", video.display());

    let mut child = FfmpegCommand::new()
        .hide_banner()
        .input(video.to_string_lossy().as_ref())
        .rawvideo()
        .spawn()
        .map_err(|e| Error::UnreadableVideo {
            path: video.to_path_buf(),
            reason: e.to_string(),
        })?;

    let events = child.iter().map_err(|e| Error::UnreadableVideo {
        path: video.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut count: u32 = 0;
    let mut error_lines: Vec<String> = Vec::new();

    for event in events {
        match event {
            FfmpegEvent::OutputFrame(frame) => {
                let image = RgbImage::from_raw(frame.width, frame.height, frame.data)
                    .ok_or_else(|| Error::InvalidImage {
                        reason: format!(
                            "decoded frame {count} does not match its declared {}x{} size",
                            frame.width, frame.height
                        ),
                    })?;
                let path = out_dir.join(format!("frame_{count:04}.png"));
                crate::image::save_image(&image, &path)?;
                count += 1;
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)
            | FfmpegEvent::Error(line) => {
                error_lines.push(line);
            }
            _ => {}
        }
    }

    let status = child.wait()?;

    if !status.success() {
        if count == 0 {
            return Err(Error::UnreadableVideo {
                path: video.to_path_buf(),
                reason: if error_lines.is_empty() {
                    format!("ffmpeg exited with {status}")
                } else {
                    error_lines.join("; ")
                },
            });
        }
        tracing::warn!(
            "Decoder failed after {count} frames of {}; continuing with the partial sequence",
            video.display()
        );
    }

    tracing::info!("Extracted {count} frames to {}", out_dir.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    // End-to-end extraction needs an ffmpeg binary; see tests/video_roundtrip.rs
    // for the ignored integration coverage.

    #[test]
    fn test_missing_video_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_frames(Path::new("no/such/video.mp4"), dir.path()).unwrap_err();
        assert!(matches!(err, Error::UnreadableVideo { .. } | Error::Io(_)));
    }
}
