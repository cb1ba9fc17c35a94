//! Frame sequence to video assembly.

use std::io::Write;
use std::path::Path;
use std::thread;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

use crate::error::{Error, Result};

use super::list_frame_files;

/// Outcome of an assembly run.
///
/// Skips are part of the contract: a frame that cannot be read or does not
/// match the output dimensions is dropped with a warning rather than aborting
/// the whole video, and the count makes that visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Frames encoded into the output container.
    pub frames_written: u32,
    /// Frames dropped for being unreadable or mismatched in size.
    pub frames_skipped: u32,
}

/// Encode the frame images in `frame_dir` into an MPEG-4 video.
///
/// Frames are taken in lexicographic order (equal to temporal order under the
/// extraction naming convention). The first frame fixes the output
/// dimensions; later frames that disagree are skipped with a warning. The
/// container is encoded at `frame_rate` frames per second with the `mp4v`
/// four-character code.
///
/// # Errors
///
/// Returns [`Error::NoFrames`] when the directory holds no frame images (no
/// output file is written), and [`Error::VideoEncode`] when the encoder
/// fails.
pub fn assemble_video(frame_dir: &Path, output: &Path, frame_rate: u32) -> Result<AssemblyReport> {
    if frame_rate == 0 {
        return Err(Error::InvalidParameter {
            name: "frame_rate".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let frames = list_frame_files(frame_dir)?;
    if frames.is_empty() {
        return Err(Error::NoFrames {
            dir: frame_dir.to_path_buf(),
        });
    }

    // The first frame fixes the output geometry.
    let first = crate::image::load_rgb(&frames[0])?;
    let (width, height) = first.dimensions();
    drop(first);

    tracing::info!(
        "Assembling {} frames at {width}x{height}, {frame_rate} fps -> {}",
        frames.len(),
        output.display()
    );

    let geometry = format!("{width}x{height}");
    let rate = frame_rate.to_string();

    let mut child = FfmpegCommand::new()
        .hide_banner()
        .args([
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            geometry.as_str(),
            "-r",
            rate.as_str(),
        ])
        .input("-")
        .args(["-c:v", "mpeg4", "-vtag", "mp4v", "-q:v", "3"])
        .overwrite()
        .output(output.to_string_lossy().as_ref())
        .spawn()
        .map_err(|e| Error::VideoEncode {
            path: output.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut stdin = child.take_stdin().ok_or_else(|| Error::VideoEncode {
        path: output.to_path_buf(),
        reason: "encoder stdin unavailable".to_string(),
    })?;

    // Feed frames on a separate thread while this one drains the encoder's
    // log output; writing and reading on one thread can deadlock once the
    // stderr pipe fills up.
    let writer = thread::spawn(move || {
        let mut written: u32 = 0;
        let mut skipped: u32 = 0;

        for path in frames {
            match crate::image::load_rgb(&path) {
                Ok(frame) if frame.dimensions() == (width, height) => {
                    if stdin.write_all(frame.as_raw()).is_err() {
                        // Encoder went away; surface the cause via its logs
                        break;
                    }
                    written += 1;
                }
                Ok(frame) => {
                    tracing::warn!(
                        "Skipping {}: {}x{} does not match the {width}x{height} output",
                        path.display(),
                        frame.width(),
                        frame.height()
                    );
                    skipped += 1;
                }
                Err(err) => {
                    tracing::warn!("Skipping unreadable frame {}: {err}", path.display());
                    skipped += 1;
                }
            }
        }

        (written, skipped)
    });

    let mut error_lines: Vec<String> = Vec::new();
    if let Ok(events) = child.iter() {
        for event in events {
            match event {
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)
                | FfmpegEvent::Error(line) => error_lines.push(line),
                _ => {}
            }
        }
    }

    let status = child.wait()?;

    let (frames_written, frames_skipped) = writer.join().map_err(|_| Error::VideoEncode {
        path: output.to_path_buf(),
        reason: "frame writer thread panicked".to_string(),
    })?;

    if !status.success() {
        return Err(Error::VideoEncode {
            path: output.to_path_buf(),
            reason: if error_lines.is_empty() {
                format!("ffmpeg exited with {status}")
            } else {
                error_lines.join("; ")
            },
        });
    }

    tracing::info!(
        "Wrote {} ({frames_written} frames, {frames_skipped} skipped)",
        output.display()
    );

    Ok(AssemblyReport {
        frames_written,
        frames_skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dir_is_no_frames_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let err = assemble_video(dir.path(), &output, 30).unwrap_err();

        assert!(matches!(err, Error::NoFrames { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = assemble_video(dir.path(), &dir.path().join("out.mp4"), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }
}
