//! Batch orchestration: extract, colorize frame-by-frame, reassemble.

use std::fs;
use std::path::Path;

use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::TempDir;

use crate::error::Result;

use super::assemble::{assemble_video, AssemblyReport};
use super::extract::extract_frames;
use super::list_frame_files;

/// Outcome of a full video colorization run.
#[derive(Debug, Clone, Copy)]
pub struct BatchReport {
    /// Frames decoded out of the source container.
    pub frames_extracted: u32,
    /// Frames successfully colorized.
    pub frames_colorized: u32,
    /// Frames dropped because the intermediate file could not be read back.
    pub frames_skipped: u32,
    /// Assembly-stage outcome, including its own skip count.
    pub assembly: AssemblyReport,
}

/// Colorize every frame image in `frame_dir` into `out_dir`.
///
/// Frames are processed in sorted (temporal) order. Each output keeps the
/// source frame's name under a `colorized_` prefix so order survives into
/// assembly. A frame that cannot be read back is logged and skipped;
/// colorization failures abort, since a broken predictor would fail every
/// remaining frame the same way.
///
/// # Errors
///
/// Propagates directory IO errors, output write errors, and any error from
/// `colorize`.
pub fn colorize_frames<F>(frame_dir: &Path, out_dir: &Path, mut colorize: F) -> Result<(u32, u32)>
where
    F: FnMut(&RgbImage) -> Result<RgbImage>,
{
    fs::create_dir_all(out_dir)?;

    let frames = list_frame_files(frame_dir)?;

    let pb = ProgressBar::new(frames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Colorizing [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let mut colorized: u32 = 0;
    let mut skipped: u32 = 0;

    for path in &frames {
        match crate::image::load_rgb(path) {
            Ok(frame) => {
                let result = colorize(&frame)?;
                let name = path
                    .file_name()
                    .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
                crate::image::save_image(&result, out_dir.join(format!("colorized_{name}")))?;
                colorized += 1;
            }
            Err(err) => {
                tracing::warn!("Skipping frame {}: {err}", path.display());
                skipped += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok((colorized, skipped))
}

/// Colorize a whole video: extract frames, colorize each, reassemble.
///
/// Both intermediate frame directories are unique per call (created under
/// `work_root` when given, the system temp directory otherwise) and are
/// removed on every exit path, success or failure; directory ownership is
/// scoped to this function. Concurrent runs therefore never share working
/// storage.
///
/// # Errors
///
/// Propagates extraction, colorization, and assembly failures. Note that an
/// extraction yielding zero frames surfaces as [`crate::Error::NoFrames`]
/// from the assembly stage.
pub fn run<F>(
    video: &Path,
    output: &Path,
    frame_rate: u32,
    work_root: Option<&Path>,
    colorize: F,
) -> Result<BatchReport>
where
    F: FnMut(&RgbImage) -> Result<RgbImage>,
{
    let frames_dir = work_dir(work_root, "rechroma-frames-")?;
    let colorized_dir = work_dir(work_root, "rechroma-colorized-")?;

    let frames_extracted = extract_frames(video, frames_dir.path())?;

    let (frames_colorized, frames_skipped) =
        colorize_frames(frames_dir.path(), colorized_dir.path(), colorize)?;

    let assembly = assemble_video(colorized_dir.path(), output, frame_rate)?;

    // Drop would clean these up anyway; closing explicitly surfaces deletion
    // problems on the success path instead of swallowing them.
    for dir in [frames_dir, colorized_dir] {
        let path = dir.path().to_path_buf();
        if let Err(err) = dir.close() {
            tracing::warn!("Failed to remove working directory {}: {err}", path.display());
        }
    }

    Ok(BatchReport {
        frames_extracted,
        frames_colorized,
        frames_skipped,
        assembly,
    })
}

/// Create a uniquely-named working directory, auto-removed on drop.
fn work_dir(root: Option<&Path>, prefix: &str) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);

    let dir = match root {
        Some(root) => {
            fs::create_dir_all(root)?;
            builder.tempdir_in(root)?
        }
        None => builder.tempdir()?,
    };

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn write_frames(dir: &Path, count: u32) {
        for i in 0..count {
            let img = RgbImage::from_pixel(6, 4, Rgb([i as u8 * 20, 0, 0]));
            crate::image::save_image(&img, dir.join(format!("frame_{i:04}.png"))).unwrap();
        }
    }

    #[test]
    fn test_colorize_frames_preserves_order_and_names() {
        let frames = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_frames(frames.path(), 3);

        let mut seen = Vec::new();
        let (colorized, skipped) = colorize_frames(frames.path(), out.path(), |img| {
            seen.push(*img.get_pixel(0, 0));
            Ok(img.clone())
        })
        .unwrap();

        assert_eq!((colorized, skipped), (3, 0));
        // Temporal order: red channel 0, 20, 40
        assert_eq!(
            seen.iter().map(|p| p[0]).collect::<Vec<_>>(),
            vec![0, 20, 40]
        );

        let names: Vec<_> = list_frame_files(out.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(
            names,
            [
                "colorized_frame_0000.png",
                "colorized_frame_0001.png",
                "colorized_frame_0002.png"
            ]
        );
    }

    #[test]
    fn test_corrupt_frame_is_skipped() {
        let frames = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_frames(frames.path(), 3);
        // Truncate one intermediate to an undecodable stub
        fs::write(frames.path().join("frame_0001.png"), b"not a png").unwrap();

        let (colorized, skipped) =
            colorize_frames(frames.path(), out.path(), |img| Ok(img.clone())).unwrap();

        assert_eq!((colorized, skipped), (2, 1));
        let survivors = list_frame_files(out.path()).unwrap();
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn test_colorize_failure_aborts() {
        let frames = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_frames(frames.path(), 2);

        let result = colorize_frames(frames.path(), out.path(), |_| {
            Err(crate::Error::InvalidImage {
                reason: "stub".to_string(),
            })
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_work_dirs_are_unique_and_cleaned() {
        let root = tempfile::tempdir().unwrap();

        let a = work_dir(Some(root.path()), "rechroma-frames-").unwrap();
        let b = work_dir(Some(root.path()), "rechroma-frames-").unwrap();
        assert_ne!(a.path(), b.path());

        let (path_a, path_b) = (a.path().to_path_buf(), b.path().to_path_buf());
        drop(a);
        drop(b);
        assert!(!path_a.exists());
        assert!(!path_b.exists());
    }

    #[test]
    fn test_failed_run_leaves_no_residue() {
        let root = tempfile::tempdir().unwrap();

        // Unreadable input: extraction fails, both working directories must
        // already be gone by the time the error reaches us.
        let result = run(
            Path::new("no/such/video.mp4"),
            &root.path().join("out.mp4"),
            30,
            Some(root.path()),
            |img: &RgbImage| Ok(img.clone()),
        );
        assert!(result.is_err());

        let residue: Vec<_> = fs::read_dir(root.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect();
        assert!(residue.is_empty(), "leftover directories: {residue:?}");
    }
}
