//! Video extraction/assembly round-trip tests.
//!
//! These spawn a real `ffmpeg` binary and are ignored by default; run with
//! `cargo test -- --ignored` on a host with ffmpeg on the PATH. The
//! frame-level skip policy itself is covered without ffmpeg in the library's
//! unit tests.

use std::fs;

use image::{Rgb, RgbImage};

use rechroma::video::{assemble_video, extract_frames};

/// Ten solid-color frames with well-separated red levels.
fn write_synthetic_frames(dir: &std::path::Path, count: u32) {
    for i in 0..count {
        let img = RgbImage::from_pixel(64, 48, Rgb([(i * 25) as u8, 0, 0]));
        img.save(dir.join(format!("frame_{i:04}.png"))).unwrap();
    }
}

/// Red level of a frame file, averaged over all pixels.
fn mean_red(path: &std::path::Path) -> f64 {
    let img = image::open(path).unwrap().to_rgb8();
    let sum: u64 = img.pixels().map(|p| u64::from(p[0])).sum();
    sum as f64 / (u64::from(img.width()) * u64::from(img.height())) as f64
}

#[test]
#[ignore = "requires an ffmpeg binary on the PATH"]
fn extraction_preserves_temporal_order() {
    let work = tempfile::tempdir().unwrap();
    let source_frames = work.path().join("source");
    fs::create_dir_all(&source_frames).unwrap();
    write_synthetic_frames(&source_frames, 10);

    let video = work.path().join("synthetic.mp4");
    let report = assemble_video(&source_frames, &video, 30).unwrap();
    assert_eq!(report.frames_written, 10);
    assert_eq!(report.frames_skipped, 0);

    let extracted = work.path().join("extracted");
    let count = extract_frames(&video, &extracted).unwrap();
    assert_eq!(count, 10);

    // Lexicographic listing must reproduce the original brightness ramp
    let mut names: Vec<_> = fs::read_dir(&extracted)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    names.sort();

    let mut previous = -1.0_f64;
    for path in names {
        let red = mean_red(&path);
        assert!(
            red > previous - 8.0,
            "brightness ramp broken at {}",
            path.display()
        );
        previous = red;
    }
}

#[test]
#[ignore = "requires an ffmpeg binary on the PATH"]
fn deleting_one_frame_yields_best_effort_output() {
    let work = tempfile::tempdir().unwrap();
    let frames = work.path().join("frames");
    fs::create_dir_all(&frames).unwrap();
    write_synthetic_frames(&frames, 10);

    // Simulate a lost intermediate: frame index 5 disappears before assembly
    fs::remove_file(frames.join("frame_0005.png")).unwrap();

    let video = work.path().join("partial.mp4");
    let report = assemble_video(&frames, &video, 30).unwrap();
    assert_eq!(report.frames_written, 9);

    let extracted = work.path().join("extracted");
    assert_eq!(extract_frames(&video, &extracted).unwrap(), 9);
}
