//! Image saving utilities.

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// Save an RGB image to disk, format inferred from the extension.
///
/// Colorized outputs and intermediate video frames are written as PNG;
/// anything the `image` crate can encode by extension works.
///
/// # Errors
///
/// Returns [`Error::ImageSave`] if encoding or writing fails.
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    let path = path.as_ref();

    image.save(path).map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::load_rgb;

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 1, image::Rgb([10, 20, 30]));
        save_image(&img, &path).unwrap();

        let reloaded = load_rgb(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (2, 2));
        assert_eq!(reloaded.get_pixel(1, 1), &image::Rgb([10, 20, 30]));
    }
}
