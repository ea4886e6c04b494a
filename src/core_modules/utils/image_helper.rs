pub mod image_helper {
    use image::ImageEncoder;
    use std::path::Path;

    /// Writes an RGB frame to disk as PNG. Debug/snapshot helper; the live
    /// pipeline never touches the filesystem.
    pub fn save_png(path: &Path, frame: &image::RgbImage) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn save_gradient_frame() {
        let width = 160u32;
        let height = 120u32;
        let mut frame = RgbImage::new(width, height);
        for (x, _, pixel) in frame.enumerate_pixels_mut() {
            let intensity = (x % 255) as u8;
            *pixel = Rgb([intensity, intensity, intensity]);
        }

        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let path = dir.path().join("gradient_frame.png");
        save_png(&path, &frame).expect("Error saving file.");
        let metadata = std::fs::metadata(&path).expect("Error reading metadata.");
        assert!(metadata.len() > 0);
    }
}
