use std::path::Path;

use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Saves a composited frame with the `image` crate (PNG, JPEG, ... by extension).
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(ChromaKeyError::UnsupportedColorSpace {
                channels: frame.channels(),
            }
            .into());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(path)?;
        log::debug!(
            "Wrote {}x{} image to {}",
            frame.width(),
            frame.height(),
            path.display()
        );
        Ok(())
    }
}
