use image::imageops::{self, FilterType};

use super::error::ChromaKeyError;
use super::frame::Frame;

/// Resizes a 3-channel frame to exactly `width` x `height` with bilinear
/// filtering, stretching as needed. The frame index is preserved.
///
/// Returns a copy without filtering when the frame already has the target size.
pub fn resize_frame(frame: &Frame, width: u32, height: u32) -> Result<Frame, ChromaKeyError> {
    if width == 0 || height == 0 {
        return Err(ChromaKeyError::InvalidDimensions {
            expected: (width, height),
            actual: frame.dimensions(),
        });
    }
    if frame.channels() != 3 {
        return Err(ChromaKeyError::UnsupportedColorSpace {
            channels: frame.channels(),
        });
    }
    if frame.dimensions() == (width, height) {
        return Ok(frame.clone());
    }

    let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or_else(|| ChromaKeyError::Resample("frame data does not match dimensions".into()))?;
    let resized = imageops::resize(&img, width, height, FilterType::Triangle);

    Ok(Frame::new(resized.into_raw(), width, height, 3, frame.index()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_size_is_identity() {
        let mut frame = Frame::filled(4, 3, [9, 8, 7], 2);
        frame.data_mut()[0] = 200;
        let out = resize_frame(&frame, 4, 3).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_upscale_hits_exact_target() {
        let frame = Frame::filled(2, 2, [10, 20, 30], 0);
        let out = resize_frame(&frame, 7, 5).unwrap();
        assert_eq!(out.dimensions(), (7, 5));
        assert_eq!(out.data().len(), 7 * 5 * 3);
    }

    #[test]
    fn test_uniform_color_survives_resize() {
        let frame = Frame::filled(16, 9, [40, 120, 220], 0);
        let out = resize_frame(&frame, 5, 11).unwrap();
        for px in out.data().chunks_exact(3) {
            assert_eq!(px, &[40, 120, 220]);
        }
    }

    #[test]
    fn test_preserves_index() {
        let frame = Frame::filled(8, 8, [0, 0, 0], 42);
        assert_eq!(resize_frame(&frame, 4, 4).unwrap().index(), 42);
    }

    #[test]
    fn test_zero_target_rejected() {
        let frame = Frame::filled(8, 8, [0, 0, 0], 0);
        assert!(matches!(
            resize_frame(&frame, 0, 4),
            Err(ChromaKeyError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_non_rgb_rejected() {
        let frame = Frame::new(vec![0u8; 16], 2, 2, 4, 0);
        assert!(matches!(
            resize_frame(&frame, 4, 4),
            Err(ChromaKeyError::UnsupportedColorSpace { channels: 4 })
        ));
    }
}
