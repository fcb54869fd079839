use ndarray::{s, Axis};

use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::key_color::KeyColor;

/// Averages each channel over `region` to pick a key color.
///
/// The region is clipped to the frame first; means are truncated to 8 bits.
/// A region with no pixels inside the frame is rejected.
pub fn sample_key_color(frame: &Frame, region: &Region) -> Result<KeyColor, ChromaKeyError> {
    if frame.channels() != 3 {
        return Err(ChromaKeyError::UnsupportedColorSpace {
            channels: frame.channels(),
        });
    }
    if region.area() == 0 {
        return Err(ChromaKeyError::InvalidRegion);
    }
    let clipped = region
        .clip(frame.width(), frame.height())
        .ok_or(ChromaKeyError::InvalidRegion)?;

    let (x0, y0) = (clipped.x as usize, clipped.y as usize);
    let (x1, y1) = (x0 + clipped.width as usize, y0 + clipped.height as usize);

    let view = frame.as_ndarray();
    let roi = view.slice(s![y0..y1, x0..x1, ..]);
    let pixels = roi.len_of(Axis(0)) * roi.len_of(Axis(1));

    let mut channels = [0u8; 3];
    for (c, slot) in channels.iter_mut().enumerate() {
        let sum: u64 = roi.index_axis(Axis(2), c).iter().map(|&v| v as u64).sum();
        *slot = (sum / pixels as u64) as u8;
    }

    log::debug!("Sampled key color {channels:?} from {pixels} pixels");
    Ok(KeyColor { channels })
}
