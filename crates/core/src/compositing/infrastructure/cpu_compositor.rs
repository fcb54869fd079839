use std::cell::RefCell;

use crate::compositing::domain::compositor::Compositor;
use crate::keying::domain::adjustment::Adjustment;
use crate::keying::domain::key_color::KeyColor;
use crate::keying::domain::keying_parameters::KeyingParameters;
use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;

use super::matte;

/// CPU chroma key compositor.
///
/// Per call: adjust both rasters, build a hue/saturation/value key mask from
/// the adjusted foreground, feather it with a Gaussian sized by softness,
/// alpha-blend background over foreground, then subtract the spill amount
/// from the green-like channel of the whole output.
///
/// The blur scratch buffer is reused across calls; it never affects output.
pub struct CpuCompositor {
    blur_temp: RefCell<Vec<f32>>,
}

impl CpuCompositor {
    pub fn new() -> Self {
        Self {
            blur_temp: RefCell::new(Vec::new()),
        }
    }
}

impl Default for CpuCompositor {
    fn default() -> Self {
        Self::new()
    }
}

fn check_rgb(frame: &Frame) -> Result<(), ChromaKeyError> {
    if frame.channels() != 3 {
        return Err(ChromaKeyError::UnsupportedColorSpace {
            channels: frame.channels(),
        });
    }
    Ok(())
}

impl Compositor for CpuCompositor {
    fn composite(
        &self,
        foreground: &Frame,
        background: &Frame,
        key_color: KeyColor,
        params: &KeyingParameters,
        fg_adjust: &Adjustment,
        bg_adjust: &Adjustment,
    ) -> Result<Frame, ChromaKeyError> {
        check_rgb(foreground)?;
        check_rgb(background)?;
        if foreground.dimensions() != background.dimensions() {
            return Err(ChromaKeyError::InvalidDimensions {
                expected: foreground.dimensions(),
                actual: background.dimensions(),
            });
        }

        let params = params.clamped();
        let width = foreground.width() as usize;
        let height = foreground.height() as usize;

        let fg = fg_adjust.apply(foreground);
        let bg = bg_adjust.apply(background);

        let mut alpha = matte::key_mask(&fg, key_color.to_hsv(), params.tolerance);
        {
            let mut temp = self.blur_temp.borrow_mut();
            matte::feather(&mut alpha, width, height, params.softness, &mut temp);
        }

        let mut out = fg.into_data();
        for ((px, bg_px), &a) in out
            .chunks_exact_mut(3)
            .zip(bg.data().chunks_exact(3))
            .zip(alpha.iter())
        {
            if a <= 0.0 {
                continue;
            }
            for (f, &b) in px.iter_mut().zip(bg_px) {
                let blended = a * b as f32 + (1.0 - a) * *f as f32;
                *f = blended.round().clamp(0.0, 255.0) as u8;
            }
        }

        if params.spill_suppression > 0 {
            let spill = params.spill_suppression.min(u8::MAX as u32) as u8;
            for px in out.chunks_exact_mut(3) {
                px[1] = px[1].saturating_sub(spill);
            }
        }

        Ok(Frame::new(
            out,
            foreground.width(),
            foreground.height(),
            3,
            foreground.index(),
        ))
    }
}
