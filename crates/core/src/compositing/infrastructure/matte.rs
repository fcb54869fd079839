use crate::keying::domain::hsv::Hsv;
use crate::shared::constants::{HUE_RANGE, SATURATION_VALUE_GATE};
use crate::shared::frame::Frame;

use super::gaussian;

/// Matte blur kernel size for a softness setting: `4 * softness + 1`.
///
/// Softness 0 gives a 1-tap kernel, i.e. no blur.
pub fn kernel_size_for_softness(softness: u32) -> usize {
    4 * softness as usize + 1
}

/// Inclusive hue band `[key - tolerance, key + tolerance]`, clamped to the
/// hue range without wrapping.
pub fn hue_band(key_hue: u8, tolerance: u32) -> (u32, u32) {
    let key = key_hue as u32;
    (key.saturating_sub(tolerance), (key + tolerance).min(HUE_RANGE))
}

/// Returns true when a pixel falls inside the key band and clears the
/// saturation/value gate.
pub fn is_key_pixel(hsv: Hsv, band: (u32, u32)) -> bool {
    let h = hsv.h as u32;
    h >= band.0
        && h <= band.1
        && hsv.s >= SATURATION_VALUE_GATE
        && hsv.v >= SATURATION_VALUE_GATE
}

/// Binary alpha map of a 3-channel frame: 1.0 where the pixel is keyed,
/// 0.0 elsewhere. One entry per pixel, row-major.
pub fn key_mask(frame: &Frame, key: Hsv, tolerance: u32) -> Vec<f32> {
    let band = hue_band(key.h, tolerance);
    frame
        .data()
        .chunks_exact(3)
        .map(|px| {
            let hsv = Hsv::from_rgb(px[0], px[1], px[2]);
            if is_key_pixel(hsv, band) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Feathers an alpha map in place with the Gaussian for `softness`.
pub fn feather(alpha: &mut [f32], width: usize, height: usize, softness: u32, temp: &mut Vec<f32>) {
    let kernel_size = kernel_size_for_softness(softness);
    if kernel_size <= 1 {
        return;
    }
    let kernel = gaussian::gaussian_kernel_1d(kernel_size);
    gaussian::separable_blur_plane(alpha, width, height, &kernel, temp);
}
