use crate::shared::constants::HUE_RANGE;

/// Hue/saturation/value in the common 8-bit encoding: hue is degrees halved
/// (`0..180`), saturation and value span `0..=255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let v = max;
        let diff = (max - min) as f32;

        let s = if max == 0 {
            0
        } else {
            (diff * 255.0 / max as f32).round() as u8
        };

        if diff == 0.0 {
            return Self { h: 0, s, v };
        }

        let (r, g, b) = (r as f32, g as f32, b as f32);
        let mut degrees = if max as f32 == r {
            60.0 * (g - b) / diff
        } else if max as f32 == g {
            120.0 + 60.0 * (b - r) / diff
        } else {
            240.0 + 60.0 * (r - g) / diff
        };
        if degrees < 0.0 {
            degrees += 360.0;
        }

        let mut h = (degrees / 2.0).round() as u32;
        if h >= HUE_RANGE {
            h -= HUE_RANGE;
        }
        Self { h: h as u8, s, v }
    }
}
