use crate::shared::constants::{MAX_BRIGHTNESS, MAX_CONTRAST, MIN_BRIGHTNESS, MIN_CONTRAST};
use crate::shared::frame::Frame;

/// Per-channel affine remap: `clamp(round(value * contrast + brightness), 0, 255)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjustment {
    pub brightness: i32,
    pub contrast: f32,
}

impl Adjustment {
    pub fn new(brightness: i32, contrast: f32) -> Self {
        Self {
            brightness,
            contrast,
        }
    }

    pub fn identity() -> Self {
        Self::new(0, 1.0)
    }

    pub fn clamped(self) -> Self {
        let contrast = if self.contrast.is_finite() {
            self.contrast.clamp(MIN_CONTRAST, MAX_CONTRAST)
        } else {
            1.0
        };
        Self {
            brightness: self.brightness.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS),
            contrast,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 1.0
    }

    pub fn apply_value(&self, value: u8) -> u8 {
        (value as f32 * self.contrast + self.brightness as f32)
            .round()
            .clamp(0.0, 255.0) as u8
    }

    /// Applies the remap to every channel of every pixel.
    pub fn apply(&self, frame: &Frame) -> Frame {
        let adj = self.clamped();
        let mut out = frame.clone();
        if adj.is_identity() {
            return out;
        }
        let lut: Vec<u8> = (0..=255u8).map(|v| adj.apply_value(v)).collect();
        for v in out.data_mut() {
            *v = lut[*v as usize];
        }
        out
    }
}

impl Default for Adjustment {
    fn default() -> Self {
        Self::identity()
    }
}
