pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Pure green, the usual greenscreen key.
pub const DEFAULT_KEY_COLOR: [u8; 3] = [0, 255, 0];
pub const DEFAULT_TOLERANCE: u32 = 25;
pub const DEFAULT_SOFTNESS: u32 = 0;
pub const DEFAULT_SPILL_SUPPRESSION: u32 = 0;

/// 8-bit hue spans 0..180 (degrees halved).
pub const HUE_RANGE: u32 = 180;
pub const MAX_TOLERANCE: u32 = HUE_RANGE;
pub const MAX_SOFTNESS: u32 = 25;
pub const MAX_SPILL_SUPPRESSION: u32 = 100;

/// Saturation and value must both reach this before a pixel can be keyed;
/// keeps near-black and near-gray pixels from matching any hue.
pub const SATURATION_VALUE_GATE: u8 = 50;

pub const MIN_BRIGHTNESS: i32 = -255;
pub const MAX_BRIGHTNESS: i32 = 255;
pub const MIN_CONTRAST: f32 = 0.0;
pub const MAX_CONTRAST: f32 = 4.0;

/// Encoder frame rate when the source does not report one.
pub const FALLBACK_FPS: f64 = 30.0;
