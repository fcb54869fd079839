use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the compositing core and its loaders.
///
/// Structural problems (mismatched sizes, empty backgrounds, unknown
/// channel layouts) are reported immediately and never retried here.
/// Parameter values out of range are clamped instead; `OutOfRangeParameter`
/// exists for front ends that validate user input before calling in.
#[derive(Error, Debug)]
pub enum ChromaKeyError {
    #[error("raster is {}x{}, expected {}x{}", .actual.0, .actual.1, .expected.0, .expected.1)]
    InvalidDimensions {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("background sequence contains no frames")]
    EmptySequence,
    #[error("parameter {name} out of range: {value}")]
    OutOfRangeParameter { name: &'static str, value: String },
    #[error("unsupported channel layout: {channels} channels (expected 3)")]
    UnsupportedColorSpace { channels: u8 },
    #[error("sample region has zero area")]
    InvalidRegion,
    #[error("cannot read {}: {}", .path.display(), .reason)]
    Unreadable { path: PathBuf, reason: String },
    #[error("resample failed: {0}")]
    Resample(String),
}
