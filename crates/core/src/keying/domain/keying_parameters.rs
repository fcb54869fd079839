use crate::shared::constants::{
    DEFAULT_SOFTNESS, DEFAULT_SPILL_SUPPRESSION, DEFAULT_TOLERANCE, MAX_SOFTNESS,
    MAX_SPILL_SUPPRESSION, MAX_TOLERANCE,
};

/// Controls for the keying stage.
///
/// - `tolerance`: hue half-width around the key hue, in 8-bit hue units.
/// - `softness`: feather control; the matte blur kernel is `4 * softness + 1`.
/// - `spill_suppression`: flat amount removed from the green-like channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyingParameters {
    pub tolerance: u32,
    pub softness: u32,
    pub spill_suppression: u32,
}

impl KeyingParameters {
    pub fn new(tolerance: u32, softness: u32, spill_suppression: u32) -> Self {
        Self {
            tolerance,
            softness,
            spill_suppression,
        }
    }

    /// Copy with every field clamped to its documented bound.
    pub fn clamped(self) -> Self {
        let clamped = Self {
            tolerance: self.tolerance.min(MAX_TOLERANCE),
            softness: self.softness.min(MAX_SOFTNESS),
            spill_suppression: self.spill_suppression.min(MAX_SPILL_SUPPRESSION),
        };
        if clamped != self {
            log::debug!("Keying parameters clamped from {self:?} to {clamped:?}");
        }
        clamped
    }
}

impl Default for KeyingParameters {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_SOFTNESS, DEFAULT_SPILL_SUPPRESSION)
    }
}
