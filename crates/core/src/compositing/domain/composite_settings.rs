use crate::keying::domain::adjustment::Adjustment;
use crate::keying::domain::key_color::KeyColor;
use crate::keying::domain::keying_parameters::KeyingParameters;
use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;

use super::compositor::Compositor;

/// Everything a compositor needs besides the two rasters, bundled so the
/// pipelines can carry one value per run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompositeSettings {
    pub key_color: KeyColor,
    pub keying: KeyingParameters,
    pub foreground: Adjustment,
    pub background: Adjustment,
}

impl CompositeSettings {
    pub fn apply(
        &self,
        compositor: &dyn Compositor,
        foreground: &Frame,
        background: &Frame,
    ) -> Result<Frame, ChromaKeyError> {
        compositor.composite(
            foreground,
            background,
            self.key_color,
            &self.keying,
            &self.foreground,
            &self.background,
        )
    }

    /// Output used when no background is loaded: the adjusted foreground.
    pub fn passthrough(&self, foreground: &Frame) -> Frame {
        self.foreground.apply(foreground)
    }
}
