use crate::keying::domain::adjustment::Adjustment;
use crate::keying::domain::key_color::KeyColor;
use crate::keying::domain::keying_parameters::KeyingParameters;
use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;

/// Domain interface for merging a foreground over a background by key color.
///
/// Implementations are pure: the same inputs always yield the same output,
/// and the inputs are never modified. Both rasters must have the same size.
pub trait Compositor: Send {
    fn composite(
        &self,
        foreground: &Frame,
        background: &Frame,
        key_color: KeyColor,
        params: &KeyingParameters,
        fg_adjust: &Adjustment,
        bg_adjust: &Adjustment,
    ) -> Result<Frame, ChromaKeyError>;
}
