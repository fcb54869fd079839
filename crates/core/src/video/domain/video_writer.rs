use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Encodes composited frames into a video container.
///
/// A failed `write` leaves earlier frames intact; callers still `close`
/// the writer so the frames already written form a playable file.
pub trait VideoWriter: Send {
    /// Starts a container at `path` sized and timed from `metadata`.
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes the encoder and finalizes the container. Safe to call twice.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
