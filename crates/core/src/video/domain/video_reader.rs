use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a video or image source.
///
/// Implementations handle codec and container details; the compositing
/// pipeline only sees `Frame` and `VideoMetadata`. `open` fails when the
/// file is missing or unreadable; a readable file may still yield no frames.
pub trait VideoReader: Send {
    /// Opens a video or image file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader.
    fn close(&mut self);

    /// Decodes every remaining frame into memory.
    fn read_all(&mut self) -> Result<Vec<Frame>, Box<dyn std::error::Error>> {
        self.frames().collect()
    }
}
