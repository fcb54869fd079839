use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Adapts a single image file to the [`VideoReader`] interface.
///
/// The image is a one-frame source with `fps=0` and `total_frames=1`, so
/// still foregrounds and backgrounds go through the same code as videos.
/// Decoding uses the `image` crate; any alpha channel is dropped.
pub struct ImageFileReader {
    frame: Option<Frame>,
    opened: bool,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self {
            frame: None,
            opened: false,
        }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();
        self.frame = Some(Frame::new(img.into_raw(), width, height, 3, 0));
        self.opened = true;

        Ok(VideoMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: 1,
            codec: String::new(),
            source_path: Some(path.to_path_buf()),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if !self.opened {
            return Box::new(std::iter::once(Err("ImageFileReader: not opened".into())));
        }
        Box::new(self.frame.take().into_iter().map(Ok))
    }

    fn close(&mut self) {
        self.frame = None;
        self.opened = false;
    }
}
