use std::path::Path;

use crate::background::domain::background_source::{
    BackgroundSource, FrameSequence, PlaybackDirection,
};
use crate::shared::error::ChromaKeyError;
use crate::shared::media_path::is_image_path;
use crate::video::domain::video_reader::VideoReader;
use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
use crate::video::infrastructure::image_file_reader::ImageFileReader;

pub type ReaderFactory = Box<dyn Fn() -> Box<dyn VideoReader> + Send + Sync>;

/// Builds a [`BackgroundSource`] from a file on disk.
///
/// Image extensions become a `StaticImage`; anything else is decoded in
/// full into a `FrameSequence`.
pub struct BackgroundLoader {
    image_reader: ReaderFactory,
    video_reader: ReaderFactory,
}

impl BackgroundLoader {
    pub fn new(image_reader: ReaderFactory, video_reader: ReaderFactory) -> Self {
        Self {
            image_reader,
            video_reader,
        }
    }

    pub fn load(
        &self,
        path: &Path,
        direction: PlaybackDirection,
    ) -> Result<BackgroundSource, ChromaKeyError> {
        if is_image_path(path) {
            let mut frames = read_frames((self.image_reader)(), path)?;
            let image = frames.pop().ok_or(ChromaKeyError::EmptySequence)?;
            log::info!(
                "Loaded background image {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            return BackgroundSource::static_image(image);
        }

        let frames = read_frames((self.video_reader)(), path)?;
        log::info!(
            "Loaded background video {} ({} frames, {:?})",
            path.display(),
            frames.len(),
            direction
        );
        Ok(BackgroundSource::FrameSequence(FrameSequence::new(
            frames, direction,
        )?))
    }
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        Self::new(
            Box::new(|| Box::new(ImageFileReader::new())),
            Box::new(|| Box::new(FfmpegReader::new())),
        )
    }
}

fn read_frames(
    mut reader: Box<dyn VideoReader>,
    path: &Path,
) -> Result<Vec<crate::shared::frame::Frame>, ChromaKeyError> {
    let unreadable = |e: Box<dyn std::error::Error>| ChromaKeyError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    reader.open(path).map_err(unreadable)?;
    let frames = reader.read_all().map_err(unreadable);
    reader.close();
    frames
}
