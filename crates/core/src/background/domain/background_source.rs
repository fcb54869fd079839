use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;
use crate::shared::resample::resize_frame;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackDirection {
    #[default]
    Forward,
    Reverse,
}

/// A background video fully decoded into memory, with a looping play cursor.
///
/// The cursor advances before every read and wraps at both ends, so playback
/// loops without a pause at the seam. Not reentrant: step one sequence from
/// one thread at a time.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    cursor: usize,
    direction: PlaybackDirection,
}

impl FrameSequence {
    /// Creates a sequence with the cursor at 0. Fails on an empty frame list
    /// or on any frame that is not 3-channel.
    pub fn new(frames: Vec<Frame>, direction: PlaybackDirection) -> Result<Self, ChromaKeyError> {
        if frames.is_empty() {
            return Err(ChromaKeyError::EmptySequence);
        }
        frames.iter().try_for_each(check_rgb)?;
        Ok(Self {
            frames,
            cursor: 0,
            direction,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn direction(&self) -> PlaybackDirection {
        self.direction
    }

    /// Takes effect on the next step.
    pub fn set_direction(&mut self, direction: PlaybackDirection) {
        self.direction = direction;
    }

    /// Puts the cursor back at 0. The next step then yields frame 1 going
    /// forward or the last frame going in reverse.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn next_cursor(&self) -> usize {
        let len = self.frames.len();
        match self.direction {
            PlaybackDirection::Forward => (self.cursor + 1) % len,
            PlaybackDirection::Reverse => (self.cursor + len - 1) % len,
        }
    }

    /// Moves the cursor one frame in the play direction, wrapping at the ends,
    /// and returns the frame now under it.
    pub fn step(&mut self) -> &Frame {
        self.cursor = self.next_cursor();
        &self.frames[self.cursor]
    }
}

fn check_rgb(frame: &Frame) -> Result<(), ChromaKeyError> {
    if frame.channels() != 3 {
        return Err(ChromaKeyError::UnsupportedColorSpace {
            channels: frame.channels(),
        });
    }
    Ok(())
}

/// The background composited behind keyed pixels.
#[derive(Clone, Debug)]
pub enum BackgroundSource {
    StaticImage(Frame),
    FrameSequence(FrameSequence),
}

impl BackgroundSource {
    /// Fails on a frame that is not 3-channel.
    pub fn static_image(image: Frame) -> Result<Self, ChromaKeyError> {
        check_rgb(&image)?;
        Ok(Self::StaticImage(image))
    }

    pub fn frame_sequence(
        frames: Vec<Frame>,
        direction: PlaybackDirection,
    ) -> Result<Self, ChromaKeyError> {
        FrameSequence::new(frames, direction).map(Self::FrameSequence)
    }

    /// Changes playback direction; a static image has none.
    pub fn set_direction(&mut self, direction: PlaybackDirection) {
        if let Self::FrameSequence(seq) = self {
            seq.set_direction(direction);
        }
    }

    pub fn rewind(&mut self) {
        if let Self::FrameSequence(seq) = self {
            seq.rewind();
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::FrameSequence(_))
    }

    /// Produces the next background raster at exactly `width` x `height`.
    ///
    /// A static image is only resampled. A frame sequence resamples the frame
    /// after its cursor and moves the cursor there only on success.
    pub fn next_background(&mut self, width: u32, height: u32) -> Result<Frame, ChromaKeyError> {
        if width == 0 || height == 0 {
            return Err(ChromaKeyError::InvalidDimensions {
                expected: (width, height),
                actual: (width, height),
            });
        }
        match self {
            Self::StaticImage(image) => resize_frame(image, width, height),
            Self::FrameSequence(seq) => {
                let next = seq.next_cursor();
                let frame = resize_frame(&seq.frames[next], width, height)?;
                seq.cursor = next;
                Ok(frame)
            }
        }
    }
}

/// Free-function form of [`BackgroundSource::next_background`].
pub fn next_background(
    source: &mut BackgroundSource,
    width: u32,
    height: u32,
) -> Result<Frame, ChromaKeyError> {
    source.next_background(width, height)
}
