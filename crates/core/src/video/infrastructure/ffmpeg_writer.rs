use std::path::Path;

use ffmpeg_next::format::context::Output;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;
use ffmpeg_next::Rational;

use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes composited frames as MPEG-4 Part 2 video via ffmpeg-next.
///
/// Frames are converted from RGB24 to YUV420P and stamped with sequential
/// presentation timestamps at the metadata's effective frame rate.
pub struct FfmpegWriter {
    session: Option<EncodeSession>,
}

struct EncodeSession {
    octx: Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: scaling::Context,
    width: u32,
    height: u32,
    time_base: Rational,
    frame_count: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self { session: None }
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSession {
    /// Moves every packet the encoder has ready into the container.
    fn drain(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ost_time_base = self
            .octx
            .stream(0)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(self.time_base, ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.encoder.send_eof()?;
        self.drain()?;
        self.octx.write_trailer()?;
        Ok(())
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut octx = ffmpeg_next::format::output(path)?;
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;
        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;
        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);

        // MPEG-4 needs an integral time base; fractional rates round.
        let fps = (metadata.effective_fps().round() as i32).max(1);
        let time_base = Rational(1, fps);
        encoder_ctx.set_time_base(time_base);
        encoder_ctx.set_frame_rate(Some(Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        octx.write_header()?;

        let scaler = scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            scaling::Flags::BILINEAR,
        )?;

        log::debug!(
            "Encoding {}x{} @ {fps} fps to {}",
            metadata.width,
            metadata.height,
            path.display()
        );
        self.session = Some(EncodeSession {
            octx,
            encoder,
            scaler,
            width: metadata.width,
            height: metadata.height,
            time_base,
            frame_count: 0,
        });
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let session = self.session.as_mut().ok_or("FfmpegWriter: not opened")?;

        if frame.channels() != 3 {
            return Err(ChromaKeyError::UnsupportedColorSpace {
                channels: frame.channels(),
            }
            .into());
        }
        if frame.dimensions() != (session.width, session.height) {
            return Err(ChromaKeyError::InvalidDimensions {
                expected: (session.width, session.height),
                actual: frame.dimensions(),
            }
            .into());
        }

        let mut rgb_frame =
            Video::new(ffmpeg_next::format::Pixel::RGB24, session.width, session.height);
        let stride = rgb_frame.stride(0);
        let row_bytes = session.width as usize * 3;
        let dst = rgb_frame.data_mut(0);
        for (row, src_row) in frame.data().chunks_exact(row_bytes).enumerate() {
            let start = row * stride;
            dst[start..start + row_bytes].copy_from_slice(src_row);
        }

        let mut yuv_frame = Video::empty();
        session.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(session.frame_count as i64));

        session.encoder.send_frame(&yuv_frame)?;
        session.drain()?;
        session.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        session.finish()?;
        log::debug!("Finalized video with {} frames", session.frame_count);
        Ok(())
    }
}
