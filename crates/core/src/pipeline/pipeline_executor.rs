use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::background::domain::background_source::BackgroundSource;
use crate::compositing::domain::composite_settings::CompositeSettings;
use crate::compositing::domain::compositor::Compositor;
use crate::shared::error::ChromaKeyError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Per-run knobs for an export.
pub struct PipelineConfig {
    /// Called after each written frame with `(frames_done, total_frames)`.
    /// Returning `false` cancels the export.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
    pub logger: Box<dyn PipelineLogger>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            logger: Box::new(NullPipelineLogger),
        }
    }
}

/// The foreground-independent half of an export: how to composite and
/// what to composite over.
pub struct CompositeJob {
    pub compositor: Box<dyn Compositor>,
    /// `None` passes the adjusted foreground through untouched.
    pub background: Option<BackgroundSource>,
    pub settings: CompositeSettings,
}

impl CompositeJob {
    pub fn new(
        compositor: Box<dyn Compositor>,
        background: Option<BackgroundSource>,
        settings: CompositeSettings,
    ) -> Self {
        Self {
            compositor,
            background,
            settings,
        }
    }

    /// Composites one foreground frame over the next background frame,
    /// stepping the background exactly once.
    pub fn render(
        &mut self,
        foreground: &Frame,
        logger: &mut dyn PipelineLogger,
    ) -> Result<Frame, ChromaKeyError> {
        let Some(background) = self.background.as_mut() else {
            let started = Instant::now();
            let output = self.settings.passthrough(foreground);
            logger.timing("composite", elapsed_ms(started));
            return Ok(output);
        };

        let started = Instant::now();
        let backdrop = background.next_background(foreground.width(), foreground.height())?;
        logger.timing("background", elapsed_ms(started));

        let started = Instant::now();
        let output = self
            .settings
            .apply(&*self.compositor, foreground, &backdrop)?;
        logger.timing("composite", elapsed_ms(started));
        Ok(output)
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub frames_written: usize,
    /// As reported by the foreground's container; 0 when unknown.
    pub total_frames: usize,
    pub cancelled: bool,
}

/// An export that stopped early. The output file was still finalized and
/// holds the first `frames_written` frames.
#[derive(Debug, thiserror::Error)]
#[error("export stopped after {frames_written} of {total_frames} frames: {reason}")]
pub struct ExportFailure {
    pub frames_written: usize,
    pub total_frames: usize,
    pub reason: String,
}

/// Runs read → background step → composite → write over a whole video.
pub trait PipelineExecutor: Send {
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        job: CompositeJob,
        metadata: &VideoMetadata,
        output_path: &Path,
        config: PipelineConfig,
    ) -> Result<ExportSummary, Box<dyn std::error::Error>>;
}
