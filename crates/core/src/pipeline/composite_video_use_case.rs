use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::background::domain::background_source::BackgroundSource;
use crate::compositing::domain::composite_settings::CompositeSettings;
use crate::compositing::domain::compositor::Compositor;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_executor::{CompositeJob, ExportSummary, PipelineConfig, PipelineExecutor};
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Composites a whole foreground video over a background and encodes it.
///
/// Single-use: `execute` hands the owned reader, writer and background to
/// the executor, so a second call fails.
pub struct CompositeVideoUseCase {
    reader: Option<Box<dyn VideoReader>>,
    writer: Option<Box<dyn VideoWriter>>,
    job: Option<CompositeJob>,
    executor: Box<dyn PipelineExecutor>,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    cancelled: Arc<AtomicBool>,
    logger: Option<Box<dyn PipelineLogger>>,
}

impl CompositeVideoUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        compositor: Box<dyn Compositor>,
        background: Option<BackgroundSource>,
        settings: CompositeSettings,
        executor: Box<dyn PipelineExecutor>,
        on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
        cancelled: Option<Arc<AtomicBool>>,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Self {
        Self {
            reader: Some(reader),
            writer: Some(writer),
            job: Some(CompositeJob::new(compositor, background, settings)),
            executor,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            logger,
        }
    }

    /// Runs the export. `metadata` describes the already-opened foreground
    /// and sizes the output. A background video is rewound to cursor 0
    /// first, whatever an earlier preview left its cursor at.
    pub fn execute(
        &mut self,
        metadata: &VideoMetadata,
        output_path: &Path,
    ) -> Result<ExportSummary, Box<dyn std::error::Error>> {
        let mut job = self.job.take().ok_or("Pipeline already executed")?;
        if let Some(background) = job.background.as_mut() {
            background.rewind();
        }

        let config = PipelineConfig {
            on_progress: self.on_progress.take(),
            cancelled: self.cancelled.clone(),
            logger: self
                .logger
                .take()
                .unwrap_or_else(|| Box::new(NullPipelineLogger)),
        };

        let summary = self.executor.execute(
            self.reader.take().ok_or("Pipeline already executed")?,
            self.writer.take().ok_or("Pipeline already executed")?,
            job,
            metadata,
            output_path,
            config,
        )?;
        log::info!(
            "Wrote {} of {} frames to {}",
            summary.frames_written,
            summary.total_frames,
            output_path.display()
        );
        Ok(summary)
    }
}
