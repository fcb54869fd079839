use std::path::Path;

use crate::background::domain::background_source::BackgroundSource;
use crate::compositing::domain::composite_settings::CompositeSettings;
use crate::compositing::domain::compositor::Compositor;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

use super::pipeline_executor::CompositeJob;
use super::pipeline_logger::NullPipelineLogger;

/// Single-image pipeline: read → step background once → composite → write.
pub struct CompositeImageUseCase {
    reader: Box<dyn VideoReader>,
    image_writer: Box<dyn ImageWriter>,
    job: CompositeJob,
}

impl CompositeImageUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        image_writer: Box<dyn ImageWriter>,
        compositor: Box<dyn Compositor>,
        background: Option<BackgroundSource>,
        settings: CompositeSettings,
    ) -> Self {
        Self {
            reader,
            image_writer,
            job: CompositeJob::new(compositor, background, settings),
        }
    }

    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.reader.open(input_path)?;
        let frame = self.reader.frames().next().ok_or("No frames in image")??;
        self.reader.close();

        if let Some(background) = self.job.background.as_mut() {
            background.rewind();
        }
        let output = self.job.render(&frame, &mut NullPipelineLogger)?;
        self.image_writer.write(output_path, &output)?;

        log::info!(
            "Wrote {}x{} composite to {}",
            output.width(),
            output.height(),
            output_path.display()
        );
        Ok(())
    }
}
