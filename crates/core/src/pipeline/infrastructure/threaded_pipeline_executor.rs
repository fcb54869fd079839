use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::pipeline_executor::{
    CompositeJob, ExportFailure, ExportSummary, PipelineConfig, PipelineExecutor,
};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type SendError = Box<dyn std::error::Error + Send + Sync>;
type ProgressFn = dyn Fn(usize, usize) -> bool + Send;

/// Executes an export with decode and encode on their own threads.
///
/// Layout: `reader → main [background step, composite] → writer`
///
/// The background cursor only moves on the main thread, one step per
/// foreground frame, in decode order.
pub struct ThreadedPipelineExecutor {
    channel_capacity: usize,
}

impl ThreadedPipelineExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedPipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// How the main loop stopped.
enum LoopEnd {
    Finished,
    Cancelled,
    Failed(String),
    /// The writer hung up; its own outcome carries the reason.
    WriterGone,
}

struct WriterOutcome {
    frames_written: usize,
    error: Option<String>,
}

impl PipelineExecutor for ThreadedPipelineExecutor {
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        mut writer: Box<dyn VideoWriter>,
        job: CompositeJob,
        metadata: &VideoMetadata,
        output_path: &Path,
        config: PipelineConfig,
    ) -> Result<ExportSummary, Box<dyn std::error::Error>> {
        let total_frames = metadata.total_frames;
        let PipelineConfig {
            on_progress,
            cancelled,
            mut logger,
        } = config;

        writer.open(output_path, metadata)?;
        logger.info(&format!(
            "Exporting {}x{} to {}",
            metadata.width,
            metadata.height,
            output_path.display()
        ));

        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<Result<Frame, SendError>>(self.channel_capacity);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<Frame>(self.channel_capacity);

        let reader_handle = spawn_reader(reader, frame_tx, cancelled.clone());
        let writer_handle = spawn_writer(writer, write_rx);

        let end = run_main_loop(
            frame_rx,
            write_tx,
            job,
            &cancelled,
            on_progress.as_deref(),
            &mut *logger,
            total_frames,
        );

        let reader_panicked = reader_handle.join().is_err();
        let outcome = writer_handle.join().unwrap_or_else(|_| WriterOutcome {
            frames_written: 0,
            error: Some("writer thread panicked".to_string()),
        });
        logger.summary();

        let failure = |reason: String| -> Box<dyn std::error::Error> {
            Box::new(ExportFailure {
                frames_written: outcome.frames_written,
                total_frames,
                reason,
            })
        };

        if let Some(reason) = outcome.error.clone() {
            return Err(failure(reason));
        }
        match end {
            LoopEnd::Failed(reason) => return Err(failure(reason)),
            LoopEnd::WriterGone => return Err(failure("writer stopped early".to_string())),
            LoopEnd::Finished | LoopEnd::Cancelled => {}
        }
        if reader_panicked {
            return Err(failure("reader thread panicked".to_string()));
        }

        let summary = ExportSummary {
            frames_written: outcome.frames_written,
            total_frames,
            cancelled: matches!(end, LoopEnd::Cancelled),
        };
        if summary.cancelled {
            logger.info(&format!(
                "Export cancelled after {} frames",
                summary.frames_written
            ));
        }
        Ok(summary)
    }
}

fn spawn_reader(
    mut reader: Box<dyn VideoReader>,
    frame_tx: Sender<Result<Frame, SendError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for frame_result in reader.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let failed = frame_result.is_err();
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() || failed {
                break;
            }
        }
        reader.close();
    })
}

/// Encodes until the channel closes or a write fails. The writer is
/// closed either way so the frames already encoded stay playable.
fn spawn_writer(
    mut writer: Box<dyn VideoWriter>,
    write_rx: Receiver<Frame>,
) -> JoinHandle<WriterOutcome> {
    std::thread::spawn(move || {
        let mut frames_written = 0;
        let mut error = None;
        for frame in &write_rx {
            if let Err(e) = writer.write(&frame) {
                log::warn!("Write failed at frame {}: {e}", frame.index());
                error = Some(e.to_string());
                break;
            }
            frames_written += 1;
        }
        drop(write_rx);

        if let Err(e) = writer.close() {
            error.get_or_insert(e.to_string());
        }
        WriterOutcome {
            frames_written,
            error,
        }
    })
}

/// Steps the background and composites each decoded frame in order,
/// handing results to the writer.
#[allow(clippy::too_many_arguments)]
fn run_main_loop(
    frame_rx: Receiver<Result<Frame, SendError>>,
    write_tx: Sender<Frame>,
    mut job: CompositeJob,
    cancelled: &AtomicBool,
    on_progress: Option<&ProgressFn>,
    logger: &mut dyn PipelineLogger,
    total_frames: usize,
) -> LoopEnd {
    let mut frames_sent = 0;
    for frame_result in &frame_rx {
        if cancelled.load(Ordering::Relaxed) {
            return LoopEnd::Cancelled;
        }
        logger.metric("reader_queue_depth", frame_rx.len() as f64);

        let frame = match frame_result {
            Ok(frame) => frame,
            Err(e) => return LoopEnd::Failed(format!("decode failed: {e}")),
        };
        let output = match job.render(&frame, logger) {
            Ok(output) => output,
            Err(e) => return LoopEnd::Failed(e.to_string()),
        };
        if write_tx.send(output).is_err() {
            return LoopEnd::WriterGone;
        }

        frames_sent += 1;
        logger.progress(frames_sent, total_frames);
        if let Some(callback) = on_progress {
            if !callback(frames_sent, total_frames) {
                cancelled.store(true, Ordering::Relaxed);
                return LoopEnd::Cancelled;
            }
        }
    }

    if cancelled.load(Ordering::Relaxed) {
        LoopEnd::Cancelled
    } else {
        LoopEnd::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::domain::background_source::{BackgroundSource, PlaybackDirection};
    use crate::compositing::domain::composite_settings::CompositeSettings;
    use crate::compositing::domain::compositor::Compositor;
    use crate::compositing::infrastructure::cpu_compositor::CpuCompositor;
    use crate::keying::domain::adjustment::Adjustment;
    use crate::keying::domain::key_color::KeyColor;
    use crate::keying::domain::keying_parameters::KeyingParameters;
    use crate::shared::error::ChromaKeyError;
    use std::sync::Mutex;

    const GREEN: [u8; 3] = [0, 255, 0];

    // --- Stubs ---

    struct StubReader {
        frames: Vec<Result<Frame, String>>,
        closed: Arc<Mutex<bool>>,
    }

    impl StubReader {
        fn new(frames: Vec<Frame>) -> Self {
            Self::with_results(frames.into_iter().map(Ok).collect())
        }

        fn with_results(frames: Vec<Result<Frame, String>>) -> Self {
            Self {
                frames,
                closed: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl VideoReader for StubReader {
        fn open(&mut self, _path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            Ok(meta_with_count(self.frames.len()))
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(self.frames.drain(..).map(|r| r.map_err(Into::into)))
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct StubWriter {
        written: Arc<Mutex<Vec<Frame>>>,
        closed: Arc<Mutex<bool>>,
        fail_at: Option<usize>,
    }

    impl StubWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
                closed: Arc::new(Mutex::new(false)),
                fail_at: None,
            }
        }

        fn failing_at(n: usize) -> Self {
            Self {
                fail_at: Some(n),
                ..Self::new()
            }
        }
    }

    impl VideoWriter for StubWriter {
        fn open(
            &mut self,
            _path: &Path,
            _metadata: &VideoMetadata,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            let mut written = self.written.lock().unwrap();
            if self.fail_at == Some(written.len()) {
                return Err("disk full".into());
            }
            written.push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    struct FailingCompositor;

    impl Compositor for FailingCompositor {
        fn composite(
            &self,
            _foreground: &Frame,
            _background: &Frame,
            _key_color: KeyColor,
            _params: &KeyingParameters,
            _fg_adjust: &Adjustment,
            _bg_adjust: &Adjustment,
        ) -> Result<Frame, ChromaKeyError> {
            Err(ChromaKeyError::UnsupportedColorSpace { channels: 4 })
        }
    }

    // --- Helpers ---

    fn key_frames(count: usize) -> Vec<Frame> {
        (0..count).map(|i| Frame::filled(8, 6, GREEN, i)).collect()
    }

    fn meta_with_count(count: usize) -> VideoMetadata {
        VideoMetadata {
            width: 8,
            height: 6,
            fps: 30.0,
            total_frames: count,
            codec: String::new(),
            source_path: None,
        }
    }

    fn job(background: Option<BackgroundSource>) -> CompositeJob {
        CompositeJob::new(
            Box::new(CpuCompositor::new()),
            background,
            CompositeSettings::default(),
        )
    }

    fn red_background() -> Option<BackgroundSource> {
        Some(BackgroundSource::StaticImage(Frame::filled(4, 4, [255, 0, 0], 0)))
    }

    fn run(
        reader: StubReader,
        writer: StubWriter,
        job: CompositeJob,
        count: usize,
        config: PipelineConfig,
    ) -> Result<ExportSummary, Box<dyn std::error::Error>> {
        ThreadedPipelineExecutor::new().execute(
            Box::new(reader),
            Box::new(writer),
            job,
            &meta_with_count(count),
            Path::new("/tmp/out.mp4"),
            config,
        )
    }

    fn expect_failure(result: Result<ExportSummary, Box<dyn std::error::Error>>) -> ExportFailure {
        let err = result.unwrap_err();
        match err.downcast::<ExportFailure>() {
            Ok(failure) => *failure,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // --- Tests ---

    #[test]
    fn test_composites_every_frame_in_order() {
        let writer = StubWriter::new();
        let written = writer.written.clone();

        let summary = run(
            StubReader::new(key_frames(5)),
            writer,
            job(red_background()),
            5,
            PipelineConfig::default(),
        )
        .unwrap();

        assert_eq!(
            summary,
            ExportSummary {
                frames_written: 5,
                total_frames: 5,
                cancelled: false
            }
        );
        let written = written.lock().unwrap();
        for (i, frame) in written.iter().enumerate() {
            assert_eq!(frame.index(), i);
            assert_eq!(frame.dimensions(), (8, 6));
            assert_eq!(frame.pixel(3, 3), &[255, 0, 0]);
        }
    }

    #[test]
    fn test_no_background_passes_foreground_through() {
        let writer = StubWriter::new();
        let written = writer.written.clone();

        run(
            StubReader::new(key_frames(2)),
            writer,
            job(None),
            2,
            PipelineConfig::default(),
        )
        .unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].pixel(0, 0), &GREEN);
    }

    #[test]
    fn test_background_video_steps_once_per_frame_from_its_cursor() {
        let bg_frames = (0..3u8)
            .map(|i| Frame::filled(8, 6, [i * 10 + 10, 0, 0], i as usize))
            .collect();
        let mut background =
            BackgroundSource::frame_sequence(bg_frames, PlaybackDirection::Reverse).unwrap();
        background.next_background(8, 6).unwrap();

        let writer = StubWriter::new();
        let written = writer.written.clone();
        run(
            StubReader::new(key_frames(4)),
            writer,
            job(Some(background)),
            4,
            PipelineConfig::default(),
        )
        .unwrap();

        let reds: Vec<u8> = written.lock().unwrap().iter().map(|f| f.pixel(0, 0)[0]).collect();
        // Cursor sits on frame 2; reverse steps visit 1, 0, 2, 1.
        assert_eq!(reds, vec![20, 10, 30, 20]);
    }

    #[test]
    fn test_closes_reader_and_writer() {
        let reader = StubReader::new(key_frames(2));
        let reader_closed = reader.closed.clone();
        let writer = StubWriter::new();
        let writer_closed = writer.closed.clone();

        run(reader, writer, job(None), 2, PipelineConfig::default()).unwrap();

        assert!(*reader_closed.lock().unwrap());
        assert!(*writer_closed.lock().unwrap());
    }

    #[test]
    fn test_empty_video_writes_nothing() {
        let summary = run(
            StubReader::new(vec![]),
            StubWriter::new(),
            job(red_background()),
            0,
            PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.frames_written, 0);
        assert!(!summary.cancelled);
    }

    #[test]
    fn test_write_failure_still_closes_writer_and_reports_count() {
        let writer = StubWriter::failing_at(2);
        let writer_closed = writer.closed.clone();

        let failure = expect_failure(run(
            StubReader::new(key_frames(6)),
            writer,
            job(red_background()),
            6,
            PipelineConfig::default(),
        ));

        assert_eq!(failure.frames_written, 2);
        assert_eq!(failure.total_frames, 6);
        assert!(failure.reason.contains("disk full"));
        assert!(*writer_closed.lock().unwrap());
    }

    #[test]
    fn test_decode_error_stops_export() {
        let mut results: Vec<Result<Frame, String>> = key_frames(2).into_iter().map(Ok).collect();
        results.push(Err("corrupt packet".to_string()));
        results.push(Ok(Frame::filled(8, 6, GREEN, 3)));
        let writer = StubWriter::new();
        let writer_closed = writer.closed.clone();

        let failure = expect_failure(run(
            StubReader::with_results(results),
            writer,
            job(None),
            4,
            PipelineConfig::default(),
        ));

        assert_eq!(failure.frames_written, 2);
        assert!(failure.reason.contains("corrupt packet"));
        assert!(*writer_closed.lock().unwrap());
    }

    #[test]
    fn test_compositor_error_stops_export() {
        let failure = expect_failure(run(
            StubReader::new(key_frames(3)),
            StubWriter::new(),
            CompositeJob::new(
                Box::new(FailingCompositor),
                red_background(),
                CompositeSettings::default(),
            ),
            3,
            PipelineConfig::default(),
        ));
        assert_eq!(failure.frames_written, 0);
        assert!(failure.reason.contains("channels"));
    }

    #[test]
    fn test_progress_callback_can_cancel() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let config = PipelineConfig {
            on_progress: Some(Box::new(move |done, total| {
                seen.lock().unwrap().push((done, total));
                done < 2
            })),
            ..Default::default()
        };

        let summary = run(
            StubReader::new(key_frames(10)),
            StubWriter::new(),
            job(red_background()),
            10,
            config,
        )
        .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.frames_written, 2);
        assert_eq!(*calls.lock().unwrap(), vec![(1, 10), (2, 10)]);
    }

    #[test]
    fn test_pre_cancelled_flag_writes_nothing() {
        let config = PipelineConfig {
            cancelled: Arc::new(AtomicBool::new(true)),
            ..Default::default()
        };

        let summary = run(
            StubReader::new(key_frames(5)),
            StubWriter::new(),
            job(None),
            5,
            config,
        )
        .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.frames_written, 0);
    }

    #[test]
    fn test_small_channel_capacity_keeps_order() {
        let writer = StubWriter::new();
        let written = writer.written.clone();

        ThreadedPipelineExecutor::with_channel_capacity(1)
            .execute(
                Box::new(StubReader::new(key_frames(20))),
                Box::new(writer),
                job(red_background()),
                &meta_with_count(20),
                Path::new("/tmp/out.mp4"),
                PipelineConfig::default(),
            )
            .unwrap();

        let indices: Vec<usize> = written.lock().unwrap().iter().map(Frame::index).collect();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
    }
}
