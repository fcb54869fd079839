use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for export progress, per-frame stage timings and metrics.
///
/// The executor reports through this trait so the CLI can print a
/// throughput report while tests and embedders stay silent.
pub trait PipelineLogger: Send {
    fn progress(&mut self, current: usize, total: usize);

    /// Duration of one stage (`"background"`, `"composite"`) for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Called once after the last frame. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Debug, Default)]
struct Series {
    values: Vec<f64>,
}

impl Series {
    fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.total() / self.values.len() as f64
        }
    }
}

/// Logs progress through the `log` facade and accumulates stage timings
/// for an end-of-export report.
///
/// Progress lines are throttled to one every `throttle_frames` frames,
/// plus the final frame.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Series>,
    metrics: BTreeMap<String, Series>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    /// The report `summary` logs, or `None` before any frame was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let elapsed_ms = elapsed_s * 1000.0;
        let mut lines = vec![format!(
            "Export summary ({} frames, {elapsed_s:.1}s):",
            self.frames_seen
        )];

        for (stage, series) in &self.timings {
            let share = if elapsed_ms > 0.0 {
                series.total() / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {:6.1}ms  total {:7.0}ms  ({share:4.1}%)",
                series.mean(),
                series.total()
            ));
        }
        for (name, series) in &self.metrics {
            lines.push(format!("  {name}: avg {:.1}", series.mean()));
        }
        if self.frames_seen > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames_seen as f64 / elapsed_s
            ));
        }
        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|s| s.values.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|s| s.values.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Compositing: {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Compositing: {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .values
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .values
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("composite", 5.0);
        logger.metric("reader_queue_depth", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("composite", 20.0);
        logger.timing("composite", 30.0);
        logger.timing("background", 5.0);

        assert_eq!(logger.timings_for("composite"), Some(&[20.0, 30.0][..]));
        assert_eq!(logger.timings_for("background"), Some(&[5.0][..]));
        assert!(logger.timings_for("encode").is_none());
    }

    #[test]
    fn test_metric_mean() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("reader_queue_depth", 3.0);
        logger.metric("reader_queue_depth", 4.0);

        let values = logger.metrics_for("reader_queue_depth").unwrap();
        assert_relative_eq!(values.iter().sum::<f64>() / values.len() as f64, 3.5);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(10, 10);
        logger.timing("composite", 20.0);
        logger.timing("background", 5.0);
        logger.metric("reader_queue_depth", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Export summary (10 frames"));
        assert!(summary.contains("composite"));
        assert!(summary.contains("background"));
        assert!(summary.contains("reader_queue_depth: avg 2.0"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_summary_sorted_by_stage_name() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("composite", 1.0);
        logger.timing("background", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.find("background").unwrap() < summary.find("composite").unwrap());
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_seen() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, 0);
        }
        assert_eq!(logger.frames_seen, 20);
    }

    #[test]
    fn test_zero_throttle_is_raised_to_one() {
        assert_eq!(StdoutPipelineLogger::new(0).throttle_frames, 1);
        assert_eq!(StdoutPipelineLogger::default().throttle_frames, 30);
    }
}
