use std::path::PathBuf;

use super::constants::FALLBACK_FPS;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Frame rate to encode at: the reported rate, or 30 when unknown.
    pub fn effective_fps(&self) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            FALLBACK_FPS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn meta(fps: f64) -> VideoMetadata {
        VideoMetadata {
            width: 1920,
            height: 1080,
            fps,
            total_frames: 900,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("/tmp/test.mp4")),
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let m = meta(30.0);
        let cloned = m.clone();
        assert_eq!(m, cloned);
    }

    #[test]
    fn test_effective_fps_uses_reported_rate() {
        assert_relative_eq!(meta(24.0).effective_fps(), 24.0);
    }

    #[test]
    fn test_effective_fps_falls_back_when_unknown() {
        assert_relative_eq!(meta(0.0).effective_fps(), 30.0);
        assert_relative_eq!(meta(f64::NAN).effective_fps(), 30.0);
    }

    #[test]
    fn test_image_metadata() {
        // Images are represented as single-frame sources with fps=0
        let m = VideoMetadata {
            width: 800,
            height: 600,
            fps: 0.0,
            total_frames: 1,
            codec: String::new(),
            source_path: None,
        };
        assert_eq!(m.total_frames, 1);
    }
}
