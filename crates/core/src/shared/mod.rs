pub mod constants;
pub mod error;
pub mod frame;
pub mod media_path;
pub mod region;
pub mod resample;
pub mod video_metadata;
