pub mod background;
pub mod compositing;
pub mod keying;
pub mod pipeline;
pub mod shared;
pub mod video;
