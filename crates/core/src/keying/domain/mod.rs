pub mod adjustment;
pub mod color_sampler;
pub mod hsv;
pub mod key_color;
pub mod keying_parameters;
