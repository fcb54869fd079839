pub mod cpu_compositor;
pub mod gaussian;
pub mod matte;
