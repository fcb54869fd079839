pub mod composite_settings;
pub mod compositor;
