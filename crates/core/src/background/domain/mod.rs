pub mod background_source;
