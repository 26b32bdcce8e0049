pub mod config;
pub mod constants;
pub mod face_region;
pub mod frame;
pub mod geometry;
pub mod status;
