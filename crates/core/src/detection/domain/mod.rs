pub mod description_source;
pub mod face_detector;
pub mod fail_soft;
pub mod manual_marker;
