pub mod frame_source;
pub mod infrastructure;
pub mod live_preview;
pub mod obscure_photo_use_case;
pub mod overlay_sink;
