pub mod directory_frame_source;
pub mod directory_overlay_sink;
pub mod image_file_reader;
pub mod image_file_writer;
