pub mod draw_command;
pub mod effect_mode;
pub mod frame_obfuscator;
