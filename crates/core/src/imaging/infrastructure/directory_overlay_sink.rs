use std::path::PathBuf;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::obfuscation::infrastructure::overlay::Overlay;
use crate::pipeline::overlay_sink::OverlaySink;

use super::image_file_writer::ImageFileWriter;

/// Writes every delivered overlay as `overlay_NNNN.png`. Glyph stamps, when
/// present, go next to it as `overlay_NNNN.json`.
pub struct DirectoryOverlaySink {
    dir: PathBuf,
    writer: ImageFileWriter,
    count: usize,
}

impl DirectoryOverlaySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writer: ImageFileWriter::new(),
            count: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl OverlaySink for DirectoryOverlaySink {
    fn deliver(&mut self, overlay: &Overlay) -> Result<(), Box<dyn std::error::Error>> {
        let stem = format!("overlay_{:04}", self.count);
        self.writer
            .write(&self.dir.join(format!("{stem}.png")), overlay.surface())?;
        if !overlay.glyphs().is_empty() {
            let json = serde_json::to_string_pretty(overlay.glyphs())?;
            std::fs::write(self.dir.join(format!("{stem}.json")), json)?;
        }
        self.count += 1;
        Ok(())
    }
}
