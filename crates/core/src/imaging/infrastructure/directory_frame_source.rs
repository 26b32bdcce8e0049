use std::path::{Path, PathBuf};

use crate::imaging::domain::image_reader::ImageReader;
use crate::pipeline::frame_source::FrameSource;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

use super::image_file_reader::ImageFileReader;

/// Replays the images of a directory, in file-name order, as a live stream.
pub struct DirectoryFrameSource {
    files: Vec<PathBuf>,
    next: usize,
    reader: ImageFileReader,
}

impl DirectoryFrameSource {
    pub fn open(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_image(p))
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(format!("No images found in {}", dir.display()).into());
        }
        log::info!("Replaying {} frame(s) from {}", files.len(), dir.display());
        Ok(Self {
            files,
            next: 0,
            reader: ImageFileReader::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Size of the first frame, used to size the overlay.
    pub fn first_frame_size(&self) -> Result<(u32, u32), Box<dyn std::error::Error>> {
        let first = self.files.first().ok_or("empty frame directory")?;
        let (w, h) = image::image_dimensions(first)?;
        Ok((w, h))
    }
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
}

impl FrameSource for DirectoryFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        let frame = self.reader.read(path)?.with_index(self.next);
        self.next += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, value: u8) {
        let img = image::RgbImage::from_pixel(6, 4, image::Rgb([value, value, value]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_frames_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 20);
        write_png(dir.path(), "a.png", 10);
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let mut source = DirectoryFrameSource::open(dir.path()).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.first_frame_size().unwrap(), (6, 4));

        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(first.pixel(0, 0)[0], 10);
        assert_eq!((first.index(), second.index()), (0, 1));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_empty_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryFrameSource::open(dir.path()).is_err());
    }
}
