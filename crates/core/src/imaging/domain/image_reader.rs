use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes a captured photo into a frame at native resolution.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
