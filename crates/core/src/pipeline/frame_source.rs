use crate::shared::frame::Frame;

/// Supplies live video frames (a camera in the app, a directory of stills
/// in the CLI).
pub trait FrameSource: Send {
    /// Next frame, or `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;
}
