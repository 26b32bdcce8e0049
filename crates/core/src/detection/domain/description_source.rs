use crate::shared::frame::Frame;

/// A vision service that answers with free text about an image.
///
/// The text may mention face positions; turning it into regions is the
/// job of the description detector.
pub trait DescriptionSource: Send {
    fn describe(&mut self, frame: &Frame) -> Result<String, Box<dyn std::error::Error>>;
}
