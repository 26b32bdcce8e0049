use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

/// Domain interface for irreversibly degrading face regions within a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) and must leave
/// pixels outside every region untouched.
pub trait FrameObfuscator: Send {
    fn obfuscate(
        &self,
        frame: &mut Frame,
        regions: &[FaceRegion],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
