use crate::obfuscation::infrastructure::overlay::Overlay;

/// Receives each repainted live overlay.
pub trait OverlaySink: Send {
    fn deliver(&mut self, overlay: &Overlay) -> Result<(), Box<dyn std::error::Error>>;
}
