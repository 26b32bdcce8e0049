use thiserror::Error;

use crate::shared::face_region::RegionError;

/// User-facing failures of a photo session. None of them end the session;
/// the user can always retake.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("could not capture photo: {0}")]
    Capture(String),
    #[error("could not produce obscured image: {0}")]
    Encode(String),
    #[error("obscured image is still building")]
    StillBuilding,
    #[error("no photo has been captured")]
    NoPhoto,
    #[error(transparent)]
    Region(#[from] RegionError),
}
