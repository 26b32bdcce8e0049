pub mod photo_session;
pub mod session_error;
