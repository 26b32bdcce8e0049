//! Face region detection adapters and the obfuscation engine behind `picai`.
//!
//! Still photos go through [`pipeline::obscure_photo_use_case`] and are cached
//! per [`session::photo_session::PhotoSession`]; live frames go through
//! [`pipeline::live_preview::LivePreview`], which renders an overlay every tick.

pub mod detection;
pub mod imaging;
pub mod obfuscation;
pub mod pipeline;
pub mod session;
pub mod shared;
