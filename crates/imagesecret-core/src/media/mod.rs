//! Image format specific processors.

pub mod jpeg;
pub mod png;

pub use jpeg::JpegImageProcessor;
pub use png::{PngImageProcessor, PngPayloadEmbedder};
