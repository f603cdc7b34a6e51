//! Hiding data in baseline JPEG images.
//!
//! The crate parses a JPEG into its segments, Huffman decodes the scan into
//! quantized DCT coefficients, stores payload bits in the two low bits of
//! every coefficient with a magnitude large enough to survive the change,
//! and writes the image back with re-encoded entropy data.
//!
//! # Layer Responsibilities
//!
//! This crate only moves raw bytes in and out of coefficients. Payload
//! framing (text, files) is handled by `imagesecret-core`.
//!
//! # Example
//!
//! ```ignore
//! let cover = std::fs::read("cover.jpg")?;
//! let capacity = imagesecret_jpeg::jpeg_capacity(&cover)?;
//! let stego = imagesecret_jpeg::embed_in_jpeg(&cover, b"Hello World")?;
//! assert_eq!(imagesecret_jpeg::extract_from_jpeg(&stego)?, b"Hello World");
//! ```

pub mod coefficients;
pub mod embedder;
mod error;
pub mod jpeg;

pub use coefficients::CoefficientCursor;
pub use embedder::{is_usable, JpegPayloadEmbedder};
pub use error::{JpegError, Result};
pub use jpeg::{embed_in_jpeg, extract_from_jpeg, jpeg_capacity};
