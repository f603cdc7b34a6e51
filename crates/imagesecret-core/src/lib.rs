//! # Image Secret Core
//!
//! Hides text, files and raw bytes in JPEG and PNG images.
//!
//! A [`Payload`] is framed with a marker naming its kind and handed to the
//! processor for the carrier's format:
//! - [`JpegImageProcessor`] stores two bits in each large quantized DCT
//!   coefficient of a baseline JPEG, see [`imagesecret_jpeg`]
//! - [`PngImageProcessor`] stores one bit in the least significant bit of
//!   each red, green and blue sample
//!
//! [`DefaultImageStegoProcessor`] picks the processor by file extension.
//!
//! ## Hide a message inside an image
//!
//! ```rust
//! use imagesecret_core::{DefaultImageStegoProcessor, FileCarrier, Payload};
//! # use image::{Rgba, RgbaImage};
//! # let mut png = std::io::Cursor::new(Vec::new());
//! # RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 255]))
//! #     .write_to(&mut png, image::ImageFormat::Png)
//! #     .unwrap();
//! # let png = png.into_inner();
//!
//! let processor = DefaultImageStegoProcessor::default();
//! let carrier = FileCarrier::new(png, "holiday.png");
//!
//! let secret = processor
//!     .embed(&carrier, &Payload::text("Hello, World!"))
//!     .expect("Failed to hide the message");
//! assert_eq!(
//!     processor.extract(&secret).unwrap(),
//!     Payload::text("Hello, World!")
//! );
//! ```

pub mod carrier;
pub mod commands;
mod error;
pub mod media;
pub mod payload;
pub mod processor;
pub mod result;

pub use crate::carrier::{FileCarrier, ImageType};
pub use crate::error::StegoError;
pub use crate::media::{JpegImageProcessor, PngImageProcessor, PngPayloadEmbedder};
pub use crate::payload::Payload;
pub use crate::processor::{DefaultImageStegoProcessor, ImageProcessor, ImageProcessors};
pub use crate::result::Result;
