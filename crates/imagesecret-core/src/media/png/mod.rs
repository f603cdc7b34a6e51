mod lsb_codec;

pub use lsb_codec::{PngPayloadEmbedder, LENGTH_PREFIX_BITS};

use image::{ImageFormat, RgbaImage};
use log::error;
use std::io::Cursor;

use crate::processor::ImageProcessor;
use crate::result::Result;
use crate::StegoError;

/// Hides payloads in the color samples of PNG images.
///
/// The carrier is decoded to RGBA8 and written back as a lossless PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngImageProcessor;

fn load(carrier: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory_with_format(carrier, ImageFormat::Png).map_err(|e| {
        error!("Error decoding PNG carrier: {e}");
        StegoError::InvalidImage(e.to_string())
    })?;

    Ok(image.to_rgba8())
}

fn save(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).map_err(|e| {
        error!("Error encoding PNG image: {e}");
        StegoError::ImageEncodingError(e)
    })?;

    Ok(buf.into_inner())
}

impl ImageProcessor for PngImageProcessor {
    fn encode(&self, carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let mut image = load(carrier)?;
        if payload.is_empty() {
            return Ok(carrier.to_vec());
        }
        PngPayloadEmbedder.embed(&mut image, payload)?;

        save(&image)
    }

    fn decode(&self, carrier: &[u8]) -> Result<Vec<u8>> {
        PngPayloadEmbedder.extract(&load(carrier)?)
    }

    fn max_payload_size(&self, carrier: &[u8]) -> Result<usize> {
        Ok(PngPayloadEmbedder.capacity(&load(carrier)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, (x ^ y) as u8, 0xFF])
        });
        save(&image).unwrap()
    }

    #[test]
    fn round_trip_through_png_bytes() {
        let carrier = png(32, 32);
        let processor = PngImageProcessor;

        let stego = processor.encode(&carrier, b"png payload").unwrap();
        assert_eq!(processor.decode(&stego).unwrap(), b"png payload");

        let decoded = image::load_from_memory(&stego).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
    }

    #[test]
    fn capacity_of_a_png() {
        assert_eq!(
            PngImageProcessor.max_payload_size(&png(10, 10)).unwrap(),
            (300 - 32) / 8
        );
    }

    #[test]
    fn empty_payload_keeps_the_bytes() {
        let carrier = png(8, 8);
        assert_eq!(PngImageProcessor.encode(&carrier, &[]).unwrap(), carrier);
    }

    #[test]
    fn garbage_is_an_invalid_image() {
        let processor = PngImageProcessor;
        assert!(matches!(
            processor.decode(b"not a png at all"),
            Err(StegoError::InvalidImage(_))
        ));
        assert!(matches!(
            processor.encode(b"\xFF\xD8\xFF", b"x"),
            Err(StegoError::InvalidImage(_))
        ));
    }
}
