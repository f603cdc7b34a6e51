//! One payload bit in the least significant bit of every red, green and
//! blue sample. Alpha is never touched.
//!
//! Layout: a 32-bit big-endian length (payload size in bits) followed by
//! the payload bits, most significant first, pixels in row-major order.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use image::RgbaImage;
use std::io::Cursor;

use crate::result::Result;
use crate::StegoError;

/// Size of the length prefix in bits.
pub const LENGTH_PREFIX_BITS: usize = 32;
/// Samples per pixel that carry payload bits.
const CARRIER_CHANNELS: usize = 3;

fn channel_bits(image: &RgbaImage) -> usize {
    image.width() as usize * image.height() as usize * CARRIER_CHANNELS
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PngPayloadEmbedder;

impl PngPayloadEmbedder {
    /// Payload bytes that fit next to the length prefix.
    pub fn capacity(&self, image: &RgbaImage) -> usize {
        channel_bits(image).saturating_sub(LENGTH_PREFIX_BITS) / 8
    }

    /// Writes `payload` into the color samples of `image`.
    ///
    /// Nothing is modified when the payload does not fit. An empty payload is a no-op.
    pub fn embed(&self, image: &mut RgbaImage, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Ok(());
        }
        let available = self.capacity(image);
        let not_enough_space = StegoError::NotEnoughSpaceForPayload {
            required: payload.len(),
            available,
        };
        if payload.len() > available {
            return Err(not_enough_space);
        }
        let length = u32::try_from(payload.len() * 8).map_err(|_| not_enough_space)?;

        let mut framed = Vec::with_capacity(LENGTH_PREFIX_BITS / 8 + payload.len());
        framed.extend_from_slice(&length.to_be_bytes());
        framed.extend_from_slice(payload);

        let mut remaining = framed.len() * 8;
        let mut bits = BitReader::endian(Cursor::new(&framed), BigEndian);

        'pixels: for pixel in image.pixels_mut() {
            for channel in pixel.0.iter_mut().take(CARRIER_CHANNELS) {
                if remaining == 0 {
                    break 'pixels;
                }
                let bit = bits
                    .read_bit()
                    .map_err(|source| StegoError::ReadError { source })?;
                *channel = (*channel & !1) | bit as u8;
                remaining -= 1;
            }
        }

        log::debug!(
            "embedded {} payload bytes into {}x{} pixels, {available} bytes available",
            payload.len(),
            image.width(),
            image.height()
        );
        Ok(())
    }

    /// Reads a payload written by [`embed`](Self::embed).
    pub fn extract(&self, image: &RgbaImage) -> Result<Vec<u8>> {
        let capacity = self.capacity(image);
        let mut bits = image
            .pixels()
            .flat_map(|pixel| pixel.0[..CARRIER_CHANNELS].iter().map(|&c| c & 1 == 1));

        let mut length = 0u32;
        for _ in 0..LENGTH_PREFIX_BITS {
            let bit = bits.next().ok_or_else(|| {
                StegoError::PayloadReadError("image is too small to hold a payload length".into())
            })?;
            length = (length << 1) | bit as u32;
        }
        if length % 8 != 0 || (length / 8) as usize > capacity {
            return Err(StegoError::PayloadReadError(format!(
                "declared payload of {length} bits does not fit into {capacity} bytes"
            )));
        }

        let mut payload = BitWriter::endian(Vec::with_capacity(length as usize / 8), BigEndian);
        for _ in 0..length {
            let bit = bits
                .next()
                .ok_or_else(|| StegoError::PayloadReadError("payload is truncated".into()))?;
            payload
                .write_bit(bit)
                .map_err(|source| StegoError::WriteError { source })?;
        }

        log::debug!("extracted {} payload bytes", length / 8);
        Ok(payload.into_writer())
    }
}
