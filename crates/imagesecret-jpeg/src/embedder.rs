//! Payload embedding into the low bits of quantized DCT coefficients.
//!
//! Layout: a 64-bit big-endian length (payload size in bits) followed by the
//! payload bits, most significant first. Every usable coefficient carries two
//! bits: the first goes into bit 0, the second into bit 1.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::Cursor;

use crate::coefficients::{coefficients, CoefficientCursor};
use crate::error::{JpegError, Result};
use crate::jpeg::scan::Mcu;

/// Smallest positive coefficient that carries payload bits.
pub const USABLE_POSITIVE_MIN: i16 = 4;
/// Largest negative coefficient that carries payload bits.
pub const USABLE_NEGATIVE_MAX: i16 = -5;
/// Payload bits stored per usable coefficient.
pub const BITS_PER_COEFFICIENT: usize = 2;
/// Size of the length prefix in bits.
pub const LENGTH_PREFIX_BITS: usize = 64;

const LOW_BITS_MASK: i16 = 0b11;

/// Whether `value` may carry payload bits.
///
/// Replacing the two low bits of a usable value always yields a usable
/// value, so extraction finds the same coefficients embedding wrote to.
#[inline]
pub fn is_usable(value: i16) -> bool {
    value <= USABLE_NEGATIVE_MAX || value >= USABLE_POSITIVE_MIN
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JpegPayloadEmbedder;

impl JpegPayloadEmbedder {
    /// Payload bytes that fit into `mcus` next to the length prefix.
    pub fn capacity(&self, mcus: &[Mcu]) -> usize {
        let bits = coefficients(mcus).filter(|&v| is_usable(v)).count() * BITS_PER_COEFFICIENT;
        bits.saturating_sub(LENGTH_PREFIX_BITS) / 8
    }

    /// Writes `payload` into `mcus`.
    ///
    /// Fails with [`JpegError::NotEnoughSpace`] before touching any
    /// coefficient when the payload does not fit. An empty payload is a no-op.
    pub fn embed(&self, mcus: &mut [Mcu], payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Ok(());
        }
        let available = self.capacity(mcus);
        if payload.len() > available {
            return Err(JpegError::NotEnoughSpace {
                required: payload.len(),
                available,
            });
        }

        let mut framed = Vec::with_capacity(LENGTH_PREFIX_BITS / 8 + payload.len());
        framed.extend_from_slice(&(payload.len() as u64 * 8).to_be_bytes());
        framed.extend_from_slice(payload);

        let total_bits = framed.len() * 8;
        let mut bits = BitReader::endian(Cursor::new(&framed), BigEndian);
        let mut cursor = CoefficientCursor::new(mcus);
        let mut written = 0;

        while written < total_bits {
            let value = cursor.next().ok_or(JpegError::NotEnoughSpace {
                required: payload.len(),
                available,
            })?;
            if !is_usable(value) {
                continue;
            }
            let low = bits.read_bit()? as i16;
            let high = bits.read_bit()? as i16;
            cursor.set((value & !LOW_BITS_MASK) | (high << 1) | low);
            written += BITS_PER_COEFFICIENT;
        }

        log::debug!(
            "embedded {} payload bytes, {available} bytes available",
            payload.len()
        );
        Ok(())
    }

    /// Reads a payload written by [`embed`](Self::embed).
    pub fn extract(&self, mcus: &[Mcu]) -> Result<Vec<u8>> {
        let capacity = self.capacity(mcus);
        let mut bits = coefficients(mcus)
            .filter(|&v| is_usable(v))
            .flat_map(|v| [v & 1 != 0, (v >> 1) & 1 != 0]);

        let mut length = 0u64;
        for _ in 0..LENGTH_PREFIX_BITS {
            let bit = bits
                .next()
                .ok_or_else(|| JpegError::payload("image is too small to hold a payload length"))?;
            length = (length << 1) | bit as u64;
        }
        if length % 8 != 0 || length / 8 > capacity as u64 {
            return Err(JpegError::payload(format!(
                "declared payload of {length} bits does not fit into {capacity} bytes"
            )));
        }

        let mut payload = BitWriter::endian(Vec::with_capacity((length / 8) as usize), BigEndian);
        for _ in 0..length {
            let bit = bits
                .next()
                .ok_or_else(|| JpegError::payload("payload is truncated"))?;
            payload.write_bit(bit)?;
        }

        log::debug!("extracted {} payload bytes", length / 8);
        Ok(payload.into_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::scan::McuComponent;

    /// One MCU whose single component cycles through `values`.
    fn carrier(values: &[i16], blocks: usize) -> Vec<Mcu> {
        let mut component = McuComponent::new(0, 0, blocks, 1);
        for (sample, value) in component.samples.iter_mut().zip(values.iter().cycle()) {
            *sample = *value;
        }
        vec![Mcu {
            components: vec![component],
        }]
    }

    #[test]
    fn usable_range_boundaries() {
        assert!(!is_usable(3));
        assert!(is_usable(4));
        assert!(!is_usable(-4));
        assert!(is_usable(-5));
        assert!(!is_usable(0));

        for value in [-200i16, -8, -6, -5, 4, 5, 7, 120] {
            for low in 0..4 {
                assert!(is_usable((value & !LOW_BITS_MASK) | low), "{value} with {low}");
            }
        }
    }

    #[test]
    fn capacity_counts_two_bits_per_usable_coefficient() {
        // half of 640 coefficients are usable: 640 bits, 64 for the length
        let mcus = carrier(&[9, 1], 10);
        assert_eq!(JpegPayloadEmbedder.capacity(&mcus), (640 - 64) / 8);
        assert_eq!(JpegPayloadEmbedder.capacity(&carrier(&[0], 4)), 0);
    }

    #[test]
    fn embed_then_extract() {
        let mut mcus = carrier(&[12, 0, -7, 2, 5, -30], 8);
        let payload = b"coefficients";

        JpegPayloadEmbedder.embed(&mut mcus, payload).unwrap();
        assert_eq!(JpegPayloadEmbedder.extract(&mcus).unwrap(), payload);
    }

    #[test]
    fn bit_layout_is_low_bit_first() {
        let mut mcus = carrier(&[8], 1);
        JpegPayloadEmbedder.embed(&mut mcus, &[0b0110_0000]).unwrap();

        let samples = &mcus[0].components[0].samples;
        // length 8 = 0x00..08: bits ... 0 0 1 0 0 0 as pairs (0,0) (1,0) (0,0)
        assert!(samples[..30].iter().all(|&v| v == 8));
        assert_eq!(samples[30], 8 | 0b01);
        assert_eq!(samples[31], 8);
        // payload 0110_0000: pairs (0,1) (1,0) (0,0) (0,0)
        assert_eq!(samples[32], 8 | 0b10);
        assert_eq!(samples[33], 8 | 0b01);
        assert_eq!(samples[34], 8);
    }

    #[test]
    fn negative_coefficients_keep_their_sign() {
        let mut mcus = carrier(&[-5], 1);
        JpegPayloadEmbedder.embed(&mut mcus, &[0xFF]).unwrap();

        let samples = &mcus[0].components[0].samples;
        assert_eq!(samples[32], -5);
        assert_eq!(samples[0], -8);
        assert!(samples.iter().all(|&v| is_usable(v)));
    }

    #[test]
    fn oversized_payload_leaves_coefficients_untouched() {
        let mut mcus = carrier(&[6, -9, 0], 1);
        let before = mcus.clone();
        let available = JpegPayloadEmbedder.capacity(&mcus);

        let err = JpegPayloadEmbedder
            .embed(&mut mcus, &vec![1u8; available + 1])
            .unwrap_err();
        match err {
            JpegError::NotEnoughSpace { required, available: a } => {
                assert_eq!(required, available + 1);
                assert_eq!(a, available);
            }
            other => panic!("unexpected {other}"),
        }
        assert_eq!(mcus, before);
    }

    #[test]
    fn empty_payload_is_a_no_op() {
        let mut mcus = carrier(&[6, -9, 0], 1);
        let before = mcus.clone();
        JpegPayloadEmbedder.embed(&mut mcus, &[]).unwrap();
        assert_eq!(mcus, before);
    }

    #[test]
    fn garbage_length_is_a_payload_error() {
        // every usable coefficient reads as bits (1, 1)
        let mcus = carrier(&[7], 4);
        assert!(matches!(
            JpegPayloadEmbedder.extract(&mcus),
            Err(JpegError::PayloadRead { .. })
        ));
        assert!(matches!(
            JpegPayloadEmbedder.extract(&carrier(&[0], 1)),
            Err(JpegError::PayloadRead { .. })
        ));
    }
}
