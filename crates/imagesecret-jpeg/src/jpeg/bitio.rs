//! Bit level access to entropy-coded scan data.
//!
//! Both directions work MSB-first and hide byte stuffing from the caller:
//! a `0xFF` data byte travels as `FF 00` in the stream.

use super::huffman::{HuffmanTable, MAX_CODE_LENGTH};
use super::marker::{Marker, MARKER_PREFIX};
use crate::error::{JpegError, Result};

/// Reads entropy-coded data one bit at a time.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    current: u8,
    /// Unread bits left in `current`.
    bits_left: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            pos: 0,
            current: 0,
            bits_left: 0,
        }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn fetch_byte(&mut self) -> Result<()> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| JpegError::invalid("unexpected end of entropy-coded data"))?;
        self.pos += 1;

        if byte == MARKER_PREFIX {
            let next = *self
                .data
                .get(self.pos)
                .ok_or_else(|| JpegError::invalid("unexpected end of entropy-coded data"))?;
            match Marker::from_u8(next) {
                None if next == 0x00 => self.pos += 1,
                Some(Marker::DNL) => {
                    return Err(JpegError::unsupported(
                        "DNL marker in entropy-coded data is not supported",
                    ))
                }
                _ => {
                    return Err(JpegError::invalid(format!(
                        "invalid marker 0xFF{next:02X} found in entropy-coded data at offset {}",
                        self.pos - 1
                    )))
                }
            }
        }

        self.current = byte;
        self.bits_left = 8;
        Ok(())
    }

    #[inline]
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.bits_left == 0 {
            self.fetch_byte()?;
        }
        self.bits_left -= 1;
        Ok((self.current >> self.bits_left) & 1)
    }

    /// Reads `count` (at most 16) bits as an unsigned value.
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        debug_assert!(count <= 16);
        let mut value = 0u16;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u16;
        }
        Ok(value)
    }

    /// Decodes one Huffman symbol (ITU T.81 Figure F.16).
    pub fn decode(&mut self, table: &HuffmanTable) -> Result<u8> {
        let mut code = 0i32;
        for length in 1..=MAX_CODE_LENGTH {
            code = (code << 1) | self.read_bit()? as i32;
            if let Some(symbol) = table.symbol(code, length) {
                return Ok(symbol);
            }
        }
        Err(JpegError::invalid(format!(
            "invalid Huffman code near offset {} for {:?} table {}",
            self.pos, table.class, table.id
        )))
    }

    /// RECEIVE followed by EXTEND: reads a `size` bit magnitude and restores its sign.
    pub fn receive_extend(&mut self, size: u8) -> Result<i16> {
        if size == 0 {
            return Ok(0);
        }
        if size > 15 {
            return Err(JpegError::invalid(format!(
                "coefficient category {size} out of range"
            )));
        }
        let value = self.read_bits(size)? as i32;
        if value < 1 << (size - 1) {
            Ok((value + (-1 << size) + 1) as i16)
        } else {
            Ok(value as i16)
        }
    }

    /// Skips the rest of the current byte and consumes the expected `RSTn` marker.
    pub fn restart(&mut self, expected: u8) -> Result<()> {
        self.bits_left = 0;
        let marker = Marker::RST(expected).to_bytes();
        if self.data.get(self.pos..self.pos + 2) != Some(&marker[..]) {
            return Err(JpegError::invalid(format!(
                "expected restart marker RST{expected} at offset {}",
                self.pos
            )));
        }
        self.pos += 2;
        Ok(())
    }
}

/// Writes entropy-coded data, stuffing a zero byte after every `0xFF`.
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    /// Pending bits, right aligned.
    bits: u32,
    num_bits: u8,
}

impl BitWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        BitWriter {
            data: Vec::with_capacity(capacity),
            bits: 0,
            num_bits: 0,
        }
    }

    /// Writes the low `count` bits of `value`, most significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u16, count: u8) {
        debug_assert!(count <= 16);
        if count == 0 {
            return;
        }
        let mask = (1u32 << count) - 1;
        self.bits = (self.bits << count) | (value as u32 & mask);
        self.num_bits += count;

        while self.num_bits >= 8 {
            self.num_bits -= 8;
            self.push_byte((self.bits >> self.num_bits) as u8);
        }
        self.bits &= (1u32 << self.num_bits) - 1;
    }

    #[inline]
    pub fn write_bit(&mut self, bit: u8) {
        self.write_bits((bit & 1) as u16, 1);
    }

    /// Writes the code of `symbol`, failing if the table has none.
    pub fn write_symbol(&mut self, symbol: u8, table: &HuffmanTable) -> Result<()> {
        let (code, size) = table.code(symbol).ok_or_else(|| {
            JpegError::invalid(format!(
                "symbol 0x{symbol:02X} has no code in {:?} Huffman table {}",
                table.class, table.id
            ))
        })?;
        self.write_bits(code, size);
        Ok(())
    }

    fn push_byte(&mut self, byte: u8) {
        self.data.push(byte);
        if byte == MARKER_PREFIX {
            self.data.push(0x00);
        }
    }

    /// Completes a partially filled byte by padding it with 1-bits.
    pub fn write_incomplete_byte(&mut self) {
        if self.num_bits > 0 {
            let padding = 8 - self.num_bits;
            let byte = (self.bits << padding) | ((1u32 << padding) - 1);
            self.push_byte(byte as u8);
            self.bits = 0;
            self.num_bits = 0;
        }
    }

    /// Pads the current byte and emits an unstuffed `RSTn` marker.
    pub fn write_restart_marker(&mut self, index: u8) {
        self.write_incomplete_byte();
        self.data.extend_from_slice(&Marker::RST(index).to_bytes());
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.write_incomplete_byte();
        self.data
    }
}

/// Magnitude category (SSSS) and the additional bits that encode `value`.
///
/// Inverse of [`BitReader::receive_extend`].
#[inline]
pub fn encode_coefficient(value: i16) -> (u8, u16) {
    if value == 0 {
        return (0, 0);
    }
    let magnitude = value.unsigned_abs();
    let size = (16 - magnitude.leading_zeros()) as u8;
    let bits = if value < 0 {
        ((1u32 << size) - 1 - magnitude as u32) as u16
    } else {
        magnitude
    };
    (size, bits)
}
