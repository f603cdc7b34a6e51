//! Coefficient-level access to baseline JPEG files.
//!
//! ```text
//! JPEG → segments → Huffman decode → MCUs → embed → Huffman encode → JPEG
//! ```
//!
//! Quantization tables, headers and every other segment are copied through
//! untouched; only the entropy-coded scan body is rewritten.

pub mod bitio;
pub mod huffman;
pub mod marker;
pub mod scan;
pub mod segment;
pub mod writer;

pub use bitio::{encode_coefficient, BitReader, BitWriter};
pub use huffman::{HuffmanTable, HuffmanTables, TableClass};
pub use marker::Marker;
pub use scan::{decode_scan, encode_scan, Mcu, McuComponent, ZIGZAG_TO_NATURAL};
pub use segment::{FrameComponent, FrameHeader, ScanComponent, ScanHeader, Segment, SegmentGroup};
pub use writer::write_jpeg;

use crate::embedder::JpegPayloadEmbedder;
use crate::error::Result;

/// Maximum payload size in bytes `jpeg_data` can carry.
pub fn jpeg_capacity(jpeg_data: &[u8]) -> Result<usize> {
    let group = SegmentGroup::read(jpeg_data)?;
    let mcus = decode_scan(&group)?;
    Ok(JpegPayloadEmbedder.capacity(&mcus))
}

/// Hides `payload` in `jpeg_data` and returns the new image.
///
/// The image is fully parsed and decoded even for an empty payload, which
/// then returns the input bytes unchanged.
///
/// # Example
/// ```ignore
/// let cover = std::fs::read("cover.jpg")?;
/// let stego = imagesecret_jpeg::embed_in_jpeg(&cover, b"Secret message")?;
/// std::fs::write("stego.jpg", stego)?;
/// ```
pub fn embed_in_jpeg(jpeg_data: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let group = SegmentGroup::read(jpeg_data)?;
    let mut mcus = decode_scan(&group)?;

    if payload.is_empty() {
        return Ok(jpeg_data.to_vec());
    }

    JpegPayloadEmbedder.embed(&mut mcus, payload)?;
    let scan_body = encode_scan(&group, &mcus)?;
    write_jpeg(&group, &scan_body)
}

/// Recovers the payload hidden by [`embed_in_jpeg`].
pub fn extract_from_jpeg(jpeg_data: &[u8]) -> Result<Vec<u8>> {
    let group = SegmentGroup::read(jpeg_data)?;
    let mcus = decode_scan(&group)?;
    JpegPayloadEmbedder.extract(&mcus)
}
