use crate::processor::ImageProcessor;
use crate::result::Result;

/// Hides payloads in the quantized DCT coefficients of baseline JPEGs.
///
/// The image is never decompressed: coefficients are Huffman decoded,
/// modified and Huffman encoded again with the original tables, so the
/// result has the same quality and nearly the same size as the carrier.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegImageProcessor;

impl ImageProcessor for JpegImageProcessor {
    fn encode(&self, carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        Ok(imagesecret_jpeg::embed_in_jpeg(carrier, payload)?)
    }

    fn decode(&self, carrier: &[u8]) -> Result<Vec<u8>> {
        Ok(imagesecret_jpeg::extract_from_jpeg(carrier)?)
    }

    fn max_payload_size(&self, carrier: &[u8]) -> Result<usize> {
        Ok(imagesecret_jpeg::jpeg_capacity(carrier)?)
    }
}
