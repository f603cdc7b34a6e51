//! Format dispatch and payload framing on top of the image processors.

use enum_dispatch::enum_dispatch;

use crate::carrier::{FileCarrier, ImageType};
use crate::media::{JpegImageProcessor, PngImageProcessor};
use crate::payload::Payload;
use crate::result::Result;

/// Raw payload embedding for one image format.
#[enum_dispatch]
pub trait ImageProcessor {
    /// Returns `carrier` with `payload` hidden inside.
    fn encode(&self, carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>>;

    /// Returns the payload hidden in `carrier`.
    fn decode(&self, carrier: &[u8]) -> Result<Vec<u8>>;

    /// Largest payload in bytes `carrier` can hold.
    fn max_payload_size(&self, carrier: &[u8]) -> Result<usize>;
}

#[enum_dispatch(ImageProcessor)]
#[derive(Debug, Clone, Copy)]
pub enum ImageProcessors {
    JpegImageProcessor,
    PngImageProcessor,
}

/// Hides framed [`Payload`]s in JPEG and PNG carriers.
///
/// The processor is picked from the carrier's file name extension.
#[derive(Debug, Clone)]
pub struct DefaultImageStegoProcessor {
    jpeg: ImageProcessors,
    png: ImageProcessors,
}

impl Default for DefaultImageStegoProcessor {
    fn default() -> Self {
        Self::new(JpegImageProcessor, PngImageProcessor)
    }
}

impl DefaultImageStegoProcessor {
    pub fn new<J, P>(jpeg: J, png: P) -> Self
    where
        J: Into<ImageProcessors>,
        P: Into<ImageProcessors>,
    {
        Self {
            jpeg: jpeg.into(),
            png: png.into(),
        }
    }

    fn processor(&self, carrier: &FileCarrier) -> Result<&ImageProcessors> {
        Ok(match carrier.image_type()? {
            ImageType::Jpeg => &self.jpeg,
            ImageType::Png => &self.png,
        })
    }

    /// Largest framed payload, see [`Payload::framed_len`], that fits into `carrier`.
    pub fn max_payload_size(&self, carrier: &FileCarrier) -> Result<usize> {
        self.processor(carrier)?.max_payload_size(&carrier.content)
    }

    pub fn embed(&self, carrier: &FileCarrier, payload: &Payload) -> Result<FileCarrier> {
        let processor = self.processor(carrier)?;
        let framed = payload.write()?;
        log::debug!(
            "hiding a {} byte payload in '{}'",
            framed.len(),
            carrier.filename
        );
        let content = processor.encode(&carrier.content, &framed)?;

        Ok(FileCarrier::new(content, carrier.filename.clone()))
    }

    pub fn extract(&self, carrier: &FileCarrier) -> Result<Payload> {
        let framed = self.processor(carrier)?.decode(&carrier.content)?;
        log::debug!(
            "found a {} byte payload in '{}'",
            framed.len(),
            carrier.filename
        );

        Payload::read(&framed)
    }
}
