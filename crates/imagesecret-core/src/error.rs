use imagesecret_jpeg::JpegError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    /// Represents a carrier that is not a well formed image of its declared type, for example a broken JPEG
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Represents a carrier type or image feature that cannot carry a payload, for example a GIF or a progressive JPEG
    #[error("Not supported image format: {0}")]
    UnsupportedFormat(String),

    /// Represents a payload that is larger than the carrier capacity
    #[error("Not enough space in the image. Required: {required} bytes, available: {available} bytes")]
    NotEnoughSpaceForPayload { required: usize, available: usize },

    /// Represents a text or binary payload without content, which could not be read back
    #[error("Payload is empty")]
    EmptyPayload,

    /// Represents a carrier without a well formed payload inside
    #[error("Payload could not be read: {0}")]
    PayloadReadError(String),

    /// Represents a file name that cannot be stored in or restored from a payload
    #[error("A file with an invalid file name was provided: {0}")]
    InvalidFileName(String),

    /// Represents a failure when encoding the resulting image
    #[error("Image encoding error")]
    ImageEncodingError(#[source] image::ImageError),

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },
}

impl From<JpegError> for StegoError {
    fn from(e: JpegError) -> Self {
        match e {
            JpegError::InvalidImage { reason } => StegoError::InvalidImage(reason),
            JpegError::UnsupportedFormat { reason } => StegoError::UnsupportedFormat(reason),
            JpegError::NotEnoughSpace {
                required,
                available,
            } => StegoError::NotEnoughSpaceForPayload {
                required,
                available,
            },
            JpegError::PayloadRead { reason } => StegoError::PayloadReadError(reason),
        }
    }
}
