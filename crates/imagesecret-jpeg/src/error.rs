//! Error types for JPEG container and payload operations.

use std::fmt;
use thiserror::Error;

/// Result type alias for JPEG operations.
pub type Result<T> = std::result::Result<T, JpegError>;

/// Errors that can occur while parsing, re-encoding or embedding into a JPEG.
#[derive(Error)]
pub enum JpegError {
    /// The byte stream violates the JPEG grammar (bad SOI, truncated segment, bad Huffman code, ...).
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    /// The image is a valid JPEG but uses a feature outside of baseline Huffman DCT.
    #[error("unsupported format: {reason}")]
    UnsupportedFormat { reason: String },

    /// The payload does not fit into the usable coefficients of the carrier.
    #[error("Not enough space in the image. Required: {required} bytes, available: {available} bytes")]
    NotEnoughSpace { required: usize, available: usize },

    /// The carrier does not hold a well formed payload.
    #[error("payload read error: {reason}")]
    PayloadRead { reason: String },
}

impl JpegError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        JpegError::InvalidImage {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        JpegError::UnsupportedFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn payload(reason: impl Into<String>) -> Self {
        JpegError::PayloadRead {
            reason: reason.into(),
        }
    }
}

/// Byte level reads only fail on truncated input, which is a malformed image.
impl From<std::io::Error> for JpegError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => JpegError::invalid("unexpected end of file"),
            _ => JpegError::invalid(e.to_string()),
        }
    }
}

impl fmt::Debug for JpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // same text as Display
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enough_space_reports_both_sizes() {
        let e = JpegError::NotEnoughSpace {
            required: 120,
            available: 64,
        };
        assert_eq!(
            e.to_string(),
            "Not enough space in the image. Required: 120 bytes, available: 64 bytes"
        );
    }

    #[test]
    fn truncated_reads_become_invalid_image() {
        let e: JpegError = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(e, JpegError::InvalidImage { .. }));
        assert_eq!(format!("{e:?}"), "invalid image: unexpected end of file");
    }
}
