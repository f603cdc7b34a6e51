use std::fs;
use std::path::Path;

use crate::result::Result;
use crate::StegoError;

/// Image formats that can carry a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    /// Detects the type from the extension after the last `.` of `filename`, ignoring case.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "jpg" | "jpeg" => Ok(ImageType::Jpeg),
            "png" => Ok(ImageType::Png),
            _ => Err(StegoError::UnsupportedFormat(format!(
                "no image processor for file '{filename}'"
            ))),
        }
    }
}

/// An image as bytes together with the file name it was declared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCarrier {
    pub content: Vec<u8>,
    pub filename: String,
}

impl FileCarrier {
    pub fn new<S: Into<String>>(content: Vec<u8>, filename: S) -> Self {
        Self {
            content,
            filename: filename.into(),
        }
    }

    pub fn from_file<P: AsRef<Path> + ?Sized>(path: &P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| StegoError::ReadError { source })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StegoError::InvalidFileName(path.display().to_string()))?;

        Ok(Self::new(content, filename))
    }

    pub fn image_type(&self) -> Result<ImageType> {
        ImageType::from_filename(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_select_the_image_type() {
        assert_eq!(ImageType::from_filename("a.jpg").unwrap(), ImageType::Jpeg);
        assert_eq!(ImageType::from_filename("a.JPEG").unwrap(), ImageType::Jpeg);
        assert_eq!(ImageType::from_filename("x.y.Png").unwrap(), ImageType::Png);
    }

    #[test]
    fn unknown_extensions_are_unsupported() {
        for name in ["a.gif", "png", "archive.png.zip", ""] {
            assert!(
                matches!(
                    ImageType::from_filename(name),
                    Err(StegoError::UnsupportedFormat(_))
                ),
                "{name}"
            );
        }
    }
}
