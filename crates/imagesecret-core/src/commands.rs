//! File system level operations used by the command line.

use log::error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::carrier::{FileCarrier, ImageType};
use crate::payload::Payload;
use crate::processor::DefaultImageStegoProcessor;
use crate::result::Result;
use crate::StegoError;

/// File name an unveiled text payload is written to.
pub const MESSAGE_FILE_NAME: &str = "secret-message.txt";
/// File name an unveiled binary payload is written to.
pub const BINARY_FILE_NAME: &str = "secret-data.bin";

/// Hides `payload` in the image at `carrier` and writes the result to `output`.
pub fn hide(carrier: &Path, output: &Path, payload: &Payload) -> Result<()> {
    let carrier = FileCarrier::from_file(carrier)?;
    let result = DefaultImageStegoProcessor::default().embed(&carrier, payload)?;

    let target_type = output
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| ImageType::from_filename(n).ok());
    if target_type != carrier.image_type().ok() {
        log::warn!(
            "{} is written in the format of {}",
            output.display(),
            carrier.filename
        );
    }

    fs::write(output, result.content).map_err(|source| {
        error!("Error writing {}: {source}", output.display());
        StegoError::WriteError { source }
    })
}

/// Writes the payload hidden in `carrier` into `output_folder` and returns the written file.
pub fn unveil(carrier: &Path, output_folder: &Path) -> Result<PathBuf> {
    let carrier = FileCarrier::from_file(carrier)?;
    let payload = DefaultImageStegoProcessor::default().extract(&carrier)?;

    let (name, content) = match payload {
        Payload::Text(text) => (MESSAGE_FILE_NAME.to_string(), text.into_bytes()),
        Payload::File { name, content } => (sanitize_file_name(&name)?, content),
        Payload::Binary(data) => (BINARY_FILE_NAME.to_string(), data),
    };

    let target = output_folder.join(name);
    fs::write(&target, content).map_err(|source| {
        error!("Error writing {}: {source}", target.display());
        StegoError::WriteError { source }
    })?;

    Ok(target)
}

/// Largest framed payload in bytes the image at `carrier` can hold.
pub fn capacity(carrier: &Path) -> Result<usize> {
    DefaultImageStegoProcessor::default().max_payload_size(&FileCarrier::from_file(carrier)?)
}

/// Drops directory components so an embedded name cannot escape the output folder.
fn sanitize_file_name(name: &str) -> Result<String> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| StegoError::InvalidFileName(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn png_carrier(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("carrier.png");
        RgbaImage::from_fn(40, 30, |x, y| Rgba([x as u8 * 5, y as u8 * 7, 60, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn hide_and_unveil_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let carrier = png_carrier(&dir);
        let secret = dir.path().join("secret.png");

        hide(&carrier, &secret, &Payload::text("Hello, World!")).unwrap();
        let written = unveil(&secret, dir.path()).unwrap();

        assert_eq!(written, dir.path().join(MESSAGE_FILE_NAME));
        assert_eq!(fs::read_to_string(written).unwrap(), "Hello, World!");
    }

    #[test]
    fn hide_and_unveil_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let carrier = png_carrier(&dir);
        let data = dir.path().join("data.csv");
        fs::write(&data, "a,b\n1,2\n").unwrap();
        let secret = dir.path().join("secret.png");

        hide(&carrier, &secret, &Payload::from_file(&data).unwrap()).unwrap();
        let written = unveil(&secret, out.path()).unwrap();

        assert_eq!(written, out.path().join("data.csv"));
        assert_eq!(fs::read(written).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn binary_payloads_get_a_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let carrier = png_carrier(&dir);
        let secret = dir.path().join("secret.png");

        hide(&carrier, &secret, &Payload::Binary(vec![0, 1, 2, 0xFF])).unwrap();
        let written = unveil(&secret, dir.path()).unwrap();

        assert_eq!(written, dir.path().join(BINARY_FILE_NAME));
        assert_eq!(fs::read(written).unwrap(), [0, 1, 2, 0xFF]);
    }

    #[test]
    fn embedded_directories_are_stripped() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("plain.txt").unwrap(), "plain.txt");
        assert!(matches!(
            sanitize_file_name(".."),
            Err(StegoError::InvalidFileName(_))
        ));
    }

    #[test]
    fn capacity_of_a_carrier_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(capacity(&png_carrier(&dir)).unwrap(), (40 * 30 * 3 - 32) / 8);
    }

    #[test]
    fn missing_files_are_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            capacity(&dir.path().join("nothing.png")),
            Err(StegoError::ReadError { .. })
        ));
    }

    #[test]
    fn unwritable_output_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let carrier = png_carrier(&dir);
        let target = dir.path().join("missing-folder").join("secret.png");

        assert!(matches!(
            hide(&carrier, &target, &Payload::text("x")),
            Err(StegoError::WriteError { .. })
        ));
    }
}
