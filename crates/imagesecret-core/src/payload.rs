//! Self-describing payload framing.
//!
//! A framed payload starts with a big-endian 16-bit marker naming its kind:
//!
//! | marker   | kind   | body                                             |
//! |----------|--------|--------------------------------------------------|
//! | `0xFFF0` | text   | UTF-8 text                                       |
//! | `0xFFF1` | file   | name length `N` (1 byte), `N` bytes UTF-8 name, content |
//! | `0xFFF2` | binary | raw bytes                                        |

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::result::Result;
use crate::StegoError;

pub const TEXT_MARKER: u16 = 0xFFF0;
pub const FILE_MARKER: u16 = 0xFFF1;
pub const BINARY_MARKER: u16 = 0xFFF2;

/// Size of the kind marker in bytes.
pub const MARKER_LEN: usize = 2;
/// Shortest buffer [`Payload::read`] accepts.
pub const MIN_FRAMED_LEN: usize = MARKER_LEN + 1;
/// Longest file name a file payload can store.
pub const MAX_FILE_NAME_LEN: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    File { name: String, content: Vec<u8> },
    Binary(Vec<u8>),
}

impl Payload {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Payload::Text(text.into())
    }

    pub fn file<S: Into<String>>(name: S, content: Vec<u8>) -> Self {
        Payload::File {
            name: name.into(),
            content,
        }
    }

    /// Reads `path` into a file payload named after its last path component.
    pub fn from_file<P: AsRef<Path> + ?Sized>(path: &P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StegoError::InvalidFileName(path.display().to_string()))?;
        let content = fs::read(path).map_err(|source| StegoError::ReadError { source })?;

        Ok(Payload::file(name, content))
    }

    pub fn marker(&self) -> u16 {
        match self {
            Payload::Text(_) => TEXT_MARKER,
            Payload::File { .. } => FILE_MARKER,
            Payload::Binary(_) => BINARY_MARKER,
        }
    }

    /// Number of bytes [`write`](Self::write) produces.
    pub fn framed_len(&self) -> usize {
        MARKER_LEN
            + match self {
                Payload::Text(text) => text.len(),
                Payload::File { name, content } => 1 + name.len() + content.len(),
                Payload::Binary(data) => data.len(),
            }
    }

    /// Serializes the payload with its kind marker.
    ///
    /// Empty text and binary payloads fail with [`StegoError::EmptyPayload`],
    /// their framing would be shorter than [`MIN_FRAMED_LEN`].
    pub fn write(&self) -> Result<Vec<u8>> {
        if matches!(self, Payload::Text(text) if text.is_empty())
            || matches!(self, Payload::Binary(data) if data.is_empty())
        {
            return Err(StegoError::EmptyPayload);
        }

        let mut buf = Vec::with_capacity(self.framed_len());
        buf.write_u16::<BigEndian>(self.marker())
            .map_err(|source| StegoError::WriteError { source })?;

        match self {
            Payload::Text(text) => buf.extend_from_slice(text.as_bytes()),
            Payload::File { name, content } => {
                if name.is_empty() || name.len() > MAX_FILE_NAME_LEN {
                    return Err(StegoError::InvalidFileName(name.clone()));
                }
                buf.push(name.len() as u8);
                buf.extend_from_slice(name.as_bytes());
                buf.extend_from_slice(content);
            }
            Payload::Binary(data) => buf.extend_from_slice(data),
        }

        Ok(buf)
    }

    /// Parses a buffer produced by [`write`](Self::write).
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_FRAMED_LEN {
            return Err(StegoError::PayloadReadError(format!(
                "payload of {} bytes is too short",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        let marker = cursor.read_u16::<BigEndian>().map_err(read_error)?;
        let body = &data[MARKER_LEN..];

        match marker {
            TEXT_MARKER => Ok(Payload::Text(utf8(body.to_vec(), "text")?)),
            FILE_MARKER => {
                let name_len = cursor.read_u8().map_err(read_error)? as usize;
                if body.len() < 1 + name_len {
                    return Err(StegoError::PayloadReadError(format!(
                        "file name of {name_len} bytes exceeds the payload"
                    )));
                }
                let mut name = vec![0; name_len];
                cursor.read_exact(&mut name).map_err(read_error)?;
                let content = body[1 + name_len..].to_vec();

                Ok(Payload::File {
                    name: utf8(name, "file name")?,
                    content,
                })
            }
            BINARY_MARKER => Ok(Payload::Binary(body.to_vec())),
            other => Err(StegoError::PayloadReadError(format!(
                "unknown payload marker {other:#06X}"
            ))),
        }
    }
}

fn utf8(bytes: Vec<u8>, what: &str) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| StegoError::PayloadReadError(format!("{what} is not valid UTF-8: {e}")))
}

fn read_error(e: std::io::Error) -> StegoError {
    StegoError::PayloadReadError(e.to_string())
}
