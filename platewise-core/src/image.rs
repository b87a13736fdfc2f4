//! Transport-ready plate images.
//!
//! An [`UploadedImage`] is the base64 payload plus its MIME type. The same
//! value feeds the inference request and, via [`UploadedImage::data_url`],
//! the preview in the verification view.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use thiserror::Error;

/// Why an image could not be ingested.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The file could not be read.
    #[error("failed to read image: {0}")]
    Read(#[from] std::io::Error),

    /// The file is empty.
    #[error("image file is empty")]
    Empty,

    /// Neither the content nor the file name identify a supported image type.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// An encoded image ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    mime_type: String,
    data: String,
}

impl UploadedImage {
    /// Encode raw image bytes. `file_name` is only consulted when the bytes
    /// themselves don't identify the format.
    ///
    /// # Errors
    /// Returns [`ImageError::Empty`] for zero bytes and
    /// [`ImageError::UnsupportedFormat`] for anything that isn't an image.
    pub fn from_bytes(bytes: &[u8], file_name: Option<&str>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let mime = sniff_mime(bytes)
            .or_else(|| file_name.and_then(mime_from_extension))
            .ok_or_else(|| {
                ImageError::UnsupportedFormat(file_name.unwrap_or("<unnamed>").to_string())
            })?;

        Ok(Self {
            mime_type: mime.to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        })
    }

    /// MIME type tag, e.g. `image/jpeg`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without any `data:` prefix.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// `data:` URL usable directly as a preview source.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Size of the encoded payload in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }
}

/// Identify an image from its magic bytes.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c' | b'f', ..] => {
            Some("image/heic")
        }
        _ => None,
    }
}

/// Guess an image MIME type from a file name's extension.
#[must_use]
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" | "heif" => Some("image/heic"),
        _ => None,
    }
}
