//! Inline image attached to vision requests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::defaults;
use crate::error::GenerationError;
use crate::utils::mime;

/// A validated image, held base64-encoded as it goes on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    mime_type: String,
    data: String,
    byte_len: usize,
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageInput")
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.byte_len)
            .finish()
    }
}

impl ImageInput {
    /// Validate raw bytes and encode them.
    pub fn new(mime_type: &str, bytes: &[u8]) -> Result<Self, GenerationError> {
        let mime_type = check_bytes(mime_type, bytes)?;
        Ok(Self {
            mime_type,
            data: STANDARD.encode(bytes),
            byte_len: bytes.len(),
        })
    }

    /// Validate already-encoded data. A `data:` URL prefix is accepted.
    pub fn from_base64(mime_type: &str, data: &str) -> Result<Self, GenerationError> {
        let data = strip_data_url(data.trim());
        if data.is_empty() {
            return Err(GenerationError::InvalidInput(
                "The image is empty.".to_string(),
            ));
        }
        let bytes = STANDARD.decode(data).map_err(|e| {
            GenerationError::InvalidInput(format!("The image data is not valid base64: {e}"))
        })?;
        Self::new(mime_type, &bytes)
    }

    /// Guess the MIME type of an image from its bytes or file name.
    pub fn guess_mime(bytes: &[u8], path: Option<&str>) -> Option<String> {
        mime::guess_image_mime(Some(bytes), path)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 (standard alphabet, padded).
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Decoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

fn check_bytes(declared: &str, bytes: &[u8]) -> Result<String, GenerationError> {
    if bytes.is_empty() {
        return Err(GenerationError::InvalidInput(
            "The image is empty.".to_string(),
        ));
    }
    let declared = mime::normalize_mime(declared);
    if !mime::is_allowed_image_mime(&declared) {
        return Err(GenerationError::InvalidInput(format!(
            "Unsupported image type '{declared}'. Use JPEG, PNG, WEBP or GIF."
        )));
    }
    if bytes.len() > defaults::image::MAX_BYTES {
        return Err(GenerationError::InvalidInput(format!(
            "The image is too large ({} bytes); the limit is {} bytes.",
            bytes.len(),
            defaults::image::MAX_BYTES
        )));
    }
    if let Some(sniffed) = mime::guess_mime_from_bytes(bytes) {
        let sniffed = mime::normalize_mime(&sniffed);
        if sniffed != declared {
            return Err(GenerationError::InvalidInput(format!(
                "The image content is {sniffed} but was declared as {declared}."
            )));
        }
    }
    Ok(declared)
}

fn strip_data_url(data: &str) -> &str {
    if data.starts_with("data:") {
        match data.split_once(',') {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        data
    }
}
