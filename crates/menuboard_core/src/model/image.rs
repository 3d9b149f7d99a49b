//! Inline item images.
//!
//! Images are stored as text-encoded data URLs inside the item record. Core
//! never decodes or inspects pixel data; it only builds the text form from
//! picked bytes and checks the URL shape of text handed in by callers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

static DATA_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(?P<media>[\w.+-]+/[\w.+-]+)?(?:;[\w.+-]+(?:=[^;,]*)?)*,")
        .expect("valid data url regex")
});

/// Text-encoded image embedded in an item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageBlob(String);

/// Image input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// No bytes or empty text were supplied.
    Empty,
    /// Text does not start with a `data:` URL header.
    NotDataUrl,
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "image data is empty"),
            Self::NotDataUrl => write!(f, "image must be a data URL"),
        }
    }
}

impl Error for ImageError {}

impl ImageBlob {
    /// Encodes picked file bytes as a base64 data URL.
    ///
    /// A blank `media_type` falls back to `application/octet-stream`, matching
    /// what browser file readers produce for unknown files.
    pub fn encode(media_type: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let media_type = match media_type.trim() {
            "" => FALLBACK_MEDIA_TYPE,
            value => value,
        };
        Ok(Self(format!(
            "data:{media_type};base64,{}",
            STANDARD.encode(bytes)
        )))
    }

    /// Accepts already-encoded text after a header shape check.
    pub fn from_data_url(value: impl Into<String>) -> Result<Self, ImageError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ImageError::Empty);
        }
        if !DATA_URL_RE.is_match(trimmed) {
            return Err(ImageError::NotDataUrl);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Declared media type from the data URL header, when present.
    pub fn media_type(&self) -> Option<&str> {
        DATA_URL_RE
            .captures(&self.0)
            .and_then(|caps| caps.name("media"))
            .map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encoded length in bytes; this is what counts against storage quota.
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageBlob, ImageError};

    #[test]
    fn encode_builds_base64_data_url() {
        let blob = ImageBlob::encode("image/png", &[0x89, 0x50, 0x4e, 0x47]).unwrap();
        assert_eq!(blob.as_str(), "data:image/png;base64,iVBORw==");
        assert_eq!(blob.media_type(), Some("image/png"));
    }

    #[test]
    fn encode_falls_back_to_octet_stream() {
        let blob = ImageBlob::encode("  ", b"raw").unwrap();
        assert_eq!(blob.media_type(), Some("application/octet-stream"));
        assert_eq!(ImageBlob::encode("image/png", &[]), Err(ImageError::Empty));
    }

    #[test]
    fn from_data_url_checks_header_shape() {
        let blob = ImageBlob::from_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(blob.media_type(), Some("image/jpeg"));

        assert_eq!(
            ImageBlob::from_data_url("https://cdn.example.com/a.png"),
            Err(ImageError::NotDataUrl)
        );
        assert_eq!(ImageBlob::from_data_url(" "), Err(ImageError::Empty));
    }
}
