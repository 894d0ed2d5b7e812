//! Recipe photos.
//!
//! A photo is stored on the recipe as a single string: either a link to a
//! hosted image or the picture itself embedded as a base64 `data:` URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Image is a link, not an embedded picture")]
    NotEmbedded,

    #[error("Malformed data URL: {0}")]
    InvalidDataUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Reference to an image hosted elsewhere.
    pub fn url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Embed raw image bytes as a base64 data URL.
    pub fn embed(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "{}{}{},{}",
            DATA_PREFIX,
            media_type,
            BASE64_MARKER,
            STANDARD.encode(bytes)
        ))
    }

    /// Read a picture from disk and embed it.
    pub fn from_file(path: &Path) -> Result<Self, ImageError> {
        let bytes =
            std::fs::read(path).map_err(|e| ImageError::Io(path.display().to_string(), e))?;
        Ok(Self::embed(media_type_for(path), &bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_embedded(&self) -> bool {
        self.0.starts_with(DATA_PREFIX)
    }

    /// Media type of an embedded picture (e.g. `image/jpeg`).
    pub fn media_type(&self) -> Option<&str> {
        let (header, _) = self.split_data_url().ok()?;
        Some(header)
    }

    /// Decode the bytes of an embedded picture.
    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        let (_, payload) = self.split_data_url()?;
        STANDARD
            .decode(payload)
            .map_err(|e| ImageError::InvalidDataUrl(e.to_string()))
    }

    fn split_data_url(&self) -> Result<(&str, &str), ImageError> {
        let rest = self
            .0
            .strip_prefix(DATA_PREFIX)
            .ok_or(ImageError::NotEmbedded)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidDataUrl("missing ',' separator".to_string()))?;
        let media_type = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
            ImageError::InvalidDataUrl("only base64 payloads are supported".to_string())
        })?;
        Ok((media_type, payload))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.media_type() {
            Some(media_type) => write!(f, "embedded {}", media_type),
            None => write!(f, "{}", self.0),
        }
    }
}

fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_url_is_not_embedded() {
        let image = ImageRef::url("https://example.com/soup.jpg");
        assert!(!image.is_embedded());
        assert!(image.media_type().is_none());
        assert!(matches!(image.decode(), Err(ImageError::NotEmbedded)));
        assert_eq!(format!("{}", image), "https://example.com/soup.jpg");
    }

    #[test]
    fn test_embed_and_decode() {
        let image = ImageRef::embed("image/png", &[1, 2, 3, 250]);
        assert!(image.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(image.media_type(), Some("image/png"));
        assert_eq!(image.decode().unwrap(), vec![1, 2, 3, 250]);
        assert_eq!(format!("{}", image), "embedded image/png");
    }

    #[test]
    fn test_from_file_guesses_media_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let image = ImageRef::from_file(&path).unwrap();
        assert_eq!(image.media_type(), Some("image/jpeg"));
        assert_eq!(image.decode().unwrap(), b"not really a jpeg");
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempdir().unwrap();
        let result = ImageRef::from_file(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(ImageError::Io(_, _))));
    }

    #[test]
    fn test_non_base64_data_url_rejected() {
        let image = ImageRef::url("data:text/plain,hello");
        assert!(matches!(image.decode(), Err(ImageError::InvalidDataUrl(_))));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let image = ImageRef::url("https://example.com/a.png");
        assert_eq!(
            serde_json::to_string(&image).unwrap(),
            "\"https://example.com/a.png\""
        );
    }
}
