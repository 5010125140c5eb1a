// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage for base64-uploaded recipe images.
//!
//! Files are named by the SHA-256 of their content, so re-uploading the same
//! picture reuses the existing file.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Subdirectory of the media root holding recipe images.
const RECIPE_DIR: &str = "recipes";
/// Decoded images larger than this are refused.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("The submitted data is not valid base64.")]
    InvalidEncoding,

    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    UnsupportedFormat,

    #[error("The image is too large.")]
    TooLarge,

    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes images under `<media_root>/recipes/`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode a base64 image (optionally a `data:` URL) and store it.
    ///
    /// Returns the stored path relative to the media root.
    pub async fn save_base64(&self, payload: &str) -> Result<String, ImageError> {
        let bytes = decode_payload(payload)?;
        let extension = detect_extension(&bytes).ok_or(ImageError::UnsupportedFormat)?;

        let digest = Sha256::digest(&bytes);
        let relative = format!("{}/{}.{}", RECIPE_DIR, hex::encode(digest), extension);

        let dir = self.root.join(RECIPE_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(self.root.join(&relative), &bytes).await?;

        tracing::debug!(path = %relative, size = bytes.len(), "Stored recipe image");
        Ok(relative)
    }
}

/// Strip an optional `data:<mime>;base64,` prefix and decode.
fn decode_payload(payload: &str) -> Result<Vec<u8>, ImageError> {
    let encoded = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    // Base64 grows data by 4/3; reject before decoding anything huge.
    if compact.len() / 4 * 3 > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| ImageError::InvalidEncoding)?;
    if bytes.is_empty() {
        return Err(ImageError::InvalidEncoding);
    }
    Ok(bytes)
}

/// File extension for the image format `bytes` start with.
fn detect_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 transparent PNG.
    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_detect_extension() {
        assert_eq!(detect_extension(b"\x89PNG\r\n\x1a\n...."), Some("png"));
        assert_eq!(detect_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("jpg"));
        assert_eq!(detect_extension(b"GIF89a..."), Some("gif"));
        assert_eq!(detect_extension(b"RIFF\0\0\0\0WEBPVP8 "), Some("webp"));
        assert_eq!(detect_extension(b"plain text"), None);
    }

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_payload(&format!("data:image/png;base64,{}", PIXEL_PNG)).unwrap();
        assert_eq!(detect_extension(&bytes), Some("png"));

        let bare = decode_payload(PIXEL_PNG).unwrap();
        assert_eq!(bare, bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_payload("data:image/png;base64,@@@"),
            Err(ImageError::InvalidEncoding)
        ));
        assert!(matches!(decode_payload(""), Err(ImageError::InvalidEncoding)));
    }

    #[tokio::test]
    async fn test_save_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let first = store.save_base64(PIXEL_PNG).await.unwrap();
        let second = store
            .save_base64(&format!("data:image/png;base64,{}", PIXEL_PNG))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("recipes/") && first.ends_with(".png"));
        assert!(dir.path().join(&first).exists());
    }

    #[tokio::test]
    async fn test_save_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let payload = STANDARD.encode(b"definitely not an image");
        assert!(matches!(
            store.save_base64(&payload).await,
            Err(ImageError::UnsupportedFormat)
        ));
    }
}
