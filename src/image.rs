//! Image input
//!
//! Photos are read from disk and base64-encoded locally before being sent
//! inline to the model. Only the extension is inspected; no size or content
//! validation happens here.

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;
use tracing::debug;

use crate::constants::model::DEFAULT_IMAGE_MIME;
use crate::types::{NutriError, Result};

/// Base64 image payload ready to be sent inline
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64, no `data:` prefix
    pub data: String,
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl InlineImage {
    /// Encode raw bytes
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Read and encode an image file
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| NutriError::Image {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if bytes.is_empty() {
            return Err(NutriError::Image {
                path: path.display().to_string(),
                message: "file is empty".to_string(),
            });
        }

        let mime_type = mime_from_path(path).unwrap_or(DEFAULT_IMAGE_MIME);
        debug!(
            path = %path.display(),
            mime_type,
            bytes = bytes.len(),
            "Loaded image"
        );
        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// `data:` URL used as the meal's image reference
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(&PathBuf::from("a.jpg")), Some("image/jpeg"));
        assert_eq!(mime_from_path(&PathBuf::from("a.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_from_path(&PathBuf::from("a.png")), Some("image/png"));
        assert_eq!(mime_from_path(&PathBuf::from("a.webp")), Some("image/webp"));
        assert_eq!(mime_from_path(&PathBuf::from("a.heic")), Some("image/heic"));
        assert_eq!(mime_from_path(&PathBuf::from("a.bmp")), None);
        assert_eq!(mime_from_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn test_data_url() {
        let image = InlineImage::from_bytes(b"abc", "image/png");
        assert_eq!(image.data, "YWJj");
        assert_eq!(image.data_url(), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_load_defaults_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snack.bin");
        std::fs::write(&path, b"\xff\xd8\xff").unwrap();

        let image = InlineImage::load(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert!(!image.data.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = InlineImage::load(&dir.path().join("nope.png")).await;
        assert!(matches!(missing, Err(NutriError::Image { .. })));

        let empty = dir.path().join("empty.png");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(
            InlineImage::load(&empty).await,
            Err(NutriError::Image { .. })
        ));
    }
}
