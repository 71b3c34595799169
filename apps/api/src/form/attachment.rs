use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub const ACCEPTED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Unsupported photo format '{0}': select a JPG or PNG file")]
    UnsupportedType(String),

    #[error("Photo '{0}' is empty")]
    Empty(String),

    #[error("Photo '{name}' is {size} bytes, above the {limit} byte limit")]
    TooLarge { name: String, size: usize, limit: usize },
}

/// A photo selection that already passed the format check.
///
/// Only values of this type can be attached to a form, so an attachment that
/// counts toward progress is always a JPEG or PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAttachment {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

/// What the form shows about the selected file.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInfo {
    pub file_name: String,
    pub content_type: String,
    pub size_mb: String,
}

impl PhotoAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Bytes,
        max_bytes: usize,
    ) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let content_type = normalize_content_type(content_type);

        if !ACCEPTED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(AttachmentError::UnsupportedType(content_type));
        }
        if bytes.is_empty() {
            return Err(AttachmentError::Empty(file_name));
        }
        if bytes.len() > max_bytes {
            return Err(AttachmentError::TooLarge {
                name: file_name,
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn info(&self) -> PhotoInfo {
        PhotoInfo {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size_mb: format!("{:.2} MB", self.bytes.len() as f64 / 1024.0 / 1024.0),
        }
    }
}

/// Lowercases the media type and drops parameters such as `; charset=...`.
fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    #[test]
    fn test_accepts_jpeg_and_png() {
        let jpg = PhotoAttachment::new("me.jpg", "image/jpeg", Bytes::from_static(b"\xff\xd8"), LIMIT);
        let png = PhotoAttachment::new("me.png", "image/png", Bytes::from_static(b"\x89PNG"), LIMIT);
        assert!(jpg.is_ok());
        assert!(png.is_ok());
    }

    #[test]
    fn test_content_type_is_normalized() {
        let photo =
            PhotoAttachment::new("me.png", " IMAGE/PNG; q=1", Bytes::from_static(b"png"), LIMIT)
                .unwrap();
        assert_eq!(photo.content_type(), "image/png");
    }

    #[test]
    fn test_rejects_other_types() {
        for ct in ["image/gif", "application/pdf", "image/webp", ""] {
            let err = PhotoAttachment::new("f", ct, Bytes::from_static(b"x"), LIMIT).unwrap_err();
            assert!(matches!(err, AttachmentError::UnsupportedType(_)), "{ct}");
        }
    }

    #[test]
    fn test_rejects_empty_payload() {
        let err = PhotoAttachment::new("me.jpg", "image/jpeg", Bytes::new(), LIMIT).unwrap_err();
        assert_eq!(err, AttachmentError::Empty("me.jpg".to_string()));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let big = Bytes::from(vec![0u8; LIMIT + 1]);
        let err = PhotoAttachment::new("me.jpg", "image/jpeg", big, LIMIT).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { size, .. } if size == LIMIT + 1));
    }

    #[test]
    fn test_info_reports_size_in_mb() {
        let photo =
            PhotoAttachment::new("me.jpg", "image/jpeg", Bytes::from(vec![1u8; 1_572_864]), 2 << 20)
                .unwrap();
        assert_eq!(photo.info().size_mb, "1.50 MB");
    }
}
