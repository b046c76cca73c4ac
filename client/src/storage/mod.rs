mod upload_service;

pub use upload_service::{DEFAULT_PREDICT_COUNT, UploadService};

use serde_json::Value;
use shared::StorageKey;
use std::path::Path;

use crate::fields::{FieldPath, first_string, key};
use crate::http::FilePart;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/gif"];

const STORAGE_KEY_FIELDS: [FieldPath; 3] = [key("key"), key("s3_key"), key("path")];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    #[error("unsupported image type '{0}', expected png, jpeg, webp or gif")]
    UnsupportedType(String),
    #[error("image is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },
}

/// An image held in memory, ready to be validated and uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file, guessing the content type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, content_type_for(path), bytes))
    }

    pub fn validate(&self, max_bytes: usize) -> Result<(), UploadValidationError> {
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(UploadValidationError::UnsupportedType(
                self.content_type.clone(),
            ));
        }
        if self.bytes.len() > max_bytes {
            return Err(UploadValidationError::TooLarge {
                size: self.bytes.len(),
                max: max_bytes,
            });
        }
        Ok(())
    }

    pub(crate) fn to_part(&self, field: &str) -> FilePart {
        FilePart {
            field: field.to_string(),
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Storage key of an upload response: `key`, `s3_key` or `path`, first present wins.
pub fn extract_storage_key(raw: &Value) -> Option<StorageKey> {
    first_string(raw, &STORAGE_KEY_FIELDS).map(StorageKey::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn rejects_unsupported_types_and_oversize_files() {
        let pdf = ImageFile::new("doc.pdf", "application/pdf", vec![0; 10]);
        assert_eq!(
            pdf.validate(1024),
            Err(UploadValidationError::UnsupportedType("application/pdf".into()))
        );

        let big = ImageFile::new("leaf.png", "image/png", vec![0; 2048]);
        assert_eq!(
            big.validate(1024),
            Err(UploadValidationError::TooLarge {
                size: 2048,
                max: 1024
            })
        );
        assert!(big.validate(2048).is_ok());
    }

    #[test]
    fn from_path_guesses_content_type() {
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"jpeg bytes").unwrap();

        let image = ImageFile::from_path(file.path()).unwrap();
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.bytes, b"jpeg bytes");
        assert!(image.file_name.ends_with(".JPG"));
    }

    #[test]
    fn storage_key_candidates_in_order() {
        let key = extract_storage_key(&json!({"path": "p", "s3_key": "s", "key": null}));
        assert_eq!(key, Some(StorageKey::from("s")));
        assert_eq!(extract_storage_key(&json!({"url": "https://x"})), None);
        assert_eq!(extract_storage_key(&json!({"key": "  "})), None);
    }
}
