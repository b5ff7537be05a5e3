use std::path::Path;

use tracing::debug;

use crate::config::UploadConfig;
use crate::consts::OUTPUT_EXTENSION;
use crate::error::{CropperError, Result};

/// A raw uploaded file: bytes plus the MIME type the client declared.
#[derive(Clone, Debug)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving the MIME type from its extension.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let mime_type = mime_type_for_path(path).to_string();
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reject anything that is not a non-empty image under the size limit.
    pub fn validate(&self, limits: &UploadConfig) -> Result<()> {
        if !self.mime_type.starts_with("image/") {
            return Err(CropperError::UnsupportedMimeType(self.mime_type.clone()));
        }
        if self.is_empty() {
            return Err(CropperError::EmptyFile);
        }
        if self.len() > limits.max_bytes {
            return Err(CropperError::FileTooLarge {
                size: self.len(),
                limit: limits.max_bytes,
            });
        }
        debug!(name = %self.name, mime = %self.mime_type, size = self.len(), "Upload accepted");
        Ok(())
    }
}

/// Best-effort MIME type from a file extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Replace the trailing extension of `name` with `.jpg`, appending one when
/// the name has none.
pub fn output_file_name(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(dot)
            if dot + 1 < name.len()
                && name[dot + 1..]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            &name[..dot]
        }
        _ => name,
    };
    format!("{stem}.{OUTPUT_EXTENSION}")
}
