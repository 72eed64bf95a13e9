//! Image upload intake
//!
//! Uploads are accepted by file extension only (`jpg`, `jpeg`, `png`). The
//! size bound is explicit: an oversized file is rejected with an error the
//! front end shows, never truncated.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Extensions accepted for food photos (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors raised while accepting an upload
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported file type '{extension}'. Please upload a jpg, jpeg or png image")]
    UnsupportedType { extension: String },

    #[error("Image is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Image file is empty")]
    Empty,

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Image format recognised from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    /// Identify JPEG or PNG content from its leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

        if bytes.starts_with(&PNG_SIGNATURE) {
            Some(ImageMime::Png)
        } else if bytes.starts_with(&JPEG_SOI) {
            Some(ImageMime::Jpeg)
        } else {
            None
        }
    }
}

/// A user-selected food photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accept in-memory bytes under `file_name`
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        max_bytes: usize,
    ) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        check_extension(&file_name)?;

        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        Ok(Self { file_name, bytes })
    }

    /// Read an upload from disk
    ///
    /// The extension and the size bound are checked before the file is read.
    pub fn from_path(path: impl AsRef<Path>, max_bytes: usize) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| UploadError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        check_extension(&file_name)?;

        let size = fs::metadata(path).map_err(io_error)?.len();
        if size > max_bytes as u64 {
            return Err(UploadError::TooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit: max_bytes,
            });
        }

        let bytes = fs::read(path).map_err(io_error)?;
        Self::from_bytes(file_name, bytes, max_bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn check_extension(file_name: &str) -> Result<(), UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType { extension })
    }
}
