//! Core types for the image side of the pipeline.

use crate::error::{MockupError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Media type used when nothing better can be determined.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Image formats recognised when a media type has to be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// GIF format.
    Gif,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps a MIME type back to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

#[derive(Debug, Clone)]
enum Source {
    Memory(Vec<u8>),
    File(PathBuf),
}

/// A locally selected image: a byte source plus its declared media type.
///
/// File-backed resources are not touched until they are encoded.
#[derive(Debug, Clone)]
pub struct ImageResource {
    source: Source,
    mime_type: String,
}

impl ImageResource {
    /// Creates a resource from bytes already in memory.
    pub fn from_bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            source: Source::Memory(data),
            mime_type: mime_type.into(),
        }
    }

    /// Creates a file-backed resource with an explicit media type.
    pub fn from_path_with_mime(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            source: Source::File(path.into()),
            mime_type: mime_type.into(),
        }
    }

    /// Creates a file-backed resource, declaring its media type from the
    /// file extension, then the file's magic bytes.
    pub async fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = match mime_from_extension(&path) {
            Some(mime) => mime.to_string(),
            None => sniff_mime(&path).await.to_string(),
        };
        Self::from_path_with_mime(path, mime_type)
    }

    /// Returns the declared media type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the backing path for file resources.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File(path) => Some(path),
            Source::Memory(_) => None,
        }
    }

    /// Reads the full contents of the resource.
    pub(crate) async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            Source::Memory(data) => Ok(data.clone()),
            Source::File(path) => tokio::fs::read(path).await,
        }
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .map(|f| f.mime_type())
}

/// Bytes needed to recognise every supported format.
const MAGIC_LEN: u64 = 12;

async fn sniff_mime(path: &Path) -> &'static str {
    // Unreadable files still get a resource; the read error surfaces on encode.
    match read_header(path).await {
        Ok(header) => ImageFormat::from_magic_bytes(&header)
            .map(|f| f.mime_type())
            .unwrap_or(FALLBACK_MIME_TYPE),
        Err(_) => FALLBACK_MIME_TYPE,
    }
}

async fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut header = Vec::with_capacity(MAGIC_LEN as usize);
    file.take(MAGIC_LEN).read_to_end(&mut header).await?;
    Ok(header)
}

/// Transport-safe form of an image: base64 payload plus media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    /// Declared media type of the original resource.
    pub mime_type: String,
    /// Standard base64 of the raw bytes, without a data-URL prefix.
    pub data: String,
}

/// A single edit request: the encoded image and the instruction to apply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Image to edit.
    pub image: EncodedImage,
    /// Free-text instruction.
    pub prompt: String,
}

impl GenerationRequest {
    /// Creates a new request.
    pub fn new(image: EncodedImage, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
        }
    }
}

/// The image returned by the service, still base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "generated image should be saved or displayed"]
pub struct GenerationResult {
    data: String,
    mime_type: String,
}

impl GenerationResult {
    /// Wraps a payload taken from a response. Returns `None` for empty data.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Option<Self> {
        let data = data.into();
        if data.is_empty() {
            return None;
        }
        Some(Self {
            data,
            mime_type: mime_type.into(),
        })
    }

    /// Returns the base64 payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the media type reported alongside the payload.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decodes the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| MockupError::Decode(e.to_string()))
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decodes the payload and writes the bytes to `path`.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.decode()?;
        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.len())
    }
}
