//! Source image reference plumbing.
//!
//! The shell hands the editor an opaque string: a remote URL, a data
//! URI, or a previously stored avatar path. Classification is
//! syntactic only; no format validation happens here beyond what the
//! raster decoder accepts. Fetching remote URLs and reading stored
//! paths belong to the shell — only data URIs decode in-process.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::DynamicImage;
use thiserror::Error;

/// Error raised while decoding a data-URI source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The string is not a data URI at all.
    #[error("not a data URI")]
    NotDataUri,

    /// The data URI has no comma-separated payload.
    #[error("data URI has no payload")]
    MissingPayload,

    /// The data URI is not base64-encoded.
    #[error("data URI is not base64-encoded")]
    NotBase64,

    /// The base64 payload is malformed.
    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),

    /// The decoded bytes are not a decodable image.
    #[error("undecodable image data: {0}")]
    Decode(#[from] image::ImageError),
}

// ===== ImageSource =====

/// Classified source image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote http(s) URL; fetched by the shell.
    Remote(String),
    /// Inline `data:` URI; decodable in-process.
    DataUri(String),
    /// Previously stored avatar path; resolved by the storage layer.
    StoredPath(String),
}

impl ImageSource {
    /// Classify an opaque source string.
    pub fn classify(raw: &str) -> Self {
        if raw.starts_with("data:") {
            Self::DataUri(raw.to_string())
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Remote(raw.to_string())
        } else {
            Self::StoredPath(raw.to_string())
        }
    }
}

/// Decode the raw bytes of a base64 data URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, SourceError> {
    let rest = uri.strip_prefix("data:").ok_or(SourceError::NotDataUri)?;
    let (metadata, payload) = rest.split_once(',').ok_or(SourceError::MissingPayload)?;
    if !metadata.ends_with(";base64") {
        return Err(SourceError::NotBase64);
    }
    Ok(BASE64.decode(payload)?)
}

/// Decode a base64 data URI into a raster image.
pub fn load_data_uri(uri: &str) -> Result<DynamicImage, SourceError> {
    let bytes = decode_data_uri(uri)?;
    Ok(image::load_from_memory(&bytes)?)
}

// ===== Tests =====
