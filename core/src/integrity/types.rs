use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::headers::TransferHeader;

/// Structural metadata reported by a payload validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Upper-case format tag, e.g. `"PNG"`, `"JPEG"`.
    pub format: String,
    pub width: u32,
    pub height: u32,
    /// Decoded colour layout, e.g. `"Rgb8"`.
    pub mode: String,
}

/// Digest + optional structure for one file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityResult {
    pub sha256: String,
    pub size_bytes: u64,
    pub info: Option<ImageInfo>,
    pub pixel_fp: Option<String>,
}

/// What the sender claimed about the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredIntegrity {
    pub size_bytes: u64,
    pub sha256: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub pixel_fp: Option<String>,
}

impl From<&TransferHeader> for DeclaredIntegrity {
    fn from(h: &TransferHeader) -> Self {
        Self {
            size_bytes: h.size_bytes,
            sha256: h.sha256.clone(),
            width: h.width,
            height: h.height,
            pixel_fp: h.pixel_fp.clone(),
        }
    }
}

/// Knobs for the integrity pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityOptions {
    /// Run the structural validator.
    pub validate: bool,
    /// Compute the pixel fingerprint (expensive, advisory).
    pub fingerprint: bool,
    /// Turn a declared-vs-actual fingerprint mismatch into a failure.
    pub require_fingerprint_match: bool,
}

impl Default for IntegrityOptions {
    fn default() -> Self {
        Self {
            validate: true,
            fingerprint: false,
            require_fingerprint_match: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("SHA-256 mismatch (data corrupted): expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("incomplete transfer: expected {expected} bytes, got {received}")]
    Incomplete { expected: u64, received: u64 },

    #[error("size mismatch: declared {expected} bytes, file has {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("not a valid image: {name}: {reason}")]
    Undecodable { name: String, reason: String },

    #[error("cannot determine image format for {name}")]
    UnknownFormat { name: String },

    #[error("image decoded inconsistently across passes: {reason}")]
    Inconsistent { reason: String },

    #[error("image dimensions mismatch: declared {declared_width}x{declared_height}, actual {actual_width}x{actual_height}")]
    DimensionsMismatch {
        declared_width: u32,
        declared_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("pixel fingerprint mismatch: declared {expected}, actual {actual}")]
    FingerprintMismatch { expected: String, actual: String },

    #[error("I/O error during validation: {0}")]
    Io(#[from] io::Error),
}
