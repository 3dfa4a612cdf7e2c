//! transfer/outcome.rs
//! What a successful send or receive reports back to the caller.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::integrity::ImageInfo;
use crate::telemetry::TelemetrySnapshot;

/// Plain-mode receive result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveOutcome {
    pub saved_path: PathBuf,
    /// Sanitized display name from the header.
    pub filename: String,
    pub size_bytes: u64,
    pub sha256: String,
    /// Only present when the receiver computed it.
    pub pixel_fp: Option<String>,
    pub info: Option<ImageInfo>,
    pub telemetry: TelemetrySnapshot,
}

impl ReceiveOutcome {
    pub fn width(&self) -> Option<u32> {
        self.info.as_ref().map(|i| i.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.info.as_ref().map(|i| i.height)
    }

    pub fn format(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.format.as_str())
    }
}

/// Secure-mode receive result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecureReceiveOutcome {
    pub saved_path: PathBuf,
    pub session_id: String,
    pub timestamp: i64,
    pub filename: String,
    /// Plaintext length.
    pub size_bytes: u64,
    /// SHA-256 of the decrypted plaintext.
    pub sha256: String,
    pub info: Option<ImageInfo>,
    pub telemetry: TelemetrySnapshot,
}

/// Sender-side summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReport {
    pub filename: String,
    /// Payload length before encryption.
    pub size_bytes: u64,
    pub sha256: String,
    pub info: Option<ImageInfo>,
    /// Secure mode only.
    pub session_id: Option<String>,
    pub telemetry: TelemetrySnapshot,
}
