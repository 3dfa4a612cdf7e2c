// ## 📂 File: `src/headers/types.rs`

//! headers/types.rs
//! Typed views of the two wire headers.
//!
//! Notes:
//! - Both headers travel as compact JSON objects; field order follows the struct.
//! - `protocol_version` must equal `PROTOCOL_VERSION` exactly. No negotiation.
//! - Binary fields (salt, nonce, session id) are lowercase hex on the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_SECURE_PAYLOAD, PROTOCOL_VERSION};
use crate::crypto::types::{NONCE_LEN_12, SALT_LEN_16, SESSION_ID_LEN_16, TAG_LEN};

/// Hex length of a SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Cipher suites, identified on the wire by their `mode` label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherSuite {
    Aes256Gcm,
    Chacha20Poly1305,
}

impl Default for CipherSuite {
    fn default() -> Self {
        CipherSuite::Aes256Gcm
    }
}

impl CipherSuite {
    /// Label carried in the secure header `mode` field.
    pub const fn mode_label(self) -> &'static str {
        match self {
            CipherSuite::Aes256Gcm => "aes256gcm+scrypt",
            CipherSuite::Chacha20Poly1305 => "chacha20poly1305+scrypt",
        }
    }

    pub fn from_mode_label(label: &str) -> Result<Self, HeaderError> {
        match label {
            "aes256gcm+scrypt" => Ok(CipherSuite::Aes256Gcm),
            "chacha20poly1305+scrypt" => Ok(CipherSuite::Chacha20Poly1305),
            other => Err(HeaderError::UnknownMode(other.to_string())),
        }
    }
}

/// Plain-mode header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferHeader {
    pub protocol_version: u32,
    /// Display name only, never a path.
    pub filename: String,
    /// Informational MIME type derived from the detected format.
    pub content_type: String,
    /// Exact payload length that follows the delimiter.
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the raw payload bytes.
    pub sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Advisory pixel fingerprint (SHA-256 of decoded RGB8 pixels).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_fp: Option<String>,
}

impl TransferHeader {
    pub fn validate(&self) -> Result<(), HeaderError> {
        check_version(self.protocol_version)?;
        check_hex(&self.sha256, SHA256_HEX_LEN, "sha256")?;
        if let Some(fp) = &self.pixel_fp {
            check_hex(fp, SHA256_HEX_LEN, "pixel_fp")?;
        }
        if self.width.is_some() != self.height.is_some() {
            return Err(HeaderError::InvalidField {
                field: "width/height",
                reason: "must be declared together".into(),
            });
        }
        Ok(())
    }
}

/// Fields bound into the AEAD tag. Serialized in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedData {
    pub session_id: String,
    pub timestamp: i64,
    pub filename: String,
}

/// Secure-mode header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureHeader {
    pub protocol_version: u32,
    /// Cipher suite + KDF label, see [`CipherSuite::mode_label`].
    pub mode: String,
    /// 128-bit random id, hex. Replay-detection key.
    pub session_id: String,
    /// Unix seconds at the sender.
    pub timestamp: i64,
    pub filename: String,
    pub salt: String,
    pub nonce: String,
    /// Echo of the authenticated fields. Never trusted verbatim by receivers.
    pub associated_data: AssociatedData,
    /// Ciphertext length including the AEAD tag.
    pub cipher_len: u64,
}

impl SecureHeader {
    pub fn validate(&self) -> Result<(), HeaderError> {
        check_version(self.protocol_version)?;
        self.cipher_suite()?;
        check_hex(&self.session_id, SESSION_ID_LEN_16 * 2, "session_id")?;
        if self.salt_bytes()?.iter().all(|&b| b == 0) {
            return Err(HeaderError::InvalidField {
                field: "salt",
                reason: "all-zero salt".into(),
            });
        }
        self.nonce_bytes()?;

        if self.cipher_len < TAG_LEN as u64 {
            return Err(HeaderError::InvalidField {
                field: "cipher_len",
                reason: format!("{} is shorter than the {}-byte tag", self.cipher_len, TAG_LEN),
            });
        }
        if self.cipher_len > MAX_SECURE_PAYLOAD {
            return Err(HeaderError::InvalidField {
                field: "cipher_len",
                reason: format!("{} exceeds limit {}", self.cipher_len, MAX_SECURE_PAYLOAD),
            });
        }
        Ok(())
    }

    pub fn cipher_suite(&self) -> Result<CipherSuite, HeaderError> {
        CipherSuite::from_mode_label(&self.mode)
    }

    pub fn salt_bytes(&self) -> Result<[u8; SALT_LEN_16], HeaderError> {
        decode_hex_array(&self.salt, "salt")
    }

    pub fn nonce_bytes(&self) -> Result<[u8; NONCE_LEN_12], HeaderError> {
        decode_hex_array(&self.nonce, "nonce")
    }

    /// Associated data rebuilt from the top-level fields the receiver parsed.
    pub fn rebuilt_associated_data(&self) -> AssociatedData {
        AssociatedData {
            session_id: self.session_id.clone(),
            timestamp: self.timestamp,
            filename: self.filename.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid header JSON: {0}")]
    Json(String),

    #[error("unsupported protocol version: have={have}, need={need}")]
    UnsupportedVersion { have: u64, need: u32 },

    #[error("header too large: {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },

    #[error("unknown secure mode: {0:?}")]
    UnknownMode(String),

    #[error("invalid header field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

fn check_version(v: u32) -> Result<(), HeaderError> {
    if v != PROTOCOL_VERSION {
        return Err(HeaderError::UnsupportedVersion { have: v as u64, need: PROTOCOL_VERSION });
    }
    Ok(())
}

fn check_hex(s: &str, len: usize, field: &'static str) -> Result<(), HeaderError> {
    if s.len() != len || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HeaderError::InvalidField {
            field,
            reason: format!("expected {} hex chars", len),
        });
    }
    Ok(())
}

/// Decode a fixed-width hex field.
pub fn decode_hex_array<const N: usize>(s: &str, field: &'static str) -> Result<[u8; N], HeaderError> {
    let mut out = [0u8; N];
    hex::decode_to_slice(s, &mut out).map_err(|e| HeaderError::InvalidField {
        field,
        reason: format!("expected {} hex-encoded bytes: {}", N, e),
    })?;
    Ok(out)
}
