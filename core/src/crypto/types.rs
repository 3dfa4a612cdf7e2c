// ## 📂 File: `src/crypto/types.rs`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::kdf_params;

/// Stable key and nonce sizes.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Per-transfer KDF salt length.
pub const SALT_LEN_16: usize = 16;

/// Raw session id length (hex on the wire is twice this).
pub const SESSION_ID_LEN_16: usize = 16;

/// scrypt work factors. Both ends must agree; they are not carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: kdf_params::DEFAULT_LOG_N,
            r: kdf_params::DEFAULT_R,
            p: kdf_params::DEFAULT_P,
        }
    }
}

impl KdfParams {
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.log_n < kdf_params::MIN_LOG_N {
            return Err(CryptoError::WeakKdfParams { log_n: self.log_n, min: kdf_params::MIN_LOG_N });
        }
        Ok(())
    }
}

/// Output of one encryption: everything the receiver needs besides the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub salt: [u8; SALT_LEN_16],
    pub nonce: [u8; NONCE_LEN_12],
    /// Ciphertext with the tag appended.
    pub ciphertext: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLen { expected: usize, actual: usize },

    #[error("scrypt work factor too low: log_n={log_n}, min={min}")]
    WeakKdfParams { log_n: u8, min: u8 },

    #[error("invalid salt: all zeros")]
    InvalidSalt,

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("seal failed: {0}")]
    Seal(String),

    #[error("associated data encoding failed: {0}")]
    Aad(String),

    /// Tag mismatch, wrong password, or altered associated data. One message for all.
    #[error("authentication failed")]
    Authentication,
}
