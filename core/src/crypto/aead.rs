// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! AEAD interface for AES-256-GCM and ChaCha20-Poly1305.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys and 12-byte nonces.
//! - Tag verification is constant-time and must fail closed (no partial plaintext).
//! - Cipher selection is driven by the secure header `mode`.

use aes_gcm::aead::{Aead, KeyInit, Payload};

use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce};

use crate::crypto::types::{CryptoError, KEY_LEN_32, NONCE_LEN_12, TAG_LEN};
use crate::headers::CipherSuite;

#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl std::fmt::Debug for AeadImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AeadImpl::AesGcm(_) => f.write_str("AesGcm(..)"),
            AeadImpl::ChaCha(_) => f.write_str("ChaCha(..)"),
        }
    }
}

impl AeadImpl {
    pub fn new(suite: CipherSuite, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN_32 {
            return Err(CryptoError::InvalidKeyLen {
                expected: KEY_LEN_32,
                actual: key.len(),
            });
        }

        match suite {
            CipherSuite::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLen {
                    expected: KEY_LEN_32,
                    actual: key.len(),
                })?;
                Ok(Self::AesGcm(cipher))
            }
            CipherSuite::Chacha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLen {
                    expected: KEY_LEN_32,
                    actual: key.len(),
                })?;
                Ok(Self::ChaCha(cipher))
            }
        }
    }

    /// Encrypt; the returned buffer ends with the 16-byte tag.
    pub fn seal(&self, nonce_12: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce_12)?;

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .encrypt(AesNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                .map_err(|_| CryptoError::Seal("AES-GCM seal failed".into())),
            AeadImpl::ChaCha(cipher) => cipher
                .encrypt(ChaNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                .map_err(|_| CryptoError::Seal("ChaCha20-Poly1305 seal failed".into())),
        }
    }

    /// Decrypt and verify. Any failure is `Authentication`.
    pub fn open(&self, nonce_12: &[u8], aad: &[u8], ciphertext_and_tag: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce_12)?;

        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::Authentication);
        }

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .decrypt(AesNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                .map_err(|_| CryptoError::Authentication),
            AeadImpl::ChaCha(cipher) => cipher
                .decrypt(ChaNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                .map_err(|_| CryptoError::Authentication),
        }
    }
}

fn check_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_LEN_12 {
        return Err(CryptoError::InvalidNonceLen {
            expected: NONCE_LEN_12,
            actual: nonce.len(),
        });
    }
    Ok(())
}
