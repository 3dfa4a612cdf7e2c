//! crypto/session.rs
//! One-shot seal/open of a whole payload under a password.
//!
//! encrypt: fresh salt -> scrypt key -> fresh nonce -> AEAD seal
//! decrypt: scrypt key from the received salt -> AEAD open

use log::debug;

use crate::crypto::aead::AeadImpl;
use crate::crypto::kdf::derive_key_32;
use crate::crypto::nonce::{random_nonce, random_salt};
use crate::crypto::types::{CryptoError, KdfParams, SealedPayload, NONCE_LEN_12, SALT_LEN_16};
use crate::headers::CipherSuite;

pub fn encrypt(
    password: &str,
    plaintext: &[u8],
    associated_data: &[u8],
    suite: CipherSuite,
    params: &KdfParams,
) -> Result<SealedPayload, CryptoError> {
    let salt = random_salt();
    let key = derive_key_32(password.as_bytes(), &salt, params)?;
    let nonce = random_nonce();

    let ciphertext = AeadImpl::new(suite, &key)?.seal(&nonce, associated_data, plaintext)?;
    debug!("sealed {}B -> {}B with {:?}", plaintext.len(), ciphertext.len(), suite);

    Ok(SealedPayload { salt, nonce, ciphertext })
}

/// Fails closed: a wrong password, altered associated data or a corrupted
/// ciphertext all produce `CryptoError::Authentication` and no plaintext.
pub fn decrypt(
    password: &str,
    salt: &[u8; SALT_LEN_16],
    nonce: &[u8; NONCE_LEN_12],
    ciphertext: &[u8],
    associated_data: &[u8],
    suite: CipherSuite,
    params: &KdfParams,
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key_32(password.as_bytes(), salt, params)?;
    AeadImpl::new(suite, &key)?.open(nonce, associated_data, ciphertext)
}
