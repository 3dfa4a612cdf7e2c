// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! Password-based per-transfer key derivation.
//!
//! Design:
//! - scrypt(password, salt, N=2^log_n, r, p) -> 32-byte AEAD key
//! - Salt is random per transfer; the derived key is used for exactly one
//!   message and then dropped. Nothing is cached.

use scrypt::{scrypt, Params};

use crate::crypto::nonce::validate_salt;
use crate::crypto::types::{CryptoError, KdfParams, KEY_LEN_32, SALT_LEN_16};

/// Derive a 32-byte key from `password` and a per-transfer `salt`.
///
/// Errors:
/// - `WeakKdfParams` when the work factor is below the floor.
/// - `InvalidSalt` for an all-zero salt.
pub fn derive_key_32(
    password: &[u8],
    salt: &[u8; SALT_LEN_16],
    params: &KdfParams,
) -> Result<[u8; KEY_LEN_32], CryptoError> {
    params.validate()?;
    validate_salt(salt)?;

    let scrypt_params = Params::new(params.log_n, params.r, params.p, KEY_LEN_32)
        .map_err(|e| CryptoError::Kdf(e.to_string()))?;

    let mut key = [0u8; KEY_LEN_32];
    scrypt(password, salt, &scrypt_params, &mut key).map_err(|e| CryptoError::Kdf(e.to_string()))?;
    Ok(key)
}
