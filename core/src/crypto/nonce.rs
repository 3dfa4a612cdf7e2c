// ## 📂 File: `src/crypto/nonce.rs`

//! Random per-transfer material: salt, nonce, session id.
//!
//! Every transfer derives its own key from its own salt, so a random nonce is
//! used under exactly one key. Keep it that way: a key reused across messages
//! would need a counter or a nonce-misuse-resistant cipher instead.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::types::{CryptoError, NONCE_LEN_12, SALT_LEN_16, SESSION_ID_LEN_16};

pub fn random_salt() -> [u8; SALT_LEN_16] {
    let mut salt = [0u8; SALT_LEN_16];
    loop {
        OsRng.fill_bytes(&mut salt);
        if validate_salt(&salt).is_ok() {
            return salt;
        }
    }
}

pub fn random_nonce() -> [u8; NONCE_LEN_12] {
    let mut nonce = [0u8; NONCE_LEN_12];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Fresh 128-bit session id, lowercase hex.
pub fn new_session_id() -> String {
    let mut id = [0u8; SESSION_ID_LEN_16];
    OsRng.fill_bytes(&mut id);
    hex::encode(id)
}

/// Salt must not be all zeros.
#[inline]
pub fn validate_salt(salt: &[u8; SALT_LEN_16]) -> Result<(), CryptoError> {
    if salt.iter().all(|&b| b == 0) {
        return Err(CryptoError::InvalidSalt);
    }
    Ok(())
}
