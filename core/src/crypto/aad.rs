// ## 📂 File: `src/crypto/aad.rs`

use crate::crypto::types::CryptoError;
use crate::headers::{AssociatedData, SecureHeader};

/// Canonical associated-data bytes: compact JSON of
/// `{"session_id":..,"timestamp":..,"filename":..}` in that key order.
#[inline]
pub fn build_aad(ad: &AssociatedData) -> Result<Vec<u8>, CryptoError> {
    serde_json::to_vec(ad).map_err(|e| CryptoError::Aad(e.to_string()))
}

/// Associated data for an incoming header, rebuilt from its top-level fields.
///
/// The header's `associated_data` echo must agree with those fields. A
/// disagreement is reported exactly like a tag failure.
pub fn aad_for_received(header: &SecureHeader) -> Result<Vec<u8>, CryptoError> {
    let rebuilt = header.rebuilt_associated_data();
    if rebuilt != header.associated_data {
        return Err(CryptoError::Authentication);
    }
    build_aad(&rebuilt)
}

// AAD = fields known before encryption that the receiver can rebuild on its own.
// `cipher_len`, `salt` and `nonce` are not in it: the first is post-encryption,
// the other two already feed the key and the cipher.
