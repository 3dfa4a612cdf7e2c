// ## 📂 File: `src/headers/encode.rs`
//! src/headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Compact JSON (`serde_json::to_vec`): no whitespace between tokens, control
//!   characters inside strings escaped. Plain-mode framing relies on this.
//! - Non-ASCII text is emitted as raw UTF-8, not `\u` escapes.
//! - Encoded size is capped at `HEADER_MAX_BYTES` for both framing modes.

use serde::Serialize;

use crate::constants::HEADER_MAX_BYTES;
use crate::headers::types::{HeaderError, SecureHeader, TransferHeader};

/// Serialize any header value to compact JSON, enforcing the size ceiling.
pub fn encode_header_json<H: Serialize>(h: &H) -> Result<Vec<u8>, HeaderError> {
    let out = serde_json::to_vec(h).map_err(|e| HeaderError::Json(e.to_string()))?;

    if out.len() > HEADER_MAX_BYTES {
        return Err(HeaderError::TooLarge { len: out.len(), max: HEADER_MAX_BYTES });
    }
    Ok(out)
}

/// Validate then encode a plain-mode header.
#[inline]
pub fn encode_transfer_header(h: &TransferHeader) -> Result<Vec<u8>, HeaderError> {
    h.validate()?;
    encode_header_json(h)
}

/// Validate then encode a secure-mode header.
#[inline]
pub fn encode_secure_header(h: &SecureHeader) -> Result<Vec<u8>, HeaderError> {
    h.validate()?;
    encode_header_json(h)
}
