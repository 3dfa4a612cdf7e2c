// ## 📂 File: `src/headers/decode.rs`
//! src/headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Parse into a generic JSON value first and check `protocol_version` before
//!   mapping onto the typed struct.
//! - Typed headers are validated after decoding; callers get a header whose hex
//!   fields, lengths and mode are already known to be well formed.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::constants::{HEADER_MAX_BYTES, PROTOCOL_VERSION};
use crate::headers::types::{HeaderError, SecureHeader, TransferHeader};

/// Decode a JSON header object, requiring an exact protocol version match.
pub fn decode_header_json<H: DeserializeOwned>(buf: &[u8]) -> Result<H, HeaderError> {
    if buf.len() > HEADER_MAX_BYTES {
        return Err(HeaderError::TooLarge { len: buf.len(), max: HEADER_MAX_BYTES });
    }

    let value: Value = serde_json::from_slice(buf).map_err(|e| HeaderError::Json(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| HeaderError::Json("header is not a JSON object".into()))?;

    match obj.get("protocol_version").and_then(Value::as_u64) {
        Some(v) if v == PROTOCOL_VERSION as u64 => {}
        Some(v) => return Err(HeaderError::UnsupportedVersion { have: v, need: PROTOCOL_VERSION }),
        None => {
            return Err(HeaderError::InvalidField {
                field: "protocol_version",
                reason: "missing or not an unsigned integer".into(),
            })
        }
    }

    serde_json::from_value(value).map_err(|e| HeaderError::Json(e.to_string()))
}

pub fn decode_transfer_header(buf: &[u8]) -> Result<TransferHeader, HeaderError> {
    let h: TransferHeader = decode_header_json(buf)?;
    h.validate()?;
    Ok(h)
}

pub fn decode_secure_header(buf: &[u8]) -> Result<SecureHeader, HeaderError> {
    let h: SecureHeader = decode_header_json(buf)?;
    h.validate()?;
    Ok(h)
}
