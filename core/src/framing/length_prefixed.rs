//! Secure-mode framing: `<u32 BE header len><json header><ciphertext>`.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use log::debug;

use crate::constants::{HEADER_MAX_BYTES, LENGTH_PREFIX_LEN};
use crate::framing::io::read_exact_or_closed;
use crate::framing::types::FramingError;
use crate::headers::{decode_secure_header, encode_secure_header, SecureHeader};

/// Encode length prefix + header.
pub fn encode_length_prefixed(header: &SecureHeader) -> Result<Vec<u8>, FramingError> {
    let body = encode_secure_header(header)?;

    let mut out = Vec::with_capacity(LENGTH_PREFIX_LEN + body.len());
    out.write_u32::<BigEndian>(body.len() as u32)?;
    out.extend_from_slice(&body);
    Ok(out)
}

/// Whole secure message: prefix, header, ciphertext. One logical write.
pub fn frame_secure_message(header: &SecureHeader, ciphertext: &[u8]) -> Result<Vec<u8>, FramingError> {
    if ciphertext.len() as u64 != header.cipher_len {
        return Err(FramingError::LengthMismatch {
            expected: header.cipher_len,
            actual: ciphertext.len() as u64,
        });
    }

    let mut out = encode_length_prefixed(header)?;
    out.reserve(ciphertext.len());
    out.extend_from_slice(ciphertext);
    Ok(out)
}

/// Read the length prefix and the header it announces.
///
/// Returns the decoded header and its wire length (prefix included).
pub fn read_length_prefixed_header<R: Read + ?Sized>(
    r: &mut R,
) -> Result<(SecureHeader, usize), FramingError> {
    let prefix = read_exact_or_closed(r, LENGTH_PREFIX_LEN as u64)?;
    let len = BigEndian::read_u32(&prefix);

    if len == 0 || len as usize > HEADER_MAX_BYTES {
        return Err(FramingError::InvalidLength(len));
    }

    let raw = read_exact_or_closed(r, len as u64)?;
    let header = decode_secure_header(&raw)?;
    debug!("secure header parsed: {}B, cipher_len={}", len, header.cipher_len);

    Ok((header, LENGTH_PREFIX_LEN + len as usize))
}

/// Read exactly `cipher_len` bytes of ciphertext.
pub fn read_ciphertext<R: Read + ?Sized>(r: &mut R, header: &SecureHeader) -> Result<Vec<u8>, FramingError> {
    read_exact_or_closed(r, header.cipher_len)
}
