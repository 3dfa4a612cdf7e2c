//! Plain-mode framing: `<json header><DELIMITER><raw payload>`.

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};
use log::debug;

use crate::constants::{CHUNK_SIZE, DELIMITER, HEADER_MAX_BYTES};
use crate::framing::types::FramingError;
use crate::headers::{decode_transfer_header, encode_transfer_header, TransferHeader};

/// Encode header + delimiter. The payload is streamed separately.
pub fn encode_delimited(header: &TransferHeader) -> Result<Vec<u8>, FramingError> {
    let mut out = encode_transfer_header(header)?;
    out.extend_from_slice(DELIMITER);
    Ok(out)
}

/// Read until the delimiter and split the buffer around it.
///
/// Returns `(header_bytes, carried)`: `carried` is whatever arrived after the
/// delimiter in the same reads. Those are payload bytes and must be credited
/// toward `size_bytes`, not reread.
pub fn read_until_delimiter<R: Read + ?Sized>(r: &mut R) -> Result<(Bytes, Bytes), FramingError> {
    let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    // The delimiter may straddle two reads; rescan the tail of the previous one.
    let mut scan_from = 0usize;

    loop {
        let n = match r.read(&mut chunk) {
            Ok(0) => return Err(FramingError::MissingDelimiter { received: buf.len() }),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FramingError::Io(e)),
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_subslice(&buf[scan_from..], DELIMITER) {
            let idx = scan_from + pos;
            if idx > HEADER_MAX_BYTES {
                return Err(FramingError::HeaderTooLarge { received: idx, limit: HEADER_MAX_BYTES });
            }

            let mut header = buf.split_to(idx + DELIMITER.len());
            header.truncate(idx);
            debug!("header delimiter found: header={}B carried={}B", header.len(), buf.len());
            return Ok((header.freeze(), buf.freeze()));
        }

        if buf.len() > HEADER_MAX_BYTES + DELIMITER.len() {
            return Err(FramingError::HeaderTooLarge { received: buf.len(), limit: HEADER_MAX_BYTES });
        }

        scan_from = buf.len().saturating_sub(DELIMITER.len() - 1);
    }
}

/// Read and decode a plain-mode header. Returns the header, the bytes carried
/// past the delimiter, and the header's wire length (delimiter included).
pub fn read_delimited_header<R: Read + ?Sized>(
    r: &mut R,
) -> Result<(TransferHeader, Bytes, usize), FramingError> {
    let (raw, carried) = read_until_delimiter(r)?;
    let header = decode_transfer_header(&raw)?;
    Ok((header, carried, raw.len() + DELIMITER.len()))
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
