use std::io;
use thiserror::Error;

use crate::headers::HeaderError;

#[derive(Debug, Error)]
pub enum FramingError {
    /// No delimiter within the accumulated-size ceiling.
    #[error("header exceeds max size: {received} bytes without delimiter (limit {limit})")]
    HeaderTooLarge { received: usize, limit: usize },

    /// Stream ended while still looking for the delimiter.
    #[error("connection closed before header delimiter ({received} bytes buffered)")]
    MissingDelimiter { received: usize },

    /// Length prefix outside `1..=HEADER_MAX_BYTES`.
    #[error("invalid header length prefix: {0}")]
    InvalidLength(u32),

    /// Caller handed over a body whose length disagrees with the header.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// Stream ended before an exact-length read was satisfied.
    #[error("connection closed: expected {expected} bytes, received {received}")]
    ConnectionClosed { expected: u64, received: u64 },

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
