use std::io;
use thiserror::Error;

use crate::{
    crypto::CryptoError,
    framing::FramingError,
    headers::HeaderError,
    integrity::{IntegrityError, ValidationError},
    replay::ReplayError,
    transfer::ConfigError,
};

/// Unified transfer error covering every way one transfer attempt can end badly.
/// - `From<T>` impls for the module errors enable `?` across the orchestrators.
/// - Every variant is terminal for the current transfer; nothing is retried internally.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Local or socket I/O failure outside of framing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed, oversized or undelimited header, or an unsupported version.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Peer closed the stream before the announced byte count arrived.
    #[error("connection closed: expected {expected} bytes, received {received}")]
    ConnectionClosed { expected: u64, received: u64 },

    /// Bytes were lost or altered in transit.
    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// Bytes are intact but do not decode, or disagree with declared metadata.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("replay detected: session {session_id} was already accepted")]
    ReplayDetected { session_id: String },

    #[error("timestamp {timestamp} outside freshness window (now={now}, ttl={ttl_secs}s)")]
    TimestampOutOfWindow { timestamp: i64, now: i64, ttl_secs: u64 },

    /// AEAD open failed. Deliberately says nothing about why.
    #[error("authentication failed")]
    Authentication,

    /// Local crypto misuse (bad parameters, unsupported suite).
    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    /// Local settings are unusable (missing password, bad config file).
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl TransferError {
    /// Stable short name for logs and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            TransferError::Io(_) => "io",
            TransferError::Protocol(_) => "protocol",
            TransferError::ConnectionClosed { .. } => "connection_closed",
            TransferError::Integrity(_) => "integrity",
            TransferError::Validation(_) => "validation",
            TransferError::ReplayDetected { .. } => "replay_detected",
            TransferError::TimestampOutOfWindow { .. } => "timestamp_out_of_window",
            TransferError::Authentication => "authentication",
            TransferError::Crypto(_) => "crypto",
            TransferError::Config(_) => "config",
        }
    }
}

impl From<FramingError> for TransferError {
    fn from(e: FramingError) -> Self {
        match e {
            FramingError::ConnectionClosed { expected, received } => {
                TransferError::ConnectionClosed { expected, received }
            }
            FramingError::Io(e) => TransferError::Io(e),
            other => TransferError::Protocol(other.to_string()),
        }
    }
}

impl From<HeaderError> for TransferError {
    fn from(e: HeaderError) -> Self {
        TransferError::Protocol(e.to_string())
    }
}

impl From<CryptoError> for TransferError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Authentication => TransferError::Authentication,
            other => TransferError::Crypto(other),
        }
    }
}

impl From<ReplayError> for TransferError {
    fn from(e: ReplayError) -> Self {
        match e {
            ReplayError::ReplayDetected { session_id } => TransferError::ReplayDetected { session_id },
            ReplayError::TimestampOutOfWindow { timestamp, now, ttl_secs } => {
                TransferError::TimestampOutOfWindow { timestamp, now, ttl_secs }
            }
        }
    }
}
