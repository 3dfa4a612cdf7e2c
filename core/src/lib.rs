//! imgtx-core
//!
//! Point-to-point image transfer over TCP.
//! Plain mode ships a JSON header, a delimiter and the raw bytes, checked by
//! SHA-256 and a full image decode. Secure mode ships a length-prefixed JSON
//! header and an AEAD ciphertext keyed by scrypt, guarded by a replay window.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Wire
pub mod headers;
pub mod framing;

// Payload checks and secure session
pub mod integrity;
pub mod crypto;
pub mod replay;
pub mod telemetry;

// Senders and receivers
pub mod transfer;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::crypto::KdfParams;
    pub use crate::headers::{CipherSuite, SecureHeader, TransferHeader};
    pub use crate::integrity::{
        sender_preflight, receiver_postflight, CheckResult, ImageInfo, ImageValidator, IntegrityOptions,
        PayloadValidator,
    };
    pub use crate::replay::{Clock, ManualClock, ReplayCache, SystemClock};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::transfer::{
        ListenerConfig, PlainReceiver, PlainSender, ReceiveOutcome, SecureConfig, SecureReceiveOutcome,
        SecureReceiver, SecureSender, SendReport, SenderConfig,
    };
    pub use crate::types::TransferError;
}
