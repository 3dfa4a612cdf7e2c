// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Byte counters collected during one transfer.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCounters {
    /// Framing overhead: header, delimiter or length prefix.
    pub bytes_header: u64,
    /// Payload bytes moved over the stream (plaintext in plain mode).
    pub bytes_payload: u64,
    /// Ciphertext bytes moved over the stream (secure mode, tag included).
    pub bytes_ciphertext: u64,
    /// Bytes written to durable storage on the receiving side.
    pub bytes_written: u64,
}

impl TransferCounters {
    pub fn add_header(&mut self, wire_len: usize) {
        self.bytes_header += wire_len as u64;
    }

    pub fn add_payload(&mut self, n: u64) {
        self.bytes_payload += n;
    }

    pub fn add_ciphertext(&mut self, n: u64) {
        self.bytes_ciphertext += n;
    }

    pub fn add_written(&mut self, n: u64) {
        self.bytes_written += n;
    }

    /// Everything that crossed the wire.
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_header + self.bytes_payload + self.bytes_ciphertext
    }
}

impl AddAssign for TransferCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes_header     += rhs.bytes_header;
        self.bytes_payload    += rhs.bytes_payload;
        self.bytes_ciphertext += rhs.bytes_ciphertext;
        self.bytes_written    += rhs.bytes_written;
    }
}
