// ## 📂 File: `src/constants.rs`

/// Protocol version carried by every header. Receivers require an exact match.
pub const PROTOCOL_VERSION: u32 = 1;

/// End-of-header marker for plain-mode framing.
// Compact JSON escapes control characters inside strings and emits no
// whitespace between tokens, so a raw CR/LF pair can never occur in the header.
pub const DELIMITER: &[u8] = b"\r\n\r\n";

/// Upper bound on an encoded header (both framing modes).
pub const HEADER_MAX_BYTES: usize = 64 * 1024; // 64 KiB

/// Socket/file read granularity.
pub const CHUNK_SIZE: usize = 64 * 1024; // 64 KiB

/// Digest rolling buffer.
pub const DIGEST_BUF_SIZE: usize = 1024 * 1024; // 1 MiB

/// Largest ciphertext a secure receiver will buffer in memory.
pub const MAX_SECURE_PAYLOAD: u64 = 512 * 1024 * 1024; // 512 MiB

/// Width of the length prefix in secure-mode framing (u32 BE).
pub const LENGTH_PREFIX_LEN: usize = 4;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_OUTPUT_DIR: &str = "outputs/received";

/// Freshness window for secure sessions (seconds).
pub const DEFAULT_REPLAY_TTL_SECS: u64 = 300;

/// Sender connect timeout (milliseconds).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Prefix of staged files that are still being written.
pub const PARTIAL_PREFIX: &str = ".partial-";

/// Number of digest hex chars used in plain-mode saved names.
pub const SAVED_NAME_DIGEST_CHARS: usize = 12;

/// Longest display name kept from a header `filename` (bytes).
pub const DISPLAY_NAME_MAX_BYTES: usize = 128;

/// scrypt work factors.
pub mod kdf_params {
    /// N = 2^14, the interactive-login recommendation.
    pub const DEFAULT_LOG_N: u8 = 14;
    pub const DEFAULT_R: u32 = 8;
    pub const DEFAULT_P: u32 = 1;
    /// Refuse anything cheaper than N = 2^10.
    pub const MIN_LOG_N: u8 = 10;
}
