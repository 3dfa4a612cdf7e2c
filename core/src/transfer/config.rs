// ## 📂 File: `src/transfer/config.rs`

//! Listener, sender and secure-mode settings.
//!
//! All three load from JSON with every field optional; missing fields take
//! the defaults below.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_OUTPUT_DIR, DEFAULT_PORT, DEFAULT_REPLAY_TTL_SECS,
};
use crate::crypto::KdfParams;
use crate::headers::CipherSuite;
use crate::integrity::IntegrityOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("secure mode needs a non-empty password")]
    MissingPassword,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&raw).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
    /// Created on first receive if absent.
    pub output_dir: PathBuf,
    pub integrity: IntegrityOptions,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            integrity: IntegrityOptions::default(),
        }
    }
}

impl ListenerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout_ms: u64,
    /// Validate the file locally and compute the pixel fingerprint before sending.
    pub integrity: IntegrityOptions,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            integrity: IntegrityOptions::default(),
        }
    }
}

impl SenderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }
}

/// Secure-mode settings shared by both ends.
///
/// `kdf` and `cipher` must agree between sender and receiver. The cipher is
/// announced in the header `mode`; the KDF parameters are not on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureConfig {
    #[serde(skip_serializing)]
    pub password: String,
    pub cipher: CipherSuite,
    pub kdf: KdfParams,
    pub replay_ttl_secs: u64,
    /// Structurally validate the plaintext before it is written.
    pub validate_payload: bool,
}

impl Default for SecureConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            cipher: CipherSuite::default(),
            kdf: KdfParams::default(),
            replay_ttl_secs: DEFAULT_REPLAY_TTL_SECS,
            validate_payload: true,
        }
    }
}

impl fmt::Debug for SecureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureConfig")
            .field("password", &"<redacted>")
            .field("cipher", &self.cipher)
            .field("kdf", &self.kdf)
            .field("replay_ttl_secs", &self.replay_ttl_secs)
            .field("validate_payload", &self.validate_payload)
            .finish()
    }
}

impl SecureConfig {
    pub fn with_password(password: impl Into<String>) -> Self {
        Self { password: password.into(), ..Self::default() }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        Ok(())
    }
}
