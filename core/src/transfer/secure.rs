// ## 📂 File: `src/transfer/secure.rs`

//! Secure mode: `<u32 BE header len><json header><AEAD ciphertext>`.
//!
//! Receiver order: header (version + mode) -> replay window -> ciphertext ->
//! associated data rebuilt from parsed fields -> decrypt -> validate -> stage
//! and rename. Nothing touches the output directory before the tag verifies.

use std::fs;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpListener};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::constants::{MAX_SECURE_PAYLOAD, PROTOCOL_VERSION};
use crate::crypto::{aad_for_received, build_aad, decrypt, encrypt, new_session_id, TAG_LEN};
use crate::framing::{frame_secure_message, read_ciphertext, read_length_prefixed_header};
use crate::headers::{AssociatedData, SecureHeader};
use crate::integrity::{sha256_bytes, ImageInfo, ImageValidator, PayloadValidator};
use crate::replay::{Clock, ReplayCache, SystemClock};
use crate::telemetry::{Stage, TelemetrySnapshot, TelemetryTimer, TransferCounters};
use crate::transfer::config::{ListenerConfig, SecureConfig, SenderConfig};
use crate::transfer::outcome::{SecureReceiveOutcome, SendReport};
use crate::transfer::plain::local_display_name;
use crate::transfer::staging::StagedFile;
use crate::transfer::{accept_one, bind_listener, connect};
use crate::types::TransferError;
use crate::utils::display_basename;

/// One encrypted file, ready to frame.
#[derive(Debug, Clone)]
pub struct SealedFile {
    pub header: SecureHeader,
    pub ciphertext: Vec<u8>,
    /// SHA-256 of the plaintext.
    pub sha256: String,
    pub size_bytes: u64,
    pub info: Option<ImageInfo>,
}

pub struct SecureSender {
    config: SenderConfig,
    secure: SecureConfig,
    clock: Arc<dyn Clock>,
    validator: Arc<dyn PayloadValidator>,
}

impl SecureSender {
    pub fn new(config: SenderConfig, secure: SecureConfig) -> Self {
        Self {
            config,
            secure,
            clock: Arc::new(SystemClock),
            validator: Arc::new(ImageValidator),
        }
    }

    /// Timestamp sessions from `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn send_file(&self, path: &Path) -> Result<SendReport, TransferError> {
        let mut stream = connect(&self.config)?;
        let report = self.send_to(&mut stream, path)?;
        if let Err(e) = stream.shutdown(Shutdown::Write) {
            debug!("shutdown after send: {}", e);
        }
        Ok(report)
    }

    /// Read and encrypt `path` under a fresh session id, salt and nonce.
    pub fn seal_file(&self, path: &Path, timer: &mut TelemetryTimer) -> Result<SealedFile, TransferError> {
        self.secure.validate()?;

        let len = fs::metadata(path)?.len();
        if len + TAG_LEN as u64 > MAX_SECURE_PAYLOAD {
            return Err(TransferError::Protocol(format!(
                "{} is {} bytes, over the secure-mode limit of {}",
                path.display(),
                len,
                MAX_SECURE_PAYLOAD - TAG_LEN as u64
            )));
        }

        let plaintext = timer.time(Stage::Read, || fs::read(path))?;
        let info = if self.secure.validate_payload {
            Some(timer.time(Stage::Validate, || self.validator.validate_bytes(&plaintext))?)
        } else {
            None
        };

        let associated_data = AssociatedData {
            session_id: new_session_id(),
            timestamp: self.clock.now_secs(),
            filename: local_display_name(path),
        };
        let aad = build_aad(&associated_data)?;

        let suite = self.secure.cipher;
        let sealed = timer.time(Stage::Encrypt, || {
            encrypt(&self.secure.password, &plaintext, &aad, suite, &self.secure.kdf)
        })?;

        let header = SecureHeader {
            protocol_version: PROTOCOL_VERSION,
            mode: suite.mode_label().to_string(),
            session_id: associated_data.session_id.clone(),
            timestamp: associated_data.timestamp,
            filename: associated_data.filename.clone(),
            salt: hex::encode(sealed.salt),
            nonce: hex::encode(sealed.nonce),
            associated_data,
            cipher_len: sealed.ciphertext.len() as u64,
        };
        Ok(SealedFile {
            header,
            ciphertext: sealed.ciphertext,
            sha256: timer.time(Stage::Hash, || sha256_bytes(&plaintext)),
            size_bytes: plaintext.len() as u64,
            info,
        })
    }

    pub fn send_to<W: Write + ?Sized>(&self, w: &mut W, path: &Path) -> Result<SendReport, TransferError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TransferCounters::default();

        let sealed = self.seal_file(path, &mut timer)?;
        let message = frame_secure_message(&sealed.header, &sealed.ciphertext)?;

        timer.time(Stage::Send, || -> io::Result<()> {
            w.write_all(&message)?;
            w.flush()
        })?;
        counters.add_header(message.len() - sealed.ciphertext.len());
        counters.add_ciphertext(sealed.ciphertext.len() as u64);

        timer.finish();
        info!(
            "sent {} securely (session {}, {}B ciphertext)",
            sealed.header.filename,
            sealed.header.session_id,
            sealed.ciphertext.len()
        );

        Ok(SendReport {
            filename: sealed.header.filename,
            size_bytes: sealed.size_bytes,
            sha256: sealed.sha256,
            info: sealed.info,
            session_id: Some(sealed.header.session_id),
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }
}

pub struct SecureReceiver {
    config: ListenerConfig,
    secure: SecureConfig,
    replay: Arc<ReplayCache>,
    validator: Arc<dyn PayloadValidator>,
}

impl SecureReceiver {
    /// Receiver with its own replay cache on the wall clock.
    pub fn new(config: ListenerConfig, secure: SecureConfig) -> Self {
        let replay = Arc::new(ReplayCache::new(secure.replay_ttl_secs));
        Self { config, secure, replay, validator: Arc::new(ImageValidator) }
    }

    /// Share a replay cache across receivers (e.g. one per accepted connection).
    pub fn with_replay_cache(mut self, replay: Arc<ReplayCache>) -> Self {
        self.replay = replay;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn replay_cache(&self) -> &Arc<ReplayCache> {
        &self.replay
    }

    pub fn bind(&self) -> Result<TcpListener, TransferError> {
        Ok(bind_listener(&self.config)?)
    }

    pub fn serve_once(&self) -> Result<SecureReceiveOutcome, TransferError> {
        let listener = self.bind()?;
        self.serve_on(&listener)
    }

    pub fn serve_on(&self, listener: &TcpListener) -> Result<SecureReceiveOutcome, TransferError> {
        let (mut stream, _peer) = accept_one(listener)?;
        self.receive_from(&mut stream)
    }

    pub fn receive_from<R: Read + ?Sized>(&self, r: &mut R) -> Result<SecureReceiveOutcome, TransferError> {
        self.receive_inner(r).map_err(|e| {
            warn!("secure receive rejected ({}): {}", e.kind(), e);
            e
        })
    }

    fn receive_inner<R: Read + ?Sized>(&self, r: &mut R) -> Result<SecureReceiveOutcome, TransferError> {
        self.secure.validate()?;

        let mut timer = TelemetryTimer::new();
        let mut counters = TransferCounters::default();

        let (header, wire_len) = timer.time(Stage::Receive, || read_length_prefixed_header(r))?;
        counters.add_header(wire_len);

        self.replay.check_and_mark(&header.session_id, header.timestamp)?;
        debug!("session {} accepted by replay window", header.session_id);

        let ciphertext = timer.time(Stage::Receive, || read_ciphertext(r, &header))?;
        counters.add_ciphertext(ciphertext.len() as u64);

        let aad = aad_for_received(&header)?;
        let salt = header.salt_bytes()?;
        let nonce = header.nonce_bytes()?;
        let suite = header.cipher_suite()?;

        let plaintext = timer.time(Stage::Decrypt, || {
            decrypt(&self.secure.password, &salt, &nonce, &ciphertext, &aad, suite, &self.secure.kdf)
        })?;

        let info = if self.secure.validate_payload {
            Some(timer.time(Stage::Validate, || self.validator.validate_bytes(&plaintext))?)
        } else {
            None
        };
        let sha256 = timer.time(Stage::Hash, || sha256_bytes(&plaintext));

        fs::create_dir_all(&self.config.output_dir)?;
        let name = display_basename(&header.filename);
        let mut staged = StagedFile::create(&self.config.output_dir, &name)?;
        timer.time(Stage::Write, || -> io::Result<()> {
            staged.write_all(&plaintext)?;
            staged.finish()
        })?;
        counters.add_written(plaintext.len() as u64);

        let final_path = self.config.output_dir.join(format!("{}__{}", header.session_id, name));
        let saved_path = staged.commit(&final_path)?;

        timer.finish();
        info!("received {} securely -> {} (session {})", name, saved_path.display(), header.session_id);

        Ok(SecureReceiveOutcome {
            saved_path,
            session_id: header.session_id,
            timestamp: header.timestamp,
            filename: name,
            size_bytes: plaintext.len() as u64,
            sha256,
            info,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }
}
