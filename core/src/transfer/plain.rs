// ## 📂 File: `src/transfer/plain.rs`

//! Plain mode: `<json header><\r\n\r\n><raw payload>` with a SHA-256 check.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::constants::{PROTOCOL_VERSION, SAVED_NAME_DIGEST_CHARS};
use crate::framing::{encode_delimited, read_delimited_header, recv_exact_into};
use crate::headers::TransferHeader;
use crate::integrity::{
    DeclaredIntegrity, ImageValidator, IntegrityError, IntegrityPipeline, IntegrityResult, PayloadValidator,
};
use crate::telemetry::{Stage, TelemetrySnapshot, TelemetryTimer, TransferCounters};
use crate::transfer::config::{ListenerConfig, SenderConfig};
use crate::transfer::outcome::{ReceiveOutcome, SendReport};
use crate::transfer::staging::StagedFile;
use crate::transfer::{accept_one, bind_listener, connect};
use crate::types::TransferError;
use crate::utils::{content_type_from_format, display_basename};

const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Display name for a local file.
pub(crate) fn local_display_name(path: &Path) -> String {
    let raw = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    display_basename(&raw)
}

pub struct PlainSender {
    config: SenderConfig,
    pipeline: IntegrityPipeline,
}

impl PlainSender {
    pub fn new(config: SenderConfig) -> Self {
        let pipeline = IntegrityPipeline::new(Arc::new(ImageValidator), config.integrity);
        Self { config, pipeline }
    }

    /// Swap in a different payload validator.
    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.pipeline = IntegrityPipeline::new(validator, self.config.integrity);
        self
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Connect to the configured receiver and send `path`.
    pub fn send_file(&self, path: &Path) -> Result<SendReport, TransferError> {
        let mut stream = connect(&self.config)?;
        let report = self.send_to(&mut stream, path)?;
        if let Err(e) = stream.shutdown(Shutdown::Write) {
            debug!("shutdown after send: {}", e);
        }
        Ok(report)
    }

    /// Validate and digest `path`, then build its header. Nothing is sent.
    pub fn prepare(
        &self,
        path: &Path,
        timer: &mut TelemetryTimer,
    ) -> Result<(TransferHeader, IntegrityResult), TransferError> {
        let computed = self.pipeline.compute(path, timer)?;

        let content_type = match &computed.info {
            Some(info) => content_type_from_format(&info.format),
            None => UNKNOWN_CONTENT_TYPE.to_string(),
        };

        let header = TransferHeader {
            protocol_version: PROTOCOL_VERSION,
            filename: local_display_name(path),
            content_type,
            size_bytes: computed.size_bytes,
            sha256: computed.sha256.clone(),
            width: computed.info.as_ref().map(|i| i.width),
            height: computed.info.as_ref().map(|i| i.height),
            pixel_fp: computed.pixel_fp.clone(),
        };
        Ok((header, computed))
    }

    /// Send `path` over an already-open stream.
    pub fn send_to<W: Write + ?Sized>(&self, w: &mut W, path: &Path) -> Result<SendReport, TransferError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TransferCounters::default();

        let (header, computed) = self.prepare(path, &mut timer)?;
        let head = encode_delimited(&header)?;

        let mut file = BufReader::new(File::open(path)?);
        let sent = timer.time(Stage::Send, || -> io::Result<u64> {
            w.write_all(&head)?;
            let n = recv_exact_into(&mut file, w, header.size_bytes, &[])?;
            w.flush()?;
            Ok(n)
        })?;
        counters.add_header(head.len());
        counters.add_payload(sent);

        if sent != header.size_bytes {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} shrank while sending: {} of {} bytes", path.display(), sent, header.size_bytes),
            )
            .into());
        }

        timer.finish();
        info!("sent {} ({}B, sha256={})", header.filename, sent, header.sha256);

        Ok(SendReport {
            filename: header.filename,
            size_bytes: header.size_bytes,
            sha256: header.sha256,
            info: computed.info,
            session_id: None,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }
}

pub struct PlainReceiver {
    config: ListenerConfig,
    pipeline: IntegrityPipeline,
}

impl PlainReceiver {
    pub fn new(config: ListenerConfig) -> Self {
        let pipeline = IntegrityPipeline::new(Arc::new(ImageValidator), config.integrity);
        Self { config, pipeline }
    }

    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.pipeline = IntegrityPipeline::new(validator, self.config.integrity);
        self
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    pub fn bind(&self) -> Result<TcpListener, TransferError> {
        Ok(bind_listener(&self.config)?)
    }

    /// Bind, accept one connection, receive, return.
    pub fn serve_once(&self) -> Result<ReceiveOutcome, TransferError> {
        let listener = self.bind()?;
        self.serve_on(&listener)
    }

    /// Accept one connection on an existing listener and receive from it.
    pub fn serve_on(&self, listener: &TcpListener) -> Result<ReceiveOutcome, TransferError> {
        let (mut stream, _peer) = accept_one(listener)?;
        self.receive_from(&mut stream)
    }

    /// Run the receiving half of the protocol over any byte stream.
    pub fn receive_from<R: Read + ?Sized>(&self, r: &mut R) -> Result<ReceiveOutcome, TransferError> {
        self.receive_inner(r).map_err(|e| {
            warn!("plain receive rejected ({}): {}", e.kind(), e);
            e
        })
    }

    fn receive_inner<R: Read + ?Sized>(&self, r: &mut R) -> Result<ReceiveOutcome, TransferError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TransferCounters::default();

        fs::create_dir_all(&self.config.output_dir)?;

        let (header, carried, wire_len) = timer.time(Stage::Receive, || read_delimited_header(r))?;
        counters.add_header(wire_len);
        debug!(
            "header: {} {}B {} carried={}B",
            header.filename,
            header.size_bytes,
            header.content_type,
            carried.len()
        );

        let name = display_basename(&header.filename);
        let mut staged = StagedFile::create(&self.config.output_dir, &name)?;

        let received = timer.time(Stage::Receive, || recv_exact_into(r, &mut staged, header.size_bytes, &carried))?;
        counters.add_payload(received);
        if received < header.size_bytes {
            return Err(IntegrityError::Incomplete { expected: header.size_bytes, received }.into());
        }

        timer.time(Stage::Write, || staged.finish())?;
        counters.add_written(received);

        let verified = self.pipeline.verify(staged.path(), &DeclaredIntegrity::from(&header), &mut timer)?;

        let prefix = verified.sha256.get(..SAVED_NAME_DIGEST_CHARS).unwrap_or(&verified.sha256);
        let final_path = self.config.output_dir.join(format!("{}__{}", prefix, name));
        let saved_path = staged.commit(&final_path)?;

        timer.finish();
        info!("received {} -> {} ({}B)", name, saved_path.display(), verified.size_bytes);

        Ok(ReceiveOutcome {
            saved_path,
            filename: name,
            size_bytes: verified.size_bytes,
            sha256: verified.sha256,
            pixel_fp: verified.pixel_fp,
            info: verified.info,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }
}
