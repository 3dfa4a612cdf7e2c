//! Subcommand bodies. Each one builds configs (file first, flags on top),
//! runs the core, and prints the outcome as JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{error, info};
use serde::Serialize;

use imgtx_core::integrity::{all_passed, receiver_postflight, sender_preflight, CheckResult, ImageValidator};
use imgtx_core::transfer::{
    ListenerConfig, PlainReceiver, PlainSender, SecureConfig, SecureReceiver, SecureSender, SenderConfig,
};

use crate::{NetArgs, SecureArgs};

fn listener_config(net: &NetArgs, out: Option<PathBuf>) -> Result<ListenerConfig> {
    let mut cfg = match &net.config {
        Some(path) => ListenerConfig::from_json_file(path)?,
        None => ListenerConfig::default(),
    };
    if let Some(host) = &net.host {
        cfg.host = host.clone();
    }
    if let Some(port) = net.port {
        cfg.port = port;
    }
    if let Some(out) = out {
        cfg.output_dir = out;
    }
    Ok(cfg)
}

fn sender_config(net: &NetArgs) -> Result<SenderConfig> {
    let mut cfg = match &net.config {
        Some(path) => SenderConfig::from_json_file(path)?,
        None => SenderConfig::default(),
    };
    if let Some(host) = &net.host {
        cfg.host = host.clone();
    }
    if let Some(port) = net.port {
        cfg.port = port;
    }
    Ok(cfg)
}

fn secure_config(args: &SecureArgs) -> Result<SecureConfig> {
    let mut cfg = match &args.secure_config {
        Some(path) => SecureConfig::from_json_file(path)?,
        None => SecureConfig::default(),
    };
    if let Some(pw) = &args.password {
        cfg.password = pw.clone();
    }
    if let Some(cipher) = args.cipher {
        cfg.cipher = cipher.into();
    }
    if cfg.password.is_empty() {
        bail!("secure mode needs a password (--password or IMGTX_PASSWORD)");
    }
    Ok(cfg)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn recv(net: &NetArgs, out: Option<PathBuf>, forever: bool, no_validate: bool) -> Result<()> {
    let mut cfg = listener_config(net, out)?;
    if no_validate {
        cfg.integrity.validate = false;
    }
    let receiver = PlainReceiver::new(cfg);
    let listener = receiver.bind().context("bind listener")?;

    loop {
        match receiver.serve_on(&listener) {
            Ok(outcome) => print_json(&outcome)?,
            Err(e) if forever => error!("transfer failed: {}", e),
            Err(e) => return Err(e).context("receive failed"),
        }
        if !forever {
            return Ok(());
        }
        info!("waiting for the next sender");
    }
}

pub fn send(file: &Path, net: &NetArgs, fingerprint: bool) -> Result<()> {
    let mut cfg = sender_config(net)?;
    if fingerprint {
        cfg.integrity.fingerprint = true;
    }
    let report = PlainSender::new(cfg)
        .send_file(file)
        .with_context(|| format!("send {}", file.display()))?;
    print_json(&report)
}

pub fn secure_recv(net: &NetArgs, secure: &SecureArgs, out: Option<PathBuf>, forever: bool) -> Result<()> {
    let cfg = listener_config(net, out)?;
    let receiver = SecureReceiver::new(cfg, secure_config(secure)?);
    let listener = receiver.bind().context("bind listener")?;

    // One receiver for the whole loop keeps one replay cache.
    loop {
        match receiver.serve_on(&listener) {
            Ok(outcome) => print_json(&outcome)?,
            Err(e) if forever => error!("secure transfer failed: {}", e),
            Err(e) => return Err(e).context("secure receive failed"),
        }
        if !forever {
            return Ok(());
        }
        info!("waiting for the next sender");
    }
}

pub fn secure_send(file: &Path, net: &NetArgs, secure: &SecureArgs) -> Result<()> {
    let sender = SecureSender::new(sender_config(net)?, secure_config(secure)?);
    let report = sender
        .send_file(file)
        .with_context(|| format!("secure send {}", file.display()))?;
    print_json(&report)
}

#[derive(Serialize)]
struct CheckReport {
    preflight: Vec<CheckResult>,
    postflight: Option<Vec<CheckResult>>,
    passed: bool,
}

pub fn check(file: &Path, against: Option<&Path>) -> Result<()> {
    let (preflight, meta) = sender_preflight(file, &ImageValidator);
    let postflight = against.map(|received| receiver_postflight(received, &meta, &ImageValidator));

    let passed = all_passed(&preflight) && postflight.as_deref().map_or(true, all_passed);
    print_json(&CheckReport { preflight, postflight, passed })?;

    if !passed {
        bail!("checks failed");
    }
    Ok(())
}
