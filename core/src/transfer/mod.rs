//! transfer/mod.rs
//! One-shot senders and receivers for both wire modes.
//!
//! Every entry point serves exactly one connection and returns a typed outcome
//! or a `TransferError`. Looping ("listen again for the next client") is the
//! caller's business.

pub mod config;
pub mod staging;
pub mod outcome;
pub mod plain;
pub mod secure;

pub use config::*;
pub use staging::*;
pub use outcome::*;
pub use plain::*;
pub use secure::*;

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info};

/// Bind the listener described by `config`.
pub fn bind_listener(config: &ListenerConfig) -> io::Result<TcpListener> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))?;
    info!("listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Block until one peer connects.
pub(crate) fn accept_one(listener: &TcpListener) -> io::Result<(TcpStream, SocketAddr)> {
    let (stream, peer) = listener.accept()?;
    info!("connection from {}", peer);
    Ok((stream, peer))
}

/// Connect to the receiver, trying every resolved address in turn.
pub fn connect(config: &SenderConfig) -> io::Result<TcpStream> {
    let timeout = Duration::from_millis(config.connect_timeout_ms);
    let mut last_err = None;

    for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                debug!("connected to {}", addr);
                return Ok(stream);
            }
            Err(e) => {
                debug!("connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("{} resolved to no addresses", config.host))
    }))
}
