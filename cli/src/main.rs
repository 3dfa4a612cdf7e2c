use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use imgtx_core::headers::CipherSuite;

mod commands;

#[derive(Parser)]
#[command(name = "imgtx")]
#[command(about = "Send and receive images over TCP, plain or encrypted", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Host/port/config flags shared by every network command.
#[derive(clap::Args, Debug, Clone)]
pub struct NetArgs {
    /// JSON config file (listener config for receivers, sender config for senders)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SecureArgs {
    /// JSON file with secure-mode settings
    #[arg(long)]
    pub secure_config: Option<PathBuf>,

    #[arg(long, env = "IMGTX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, value_enum)]
    pub cipher: Option<CipherArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CipherArg {
    Aes,
    Chacha,
}

impl From<CipherArg> for CipherSuite {
    fn from(c: CipherArg) -> Self {
        match c {
            CipherArg::Aes => CipherSuite::Aes256Gcm,
            CipherArg::Chacha => CipherSuite::Chacha20Poly1305,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Receive one image in plain mode
    Recv {
        #[command(flatten)]
        net: NetArgs,

        /// Directory for received files
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Keep accepting connections after each transfer
        #[arg(long)]
        forever: bool,

        /// Skip the image decode check
        #[arg(long)]
        no_validate: bool,
    },
    /// Send one image in plain mode
    Send {
        file: PathBuf,

        #[command(flatten)]
        net: NetArgs,

        /// Include the pixel fingerprint in the header
        #[arg(long)]
        fingerprint: bool,
    },
    /// Receive one encrypted image
    SecureRecv {
        #[command(flatten)]
        net: NetArgs,

        #[command(flatten)]
        secure: SecureArgs,

        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(long)]
        forever: bool,
    },
    /// Encrypt and send one image
    SecureSend {
        file: PathBuf,

        #[command(flatten)]
        net: NetArgs,

        #[command(flatten)]
        secure: SecureArgs,
    },
    /// Run the local preflight checks, optionally against a received copy
    Check {
        file: PathBuf,

        /// Received file to compare with
        #[arg(long)]
        against: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_default_env().filter_level(level).init();

    match cli.command {
        Commands::Recv { net, out, forever, no_validate } => commands::recv(&net, out, forever, no_validate),
        Commands::Send { file, net, fingerprint } => commands::send(&file, &net, fingerprint),
        Commands::SecureRecv { net, secure, out, forever } => commands::secure_recv(&net, &secure, out, forever),
        Commands::SecureSend { file, net, secure } => commands::secure_send(&file, &net, &secure),
        Commands::Check { file, against } => commands::check(&file, against.as_deref()),
    }
}
