//! Wire framing for plain and secure transfers.
//!
//! Responsibilities:
//! - Delimiter framing: `<json header><DELIMITER><raw payload>`
//! - Length-prefix framing: `<u32 BE len><json header><ciphertext>`
//! - The "receive exactly N bytes into a sink" primitive both modes share
//!
//! Non-responsibilities:
//! - Cryptography
//! - Digest / validation
//! - Accepting connections

pub mod types;
pub mod io;
pub mod delimited;
pub mod length_prefixed;

pub use types::FramingError;
pub use io::{read_exact_or_closed, recv_exact_into};
pub use delimited::{encode_delimited, read_delimited_header, read_until_delimiter};
pub use length_prefixed::{encode_length_prefixed, frame_secure_message, read_ciphertext, read_length_prefixed_header};
