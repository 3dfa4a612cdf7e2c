//! headers/mod.rs
//! Public module export for the plain and secure transfer headers.
//!
//! Notes:
//! - Headers are JSON objects: strings, integers and nested maps of the same.
//! - The protocol version is checked before the rest of the shape, so an
//!   incompatible peer gets `UnsupportedVersion` rather than a JSON error.
//! - Framing (delimiter vs length prefix) is not this module's concern.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
