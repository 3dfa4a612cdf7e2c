//! integrity/mod.rs
//! Digest, structural validation and advisory fingerprinting of payload files.
//!
//! Two error families on purpose:
//! - `IntegrityError`: the bytes changed or went missing in transit.
//! - `ValidationError`: the bytes are intact but do not decode, or disagree
//!   with the metadata the sender declared.

pub mod types;
pub mod digest;
pub mod validator;
pub mod pipeline;
pub mod checks;

pub use types::*;
pub use digest::*;
pub use validator::*;
pub use pipeline::*;
pub use checks::*;
