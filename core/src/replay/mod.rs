//! replay/mod.rs
//! Time-windowed defence against replayed secure sessions.
//!
//! State per session id: unseen -> accepted -> (expired, purged).
//! The cache lives in process memory only. A receiver restart forgets every
//! accepted id, so a capture can be replayed once per restart while its
//! timestamp is still inside the window. That residual risk is accepted.

pub mod clock;
pub mod cache;

pub use clock::*;
pub use cache::*;
