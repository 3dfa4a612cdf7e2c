// ## 📂 File: `src/replay/cache.rs`

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use thiserror::Error;

use crate::constants::DEFAULT_REPLAY_TTL_SECS;
use crate::replay::clock::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("replay detected: session {session_id} was already accepted")]
    ReplayDetected { session_id: String },

    #[error("timestamp {timestamp} outside freshness window (now={now}, ttl={ttl_secs}s)")]
    TimestampOutOfWindow { timestamp: i64, now: i64, ttl_secs: u64 },
}

/// Consumed session ids with the time each was first accepted.
///
/// `check_and_mark` runs purge, lookup, window check and insert under one lock,
/// so concurrent receivers sharing a cache (through `Arc`) cannot both accept
/// the same id.
pub struct ReplayCache {
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
    seen: Mutex<HashMap<String, i64>>,
}

impl std::fmt::Debug for ReplayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayCache")
            .field("ttl_secs", &self.ttl_secs)
            .field("entries", &self.len())
            .finish()
    }
}

impl Default for ReplayCache {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_TTL_SECS)
    }
}

impl ReplayCache {
    /// Cache driven by the wall clock.
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_clock(ttl_secs, Arc::new(SystemClock))
    }

    /// Cache driven by an injected clock.
    pub fn with_clock(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl_secs,
            clock,
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Accept `session_id` once, or say why not.
    ///
    /// 1. purge entries older than the TTL
    /// 2. an id still present is a replay (checked before the timestamp)
    /// 3. `|now - timestamp| > ttl` is out of window, past or future
    /// 4. record `session_id -> now`
    pub fn check_and_mark(&self, session_id: &str, timestamp: i64) -> Result<(), ReplayError> {
        let mut seen = self.lock();
        let now = self.clock.now_secs();
        let ttl = self.ttl_secs as i64;

        let before = seen.len();
        seen.retain(|_, accepted_at| now.saturating_sub(*accepted_at) <= ttl);
        if seen.len() != before {
            debug!("replay cache purged {} expired session(s)", before - seen.len());
        }

        if seen.contains_key(session_id) {
            warn!("rejecting replayed session {}", session_id);
            return Err(ReplayError::ReplayDetected { session_id: session_id.to_string() });
        }

        if now.saturating_sub(timestamp).unsigned_abs() > self.ttl_secs {
            warn!("rejecting session {}: timestamp {} vs now {}", session_id, timestamp, now);
            return Err(ReplayError::TimestampOutOfWindow {
                timestamp,
                now,
                ttl_secs: self.ttl_secs,
            });
        }

        seen.insert(session_id.to_string(), now);
        Ok(())
    }

    /// Whether `session_id` is currently recorded (no purge).
    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, i64>> {
        // Poison is ignored: every mutation is a single retain or insert.
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
