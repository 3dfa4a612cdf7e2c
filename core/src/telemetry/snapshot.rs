// ## src/telemetry/snapshot.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TransferCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Frozen view of one transfer's counters and timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TransferCounters,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TransferCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let moved = counters.bytes_payload.max(counters.bytes_ciphertext);
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            moved as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Stage times can never add up to more than the whole transfer.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
    }
}
