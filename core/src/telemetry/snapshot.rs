//! telemetry/snapshot.rs
//! Immutable summary of one pipeline run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::PipelineCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub blocks_read: u64,
    pub blocks_written: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub memory_stalls: u64,
    /// `bytes_out / bytes_in`, 0 for empty input.
    pub ratio: f64,
    pub throughput_in_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &PipelineCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let bytes_in = counters.bytes_in();
        let bytes_out = counters.bytes_out();

        let ratio = if bytes_in > 0 {
            bytes_out as f64 / bytes_in as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            blocks_read: counters.blocks_read(),
            blocks_written: counters.blocks_written(),
            bytes_in,
            bytes_out,
            memory_stalls: counters.memory_stalls(),
            ratio,
            throughput_in_bytes_per_sec: throughput,
            elapsed,
            stage_times: counters.stage_times(),
        }
    }

    /// Every block read was also written.
    pub fn is_complete(&self) -> bool {
        self.blocks_read == self.blocks_written
    }
}
