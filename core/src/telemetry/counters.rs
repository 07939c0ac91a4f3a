//! telemetry/counters.rs
//! Counters updated concurrently while a pipeline runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::telemetry::timers::{Stage, StageTimes};

#[derive(Debug, Default)]
pub struct PipelineCounters {
    blocks_read: AtomicU64,
    blocks_written: AtomicU64,
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
    memory_stalls: AtomicU64,
    read_nanos: AtomicU64,
    transform_nanos: AtomicU64,
    write_nanos: AtomicU64,
}

impl PipelineCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// One block left the reader; `len` is its on-input size, framing included.
    pub fn add_read(&self, len: usize) {
        self.blocks_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_in.fetch_add(len as u64, Ordering::Relaxed);
    }

    /// One block reached the destination; `len` bytes were written for it.
    pub fn add_written(&self, len: usize) {
        self.blocks_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_out.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub fn add_memory_stalls(&self, stalls: u32) {
        if stalls > 0 {
            self.memory_stalls.fetch_add(stalls as u64, Ordering::Relaxed);
        }
    }

    /// Accumulated across threads, so the sum may exceed wall time.
    pub fn add_stage_time(&self, stage: Stage, dur: Duration) {
        let nanos = u64::try_from(dur.as_nanos()).unwrap_or(u64::MAX);
        self.stage_slot(stage).fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn blocks_read(&self) -> u64 {
        self.blocks_read.load(Ordering::Relaxed)
    }

    pub fn blocks_written(&self) -> u64 {
        self.blocks_written.load(Ordering::Relaxed)
    }

    pub fn bytes_in(&self) -> u64 {
        self.bytes_in.load(Ordering::Relaxed)
    }

    pub fn bytes_out(&self) -> u64 {
        self.bytes_out.load(Ordering::Relaxed)
    }

    pub fn memory_stalls(&self) -> u64 {
        self.memory_stalls.load(Ordering::Relaxed)
    }

    pub fn stage_times(&self) -> StageTimes {
        let mut times = StageTimes::default();
        for stage in Stage::ALL {
            let nanos = self.stage_slot(stage).load(Ordering::Relaxed);
            times.add(stage, Duration::from_nanos(nanos));
        }
        times
    }

    fn stage_slot(&self, stage: Stage) -> &AtomicU64 {
        match stage {
            Stage::Read => &self.read_nanos,
            Stage::Transform => &self.transform_nanos,
            Stage::Write => &self.write_nanos,
        }
    }
}
