//! Backpressure before work is admitted into a pool.
//!
//! The gate asks a [`MemoryProbe`] whether a fixed reservation fits right now.
//! If it does not, the admitting thread sleeps and asks again. Work is delayed,
//! never dropped.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{trace, warn};
use sysinfo::System;

use crate::constants::{DEFAULT_MEMORY_RESERVATION, DEFAULT_RETRY_INTERVAL};
use crate::types::StreamError;

/// "Can N bytes be reserved right now?"
pub trait MemoryProbe: Send + Sync + fmt::Debug {
    /// Bytes currently available for new allocations.
    fn available(&self) -> u64;

    /// Upper bound `available()` can ever reach.
    fn capacity(&self) -> u64;
}

/// Host memory as reported by the operating system.
pub struct SystemMemoryProbe {
    system: Mutex<System>,
}

impl SystemMemoryProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        Self { system: Mutex::new(system) }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemMemoryProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemMemoryProbe").finish_non_exhaustive()
    }
}

impl MemoryProbe for SystemMemoryProbe {
    fn available(&self) -> u64 {
        let mut sys = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_memory();
        sys.available_memory()
    }

    fn capacity(&self) -> u64 {
        let sys = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        sys.total_memory()
    }
}

/// Always admits.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnboundedProbe;

impl MemoryProbe for UnboundedProbe {
    fn available(&self) -> u64 {
        u64::MAX
    }

    fn capacity(&self) -> u64 {
        u64::MAX
    }
}

#[derive(Debug, Clone)]
pub struct MemoryGateConfig {
    /// Bytes that must be available before one item is admitted.
    pub reservation: u64,
    /// Sleep between two failed probes.
    pub retry_interval: Duration,
    pub probe: Arc<dyn MemoryProbe>,
}

impl MemoryGateConfig {
    /// Gate that never stalls.
    pub fn unbounded() -> Self {
        Self { probe: Arc::new(UnboundedProbe), ..Self::default() }
    }
}

impl Default for MemoryGateConfig {
    fn default() -> Self {
        Self {
            reservation: DEFAULT_MEMORY_RESERVATION,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            probe: Arc::new(SystemMemoryProbe::new()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryGate {
    config: MemoryGateConfig,
}

impl MemoryGate {
    pub fn new(config: MemoryGateConfig) -> Self {
        Self { config }
    }

    /// Block until the reservation fits, returning how many times it stalled.
    ///
    /// Fails only when the reservation exceeds the probe's capacity, since
    /// waiting could never succeed then.
    pub fn admit(&self) -> Result<u32, StreamError> {
        let requested = self.config.reservation;
        let capacity = self.config.probe.capacity();
        if requested > capacity {
            return Err(StreamError::MemoryExhausted { requested, capacity });
        }

        let mut stalls = 0u32;
        loop {
            let available = self.config.probe.available();
            if available >= requested {
                trace!("memory gate admitted ({} bytes available)", available);
                return Ok(stalls);
            }
            stalls = stalls.saturating_add(1);
            warn!(
                "memory gate: {} bytes available, {} required; retrying in {:?}",
                available, requested, self.config.retry_interval
            );
            thread::sleep(self.config.retry_interval);
        }
    }
}
