//! Sensor adapter: threshold evaluation and degrade-to-safe reads.
//!
//! A failed read yields the safe default for that channel
//! (`ready=false`, `loaded=false`), logs a warning, and latches a fault
//! flag. A disconnected sensor must never cause a spurious fire, and no
//! read failure ever reaches the state machine as an error.

use cata_common::error::{AdapterError, FaultFlags};
use cata_common::state::SensorSnapshot;
use tracing::warn;

use super::{DistanceSensor, LimitSwitch};

/// Wraps the two launch sensors behind one per-cycle snapshot call.
#[derive(Debug)]
pub struct SensorAdapter<L, D> {
    limit: L,
    distance: D,
    /// Projectile-detection threshold [mm].
    load_threshold_mm: u32,
    /// Latched sensor faults.
    faults: FaultFlags,
}

impl<L: LimitSwitch, D: DistanceSensor> SensorAdapter<L, D> {
    /// Create an adapter with the configured detection threshold.
    pub fn new(limit: L, distance: D, load_threshold_mm: u32) -> Self {
        Self {
            limit,
            distance,
            load_threshold_mm,
            faults: FaultFlags::empty(),
        }
    }

    /// Read both sensors fresh. Pure query, no side effects beyond
    /// fault latching.
    pub fn snapshot(&mut self) -> SensorSnapshot {
        let limit_engaged = match self.limit.is_engaged() {
            Ok(engaged) => engaged,
            Err(e) => {
                self.record_fault(FaultFlags::READY_SENSOR_LOST, &e);
                false
            }
        };

        let projectile_loaded = match self.distance.distance_mm() {
            Ok(mm) => mm <= self.load_threshold_mm,
            Err(e) => {
                self.record_fault(FaultFlags::LOAD_SENSOR_LOST, &e);
                false
            }
        };

        SensorSnapshot {
            limit_engaged,
            projectile_loaded,
        }
    }

    /// Latched sensor faults observed so far.
    #[inline]
    pub fn faults(&self) -> FaultFlags {
        self.faults
    }

    fn record_fault(&mut self, flag: FaultFlags, error: &AdapterError) {
        // Warn once per channel; later failures only keep the latch set.
        if !self.faults.contains(flag) {
            warn!("sensor degraded, using safe default: {error}");
        }
        self.faults |= flag;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
